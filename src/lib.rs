//! # ag-analytics: Portfolio Performance Analytics
//!
//! This library turns a table of daily closing prices (a set of assets plus
//! one benchmark series) into portfolio performance analytics.
//!
//! ## Core Components
//!
//! - **ReturnCalculator**: Price table → log-return table
//! - **PerformanceAnalyzer**: Portfolio aggregation, base-100 cumulative
//!   performance, annualized risk statistics, correlation matrix and
//!   risk/return scatter points
//! - **Pipeline**: Runs both from an injected [`PipelineConfig`]
//!
//! ## Example Usage
//!
//! ```rust
//! use ag_analytics::{PerformanceAnalyzer, PriceTable, ReturnCalculator, WeightVector};
//! use chrono::NaiveDate;
//!
//! let dates: Vec<NaiveDate> = (1..=3)
//!     .map(|d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap())
//!     .collect();
//!
//! let prices = PriceTable::from_columns(
//!     dates,
//!     vec![
//!         ("A".to_string(), vec![100.0, 110.0, 121.0]),
//!         ("B".to_string(), vec![100.0, 100.0, 100.0]),
//!         ("SP500".to_string(), vec![100.0, 105.0, 110.25]),
//!     ],
//! )
//! .unwrap();
//!
//! let returns = ReturnCalculator::new().compute_returns(&prices).unwrap();
//! assert_eq!(returns.num_rows(), 2);
//!
//! let weights = WeightVector::equal(2).unwrap();
//! let result = PerformanceAnalyzer::default()
//!     .analyze(&returns, "SP500", &weights)
//!     .unwrap();
//!
//! // 100 * exp(ln(1.1) / 2)
//! assert!((result.port_cum[0] - 104.88).abs() < 0.01);
//! ```

mod analyzer;
mod config;
mod correlation;
mod error;
mod metrics;
mod pipeline;
mod returns;
mod table;
mod weights;

pub use analyzer::{
    AnalysisResult, AnalyzerConfig, PerformanceAnalyzer, PointKind, RiskReturnPoint,
    StatsComparison,
};
pub use config::{PipelineConfig, WeightScheme};
pub use correlation::CorrelationMatrix;
pub use error::{AnalyticsError, Result};
pub use metrics::{PerformanceMetrics, RiskStats, INDEX_BASE, TRADING_DAYS_PER_YEAR};
pub use pipeline::Pipeline;
pub use returns::ReturnCalculator;
pub use table::{PriceTable, ReturnTable};
pub use weights::{validate_weights, WeightVector, WEIGHT_SUM_TOLERANCE};
