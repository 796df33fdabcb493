//! Prices → returns → analysis
//!
//! The pipeline owns no state besides its configuration, so one instance can
//! be reused across price tables.

use crate::analyzer::{AnalysisResult, PerformanceAnalyzer};
use crate::config::PipelineConfig;
use crate::error::{AnalyticsError, Result};
use crate::returns::ReturnCalculator;
use crate::table::PriceTable;
use tracing::{debug, info};

/// End-to-end analytics pipeline
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    calculator: ReturnCalculator,
    analyzer: PerformanceAnalyzer,
}

impl Pipeline {
    /// Create a pipeline from an already loaded configuration
    pub fn new(config: PipelineConfig) -> Self {
        let analyzer = PerformanceAnalyzer::new(config.analyzer.clone());
        Self {
            config,
            calculator: ReturnCalculator::new(),
            analyzer,
        }
    }

    /// Load the configuration from YAML and build a pipeline
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(Self::new(PipelineConfig::from_yaml(yaml)?))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the full analysis on one price table
    ///
    /// # Example
    ///
    /// ```
    /// use ag_analytics::{Pipeline, PipelineConfig, PriceTable};
    /// use chrono::NaiveDate;
    ///
    /// let dates: Vec<NaiveDate> = (2..=5)
    ///     .map(|d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap())
    ///     .collect();
    /// let prices = PriceTable::from_columns(
    ///     dates,
    ///     vec![
    ///         ("AAPL".to_string(), vec![100.0, 102.0, 101.0, 104.0]),
    ///         ("MSFT".to_string(), vec![50.0, 49.5, 50.5, 51.0]),
    ///         ("SP500".to_string(), vec![4000.0, 4020.0, 4010.0, 4050.0]),
    ///     ],
    /// )
    /// .unwrap();
    ///
    /// let pipeline = Pipeline::new(PipelineConfig::new("SP500"));
    /// let result = pipeline.run(&prices).unwrap();
    ///
    /// assert_eq!(result.port_cum.len(), 3);
    /// assert_eq!(result.correlation.labels(), ["AAPL", "MSFT"]);
    /// assert!(result.port_stats.max_drawdown <= 0.0);
    /// ```
    pub fn run(&self, prices: &PriceTable) -> Result<AnalysisResult> {
        let benchmark = self.config.benchmark.as_str();

        if prices.column_index(benchmark).is_none() {
            return Err(AnalyticsError::InvalidInput(format!(
                "Benchmark column {} not found in price table",
                benchmark
            )));
        }

        info!(
            rows = prices.num_rows(),
            columns = prices.num_columns(),
            benchmark = benchmark,
            "Running portfolio analysis"
        );

        let returns = self.calculator.compute_returns(prices)?;

        let asset_columns = returns.asset_columns(benchmark);
        let weights = self
            .config
            .weights
            .resolve(&asset_columns, self.config.analyzer.weight_tolerance)?;
        debug!(
            scheme = self.config.weights.name(),
            weights = ?weights.as_slice(),
            "Resolved portfolio weights"
        );

        let result = self.analyzer.analyze(&returns, benchmark, &weights)?;

        info!(
            portfolio_return = result.port_stats.annualized_return,
            portfolio_volatility = result.port_stats.annualized_volatility,
            portfolio_sharpe = ?result.port_stats.sharpe_ratio,
            benchmark_return = result.bench_stats.annualized_return,
            "Portfolio analysis complete"
        );

        Ok(result)
    }
}
