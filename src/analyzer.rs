//! Portfolio vs benchmark performance analysis
//!
//! Provides, from a log-return table:
//! - Portfolio return series (weighted sum of asset returns)
//! - Base-100 cumulative performance for portfolio and benchmark
//! - Annualized risk statistics for both
//! - Correlation matrix over the assets
//! - Risk/return scatter points per asset plus the portfolio

use crate::correlation::CorrelationMatrix;
use crate::error::{AnalyticsError, Result};
use crate::metrics::{PerformanceMetrics, RiskStats, INDEX_BASE, TRADING_DAYS_PER_YEAR};
use crate::table::ReturnTable;
use crate::weights::{validate_weights, WeightVector, WEIGHT_SUM_TOLERANCE};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Analyzer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Periods per year for annualization (default: 252 trading days)
    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: f64,

    /// Allowed deviation of the weight sum from 1.0 (default: 1e-6)
    #[serde(default = "default_weight_tolerance")]
    pub weight_tolerance: f64,

    /// Label of the synthesized portfolio point in the scatter dataset
    #[serde(default = "default_portfolio_label")]
    pub portfolio_label: String,
}

fn default_periods_per_year() -> f64 {
    TRADING_DAYS_PER_YEAR
}

fn default_weight_tolerance() -> f64 {
    WEIGHT_SUM_TOLERANCE
}

fn default_portfolio_label() -> String {
    "PORTFOLIO".to_string()
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            periods_per_year: default_periods_per_year(),
            weight_tolerance: default_weight_tolerance(),
            portfolio_label: default_portfolio_label(),
        }
    }
}

/// Whether a scatter point is a single asset or the whole portfolio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointKind {
    Asset,
    Portfolio,
}

/// One point of the risk/return scatter (x = volatility, y = return)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReturnPoint {
    pub label: String,
    pub annualized_volatility: f64,
    pub annualized_return: f64,
    pub kind: PointKind,
}

/// One row of the portfolio vs benchmark summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsComparison {
    pub metric: &'static str,
    pub portfolio: Option<f64>,
    pub benchmark: Option<f64>,
}

/// Complete output of one analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Dates of the return rows; every series below is aligned to them
    pub dates: Vec<NaiveDate>,

    /// Asset columns in weight order
    pub asset_columns: Vec<String>,

    pub benchmark: String,

    pub port_returns: Vec<f64>,

    pub bench_returns: Vec<f64>,

    /// Base-100 cumulative portfolio performance
    pub port_cum: Vec<f64>,

    /// Base-100 cumulative benchmark performance
    pub bench_cum: Vec<f64>,

    pub port_stats: RiskStats,

    pub bench_stats: RiskStats,

    /// Correlations between assets (benchmark excluded)
    pub correlation: CorrelationMatrix,

    /// One point per asset followed by the portfolio point
    pub risk_return_points: Vec<RiskReturnPoint>,
}

impl AnalysisResult {
    /// Side-by-side statistics, one row per metric
    pub fn summary(&self) -> Vec<StatsComparison> {
        let (p, b) = (&self.port_stats, &self.bench_stats);
        vec![
            StatsComparison {
                metric: "annualized_return",
                portfolio: Some(p.annualized_return),
                benchmark: Some(b.annualized_return),
            },
            StatsComparison {
                metric: "annualized_volatility",
                portfolio: Some(p.annualized_volatility),
                benchmark: Some(b.annualized_volatility),
            },
            StatsComparison {
                metric: "sharpe_ratio",
                portfolio: p.sharpe_ratio,
                benchmark: b.sharpe_ratio,
            },
            StatsComparison {
                metric: "max_drawdown",
                portfolio: Some(p.max_drawdown),
                benchmark: Some(b.max_drawdown),
            },
        ]
    }

    /// The synthesized portfolio point of the scatter dataset
    pub fn portfolio_point(&self) -> Option<&RiskReturnPoint> {
        self.risk_return_points
            .iter()
            .find(|p| p.kind == PointKind::Portfolio)
    }
}

/// Portfolio performance analyzer
#[derive(Debug, Clone, Default)]
pub struct PerformanceAnalyzer {
    config: AnalyzerConfig,
}

impl PerformanceAnalyzer {
    /// Create a new performance analyzer
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze a return table against its benchmark column
    ///
    /// `weights[i]` applies to `returns.asset_columns(benchmark_col)[i]`.
    /// All preconditions are checked before any computation; a violation
    /// aborts the whole analysis.
    pub fn analyze(
        &self,
        returns: &ReturnTable,
        benchmark_col: &str,
        weights: &WeightVector,
    ) -> Result<AnalysisResult> {
        let bench_idx = returns.column_index(benchmark_col).ok_or_else(|| {
            AnalyticsError::InvalidInput(format!(
                "Benchmark column {} not found",
                benchmark_col
            ))
        })?;

        let asset_indices: Vec<usize> = (0..returns.num_columns())
            .filter(|&j| j != bench_idx)
            .collect();

        if asset_indices.is_empty() {
            return Err(AnalyticsError::InvalidInput(
                "Return table has no asset columns besides the benchmark".to_string()
            ));
        }

        if returns.num_rows() < 2 {
            return Err(AnalyticsError::InvalidInput(format!(
                "Need at least 2 return rows, got {}",
                returns.num_rows()
            )));
        }

        if weights.len() != asset_indices.len() {
            return Err(AnalyticsError::DimensionMismatch {
                expected: asset_indices.len(),
                got: weights.len(),
            });
        }

        validate_weights(weights.as_slice(), self.config.weight_tolerance)?;

        let asset_columns = returns.asset_columns(benchmark_col);
        let asset_returns = returns.data().select_columns(asset_indices.iter());

        // Portfolio aggregation: r_p = R w
        let port_returns: Vec<f64> = (&asset_returns * weights.to_dvector())
            .iter()
            .copied()
            .collect();
        let bench_returns: Vec<f64> = returns.data().column(bench_idx).iter().copied().collect();

        let port_metrics = PerformanceMetrics::new(port_returns, self.config.periods_per_year);
        let bench_metrics = PerformanceMetrics::new(bench_returns, self.config.periods_per_year);

        let port_stats = port_metrics.risk_stats()?;
        let bench_stats = bench_metrics.risk_stats()?;

        let correlation = CorrelationMatrix::from_returns(asset_columns.clone(), &asset_returns)?;

        let mut risk_return_points = Vec::with_capacity(asset_columns.len() + 1);
        for (j, label) in asset_columns.iter().enumerate() {
            let metrics = PerformanceMetrics::new(
                asset_returns.column(j).iter().copied().collect(),
                self.config.periods_per_year,
            );
            risk_return_points.push(RiskReturnPoint {
                label: label.clone(),
                annualized_volatility: metrics.annualized_volatility()?,
                annualized_return: metrics.annualized_return()?,
                kind: PointKind::Asset,
            });
        }
        risk_return_points.push(RiskReturnPoint {
            label: self.config.portfolio_label.clone(),
            annualized_volatility: port_stats.annualized_volatility,
            annualized_return: port_stats.annualized_return,
            kind: PointKind::Portfolio,
        });

        debug!(
            rows = returns.num_rows(),
            assets = asset_columns.len(),
            benchmark = benchmark_col,
            "Analysis complete"
        );

        Ok(AnalysisResult {
            dates: returns.dates().to_vec(),
            asset_columns,
            benchmark: benchmark_col.to_string(),
            port_cum: port_metrics.cumulative_index(INDEX_BASE),
            bench_cum: bench_metrics.cumulative_index(INDEX_BASE),
            port_returns: port_metrics.returns().to_vec(),
            bench_returns: bench_metrics.returns().to_vec(),
            port_stats,
            bench_stats,
            correlation,
            risk_return_points,
        })
    }
}
