//! Performance metrics calculation
//!
//! Annualized statistics for a series of daily log-returns:
//! - Annualized return: mean * periods per year
//! - Annualized volatility: sample standard deviation * √(periods per year)
//! - Sharpe Ratio: annualized return / annualized volatility (risk-free rate 0)
//! - Maximum Drawdown: worst decline of `exp(cumsum(r))` from its running peak
//!
//! Log-returns compound additively, so every index here is built as
//! `exp(Σ r)` rather than `Π (1 + r)`.

use crate::error::{AnalyticsError, Result};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Trading days per year
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Starting value of a cumulative performance series
pub const INDEX_BASE: f64 = 100.0;

/// Annualized risk statistics of one return series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskStats {
    pub annualized_return: f64,

    pub annualized_volatility: f64,

    /// `None` when the series has zero volatility
    pub sharpe_ratio: Option<f64>,

    /// Non-positive; 0.0 means no drawdown observed
    pub max_drawdown: f64,
}

impl RiskStats {
    /// Sharpe ratio, or `DivisionUndefined` for a zero-volatility series
    pub fn sharpe(&self) -> Result<f64> {
        self.sharpe_ratio.ok_or_else(|| {
            AnalyticsError::DivisionUndefined(
                "Sharpe ratio of a zero-volatility series".to_string()
            )
        })
    }
}

/// Performance metrics calculator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Daily log-returns
    returns: Vec<f64>,

    /// Periods per year used for annualization
    periods_per_year: f64,
}

impl PerformanceMetrics {
    /// Create a new performance metrics calculator
    pub fn new(returns: Vec<f64>, periods_per_year: f64) -> Self {
        Self {
            returns,
            periods_per_year,
        }
    }

    /// Calculator for daily data (252 periods per year)
    pub fn daily(returns: Vec<f64>) -> Self {
        Self::new(returns, TRADING_DAYS_PER_YEAR)
    }

    pub fn returns(&self) -> &[f64] {
        &self.returns
    }

    /// Mean return scaled to a year
    pub fn annualized_return(&self) -> Result<f64> {
        if self.returns.is_empty() {
            return Err(AnalyticsError::InvalidInput(
                "No returns data".to_string()
            ));
        }

        Ok(self.returns.iter().mean() * self.periods_per_year)
    }

    /// Sample standard deviation scaled to a year
    pub fn annualized_volatility(&self) -> Result<f64> {
        if self.returns.len() < 2 {
            return Err(AnalyticsError::InvalidInput(
                "Need at least 2 returns for standard deviation".to_string()
            ));
        }

        Ok(self.returns.iter().std_dev() * self.periods_per_year.sqrt())
    }

    /// Calculate Sharpe Ratio
    ///
    /// Sharpe = Annualized Return / Annualized Volatility, risk-free rate 0
    pub fn sharpe_ratio(&self) -> Result<f64> {
        let annualized_return = self.annualized_return()?;
        let annualized_volatility = self.annualized_volatility()?;

        if annualized_volatility == 0.0 {
            return Err(AnalyticsError::DivisionUndefined(
                "Annualized volatility is zero".to_string()
            ));
        }

        Ok(annualized_return / annualized_volatility)
    }

    /// `base * exp(Σ_{k≤t} r[k])` for every t
    ///
    /// The implied value `base` at time zero is not included.
    pub fn cumulative_index(&self, base: f64) -> Vec<f64> {
        self.returns
            .iter()
            .scan(0.0, |sum, r| {
                *sum += r;
                Some(base * sum.exp())
            })
            .collect()
    }

    /// Drawdown from the running peak at every t (each value ≤ 0)
    ///
    /// The running peak starts at the first observation.
    pub fn drawdown_series(&self) -> Vec<f64> {
        let mut peak = f64::NEG_INFINITY;

        self.cumulative_index(1.0)
            .into_iter()
            .map(|wealth| {
                if wealth > peak {
                    peak = wealth;
                }
                wealth / peak - 1.0
            })
            .collect()
    }

    /// Calculate Maximum Drawdown
    ///
    /// Returns the largest peak-to-trough decline as a non-positive fraction
    pub fn max_drawdown(&self) -> Result<f64> {
        if self.returns.is_empty() {
            return Err(AnalyticsError::InvalidInput(
                "No returns data".to_string()
            ));
        }

        Ok(self
            .drawdown_series()
            .into_iter()
            .fold(0.0, f64::min))
    }

    /// All four statistics; a zero-volatility series gets `sharpe_ratio: None`
    pub fn risk_stats(&self) -> Result<RiskStats> {
        let annualized_return = self.annualized_return()?;
        let annualized_volatility = self.annualized_volatility()?;
        let sharpe_ratio = match self.sharpe_ratio() {
            Ok(sharpe) => Some(sharpe),
            Err(AnalyticsError::DivisionUndefined(_)) => None,
            Err(e) => return Err(e),
        };

        Ok(RiskStats {
            annualized_return,
            annualized_volatility,
            sharpe_ratio,
            max_drawdown: self.max_drawdown()?,
        })
    }
}
