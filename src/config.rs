//! Pipeline configuration
//!
//! The configuration is injected into [`Pipeline`](crate::Pipeline); nothing
//! is read from the environment or from fixed paths.

use crate::analyzer::AnalyzerConfig;
use crate::error::{AnalyticsError, Result};
use crate::weights::WeightVector;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Complete pipeline configuration
///
/// Typically loaded from YAML or JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Column holding the benchmark series
    pub benchmark: String,

    /// How asset weights are chosen (default: equal weight)
    #[serde(default)]
    pub weights: WeightScheme,

    #[serde(default)]
    pub analyzer: AnalyzerConfig,
}

/// Source of the portfolio weight vector
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WeightScheme {
    /// `1/N` for each of the N asset columns
    #[default]
    EqualWeight,

    /// Named weights, aligned to the asset columns at run time
    Explicit {
        allocations: HashMap<String, f64>,
    },
}

impl WeightScheme {
    pub fn name(&self) -> &'static str {
        match self {
            WeightScheme::EqualWeight => "EqualWeight",
            WeightScheme::Explicit { .. } => "Explicit",
        }
    }

    /// Build the weight vector for the given asset ordering
    ///
    /// Explicit allocations may sum to 1.0 within `tolerance`.
    pub fn resolve(&self, asset_columns: &[String], tolerance: f64) -> Result<WeightVector> {
        match self {
            WeightScheme::EqualWeight => WeightVector::equal(asset_columns.len()),
            WeightScheme::Explicit { allocations } => {
                WeightVector::from_allocations(asset_columns, allocations, tolerance)
            }
        }
    }
}

impl PipelineConfig {
    /// Configuration with equal weights and default analyzer settings
    pub fn new(benchmark: impl Into<String>) -> Self {
        Self {
            benchmark: benchmark.into(),
            weights: WeightScheme::default(),
            analyzer: AnalyzerConfig::default(),
        }
    }

    /// Load configuration from YAML string
    ///
    /// # Example
    ///
    /// ```
    /// use ag_analytics::{PipelineConfig, WeightScheme};
    ///
    /// let yaml = r#"
    /// benchmark: SP500
    /// weights:
    ///   type: EqualWeight
    /// "#;
    ///
    /// let config = PipelineConfig::from_yaml(yaml).unwrap();
    /// assert_eq!(config.benchmark, "SP500");
    /// assert_eq!(config.weights, WeightScheme::EqualWeight);
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: PipelineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PipelineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file; `.json` is parsed as JSON, anything else as YAML
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&contents),
            _ => Self::from_yaml(&contents),
        }
    }

    /// Serialize configuration to YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check values serde cannot
    pub fn validate(&self) -> Result<()> {
        if self.benchmark.trim().is_empty() {
            return Err(AnalyticsError::ConfigError(
                "benchmark must not be empty".to_string()
            ));
        }

        if !(self.analyzer.periods_per_year.is_finite() && self.analyzer.periods_per_year > 0.0) {
            return Err(AnalyticsError::ConfigError(format!(
                "periods_per_year must be positive, got {}",
                self.analyzer.periods_per_year
            )));
        }

        if !(self.analyzer.weight_tolerance.is_finite() && self.analyzer.weight_tolerance >= 0.0) {
            return Err(AnalyticsError::ConfigError(format!(
                "weight_tolerance must be non-negative, got {}",
                self.analyzer.weight_tolerance
            )));
        }

        Ok(())
    }
}
