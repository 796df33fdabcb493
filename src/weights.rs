//! Portfolio weight vectors
//!
//! Weights are positional: entry `i` applies to the `i`-th asset column of
//! the return table (every column except the benchmark, in column order).

use crate::error::{AnalyticsError, Result};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default tolerance on `|Σ w - 1|`
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Non-negative weights summing to 1.0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct WeightVector {
    weights: Vec<f64>,
}

impl WeightVector {
    /// Create a validated weight vector
    ///
    /// # Example
    ///
    /// ```
    /// use ag_analytics::WeightVector;
    ///
    /// let weights = WeightVector::new(vec![0.6, 0.4]).unwrap();
    /// assert_eq!(weights.len(), 2);
    ///
    /// assert!(WeightVector::new(vec![0.5, 0.4]).is_err());
    /// ```
    pub fn new(weights: Vec<f64>) -> Result<Self> {
        Self::with_tolerance(weights, WEIGHT_SUM_TOLERANCE)
    }

    /// Create a weight vector whose sum may be off by up to `tolerance`
    pub fn with_tolerance(weights: Vec<f64>, tolerance: f64) -> Result<Self> {
        if weights.is_empty() {
            return Err(AnalyticsError::InvalidInput(
                "Weight vector must not be empty".to_string()
            ));
        }
        validate_weights(&weights, tolerance)?;
        Ok(Self { weights })
    }

    /// Equal weight `1/n` for each of `n` assets
    pub fn equal(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(AnalyticsError::InvalidInput(
                "Cannot build equal weights for zero assets".to_string()
            ));
        }
        Self::new(vec![1.0 / n as f64; n])
    }

    /// Align named allocations to an asset ordering
    ///
    /// Every asset must have an allocation and every allocation must name a
    /// known asset. The sum is checked against `tolerance`.
    pub fn from_allocations(
        asset_columns: &[String],
        allocations: &HashMap<String, f64>,
        tolerance: f64,
    ) -> Result<Self> {
        if let Some(unknown) = allocations
            .keys()
            .find(|name| !asset_columns.contains(*name))
        {
            return Err(AnalyticsError::InvalidInput(format!(
                "Allocation for unknown asset: {}",
                unknown
            )));
        }

        let weights = asset_columns
            .iter()
            .map(|asset| {
                allocations.get(asset).copied().ok_or_else(|| {
                    AnalyticsError::InvalidInput(format!("No allocation for asset: {}", asset))
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        Self::with_tolerance(weights, tolerance)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn to_dvector(&self) -> DVector<f64> {
        DVector::from_column_slice(&self.weights)
    }
}

impl TryFrom<Vec<f64>> for WeightVector {
    type Error = AnalyticsError;

    fn try_from(weights: Vec<f64>) -> Result<Self> {
        Self::new(weights)
    }
}

impl From<WeightVector> for Vec<f64> {
    fn from(weights: WeightVector) -> Self {
        weights.weights
    }
}

/// Check that weights are finite, non-negative and sum to 1.0 within `tolerance`
pub fn validate_weights(weights: &[f64], tolerance: f64) -> Result<()> {
    if let Some((i, w)) = weights
        .iter()
        .enumerate()
        .find(|(_, w)| !w.is_finite() || **w < 0.0)
    {
        return Err(AnalyticsError::WeightNormalization(format!(
            "Weight {} is {}, weights must be non-negative",
            i, w
        )));
    }

    let sum: f64 = weights.iter().sum();
    if (sum - 1.0).abs() > tolerance {
        return Err(AnalyticsError::WeightNormalization(format!(
            "Weights sum to {}, expected 1.0 (tolerance {})",
            sum, tolerance
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assets(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_equal_weights() {
        let weights = WeightVector::equal(4).unwrap();
        assert_eq!(weights.as_slice(), &[0.25; 4]);

        // 1/3 does not sum to exactly 1.0 but is within tolerance
        assert!(WeightVector::equal(3).is_ok());
        assert!(WeightVector::equal(0).is_err());
    }

    #[test]
    fn test_rejects_sum_of_point_nine() {
        let result = WeightVector::new(vec![0.5, 0.4]);
        assert!(matches!(result, Err(AnalyticsError::WeightNormalization(_))));
    }

    #[test]
    fn test_rejects_negative_weight() {
        let result = WeightVector::new(vec![1.2, -0.2]);
        assert!(matches!(result, Err(AnalyticsError::WeightNormalization(_))));
    }

    #[test]
    fn test_accepts_sum_within_tolerance() {
        assert!(WeightVector::new(vec![0.5, 0.5 + 5e-7]).is_ok());
        assert!(WeightVector::new(vec![0.5, 0.5 + 5e-6]).is_err());
    }

    #[test]
    fn test_with_tolerance_uses_given_bound() {
        assert!(WeightVector::with_tolerance(vec![0.5, 0.5001], 1e-3).is_ok());

        let err = WeightVector::with_tolerance(vec![0.5, 0.502], 1e-3).unwrap_err();
        assert!(err.to_string().contains("tolerance 0.001"));
    }

    #[test]
    fn test_from_allocations_aligns_to_columns() {
        let mut allocations = HashMap::new();
        allocations.insert("MSFT".to_string(), 0.3);
        allocations.insert("AAPL".to_string(), 0.7);

        let weights = WeightVector::from_allocations(
            &assets(&["AAPL", "MSFT"]),
            &allocations,
            WEIGHT_SUM_TOLERANCE,
        )
        .unwrap();
        assert_eq!(weights.as_slice(), &[0.7, 0.3]);
    }

    #[test]
    fn test_from_allocations_rejects_unknown_and_missing() {
        let mut allocations = HashMap::new();
        allocations.insert("AAPL".to_string(), 1.0);
        let missing = WeightVector::from_allocations(
            &assets(&["AAPL", "MSFT"]),
            &allocations,
            WEIGHT_SUM_TOLERANCE,
        );
        assert!(matches!(missing, Err(AnalyticsError::InvalidInput(_))));

        allocations.insert("TSLA".to_string(), 0.0);
        let unknown =
            WeightVector::from_allocations(&assets(&["AAPL"]), &allocations, WEIGHT_SUM_TOLERANCE);
        assert!(matches!(unknown, Err(AnalyticsError::InvalidInput(_))));
    }

    #[test]
    fn test_deserialization_is_validated() {
        let weights: WeightVector = serde_yaml::from_str("[0.25, 0.75]").unwrap();
        assert_eq!(weights.len(), 2);

        let bad: std::result::Result<WeightVector, _> = serde_json::from_str("[0.25, 0.25]");
        assert!(bad.is_err());
    }
}
