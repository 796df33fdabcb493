//! Pairwise Pearson correlation between asset return series

use crate::error::{AnalyticsError, Result};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// Symmetric correlation matrix with row/column labels
///
/// Undefined cells are `None`, so the matrix compares equal to its clone and
/// round-trips through JSON (`null`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    labels: Vec<String>,
    values: DMatrix<Option<f64>>,
}

impl CorrelationMatrix {
    /// Calculate correlations between the columns of `returns`
    ///
    /// `labels[j]` names column `j`. The diagonal is exactly 1.0. A column
    /// with zero variance has no defined correlation with the others; those
    /// cells are `None`.
    pub fn from_returns(labels: Vec<String>, returns: &DMatrix<f64>) -> Result<Self> {
        if labels.len() != returns.ncols() {
            return Err(AnalyticsError::InvalidInput(format!(
                "{} labels for {} return columns",
                labels.len(),
                returns.ncols()
            )));
        }

        let num_obs = returns.nrows();
        if num_obs < 2 {
            return Err(AnalyticsError::InvalidInput(format!(
                "Need at least 2 observations for correlation, got {}",
                num_obs
            )));
        }

        let n = returns.ncols();

        // Center every column; the 1/(n-1) factors cancel in the ratio
        let means: Vec<f64> = (0..n).map(|j| returns.column(j).mean()).collect();
        let centered = DMatrix::from_fn(num_obs, n, |i, j| returns[(i, j)] - means[j]);
        let norms: Vec<f64> = (0..n).map(|j| centered.column(j).norm()).collect();

        let mut values = DMatrix::from_element(n, n, None);

        for i in 0..n {
            values[(i, i)] = Some(1.0);
            for j in (i + 1)..n {
                let corr = if norms[i] == 0.0 || norms[j] == 0.0 {
                    None
                } else {
                    let cross = centered.column(i).dot(&centered.column(j));
                    Some((cross / (norms[i] * norms[j])).clamp(-1.0, 1.0))
                };

                values[(i, j)] = corr;
                values[(j, i)] = corr;
            }
        }

        Ok(Self { labels, values })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &DMatrix<Option<f64>> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Correlation at `(i, j)`; `None` when out of range or undefined
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i < self.len() && j < self.len() {
            self.values[(i, j)]
        } else {
            None
        }
    }

    /// Correlation between two assets by label
    pub fn get_by_label(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == a)?;
        let j = self.labels.iter().position(|l| l == b)?;
        self.get(i, j)
    }
}
