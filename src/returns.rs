//! Log-return calculation
//!
//! Converts a price table into a table of `ln(p[t] / p[t-1])` values aligned
//! on the price table's dates. The first date never produces a row. Any later
//! row where some column lacks a price on either side is dropped as a whole,
//! so every surviving row is defined for every column.

use crate::error::{AnalyticsError, Result};
use crate::table::{PriceTable, ReturnTable};
use nalgebra::DMatrix;
use tracing::{debug, warn};

/// Price table → log-return table
#[derive(Debug, Clone, Copy, Default)]
pub struct ReturnCalculator;

impl ReturnCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Compute log-returns for every column
    ///
    /// Fails with `InvalidInput` when the table has fewer than 2 rows or
    /// columns, or when any present price is not strictly positive.
    pub fn compute_returns(&self, prices: &PriceTable) -> Result<ReturnTable> {
        if prices.num_rows() < 2 {
            return Err(AnalyticsError::InvalidInput(format!(
                "Need at least 2 price rows, got {}",
                prices.num_rows()
            )));
        }

        if prices.num_columns() < 2 {
            return Err(AnalyticsError::InvalidInput(format!(
                "Need a benchmark and at least one asset column, got {} column(s)",
                prices.num_columns()
            )));
        }

        Self::validate_prices(prices)?;

        let ncols = prices.num_columns();
        let rows = prices.rows();
        let mut dates = Vec::with_capacity(rows.len() - 1);
        let mut values = Vec::with_capacity((rows.len() - 1) * ncols);
        let mut dropped = 0usize;

        for t in 1..rows.len() {
            let row: Option<Vec<f64>> = rows[t - 1]
                .iter()
                .zip(rows[t].iter())
                .map(|(prev, cur)| match (prev, cur) {
                    (Some(p0), Some(p1)) => Some((p1 / p0).ln()),
                    _ => None,
                })
                .collect();

            match row {
                Some(row) => {
                    dates.push(prices.dates()[t]);
                    values.extend(row);
                }
                None => dropped += 1,
            }
        }

        if dropped > 0 {
            warn!(
                dropped_rows = dropped,
                kept_rows = dates.len(),
                "Dropped return rows with missing prices"
            );
        }

        let data = DMatrix::from_row_slice(dates.len(), ncols, &values);
        debug!(rows = dates.len(), columns = ncols, "Computed log-returns");

        ReturnTable::new(dates, prices.columns().to_vec(), data)
    }

    fn validate_prices(prices: &PriceTable) -> Result<()> {
        for (date, row) in prices.dates().iter().zip(prices.rows()) {
            for (column, cell) in prices.columns().iter().zip(row) {
                if let Some(price) = cell {
                    if !price.is_finite() || *price <= 0.0 {
                        return Err(AnalyticsError::InvalidInput(format!(
                            "Price for {} on {} must be positive and finite, got {}",
                            column, date, price
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn dates(n: usize) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        (0..n).map(|i| start + chrono::Days::new(i as u64)).collect()
    }

    fn scenario_prices() -> PriceTable {
        PriceTable::from_columns(
            dates(3),
            vec![
                ("A".to_string(), vec![100.0, 110.0, 121.0]),
                ("B".to_string(), vec![100.0, 100.0, 100.0]),
                ("SP500".to_string(), vec![100.0, 105.0, 110.25]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_log_returns() {
        let returns = ReturnCalculator::new()
            .compute_returns(&scenario_prices())
            .unwrap();

        assert_eq!(returns.num_rows(), 2);
        assert_eq!(returns.columns(), ["A", "B", "SP500"]);
        assert_eq!(returns.dates(), &dates(3)[1..]);

        for r in returns.column("A").unwrap() {
            assert_relative_eq!(r, 1.1_f64.ln(), epsilon = 1e-12);
        }
        assert_eq!(returns.column("B").unwrap(), vec![0.0, 0.0]);
        for r in returns.column("SP500").unwrap() {
            assert_relative_eq!(r, 1.05_f64.ln(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_rejects_single_row() {
        let prices = PriceTable::from_columns(
            dates(1),
            vec![
                ("A".to_string(), vec![100.0]),
                ("SP500".to_string(), vec![100.0]),
            ],
        )
        .unwrap();

        let result = ReturnCalculator::new().compute_returns(&prices);
        assert!(matches!(result, Err(AnalyticsError::InvalidInput(_))));
    }

    #[test]
    fn test_rejects_single_column() {
        let prices = PriceTable::from_columns(
            dates(3),
            vec![("SP500".to_string(), vec![100.0, 101.0, 102.0])],
        )
        .unwrap();

        let result = ReturnCalculator::new().compute_returns(&prices);
        assert!(matches!(result, Err(AnalyticsError::InvalidInput(_))));
    }

    #[test]
    fn test_rejects_non_positive_price() {
        for bad in [0.0, -5.0, f64::INFINITY] {
            let prices = PriceTable::from_columns(
                dates(3),
                vec![
                    ("A".to_string(), vec![100.0, bad, 121.0]),
                    ("SP500".to_string(), vec![100.0, 105.0, 110.25]),
                ],
            )
            .unwrap();

            let result = ReturnCalculator::new().compute_returns(&prices);
            assert!(matches!(result, Err(AnalyticsError::InvalidInput(_))));
        }
    }

    #[test]
    fn test_missing_price_drops_whole_rows() {
        // A gap on day 2 makes both day 2 and day 3 undefined for column A
        let prices = PriceTable::new(
            dates(5),
            vec!["A".to_string(), "SP500".to_string()],
            vec![
                vec![Some(100.0), Some(100.0)],
                vec![Some(101.0), Some(102.0)],
                vec![None, Some(103.0)],
                vec![Some(104.0), Some(104.0)],
                vec![Some(105.0), Some(106.0)],
            ],
        )
        .unwrap();

        let returns = ReturnCalculator::new().compute_returns(&prices).unwrap();

        let d = dates(5);
        assert_eq!(returns.dates(), [d[1], d[4]]);
        let sp500 = returns.column("SP500").unwrap();
        assert_relative_eq!(sp500[0], (102.0_f64 / 100.0).ln(), epsilon = 1e-12);
        assert_relative_eq!(sp500[1], (106.0_f64 / 104.0).ln(), epsilon = 1e-12);
    }
}
