//! Price and return tables
//!
//! Both tables share the same shape conventions: a strictly ascending date
//! index, uniquely labelled columns (benchmark included), one cell per
//! column in every row.

use crate::error::{AnalyticsError, Result};
use chrono::NaiveDate;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Daily closing prices, one row per date
///
/// A `None` cell marks a missing observation. Whether present prices are
/// strictly positive is checked by the return calculator, not here.
/// Deserialization goes through [`PriceTable::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPriceTable")]
pub struct PriceTable {
    dates: Vec<NaiveDate>,
    columns: Vec<String>,
    rows: Vec<Vec<Option<f64>>>,
}

impl PriceTable {
    /// Create a price table from row-major cells
    pub fn new(
        dates: Vec<NaiveDate>,
        columns: Vec<String>,
        rows: Vec<Vec<Option<f64>>>,
    ) -> Result<Self> {
        validate_columns(&columns)?;
        validate_dates(&dates)?;

        if rows.len() != dates.len() {
            return Err(AnalyticsError::InvalidInput(format!(
                "{} rows supplied for {} dates",
                rows.len(),
                dates.len()
            )));
        }

        for (date, row) in dates.iter().zip(rows.iter()) {
            if row.len() != columns.len() {
                return Err(AnalyticsError::InvalidInput(format!(
                    "Row {} has {} cells, expected {}",
                    date,
                    row.len(),
                    columns.len()
                )));
            }
        }

        Ok(Self {
            dates,
            columns,
            rows,
        })
    }

    /// Create a fully populated price table from named column series
    ///
    /// # Example
    ///
    /// ```
    /// use ag_analytics::PriceTable;
    /// use chrono::NaiveDate;
    ///
    /// let dates = vec![
    ///     NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
    ///     NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
    /// ];
    /// let prices = PriceTable::from_columns(
    ///     dates,
    ///     vec![
    ///         ("AAPL".to_string(), vec![185.6, 184.2]),
    ///         ("SP500".to_string(), vec![4742.8, 4704.8]),
    ///     ],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(prices.num_rows(), 2);
    /// assert_eq!(prices.columns(), ["AAPL", "SP500"]);
    /// ```
    pub fn from_columns(dates: Vec<NaiveDate>, series: Vec<(String, Vec<f64>)>) -> Result<Self> {
        for (name, values) in &series {
            if values.len() != dates.len() {
                return Err(AnalyticsError::InvalidInput(format!(
                    "Column {} has {} values, expected {}",
                    name,
                    values.len(),
                    dates.len()
                )));
            }
        }

        let rows = (0..dates.len())
            .map(|t| series.iter().map(|(_, values)| Some(values[t])).collect())
            .collect();
        let columns = series.into_iter().map(|(name, _)| name).collect();

        Self::new(dates, columns, rows)
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<f64>>] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Position of a column by label
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cells of one column, in date order
    pub fn column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let j = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[j]).collect())
    }
}

/// Log-returns aligned on the price table's date index
///
/// Rows are dates, columns are series. Every cell is defined and finite.
/// Deserialization goes through [`ReturnTable::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawReturnTable")]
pub struct ReturnTable {
    dates: Vec<NaiveDate>,
    columns: Vec<String>,
    data: DMatrix<f64>,
}

impl ReturnTable {
    /// Create a return table from a rows × columns matrix
    pub fn new(dates: Vec<NaiveDate>, columns: Vec<String>, data: DMatrix<f64>) -> Result<Self> {
        validate_columns(&columns)?;
        validate_dates(&dates)?;

        if data.nrows() != dates.len() || data.ncols() != columns.len() {
            return Err(AnalyticsError::InvalidInput(format!(
                "Return matrix is {}x{}, expected {}x{}",
                data.nrows(),
                data.ncols(),
                dates.len(),
                columns.len()
            )));
        }

        if let Some(bad) = data.iter().find(|v| !v.is_finite()) {
            return Err(AnalyticsError::InvalidInput(format!(
                "Return table contains non-finite value {}",
                bad
            )));
        }

        Ok(Self {
            dates,
            columns,
            data,
        })
    }

    /// Create a return table from named column series
    pub fn from_columns(dates: Vec<NaiveDate>, series: Vec<(String, Vec<f64>)>) -> Result<Self> {
        for (name, values) in &series {
            if values.len() != dates.len() {
                return Err(AnalyticsError::InvalidInput(format!(
                    "Column {} has {} values, expected {}",
                    name,
                    values.len(),
                    dates.len()
                )));
            }
        }

        let nrows = dates.len();
        let ncols = series.len();
        let data = DMatrix::from_fn(nrows, ncols, |i, j| series[j].1[i]);
        let columns = series.into_iter().map(|(name, _)| name).collect();

        Self::new(dates, columns, data)
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Raw rows × columns matrix
    pub fn data(&self) -> &DMatrix<f64> {
        &self.data
    }

    pub fn num_rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn num_columns(&self) -> usize {
        self.data.ncols()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Values of one column, in date order
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let j = self.column_index(name)?;
        Some(self.data.column(j).iter().copied().collect())
    }

    /// Asset columns: every column except the benchmark, in original order
    ///
    /// Weight vectors are aligned positionally to this ordering.
    pub fn asset_columns(&self, benchmark: &str) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.as_str() != benchmark)
            .cloned()
            .collect()
    }
}

/// Unvalidated wire form of [`PriceTable`]
#[derive(Deserialize)]
struct RawPriceTable {
    dates: Vec<NaiveDate>,
    columns: Vec<String>,
    rows: Vec<Vec<Option<f64>>>,
}

impl TryFrom<RawPriceTable> for PriceTable {
    type Error = AnalyticsError;

    fn try_from(raw: RawPriceTable) -> Result<Self> {
        Self::new(raw.dates, raw.columns, raw.rows)
    }
}

/// Unvalidated wire form of [`ReturnTable`]
#[derive(Deserialize)]
struct RawReturnTable {
    dates: Vec<NaiveDate>,
    columns: Vec<String>,
    data: DMatrix<f64>,
}

impl TryFrom<RawReturnTable> for ReturnTable {
    type Error = AnalyticsError;

    fn try_from(raw: RawReturnTable) -> Result<Self> {
        Self::new(raw.dates, raw.columns, raw.data)
    }
}

fn validate_columns(columns: &[String]) -> Result<()> {
    let mut seen = HashSet::new();
    for name in columns {
        if name.is_empty() {
            return Err(AnalyticsError::InvalidInput(
                "Column labels must be non-empty".to_string()
            ));
        }
        if !seen.insert(name.as_str()) {
            return Err(AnalyticsError::InvalidInput(format!(
                "Duplicate column label: {}",
                name
            )));
        }
    }
    Ok(())
}

fn validate_dates(dates: &[NaiveDate]) -> Result<()> {
    for pair in dates.windows(2) {
        if pair[1] <= pair[0] {
            return Err(AnalyticsError::InvalidInput(format!(
                "Dates must be strictly ascending: {} follows {}",
                pair[1], pair[0]
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates(n: usize) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..n).map(|i| start + chrono::Days::new(i as u64)).collect()
    }

    #[test]
    fn test_price_table_from_columns() {
        let table = PriceTable::from_columns(
            dates(3),
            vec![
                ("A".to_string(), vec![100.0, 110.0, 121.0]),
                ("SP500".to_string(), vec![100.0, 105.0, 110.25]),
            ],
        )
        .unwrap();

        assert_eq!(table.num_rows(), 3);
        assert_eq!(table.num_columns(), 2);
        assert_eq!(table.column_index("SP500"), Some(1));
        assert_eq!(
            table.column("A").unwrap(),
            vec![Some(100.0), Some(110.0), Some(121.0)]
        );
        assert!(table.column("MISSING").is_none());
    }

    #[test]
    fn test_price_table_rejects_unsorted_dates() {
        let mut d = dates(3);
        d.swap(1, 2);
        let result = PriceTable::from_columns(d, vec![("A".to_string(), vec![1.0, 2.0, 3.0])]);
        assert!(matches!(result, Err(AnalyticsError::InvalidInput(_))));
    }

    #[test]
    fn test_price_table_rejects_duplicate_dates() {
        let mut d = dates(3);
        d[2] = d[1];
        let result = PriceTable::from_columns(d, vec![("A".to_string(), vec![1.0, 2.0, 3.0])]);
        assert!(matches!(result, Err(AnalyticsError::InvalidInput(_))));
    }

    #[test]
    fn test_price_table_rejects_duplicate_columns() {
        let result = PriceTable::from_columns(
            dates(2),
            vec![
                ("A".to_string(), vec![1.0, 2.0]),
                ("A".to_string(), vec![1.0, 2.0]),
            ],
        );
        assert!(matches!(result, Err(AnalyticsError::InvalidInput(_))));
    }

    #[test]
    fn test_price_table_rejects_ragged_rows() {
        let result = PriceTable::new(
            dates(2),
            vec!["A".to_string(), "B".to_string()],
            vec![vec![Some(1.0), Some(2.0)], vec![Some(1.0)]],
        );
        assert!(matches!(result, Err(AnalyticsError::InvalidInput(_))));
    }

    #[test]
    fn test_price_table_deserialization_is_validated() {
        let ragged = r#"{
  "dates": ["2024-01-01", "2024-01-02", "2024-01-03"],
  "columns": ["A", "SP500"],
  "rows": [[100, 100], [101], [102, 103]]
}"#;
        let result: std::result::Result<PriceTable, _> = serde_json::from_str(ragged);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Row 2024-01-02 has 1 cells, expected 2"));

        let unsorted = r#"{
  "dates": ["2024-01-02", "2024-01-01"],
  "columns": ["A"],
  "rows": [[100], [101]]
}"#;
        assert!(serde_json::from_str::<PriceTable>(unsorted).is_err());

        let valid = r#"{
  "dates": ["2024-01-01", "2024-01-02"],
  "columns": ["A", "SP500"],
  "rows": [[100, 100], [null, 101]]
}"#;
        let table: PriceTable = serde_json::from_str(valid).unwrap();
        assert_eq!(table.column("A").unwrap(), vec![Some(100.0), None]);

        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(serde_json::from_str::<PriceTable>(&json).unwrap(), table);
    }

    #[test]
    fn test_return_table_deserialization_is_validated() {
        // Three labels for a two-column matrix
        let json = r#"{
  "dates": ["2024-01-01", "2024-01-02"],
  "columns": ["A", "SP500", "B"],
  "data": [[0.01, 0.02, 0.0, 0.01], 2, 2]
}"#;
        let result: std::result::Result<ReturnTable, _> = serde_json::from_str(json);
        assert!(result.unwrap_err().to_string().contains("Return matrix is 2x2, expected 2x3"));

        let table = ReturnTable::from_columns(
            dates(2),
            vec![
                ("A".to_string(), vec![0.01, 0.02]),
                ("SP500".to_string(), vec![0.0, 0.01]),
            ],
        )
        .unwrap();
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(serde_json::from_str::<ReturnTable>(&json).unwrap(), table);
    }

    #[test]
    fn test_return_table_asset_columns_preserve_order() {
        let table = ReturnTable::from_columns(
            dates(2),
            vec![
                ("MSFT".to_string(), vec![0.01, 0.02]),
                ("SP500".to_string(), vec![0.0, 0.01]),
                ("AAPL".to_string(), vec![-0.01, 0.03]),
            ],
        )
        .unwrap();

        assert_eq!(table.asset_columns("SP500"), vec!["MSFT", "AAPL"]);
        assert_eq!(table.column("AAPL").unwrap(), vec![-0.01, 0.03]);
        assert_eq!(table.data()[(1, 0)], 0.02);
    }

    #[test]
    fn test_return_table_rejects_non_finite() {
        let result = ReturnTable::from_columns(
            dates(2),
            vec![("A".to_string(), vec![0.01, f64::NAN])],
        );
        assert!(matches!(result, Err(AnalyticsError::InvalidInput(_))));
    }

    #[test]
    fn test_return_table_rejects_shape_mismatch() {
        let result = ReturnTable::new(
            dates(3),
            vec!["A".to_string()],
            DMatrix::zeros(2, 1),
        );
        assert!(matches!(result, Err(AnalyticsError::InvalidInput(_))));
    }
}
