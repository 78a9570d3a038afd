use crate::error::{Result, OptimizerError};
use polars::prelude::*;
use super::types::AssetColumn;
use std::collections::HashMap;

pub struct DataValidator;

impl DataValidator {
    /// Resolve asset columns by alias; required ones must exist and the
    /// numeric ones must actually be numeric
    pub fn validate_asset_columns(df: &DataFrame) -> Result<HashMap<AssetColumn, String>> {
        let mut column_map = HashMap::new();

        for required in AssetColumn::required() {
            match Self::find_column(df, &required) {
                Some(col_name) => {
                    column_map.insert(required, col_name.to_string());
                }
                None => {
                    return Err(OptimizerError::DataLoading(format!(
                        "Missing required column: {} (tried aliases: {:?})",
                        required.as_str(),
                        required.aliases()
                    )));
                }
            }
        }

        for optional in AssetColumn::optional() {
            if let Some(col_name) = Self::find_column(df, &optional) {
                column_map.insert(optional, col_name.to_string());
            }
        }

        for (asset_col, actual_name) in &column_map {
            if !asset_col.is_numeric() {
                continue;
            }
            let column = df.column(actual_name)?;
            if !Self::is_numeric(column.dtype()) {
                return Err(OptimizerError::DataLoading(format!(
                    "Column '{}' ({}) must be numeric, found {:?}",
                    actual_name,
                    asset_col.as_str(),
                    column.dtype()
                )));
            }
        }

        Ok(column_map)
    }

    /// Validate minimum number of rows
    pub fn validate_minimum_rows(df: &DataFrame, min_rows: usize) -> Result<()> {
        if df.height() < min_rows {
            return Err(OptimizerError::DataLoading(format!(
                "Insufficient data: {} rows (minimum {} required)",
                df.height(),
                min_rows
            )));
        }
        Ok(())
    }

    /// Null counts per column, only for columns that have any
    pub fn check_nulls(df: &DataFrame) -> Result<HashMap<String, usize>> {
        let mut null_report = HashMap::new();
        for col_name in df.get_column_names() {
            let null_count = df.column(col_name)?.null_count();
            if null_count > 0 {
                null_report.insert(col_name.to_string(), null_count);
            }
        }
        Ok(null_report)
    }

    fn find_column<'a>(df: &'a DataFrame, column: &AssetColumn) -> Option<&'a str> {
        let columns = df.get_column_names();
        for alias in column.aliases() {
            if columns.iter().any(|col| col.as_str() == alias) {
                return Some(alias);
            }
        }
        None
    }

    fn is_numeric(dtype: &DataType) -> bool {
        matches!(
            dtype,
            DataType::Float64 | DataType::Float32 | DataType::Int64 | DataType::Int32 | DataType::UInt64 | DataType::UInt32
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn test_resolves_portuguese_headers() {
        let df = df! {
            "Banco" => &["Banco_A", "Banco_B"],
            "Rentabilidade" => &[13.5, 12.0],
            "Prazo" => &[365i64, 720],
            "Liquidez" => &["Diária", "No vencimento"],
        }
        .unwrap();

        let map = DataValidator::validate_asset_columns(&df).unwrap();
        assert_eq!(map[&AssetColumn::Rate], "Rentabilidade");
        assert_eq!(map[&AssetColumn::Term], "Prazo");
        assert_eq!(map[&AssetColumn::Category], "Liquidez");
        assert_eq!(map[&AssetColumn::Issuer], "Banco");
        assert!(!map.contains_key(&AssetColumn::Rating));
    }

    #[test]
    fn test_missing_and_non_numeric_columns() {
        let df = df! {
            "rate" => &[13.5],
            "category" => &["Diária"],
        }
        .unwrap();
        assert!(DataValidator::validate_asset_columns(&df).is_err());

        let df = df! {
            "rate" => &["high"],
            "term" => &[365i64],
            "category" => &["Diária"],
        }
        .unwrap();
        assert!(DataValidator::validate_asset_columns(&df).is_err());
    }
}
