use crate::config::UniverseConfig;
use crate::data::{filter::UniverseFilter, universe::Universe};
use crate::error::{Result, OptimizerError};
use crate::types::AssetRecord;
use polars::prelude::*;
use std::path::Path;
use super::{
    types::{AssetColumn, UniverseMetadata},
    validator::DataValidator,
};
use std::collections::{HashMap, HashSet};

pub struct CsvConnector;

impl CsvConnector {
    /// Load CSV file into DataFrame
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
            .finish()
            .map_err(|e| OptimizerError::DataLoading(format!("Failed to read CSV: {}", e)))?;

        Ok(df)
    }

    /// Load, convert, deduplicate and filter a universe file
    pub fn load_universe<P: AsRef<Path>>(
        path: P,
        config: &UniverseConfig,
    ) -> Result<(Universe, UniverseMetadata)> {
        let df = Self::load(&path)?;
        DataValidator::validate_minimum_rows(&df, 1)?;

        let null_report = DataValidator::check_nulls(&df)?;
        if !null_report.is_empty() {
            log::warn!("Null values detected: {:?}", null_report);
        }

        let column_map = DataValidator::validate_asset_columns(&df)?;
        let (records, rows_skipped) = Self::to_records(&df, &column_map)?;
        let (records, duplicates_dropped) = Self::drop_duplicates(records);

        let before_filter = records.len();
        let assets = UniverseFilter::new(config).apply(records);
        if assets.is_empty() {
            return Err(OptimizerError::DataLoading(
                "No asset satisfies the selected filters".to_string()
            ));
        }

        let metadata = Self::create_metadata(&path, &df, &assets, rows_skipped, duplicates_dropped, before_filter);
        Ok((Universe::new(assets)?, metadata))
    }

    /// Convert rows to asset records. Rows missing a required value, or a
    /// value in an optional column the file does carry, are skipped; the
    /// second element is how many were skipped.
    pub fn to_records(
        df: &DataFrame,
        column_map: &HashMap<AssetColumn, String>,
    ) -> Result<(Vec<AssetRecord>, usize)> {
        let required = |col: AssetColumn| {
            column_map.get(&col).ok_or_else(|| {
                OptimizerError::DataLoading(format!("Column {} was not resolved", col.as_str()))
            })
        };

        let rate = df.column(required(AssetColumn::Rate)?)?.cast(&DataType::Float64)?;
        let term = df.column(required(AssetColumn::Term)?)?.cast(&DataType::Int64)?;
        let category = df.column(required(AssetColumn::Category)?)?.cast(&DataType::String)?;
        let issuer = match column_map.get(&AssetColumn::Issuer) {
            Some(name) => Some(df.column(name)?.cast(&DataType::String)?),
            None => None,
        };
        let rating = match column_map.get(&AssetColumn::Rating) {
            Some(name) => Some(df.column(name)?.cast(&DataType::String)?),
            None => None,
        };

        let rate = rate.f64()?;
        let term = term.i64()?;
        let category = category.str()?;
        let issuer = issuer.as_ref().map(|c| c.str()).transpose()?;
        let rating = rating.as_ref().map(|c| c.str()).transpose()?;

        let mut records = Vec::with_capacity(df.height());
        let mut skipped = 0;

        for i in 0..df.height() {
            let (Some(r), Some(t), Some(c)) = (rate.get(i), term.get(i), category.get(i)) else {
                skipped += 1;
                continue;
            };
            let issuer_value = issuer.map(|s| s.get(i));
            let rating_value = rating.map(|s| s.get(i));
            if matches!(issuer_value, Some(None)) || matches!(rating_value, Some(None)) {
                skipped += 1;
                continue;
            }
            if !r.is_finite() || t < 0 || t > u32::MAX as i64 {
                log::warn!("Skipping row {}: rate={} term={}", i, r, t);
                skipped += 1;
                continue;
            }

            records.push(AssetRecord {
                rate: r,
                term: t as u32,
                category: c.to_string(),
                issuer: issuer_value.flatten().map(str::to_string),
                rating: rating_value.flatten().map(str::to_string),
            });
        }

        if skipped > 0 {
            log::warn!("Skipped {} rows with missing or invalid values", skipped);
        }

        Ok((records, skipped))
    }

    /// Drop exact duplicate rows, keeping the first occurrence
    pub fn drop_duplicates(records: Vec<AssetRecord>) -> (Vec<AssetRecord>, usize) {
        let before = records.len();
        let mut seen = HashSet::new();
        let unique: Vec<AssetRecord> = records
            .into_iter()
            .filter(|r| {
                seen.insert((
                    r.rate.to_bits(),
                    r.term,
                    r.category.clone(),
                    r.issuer.clone(),
                    r.rating.clone(),
                ))
            })
            .collect();
        let dropped = before - unique.len();
        (unique, dropped)
    }

    fn create_metadata<P: AsRef<Path>>(
        path: P,
        df: &DataFrame,
        assets: &[AssetRecord],
        rows_skipped: usize,
        duplicates_dropped: usize,
        before_filter: usize,
    ) -> UniverseMetadata {
        let rate_range = assets.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), a| {
            (lo.min(a.rate), hi.max(a.rate))
        });
        let term_range = assets.iter().fold((u32::MAX, 0), |(lo, hi), a| {
            (lo.min(a.term), hi.max(a.term))
        });

        UniverseMetadata {
            file_path: path.as_ref().to_string_lossy().to_string(),
            rows_read: df.height(),
            rows_skipped,
            duplicates_dropped,
            rows_filtered: before_filter - assets.len(),
            num_assets: assets.len(),
            rate_range,
            term_range,
            loaded_at: chrono::Utc::now(),
        }
    }
}
