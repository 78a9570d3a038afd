use crate::error::{EvaluationError, OptimizerError, Result};
use crate::types::AssetRecord;

/// Immutable table of candidate assets. Built once per run and shared
/// read-only by every evaluation.
#[derive(Debug, Clone)]
pub struct Universe {
    assets: Vec<AssetRecord>,
}

impl Universe {
    pub fn new(assets: Vec<AssetRecord>) -> Result<Self> {
        if assets.is_empty() {
            return Err(OptimizerError::DataLoading(
                "Universe contains no assets".to_string()
            ));
        }
        if let Some((i, asset)) = assets
            .iter()
            .enumerate()
            .find(|(_, a)| !a.rate.is_finite())
        {
            return Err(OptimizerError::Validation(format!(
                "Asset {} has a non-finite rate ({})",
                i, asset.rate
            )));
        }
        Ok(Self { assets })
    }

    /// Build a universe from plain yields (all with a one-year term)
    pub fn from_rates(rates: &[f64]) -> Result<Self> {
        Self::new(
            rates
                .iter()
                .map(|&rate| AssetRecord::new(rate, 365, "default"))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AssetRecord> {
        self.assets.get(index)
    }

    pub fn assets(&self) -> &[AssetRecord] {
        &self.assets
    }

    /// Rows selected by a portfolio, failing on any out-of-range index
    pub fn select(&self, indices: &[usize]) -> std::result::Result<Vec<&AssetRecord>, EvaluationError> {
        indices
            .iter()
            .map(|&index| {
                self.assets.get(index).ok_or(EvaluationError::IndexOutOfRange {
                    index,
                    universe: self.assets.len(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_out_of_range() {
        let universe = Universe::from_rates(&[10.0, 11.0]).unwrap();
        assert_eq!(universe.select(&[1, 0]).unwrap().len(), 2);
        assert_eq!(
            universe.select(&[2]).unwrap_err(),
            EvaluationError::IndexOutOfRange { index: 2, universe: 2 }
        );
    }

    #[test]
    fn test_rejects_empty_and_nan() {
        assert!(Universe::new(vec![]).is_err());
        assert!(Universe::from_rates(&[10.0, f64::NAN]).is_err());
    }
}
