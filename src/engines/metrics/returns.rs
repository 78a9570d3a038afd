// src/engines/metrics/returns.rs
use crate::types::AssetRecord;

pub const DAYS_PER_YEAR: f64 = 365.0;

pub struct ReturnMetrics;

impl ReturnMetrics {
    /// Arithmetic mean of selected yields; zero for an empty selection
    pub fn mean_rate(rows: &[&AssetRecord]) -> f64 {
        Self::mean(rows.iter().map(|a| a.rate), rows.len())
    }

    pub fn mean_term_days(rows: &[&AssetRecord]) -> f64 {
        Self::mean(rows.iter().map(|a| a.term as f64), rows.len())
    }

    /// Mean of `(1 + rate/100)^(term/365) - 1` over the rows, in percent
    pub fn compounded_to_maturity(rows: &[&AssetRecord]) -> f64 {
        let growth = rows.iter().map(|a| {
            (1.0 + a.rate / 100.0).powf(a.term as f64 / DAYS_PER_YEAR) - 1.0
        });
        Self::mean(growth, rows.len()) * 100.0
    }

    fn mean(values: impl Iterator<Item = f64>, count: usize) -> f64 {
        if count == 0 {
            return 0.0;
        }
        values.sum::<f64>() / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compounded_one_year_equals_rate() {
        let a = AssetRecord::new(12.0, 365, "Diária");
        let rows = vec![&a];
        assert!((ReturnMetrics::compounded_to_maturity(&rows) - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_compounded_two_years() {
        let a = AssetRecord::new(10.0, 730, "Diária");
        let rows = vec![&a];
        // 1.1^2 - 1 = 21%
        assert!((ReturnMetrics::compounded_to_maturity(&rows) - 21.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_means_are_zero() {
        let rows: Vec<&AssetRecord> = vec![];
        assert_eq!(ReturnMetrics::mean_rate(&rows), 0.0);
        assert_eq!(ReturnMetrics::mean_term_days(&rows), 0.0);
        assert_eq!(ReturnMetrics::compounded_to_maturity(&rows), 0.0);
    }
}
