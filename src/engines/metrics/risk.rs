// src/engines/metrics/risk.rs
use crate::types::AssetRecord;

/// Smallest dispersion used as a Sharpe-like denominator
pub const RISK_FLOOR: f64 = 0.1;

pub struct RiskMetrics;

impl RiskMetrics {
    /// Population standard deviation of the selected yields.
    /// Zero for one or no rows.
    pub fn rate_dispersion(rows: &[&AssetRecord]) -> f64 {
        let rates: Vec<f64> = rows.iter().map(|a| a.rate).collect();
        Self::std_dev(&rates)
    }

    /// Excess yield per unit of dispersion, with the dispersion floored
    pub fn sharpe_like(mean_rate: f64, dispersion: f64, risk_free_rate: f64) -> f64 {
        (mean_rate - risk_free_rate) / dispersion.max(RISK_FLOOR)
    }

    pub fn std_dev(values: &[f64]) -> f64 {
        if values.len() <= 1 {
            return 0.0;
        }

        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let variance = values.iter()
            .map(|&v| (v - mean).powi(2))
            .sum::<f64>() / values.len() as f64;

        variance.sqrt()
    }
}
