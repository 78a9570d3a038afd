// src/engines/metrics/engine.rs
use crate::engines::metrics::{ReturnMetrics, RiskMetrics};
use crate::types::AssetRecord;
use std::collections::{HashMap, HashSet};

/// Aggregate statistics of a selection of assets. Order-independent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortfolioMetrics {
    pub size: usize,
    pub mean_rate: f64,
    pub rate_dispersion: f64,
    pub mean_term_days: f64,
    pub compounded_return: f64,
    pub distinct_categories: usize,
    pub max_per_issuer: usize,
}

impl PortfolioMetrics {
    pub fn calculate(rows: &[&AssetRecord]) -> Self {
        let distinct_categories = rows
            .iter()
            .map(|a| a.category.as_str())
            .collect::<HashSet<_>>()
            .len();

        let mut per_issuer: HashMap<&str, usize> = HashMap::new();
        for issuer in rows.iter().filter_map(|a| a.issuer.as_deref()) {
            *per_issuer.entry(issuer).or_insert(0) += 1;
        }

        Self {
            size: rows.len(),
            mean_rate: ReturnMetrics::mean_rate(rows),
            rate_dispersion: RiskMetrics::rate_dispersion(rows),
            mean_term_days: ReturnMetrics::mean_term_days(rows),
            compounded_return: ReturnMetrics::compounded_to_maturity(rows),
            distinct_categories,
            max_per_issuer: per_issuer.values().copied().max().unwrap_or(0),
        }
    }
}
