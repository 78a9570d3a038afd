use crate::config::UniverseConfig;
use crate::types::AssetRecord;

/// Applies the investor's quality filters to raw asset records
pub struct UniverseFilter<'a> {
    config: &'a UniverseConfig,
}

impl<'a> UniverseFilter<'a> {
    pub fn new(config: &'a UniverseConfig) -> Self {
        Self { config }
    }

    pub fn accepts(&self, asset: &AssetRecord) -> bool {
        if let Some(min_rate) = self.config.min_rate() {
            if asset.rate < min_rate {
                return false;
            }
        }

        if let Some(max_term) = self.config.max_term_days {
            if asset.term > max_term {
                return false;
            }
        }

        if let Some(category) = &self.config.required_category {
            if &asset.category != category {
                return false;
            }
        }

        if let Some(issuer) = &asset.issuer {
            if self.config.excluded_issuers.iter().any(|e| e == issuer) {
                return false;
            }
        }

        if let Some(ratings) = &self.config.accepted_ratings {
            match &asset.rating {
                Some(rating) if ratings.contains(rating) => {}
                _ => return false,
            }
        }

        true
    }

    /// Keep the accepted records, logging how many each run drops
    pub fn apply(&self, assets: Vec<AssetRecord>) -> Vec<AssetRecord> {
        let before = assets.len();
        let kept: Vec<AssetRecord> = assets.into_iter().filter(|a| self.accepts(a)).collect();
        log::info!("Universe filter kept {}/{} assets", kept.len(), before);
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<AssetRecord> {
        vec![
            AssetRecord::new(12.0, 365, "Diária").with_issuer("Banco_A").with_rating("A+"),
            AssetRecord::new(9.0, 180, "Diária").with_issuer("Banco_B").with_rating("A"),
            AssetRecord::new(13.0, 1500, "No vencimento").with_issuer("Banco_C").with_rating("BBB"),
            AssetRecord::new(14.0, 720, "No vencimento").with_issuer("Banco_D"),
        ]
    }

    #[test]
    fn test_default_accepts_everything() {
        let config = UniverseConfig::default();
        assert_eq!(UniverseFilter::new(&config).apply(sample()).len(), 4);
    }

    #[test]
    fn test_rate_and_term_filters() {
        let config = UniverseConfig {
            benchmark_rate: 10.0,
            min_rate_pct_of_benchmark: Some(100.0),
            max_term_days: Some(1000),
            ..Default::default()
        };
        let kept = UniverseFilter::new(&config).apply(sample());
        let rates: Vec<f64> = kept.iter().map(|a| a.rate).collect();
        assert_eq!(rates, vec![12.0, 14.0]);
    }

    #[test]
    fn test_issuer_category_and_rating_filters() {
        let config = UniverseConfig {
            required_category: Some("No vencimento".to_string()),
            excluded_issuers: vec!["Banco_C".to_string()],
            ..Default::default()
        };
        let kept = UniverseFilter::new(&config).apply(sample());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].issuer.as_deref(), Some("Banco_D"));

        // Unrated assets fail an explicit rating filter
        let config = UniverseConfig {
            accepted_ratings: Some(vec!["A+".to_string(), "A".to_string()]),
            ..Default::default()
        };
        assert_eq!(UniverseFilter::new(&config).apply(sample()).len(), 2);
    }
}
