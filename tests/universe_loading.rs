use cdbopt::config::{ConfigManager, UniverseConfig};
use cdbopt::data::CsvConnector;
use cdbopt::engines::generation::{EvolutionEngine, SilentProgress};
use std::path::PathBuf;

fn sample_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/cdbs_sample.csv")
}

#[test]
fn test_load_sample_without_filters() {
    let (universe, metadata) = CsvConnector::load_universe(sample_path(), &UniverseConfig::default()).unwrap();

    // 12 rows: one without a rate, one exact duplicate
    assert_eq!(metadata.rows_read, 12);
    assert_eq!(metadata.rows_skipped, 1);
    assert_eq!(metadata.duplicates_dropped, 1);
    assert_eq!(metadata.rows_filtered, 0);
    assert_eq!(universe.len(), 10);
    assert_eq!(metadata.rate_range, (8.5, 15.3));
    assert_eq!(metadata.term_range, (90, 1440));

    let first = universe.get(0).unwrap();
    assert_eq!(first.issuer.as_deref(), Some("Banco_A"));
    assert_eq!(first.rating.as_deref(), Some("AA"));
    assert_eq!(first.category, "Diária");
}

#[test]
fn test_load_sample_with_filters() {
    let config = UniverseConfig {
        benchmark_rate: 11.0,
        min_rate_pct_of_benchmark: Some(100.0),
        max_term_days: Some(1080),
        excluded_issuers: vec!["Banco_D".to_string()],
        ..Default::default()
    };
    let (universe, metadata) = CsvConnector::load_universe(sample_path(), &config).unwrap();

    assert_eq!(universe.len(), 7);
    assert_eq!(metadata.rows_filtered, 3);
    assert!(universe.assets().iter().all(|a| a.rate >= 11.0 && a.term <= 1080));
    assert!(universe.assets().iter().all(|a| a.issuer.as_deref() != Some("Banco_D")));
}

#[test]
fn test_filters_rejecting_everything() {
    let config = UniverseConfig {
        required_category: Some("Mensal".to_string()),
        ..Default::default()
    };
    assert!(CsvConnector::load_universe(sample_path(), &config).is_err());
}

#[test]
fn test_config_file_drives_a_run() {
    let dir = std::env::temp_dir().join(format!("cdbopt_run_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("cdbopt.toml");
    std::fs::write(
        &path,
        r#"
[evolution]
population_size = 16
generations = 8
portfolio_size = 3
strategy = "conservative"
seed = 3
hall_of_fame_size = 3

[universe]
accepted_ratings = ["AA", "AAA", "A"]

[constraints]
max_assets_per_issuer = 1
"#,
    )
    .unwrap();

    let mut manager = ConfigManager::new();
    manager.load_from_file(&path).unwrap();
    let config = manager.get().clone();
    assert_eq!(config.evolution.population_size, 16);

    let (universe, _) = CsvConnector::load_universe(sample_path(), &config.universe).unwrap();
    assert_eq!(universe.len(), 8);

    let mut engine = EvolutionEngine::with_constraints(config.evolution, config.constraints, universe).unwrap();
    let outcome = engine.run(SilentProgress).unwrap();

    assert_eq!(outcome.population.len(), 16);
    assert!(outcome.hall_of_fame.len() <= 3);
    for portfolio in &outcome.hall_of_fame {
        let issuers: std::collections::HashSet<_> = portfolio
            .assets
            .iter()
            .map(|&i| engine.universe().get(i).unwrap().issuer.clone())
            .collect();
        assert_eq!(issuers.len(), portfolio.assets.len());
    }

    std::fs::remove_dir_all(&dir).ok();
}
