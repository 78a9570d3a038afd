use anyhow::{bail, Context};
use cdbopt::config::ConfigManager;
use cdbopt::data::CsvConnector;
use cdbopt::engines::generation::{ConsoleProgressCallback, EvolutionEngine, EvolutionOutcome, SilentProgress};
use cdbopt::types::PortfolioSummary;
use cdbopt::Universe;
use serde_json::json;

const USAGE: &str = "usage: cdbopt <universe.csv> [config.toml] [--json]";

fn main() -> anyhow::Result<()> {
    // Configure logging, controlled by RUST_LOG
    env_logger::init();

    let mut json_output = false;
    let mut positional = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => json_output = true,
            "-h" | "--help" => {
                println!("{}", USAGE);
                return Ok(());
            }
            _ => positional.push(arg),
        }
    }

    let (universe_path, config_path) = match positional.as_slice() {
        [universe] => (universe.clone(), None),
        [universe, config] => (universe.clone(), Some(config.clone())),
        _ => bail!("{}", USAGE),
    };

    let mut manager = ConfigManager::new();
    match &config_path {
        Some(path) => manager
            .load_from_file(path)
            .with_context(|| format!("loading configuration from {}", path))?,
        None => manager
            .load_from_env()
            .context("reading configuration from the environment")?,
    }
    let config = manager.get().clone();

    let (universe, metadata) = CsvConnector::load_universe(&universe_path, &config.universe)
        .with_context(|| format!("loading universe from {}", universe_path))?;
    log::info!(
        "Universe: {} assets (read {}, skipped {}, duplicates {}, filtered {})",
        metadata.num_assets,
        metadata.rows_read,
        metadata.rows_skipped,
        metadata.duplicates_dropped,
        metadata.rows_filtered
    );

    let mut engine = EvolutionEngine::with_constraints(config.evolution, config.constraints, universe)
        .context("invalid optimizer configuration")?;

    let outcome = if json_output {
        engine.run(SilentProgress)?
    } else {
        engine.run(ConsoleProgressCallback)?
    };

    if json_output {
        let report = json!({
            "universe": metadata,
            "stop_reason": outcome.stop_reason,
            "generations_run": outcome.generations_run,
            "evaluation_warnings": outcome.evaluation_warnings,
            "restarts": outcome.restarts,
            "final_diversity": outcome.final_diversity,
            "log": outcome.log,
            "hall_of_fame": outcome.hall_of_fame,
            "pareto_front": outcome.pareto_front,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&outcome, engine.universe());
    }

    Ok(())
}

fn print_summary(outcome: &EvolutionOutcome, universe: &Universe) {
    println!();
    println!(
        "Stopped ({:?}) after {} generations; final diversity {:.3}, {} restarts, {} failed evaluations",
        outcome.stop_reason,
        outcome.generations_run,
        outcome.final_diversity,
        outcome.restarts,
        outcome.evaluation_warnings
    );
    if let (Some(first), Some(last)) = (outcome.log.first(), outcome.log.last()) {
        println!(
            "Best fitness {:.4} -> {:.4}, mean {:.4} -> {:.4}",
            first.best_fitness, last.best_fitness, first.mean_fitness, last.mean_fitness
        );
    }

    println!();
    println!("Top portfolios:");
    for (rank, portfolio) in outcome.hall_of_fame.iter().enumerate() {
        print_portfolio(rank + 1, portfolio, universe);
    }

    if let Some(front) = &outcome.pareto_front {
        println!();
        println!("Pareto front ({} portfolios):", front.len());
        for (rank, portfolio) in front.iter().enumerate() {
            print_portfolio(rank + 1, portfolio, universe);
        }
    }
}

fn print_portfolio(rank: usize, portfolio: &PortfolioSummary, universe: &Universe) {
    let objectives: Vec<String> = portfolio.objectives.iter().map(|v| format!("{:.4}", v)).collect();
    println!("#{} [{}]", rank, objectives.join(", "));
    for (index, record) in portfolio.assets.iter().filter_map(|&i| universe.get(i).map(|a| (i, a))) {
        println!(
            "    {:>4}  {:>6.2}%  {:>5} days  {:<16} {}",
            index,
            record.rate,
            record.term,
            record.category,
            record.issuer.as_deref().unwrap_or("-")
        );
    }
}
