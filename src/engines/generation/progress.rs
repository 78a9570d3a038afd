use super::evolution_engine::ProgressCallback;
use crate::types::GenerationLogEntry;

pub struct ConsoleProgressCallback;

impl ProgressCallback for ConsoleProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        println!("Generation {} starting...", generation + 1);
    }

    fn on_generation_complete(&mut self, entry: &GenerationLogEntry, diversity: f64) {
        println!(
            "Generation {} complete. Best fitness: {:.4}, mean: {:.4}, diversity: {:.3}",
            entry.generation + 1,
            entry.best_fitness,
            entry.mean_fitness,
            diversity
        );
    }

    fn on_diversity_restart(&mut self, generation: usize, diversity: f64, replaced: usize) {
        println!(
            "  Diversity {:.3} after generation {}: reseeded {} individuals",
            diversity,
            generation + 1,
            replaced
        );
    }
}

/// Reports nothing; for library callers and tests
pub struct SilentProgress;

impl ProgressCallback for SilentProgress {
    fn on_generation_start(&mut self, _generation: usize) {}

    fn on_generation_complete(&mut self, _entry: &GenerationLogEntry, _diversity: f64) {}

    fn on_diversity_restart(&mut self, _generation: usize, _diversity: f64, _replaced: usize) {}
}

// For forwarding progress to another thread (e.g. a UI)
pub struct ChannelProgressCallback {
    sender: std::sync::mpsc::Sender<ProgressMessage>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressMessage {
    GenerationStart(usize),
    GenerationComplete { entry: GenerationLogEntry, diversity: f64 },
    DiversityRestart { generation: usize, diversity: f64, replaced: usize },
}

impl ChannelProgressCallback {
    pub fn new(sender: std::sync::mpsc::Sender<ProgressMessage>) -> Self {
        Self { sender }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        let _ = self.sender.send(ProgressMessage::GenerationStart(generation));
    }

    fn on_generation_complete(&mut self, entry: &GenerationLogEntry, diversity: f64) {
        let _ = self.sender.send(ProgressMessage::GenerationComplete {
            entry: *entry,
            diversity,
        });
    }

    fn on_diversity_restart(&mut self, generation: usize, diversity: f64, replaced: usize) {
        let _ = self.sender.send(ProgressMessage::DiversityRestart {
            generation,
            diversity,
            replaced,
        });
    }
}
