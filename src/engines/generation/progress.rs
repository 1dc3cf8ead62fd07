use super::evolution_engine::ProgressCallback;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;

/// Logs progress through the `log` facade.
pub struct ConsoleProgressCallback {
    total_steps: usize,
}

impl ConsoleProgressCallback {
    pub fn new(total_steps: usize) -> Self {
        Self { total_steps }
    }
}

impl ProgressCallback for ConsoleProgressCallback {
    fn on_generation_complete(&mut self, step: usize, best_fitness: f64) {
        log::info!(
            "Step {}/{} complete. Best fitness: {:.4}",
            step + 1,
            self.total_steps,
            best_fitness
        );
    }

    fn on_layer_complete(&mut self, layer: usize, best_fitness: f64) {
        log::info!("Layer {} finished with fitness {:.4}", layer + 1, best_fitness);
    }

    fn on_complete(&mut self) {
        log::info!("Map generation complete");
    }
}

/// Ignores every notification.
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_generation_complete(&mut self, _step: usize, _best_fitness: f64) {}
}

// For handing progress to a host thread
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressMessage {
    GenerationComplete { step: usize, best_fitness: f64 },
    LayerComplete { layer: usize, best_fitness: f64 },
    Finished,
}

pub struct ChannelProgressCallback {
    sender: Sender<ProgressMessage>,
    cancel_flag: Arc<AtomicBool>,
}

impl ChannelProgressCallback {
    pub fn new(sender: Sender<ProgressMessage>, cancel_flag: Arc<AtomicBool>) -> Self {
        Self { sender, cancel_flag }
    }
}

impl ProgressCallback for ChannelProgressCallback {
    fn on_generation_complete(&mut self, step: usize, best_fitness: f64) {
        let _ = self
            .sender
            .send(ProgressMessage::GenerationComplete { step, best_fitness });
    }

    fn on_layer_complete(&mut self, layer: usize, best_fitness: f64) {
        let _ = self
            .sender
            .send(ProgressMessage::LayerComplete { layer, best_fitness });
    }

    fn on_complete(&mut self) {
        let _ = self.sender.send(ProgressMessage::Finished);
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }
}
