pub mod compatibility;
pub mod genome;
pub mod operators;
pub mod evolution_engine;
pub mod progress;

pub use compatibility::CompatibilityMatrix;
pub use genome::{AssetId, Genome, validate_genome};
pub use evolution_engine::{EvolutionEngine, EvolutionConfig, LayerOutcome, ProgressCallback};
pub use progress::{ChannelProgressCallback, ConsoleProgressCallback, NoProgress, ProgressMessage};
