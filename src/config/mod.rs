pub mod traits;
pub mod evolution;
pub mod map;
pub mod compatibility;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use evolution::EvolutionConfig;
pub use map::MapConfig;
pub use compatibility::{CompatibilityConfig, CompatibilityRule};
pub use traits::{ConfigSection, ConfigManifest, FieldManifest};
