pub mod generation_runner;
pub mod map_generator;

pub use generation_runner::{GenerationResult, GenerationRunner};
pub use map_generator::{generate_map, MapRequest};
