//! Genetic-algorithm generation of layered tile maps with TMX export.

pub mod config;
pub mod data;
pub mod engines;
pub mod error;
pub mod export;
pub mod services;
pub mod types;

pub use error::{Result, TilemapError};
pub use types::{AssetId, Genome, GeneratedLayer, GeneratedMap, GridSize};
