use super::traits::{ConfigSection, ConfigManifest, FieldManifest};
use crate::error::TilemapError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub generations: usize,
    pub layers: usize,
    pub elite_count: usize,
    pub parent_pool_size: usize,
    pub mutation_rate: f64,
    pub local_weight: f64,
    pub distribution_weight: f64,
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations: 50,
            layers: 3,
            elite_count: 10,
            parent_pool_size: 50,
            mutation_rate: 0.01,
            local_weight: 0.7,
            distribution_weight: 0.3,
            seed: None,
        }
    }
}

impl EvolutionConfig {
    /// Total number of progress steps reported by one pipeline run.
    pub fn total_steps(&self) -> usize {
        self.layers * self.generations
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), TilemapError> {
        if self.population_size == 0 {
            return Err(TilemapError::Configuration(
                "Population size must be at least 1".to_string()
            ));
        }
        if self.layers == 0 {
            return Err(TilemapError::Configuration(
                "At least one layer is required".to_string()
            ));
        }
        if self.parent_pool_size == 0 {
            return Err(TilemapError::Configuration(
                "Parent pool size must be at least 1".to_string()
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(TilemapError::Configuration(
                "Mutation rate must be between 0 and 1".to_string()
            ));
        }
        if self.local_weight < 0.0 || self.distribution_weight < 0.0 {
            return Err(TilemapError::Configuration(
                "Fitness weights must not be negative".to_string()
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Evolution".to_string(),
            fields: vec![
                FieldManifest::new(
                    "population_size",
                    "integer",
                    serde_json::json!(self.population_size),
                    Some((1.0, 10000.0)),
                    "Number of candidate layouts per generation",
                ),
                FieldManifest::new(
                    "generations",
                    "integer",
                    serde_json::json!(self.generations),
                    Some((0.0, 10000.0)),
                    "Generations evolved for each layer",
                ),
                FieldManifest::new(
                    "layers",
                    "integer",
                    serde_json::json!(self.layers),
                    Some((1.0, 16.0)),
                    "Independent layers stacked into the map",
                ),
                FieldManifest::new(
                    "elite_count",
                    "integer",
                    serde_json::json!(self.elite_count),
                    Some((0.0, 10000.0)),
                    "Best layouts carried over unchanged",
                ),
                FieldManifest::new(
                    "parent_pool_size",
                    "integer",
                    serde_json::json!(self.parent_pool_size),
                    Some((1.0, 10000.0)),
                    "Top layouts eligible as parents",
                ),
                FieldManifest::new(
                    "mutation_rate",
                    "float",
                    serde_json::json!(self.mutation_rate),
                    Some((0.0, 1.0)),
                    "Per-cell probability of a random tile change",
                ),
                FieldManifest::new(
                    "seed",
                    "integer",
                    serde_json::Value::Null,
                    None,
                    "Random seed, empty for a fresh run every time",
                ),
            ],
        }
    }
}
