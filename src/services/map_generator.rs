use crate::config::{CompatibilityRule, EvolutionConfig};
use crate::config::traits::ConfigSection;
use crate::data::AssetCatalog;
use crate::engines::evaluation::FitnessEvaluator;
use crate::engines::generation::{
    evolution_engine::{EvolutionConfig as EngineEvolutionConfig, EvolutionEngine, ProgressCallback},
    CompatibilityMatrix,
};
use crate::engines::rendering::{composite, LayerRenderer};
use crate::error::{Result, TilemapError};
use crate::export::MapExporter;
use crate::types::{GeneratedLayer, GeneratedMap, GridSize};
use std::path::PathBuf;

/// Everything one pipeline run needs, passed by value.
#[derive(Debug, Clone)]
pub struct MapRequest {
    pub grid: GridSize,
    pub evolution: EvolutionConfig,
    pub rules: Vec<CompatibilityRule>,
    /// Skips the file export when `None`.
    pub output_path: Option<PathBuf>,
}

impl MapRequest {
    pub fn new(grid: GridSize) -> Self {
        Self {
            grid,
            evolution: EvolutionConfig::default(),
            rules: Vec::new(),
            output_path: None,
        }
    }

    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }
}

/// Offsets per-layer generation indices into one counter over the whole run.
struct LayerProgress<'a, C: ProgressCallback + ?Sized> {
    inner: &'a mut C,
    offset: usize,
}

impl<'a, C: ProgressCallback + ?Sized> ProgressCallback for LayerProgress<'a, C> {
    fn on_generation_complete(&mut self, generation: usize, best_fitness: f64) {
        self.inner
            .on_generation_complete(self.offset + generation, best_fitness);
    }

    fn is_cancelled(&self) -> bool {
        self.inner.is_cancelled()
    }
}

/// Evolve, rasterize and export every layer of a map.
///
/// The callback receives `layer * generations + generation` after each
/// generation, `on_layer_complete` per layer and `on_complete` once the
/// export has finished.
pub fn generate_map<C: ProgressCallback + ?Sized>(
    catalog: &AssetCatalog,
    request: &MapRequest,
    callback: &mut C,
) -> Result<GeneratedMap> {
    request.grid.validate()?;
    request.evolution.validate()?;
    if catalog.is_empty() {
        return Err(TilemapError::InvalidCatalog("catalog has no assets".to_string()));
    }

    let matrix = CompatibilityMatrix::with_rules(catalog.len(), &request.rules)?;
    let evaluator = FitnessEvaluator::new(
        request.evolution.local_weight,
        request.evolution.distribution_weight,
    );
    let renderer = LayerRenderer::new();

    let mut layers = Vec::with_capacity(request.evolution.layers);
    for layer_index in 0..request.evolution.layers {
        log::info!("Evolving layer {}/{}", layer_index + 1, request.evolution.layers);

        let mut engine_config = EngineEvolutionConfig::from(&request.evolution);
        engine_config.seed = request
            .evolution
            .seed
            .map(|seed| seed.wrapping_add(layer_index as u64));

        let mut engine = EvolutionEngine::new(engine_config, request.grid, &matrix, evaluator);
        let mut progress = LayerProgress {
            inner: &mut *callback,
            offset: layer_index * request.evolution.generations,
        };
        let outcome = engine.run(&mut progress)?;

        let raster = renderer.render(&outcome.genome, request.grid, catalog)?;
        callback.on_layer_complete(layer_index, outcome.fitness);

        layers.push(GeneratedLayer {
            name: format!("Layer {}", layer_index + 1),
            genome: outcome.genome,
            fitness: outcome.fitness,
            raster,
        });
    }

    let rasters: Vec<_> = layers.iter().map(|l| l.raster.clone()).collect();
    let composite = composite(&rasters)
        .ok_or_else(|| TilemapError::Configuration("At least one layer is required".to_string()))?;

    if let Some(path) = &request.output_path {
        let genomes: Vec<_> = layers.iter().map(|l| l.genome.clone()).collect();
        MapExporter::new()
            .with_tileset(catalog.sources().to_vec())
            .export(&genomes, request.grid, catalog.tile_size(), path)?;
    }

    callback.on_complete();

    Ok(GeneratedMap {
        grid: request.grid,
        tile_size: catalog.tile_size(),
        layers,
        composite,
    })
}
