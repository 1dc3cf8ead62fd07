use crate::error::{Result, TilemapError};
use crate::types::AssetId;
use image::imageops::FilterType;
use image::RgbaImage;
use std::path::{Path, PathBuf};

/// Ordered list of decoded tile sprites, indexed by `AssetId`.
///
/// Every sprite is exactly `tile_size x tile_size`. When the catalog was
/// loaded from disk the source paths are kept so the exporter can reference
/// them from the tileset.
#[derive(Debug, Clone)]
pub struct AssetCatalog {
    sprites: Vec<RgbaImage>,
    sources: Vec<PathBuf>,
    tile_size: u32,
}

impl AssetCatalog {
    pub fn new(sprites: Vec<RgbaImage>, tile_size: u32) -> Result<Self> {
        if sprites.is_empty() {
            return Err(TilemapError::InvalidCatalog("no sprites supplied".to_string()));
        }
        if tile_size == 0 {
            return Err(TilemapError::InvalidCatalog("tile size must be positive".to_string()));
        }
        for (id, sprite) in sprites.iter().enumerate() {
            if sprite.dimensions() != (tile_size, tile_size) {
                let (w, h) = sprite.dimensions();
                return Err(TilemapError::InvalidCatalog(format!(
                    "sprite {} is {}x{}, expected {}x{}",
                    id, w, h, tile_size, tile_size
                )));
            }
        }

        Ok(Self {
            sprites,
            sources: Vec::new(),
            tile_size,
        })
    }

    /// Decode image files into a catalog, scaling off-size sprites to fit.
    pub fn load<P: AsRef<Path>>(paths: &[P], tile_size: u32) -> Result<Self> {
        let mut sprites = Vec::with_capacity(paths.len());
        let mut sources = Vec::with_capacity(paths.len());

        for path in paths {
            let path = path.as_ref();
            let mut sprite = image::open(path)?.to_rgba8();
            if sprite.dimensions() != (tile_size, tile_size) {
                let (w, h) = sprite.dimensions();
                log::warn!(
                    "Scaling {} from {}x{} to {}x{}",
                    path.display(),
                    w,
                    h,
                    tile_size,
                    tile_size
                );
                sprite =
                    image::imageops::resize(&sprite, tile_size, tile_size, FilterType::Nearest);
            }
            sprites.push(sprite);
            sources.push(path.to_path_buf());
        }

        let mut catalog = Self::new(sprites, tile_size)?;
        catalog.sources = sources;
        log::info!("Loaded {} tile assets", catalog.len());
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn get(&self, id: AssetId) -> Result<&RgbaImage> {
        self.sprites
            .get(id as usize)
            .ok_or(TilemapError::AssetIndexOutOfRange {
                id: id as usize,
                catalog_size: self.sprites.len(),
            })
    }

    /// Source file of each sprite; empty when built from in-memory images.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }
}
