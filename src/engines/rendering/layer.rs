use crate::data::AssetCatalog;
use crate::engines::generation::genome::{validate_genome, AssetId};
use crate::error::{Result, TilemapError};
use crate::types::GridSize;
use image::{imageops, RgbaImage};

/// Rasterizes a genome by copying one catalog sprite into each grid cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayerRenderer;

impl LayerRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Output is `width * tile_size` by `height * tile_size`, transparent
    /// wherever a sprite has transparent pixels.
    pub fn render(
        &self,
        genome: &[AssetId],
        grid: GridSize,
        catalog: &AssetCatalog,
    ) -> Result<RgbaImage> {
        validate_genome(genome, grid, catalog.len())?;

        let tile_size = catalog.tile_size();
        let (width, height) = pixel_size(grid, tile_size)?;
        let mut layer = RgbaImage::new(width, height);

        for (i, &id) in genome.iter().enumerate() {
            let (x, y) = grid.coords(i);
            let sprite = catalog.get(id)?;
            imageops::replace(
                &mut layer,
                sprite,
                (x as u32 * tile_size) as i64,
                (y as u32 * tile_size) as i64,
            );
        }

        Ok(layer)
    }
}

/// Raster size in pixels; fails with `InvalidDimensions` when either side
/// does not fit in `u32`.
fn pixel_size(grid: GridSize, tile_size: u32) -> Result<(u32, u32)> {
    let side = |cells: usize| {
        u32::try_from(cells)
            .ok()
            .and_then(|cells| cells.checked_mul(tile_size))
    };
    match (side(grid.width), side(grid.height)) {
        (Some(width), Some(height)) => Ok((width, height)),
        _ => Err(TilemapError::InvalidDimensions {
            width: grid.width,
            height: grid.height,
        }),
    }
}

/// Alpha-blend layers bottom to top into one image.
pub fn composite(layers: &[RgbaImage]) -> Option<RgbaImage> {
    let (first, rest) = layers.split_first()?;
    let mut out = first.clone();
    for layer in rest {
        imageops::overlay(&mut out, layer, 0, 0);
    }
    Some(out)
}
