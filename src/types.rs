use crate::error::{Result, TilemapError};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

pub use crate::engines::generation::genome::{AssetId, Genome};

/// Grid dimensions in tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub width: usize,
    pub height: usize,
}

impl GridSize {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Number of cells, saturating at `usize::MAX`. Use `validate` or
    /// `checked_cell_count` before allocating per-cell storage.
    pub fn cell_count(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    pub fn checked_cell_count(&self) -> Option<usize> {
        self.width.checked_mul(self.height)
    }

    /// Fails with `InvalidDimensions` when either side is zero or the cell
    /// count overflows `usize`.
    pub fn validate(&self) -> Result<()> {
        match self.checked_cell_count() {
            Some(count) if count > 0 => Ok(()),
            _ => Err(TilemapError::InvalidDimensions {
                width: self.width,
                height: self.height,
            }),
        }
    }

    /// Cell coordinates for a row-major index.
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }
}

/// The winning genome of one layer run together with its raster.
#[derive(Debug, Clone)]
pub struct GeneratedLayer {
    pub name: String,
    pub genome: Genome,
    pub fitness: f64,
    pub raster: RgbaImage,
}

/// Result of a full pipeline invocation.
#[derive(Debug, Clone)]
pub struct GeneratedMap {
    pub grid: GridSize,
    pub tile_size: u32,
    pub layers: Vec<GeneratedLayer>,
    pub composite: RgbaImage,
}

impl GeneratedMap {
    pub fn best_fitness(&self) -> Option<f64> {
        self.layers
            .iter()
            .map(|l| l.fitness)
            .max_by(|a, b| a.total_cmp(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_empty_and_overflowing_grids() {
        assert!(GridSize::new(3, 2).validate().is_ok());
        assert!(matches!(
            GridSize::new(0, 5).validate(),
            Err(TilemapError::InvalidDimensions { width: 0, height: 5 })
        ));
        assert!(matches!(
            GridSize::new(usize::MAX, 2).validate(),
            Err(TilemapError::InvalidDimensions { height: 2, .. })
        ));
        assert_eq!(GridSize::new(usize::MAX, 2).cell_count(), usize::MAX);
        assert_eq!(GridSize::new(usize::MAX, 2).checked_cell_count(), None);
    }

    #[test]
    fn coords_are_row_major() {
        let grid = GridSize::new(3, 2);
        assert_eq!(grid.coords(0), (0, 0));
        assert_eq!(grid.coords(4), (1, 1));
    }
}
