use crate::error::{Result, TilemapError};
use crate::types::GridSize;

/// Index into the asset catalog.
pub type AssetId = u32;

/// Genome representation for one map layer
///
/// A genome is the flattened, row-major tile grid of a layer
/// (`index = y * width + x`). Each gene is the `AssetId` of the sprite
/// placed in that cell.
///
/// Fitness is a property of the whole genome and is never stored in a
/// cell. Scored populations carry it alongside as `(Genome, f64)` pairs.
///
/// # Example
///
/// ```
/// // A 3x2 grid: top row grass (0), bottom row water (1)
/// let genome: tilemapgen::types::Genome = vec![0, 0, 0, 1, 1, 1];
/// assert_eq!(genome[1 * 3 + 2], 1);
/// ```
pub type Genome = Vec<AssetId>;

/// Check the genome shape invariants: length equals the cell count and
/// every id lies in `[0, catalog_size)`.
pub fn validate_genome(genome: &[AssetId], grid: GridSize, catalog_size: usize) -> Result<()> {
    if genome.len() != grid.cell_count() {
        return Err(TilemapError::DimensionMismatch {
            expected: grid.cell_count(),
            actual: genome.len(),
        });
    }
    if let Some(&id) = genome.iter().find(|&&id| id as usize >= catalog_size) {
        return Err(TilemapError::AssetIndexOutOfRange {
            id: id as usize,
            catalog_size,
        });
    }
    Ok(())
}
