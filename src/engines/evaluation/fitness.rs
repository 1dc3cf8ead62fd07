use crate::engines::generation::compatibility::CompatibilityMatrix;
use crate::error::{Result, TilemapError};
use crate::types::{AssetId, GridSize};

/// Per-term breakdown of one evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessBreakdown {
    pub local: f64,
    pub distribution: f64,
    pub combined: f64,
}

/// Scores a genome by neighbour compatibility and tile-usage balance.
///
/// `combined = local_weight * local + distribution_weight * distribution`
#[derive(Debug, Clone, Copy)]
pub struct FitnessEvaluator {
    local_weight: f64,
    distribution_weight: f64,
}

impl Default for FitnessEvaluator {
    fn default() -> Self {
        Self::new(0.7, 0.3)
    }
}

impl FitnessEvaluator {
    pub fn new(local_weight: f64, distribution_weight: f64) -> Self {
        Self {
            local_weight,
            distribution_weight,
        }
    }

    pub fn evaluate(
        &self,
        genome: &[AssetId],
        grid: GridSize,
        matrix: &CompatibilityMatrix,
        catalog_size: usize,
    ) -> Result<f64> {
        self.breakdown(genome, grid, matrix, catalog_size)
            .map(|b| b.combined)
    }

    pub fn breakdown(
        &self,
        genome: &[AssetId],
        grid: GridSize,
        matrix: &CompatibilityMatrix,
        catalog_size: usize,
    ) -> Result<FitnessBreakdown> {
        if catalog_size == 0 {
            return Err(TilemapError::EmptyCatalog);
        }
        if grid.cell_count() != genome.len() {
            return Err(TilemapError::DimensionMismatch {
                expected: grid.cell_count(),
                actual: genome.len(),
            });
        }
        grid.validate()?;

        let local = local_score(genome, grid, matrix)?;
        let distribution = distribution_score(genome, catalog_size)?;

        Ok(FitnessBreakdown {
            local,
            distribution,
            combined: self.local_weight * local + self.distribution_weight * distribution,
        })
    }
}

/// Sum of `matrix.score(cell, neighbour)` over the orthogonal neighbours of
/// every cell. No wraparound at the edges.
pub fn local_score(
    genome: &[AssetId],
    grid: GridSize,
    matrix: &CompatibilityMatrix,
) -> Result<f64> {
    if genome.len() != grid.cell_count() {
        return Err(TilemapError::DimensionMismatch {
            expected: grid.cell_count(),
            actual: genome.len(),
        });
    }
    let GridSize { width, height } = grid;
    let mut total = 0.0;

    for (i, &tile) in genome.iter().enumerate() {
        let (x, y) = grid.coords(i);
        if x > 0 {
            total += matrix.score(tile, genome[i - 1])?;
        }
        if x + 1 < width {
            total += matrix.score(tile, genome[i + 1])?;
        }
        if y > 0 {
            total += matrix.score(tile, genome[i - width])?;
        }
        if y + 1 < height {
            total += matrix.score(tile, genome[i + width])?;
        }
    }

    Ok(total)
}

/// `sum over ids of (1 - |count/len - 1/N|)`; equals N for a perfectly even mix.
///
/// A genome needs at least one cell; an empty one fails with
/// `DimensionMismatch { expected: 1, actual: 0 }`.
pub fn distribution_score(genome: &[AssetId], catalog_size: usize) -> Result<f64> {
    if catalog_size == 0 {
        return Err(TilemapError::EmptyCatalog);
    }
    if genome.is_empty() {
        return Err(TilemapError::DimensionMismatch {
            expected: 1,
            actual: 0,
        });
    }

    let mut counts = vec![0usize; catalog_size];
    for &id in genome {
        let slot = counts
            .get_mut(id as usize)
            .ok_or(TilemapError::AssetIndexOutOfRange {
                id: id as usize,
                catalog_size,
            })?;
        *slot += 1;
    }

    let len = genome.len() as f64;
    let target = 1.0 / catalog_size as f64;
    Ok(counts
        .iter()
        .map(|&count| 1.0 - (count as f64 / len - target).abs())
        .sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn uniform_mix_maximizes_distribution() {
        let genome = vec![0, 1, 2, 3, 3, 2, 1, 0];
        assert!(approx(distribution_score(&genome, 4).unwrap(), 4.0));

        let skewed = vec![0; 8];
        assert!(distribution_score(&skewed, 4).unwrap() < 4.0);
    }

    #[test]
    fn local_term_counts_neighbour_pairs() {
        // 3x2 grid has 7 adjacent pairs, each counted from both sides
        let grid = GridSize::new(3, 2);
        let matrix = CompatibilityMatrix::build(2);
        let genome = vec![0, 1, 0, 1, 0, 1];
        assert!(approx(local_score(&genome, grid, &matrix).unwrap(), 14.0 * 0.5));
    }

    #[test]
    fn non_square_grid_uses_explicit_width() {
        let grid = GridSize::new(3, 2);
        let mut matrix = CompatibilityMatrix::build(2);
        matrix.set(0, 1, 1.0).unwrap();
        matrix.set(1, 0, 0.0).unwrap();

        // 0 has two neighbours (right, below); the other 10 directed pairs are 1-1
        let genome = vec![0, 1, 1, 1, 1, 1];
        let expected = 2.0 + 10.0 * 0.5;
        assert!(approx(local_score(&genome, grid, &matrix).unwrap(), expected));
    }

    #[test]
    fn local_term_rejects_short_genome() {
        let matrix = CompatibilityMatrix::build(2);
        assert!(matches!(
            local_score(&[0, 0], GridSize::new(3, 2), &matrix),
            Err(TilemapError::DimensionMismatch { expected: 6, actual: 2 })
        ));
    }

    #[test]
    fn distribution_term_rejects_empty_genome() {
        assert!(matches!(
            distribution_score(&[], 3),
            Err(TilemapError::DimensionMismatch { expected: 1, actual: 0 })
        ));
    }

    #[test]
    fn combined_weights() {
        let evaluator = FitnessEvaluator::default();
        let grid = GridSize::new(2, 2);
        let matrix = CompatibilityMatrix::build(2);
        let b = evaluator.breakdown(&[0, 1, 1, 0], grid, &matrix, 2).unwrap();
        assert!(approx(b.local, 8.0 * 0.5));
        assert!(approx(b.distribution, 2.0));
        assert!(approx(b.combined, 0.7 * 4.0 + 0.3 * 2.0));
    }

    #[test]
    fn empty_catalog_and_mismatch() {
        let evaluator = FitnessEvaluator::default();
        let matrix = CompatibilityMatrix::build(0);
        assert!(matches!(
            evaluator.evaluate(&[], GridSize::new(1, 1), &matrix, 0),
            Err(TilemapError::EmptyCatalog)
        ));

        let matrix = CompatibilityMatrix::build(2);
        assert!(matches!(
            evaluator.evaluate(&[0, 1, 0], GridSize::new(2, 2), &matrix, 2),
            Err(TilemapError::DimensionMismatch { expected: 4, actual: 3 })
        ));
    }
}
