use crate::config::CompatibilityRule;
use crate::error::{Result, TilemapError};
use crate::types::AssetId;

pub const DEFAULT_AFFINITY: f64 = 0.5;

/// Pairwise adjacency scores between tile types, stored row-major.
///
/// The default matrix is uniform. Authored rules are written through
/// [`CompatibilityMatrix::set`]; symmetry is a caller convention, so reads
/// always use the ordered pair.
#[derive(Debug, Clone, PartialEq)]
pub struct CompatibilityMatrix {
    size: usize,
    scores: Vec<f64>,
}

impl CompatibilityMatrix {
    pub fn build(catalog_size: usize) -> Self {
        Self {
            size: catalog_size,
            scores: vec![DEFAULT_AFFINITY; catalog_size * catalog_size],
        }
    }

    /// Default matrix with authored rules applied in order.
    pub fn with_rules(catalog_size: usize, rules: &[CompatibilityRule]) -> Result<Self> {
        let mut matrix = Self::build(catalog_size);
        for rule in rules {
            if rule.symmetric {
                matrix.set_symmetric(rule.a, rule.b, rule.score)?;
            } else {
                matrix.set(rule.a, rule.b, rule.score)?;
            }
        }
        Ok(matrix)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn score(&self, a: AssetId, b: AssetId) -> Result<f64> {
        let idx = self.index(a, b)?;
        Ok(self.scores[idx])
    }

    pub fn set(&mut self, a: AssetId, b: AssetId, score: f64) -> Result<()> {
        if !score.is_finite() || !(0.0..=1.0).contains(&score) {
            return Err(TilemapError::InvalidScore(score));
        }
        let idx = self.index(a, b)?;
        self.scores[idx] = score;
        Ok(())
    }

    pub fn set_symmetric(&mut self, a: AssetId, b: AssetId, score: f64) -> Result<()> {
        self.set(a, b, score)?;
        self.set(b, a, score)
    }

    fn index(&self, a: AssetId, b: AssetId) -> Result<usize> {
        for id in [a, b] {
            if id as usize >= self.size {
                return Err(TilemapError::OutOfRange {
                    id: id as usize,
                    size: self.size,
                });
            }
        }
        Ok(a as usize * self.size + b as usize)
    }
}
