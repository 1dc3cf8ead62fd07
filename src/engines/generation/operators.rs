use crate::error::{Result, TilemapError};
use crate::types::{AssetId, Genome};
use rand::Rng;

/// Uniform parent pick from the top of a fitness-sorted population
pub fn truncation_selection<'a, R: Rng>(
    sorted: &'a [(Genome, f64)],
    pool_size: usize,
    rng: &mut R,
) -> &'a Genome {
    let pool = pool_size.min(sorted.len()).max(1);
    &sorted[rng.gen_range(0..pool)].0
}

/// Single-point crossover: parent1 prefix + parent2 suffix
pub fn crossover<R: Rng>(
    parent1: &[AssetId],
    parent2: &[AssetId],
    rng: &mut R,
) -> Result<Genome> {
    if parent1.len() != parent2.len() {
        return Err(TilemapError::LengthMismatch {
            left: parent1.len(),
            right: parent2.len(),
        });
    }
    if parent1.is_empty() {
        return Ok(Genome::new());
    }

    let point = rng.gen_range(0..parent1.len());

    let mut child = Vec::with_capacity(parent1.len());
    child.extend_from_slice(&parent1[..point]);
    child.extend_from_slice(&parent2[point..]);
    Ok(child)
}

/// Mutation: per cell, replace with a random asset id
pub fn mutate<R: Rng>(
    genome: &mut [AssetId],
    mutation_rate: f64,
    catalog_size: usize,
    rng: &mut R,
) {
    if catalog_size == 0 {
        return;
    }
    for gene in genome.iter_mut() {
        if rng.gen::<f64>() < mutation_rate {
            *gene = rng.gen_range(0..catalog_size as AssetId);
        }
    }
}

/// Generate random genome
pub fn random_genome<R: Rng>(
    length: usize,
    catalog_size: usize,
    rng: &mut R,
) -> Genome {
    (0..length)
        .map(|_| rng.gen_range(0..catalog_size as AssetId))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn crossover_splices_at_one_point() {
        let mut rng = StdRng::seed_from_u64(3);
        let a = vec![0; 16];
        let b = vec![1; 16];
        for _ in 0..50 {
            let child = crossover(&a, &b, &mut rng).unwrap();
            assert_eq!(child.len(), 16);
            let split = child.iter().position(|&g| g == 1).unwrap_or(16);
            assert!(child[..split].iter().all(|&g| g == 0));
            assert!(child[split..].iter().all(|&g| g == 1));
        }
    }

    #[test]
    fn crossover_length_mismatch() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(matches!(
            crossover(&[0, 1], &[0], &mut rng),
            Err(TilemapError::LengthMismatch { left: 2, right: 1 })
        ));
    }

    #[test]
    fn mutate_rate_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut genome = vec![0; 64];
        mutate(&mut genome, 0.0, 4, &mut rng);
        assert!(genome.iter().all(|&g| g == 0));

        mutate(&mut genome, 1.0, 4, &mut rng);
        assert!(genome.iter().all(|&g| g < 4));
        assert!(genome.iter().any(|&g| g != 0));
    }

    #[test]
    fn selection_stays_within_pool() {
        let mut rng = StdRng::seed_from_u64(5);
        let sorted: Vec<(Genome, f64)> = (0..10).map(|i| (vec![i], 10.0 - i as f64)).collect();
        for _ in 0..100 {
            let parent = truncation_selection(&sorted, 3, &mut rng);
            assert!(parent[0] < 3);
        }
    }
}
