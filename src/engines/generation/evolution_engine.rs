use crate::config::EvolutionConfig as AppEvolutionConfig;
use crate::engines::evaluation::FitnessEvaluator;
use crate::engines::generation::{
    compatibility::CompatibilityMatrix,
    genome::Genome,
    operators::*,
};
use crate::error::{Result, TilemapError};
use crate::types::GridSize;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;

pub struct EvolutionConfig {
    pub population_size: usize,
    pub generations: usize,
    pub elite_count: usize,
    pub parent_pool_size: usize,
    pub mutation_rate: f64,
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations: 50,
            elite_count: 10,
            parent_pool_size: 50,
            mutation_rate: 0.01,
            seed: None,
        }
    }
}

impl From<&AppEvolutionConfig> for EvolutionConfig {
    fn from(config: &AppEvolutionConfig) -> Self {
        Self {
            population_size: config.population_size,
            generations: config.generations,
            elite_count: config.elite_count,
            parent_pool_size: config.parent_pool_size,
            mutation_rate: config.mutation_rate,
            seed: config.seed,
        }
    }
}

/// Best genome of one layer run
#[derive(Debug, Clone)]
pub struct LayerOutcome {
    pub genome: Genome,
    pub fitness: f64,
}

pub trait ProgressCallback: Send {
    /// Called after every completed generation with the best fitness seen in it.
    fn on_generation_complete(&mut self, generation: usize, best_fitness: f64);

    fn on_layer_complete(&mut self, _layer: usize, _best_fitness: f64) {}

    fn on_complete(&mut self) {}

    /// Polled once per generation boundary.
    fn is_cancelled(&self) -> bool {
        false
    }
}

pub struct EvolutionEngine<'m> {
    config: EvolutionConfig,
    grid: GridSize,
    matrix: &'m CompatibilityMatrix,
    evaluator: FitnessEvaluator,
    rng: StdRng,
}

impl<'m> EvolutionEngine<'m> {
    pub fn new(
        config: EvolutionConfig,
        grid: GridSize,
        matrix: &'m CompatibilityMatrix,
        evaluator: FitnessEvaluator,
    ) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            config,
            grid,
            matrix,
            evaluator,
            rng,
        }
    }

    fn catalog_size(&self) -> usize {
        self.matrix.size()
    }

    /// Run one layer: initialize, evolve for the configured number of
    /// generations, then return the best member of the final population.
    pub fn run<C>(&mut self, callback: &mut C) -> Result<LayerOutcome>
    where
        C: ProgressCallback + ?Sized,
    {
        let mut population = self.initial_population(self.config.population_size)?;

        for generation in 0..self.config.generations {
            if callback.is_cancelled() {
                return Err(TilemapError::Cancelled);
            }

            let scored = self.evaluate_population(population)?;
            let best_fitness = scored
                .iter()
                .map(|(_, f)| *f)
                .max_by(|a, b| a.total_cmp(b))
                .unwrap_or(0.0);

            population = self.next_generation(scored)?;

            log::debug!("Generation {} best fitness {:.4}", generation + 1, best_fitness);
            callback.on_generation_complete(generation, best_fitness);
        }

        let scored = self.evaluate_population(population)?;
        best_of(scored).ok_or_else(|| {
            TilemapError::Configuration("Population size must be at least 1".to_string())
        })
    }

    /// `size` genomes of `width * height` uniformly random asset ids.
    pub fn initial_population(&mut self, size: usize) -> Result<Vec<Genome>> {
        self.grid.validate()?;
        if self.catalog_size() == 0 {
            return Err(TilemapError::InvalidCatalog("catalog has no assets".to_string()));
        }

        let length = self.grid.cell_count();
        let catalog_size = self.catalog_size();
        Ok((0..size)
            .map(|_| random_genome(length, catalog_size, &mut self.rng))
            .collect())
    }

    /// Score every genome, keeping input order. Evaluation runs in parallel.
    pub fn evaluate_population(&self, population: Vec<Genome>) -> Result<Vec<(Genome, f64)>> {
        let (evaluator, grid, matrix) = (self.evaluator, self.grid, self.matrix);
        let catalog_size = self.catalog_size();

        let fitness: Vec<f64> = population
            .par_iter()
            .map(|genome| evaluator.evaluate(genome, grid, matrix, catalog_size))
            .collect::<Result<Vec<f64>>>()?;

        Ok(population.into_iter().zip(fitness).collect())
    }

    /// One generation step; the returned population has the input's size.
    pub fn evolve_once(&mut self, population: Vec<Genome>) -> Result<Vec<Genome>> {
        let scored = self.evaluate_population(population)?;
        self.next_generation(scored)
    }

    fn next_generation(&mut self, mut scored: Vec<(Genome, f64)>) -> Result<Vec<Genome>> {
        let size = scored.len();

        // Stable: equal fitness keeps original order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        let elite_count = self.config.elite_count.min(size);
        let mut next_generation: Vec<Genome> = scored
            .iter()
            .take(elite_count)
            .map(|(genome, _)| genome.clone())
            .collect();

        while next_generation.len() < size {
            let pool_size = self.config.parent_pool_size;
            let parent1 = truncation_selection(&scored, pool_size, &mut self.rng);
            let parent2 = truncation_selection(&scored, pool_size, &mut self.rng);

            let mut child = crossover(parent1, parent2, &mut self.rng)?;
            mutate(&mut child, self.config.mutation_rate, self.catalog_size(), &mut self.rng);

            next_generation.push(child);
        }

        Ok(next_generation)
    }
}

/// Highest-fitness member; the earliest wins a tie.
pub fn best_of(scored: Vec<(Genome, f64)>) -> Option<LayerOutcome> {
    scored
        .into_iter()
        .reduce(|best, candidate| if candidate.1 > best.1 { candidate } else { best })
        .map(|(genome, fitness)| LayerOutcome { genome, fitness })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counting {
        seen: Vec<usize>,
    }

    impl ProgressCallback for Counting {
        fn on_generation_complete(&mut self, generation: usize, _best_fitness: f64) {
            self.seen.push(generation);
        }
    }

    fn engine(matrix: &CompatibilityMatrix, grid: GridSize, seed: u64) -> EvolutionEngine<'_> {
        let config = EvolutionConfig {
            population_size: 12,
            generations: 4,
            seed: Some(seed),
            ..Default::default()
        };
        EvolutionEngine::new(config, grid, matrix, FitnessEvaluator::default())
    }

    #[test]
    fn initial_population_shape() {
        let matrix = CompatibilityMatrix::build(3);
        let mut engine = engine(&matrix, GridSize::new(4, 3), 1);
        let population = engine.initial_population(7).unwrap();
        assert_eq!(population.len(), 7);
        assert!(population.iter().all(|g| g.len() == 12 && g.iter().all(|&id| id < 3)));
    }

    #[test]
    fn initial_population_rejects_bad_input() {
        let matrix = CompatibilityMatrix::build(3);
        let mut flat = engine(&matrix, GridSize::new(0, 3), 1);
        assert!(matches!(
            flat.initial_population(5),
            Err(TilemapError::InvalidDimensions { .. })
        ));

        let mut huge = engine(&matrix, GridSize::new(usize::MAX, 2), 1);
        assert!(matches!(
            huge.initial_population(5),
            Err(TilemapError::InvalidDimensions { .. })
        ));

        let empty = CompatibilityMatrix::build(0);
        let mut no_assets = engine(&empty, GridSize::new(2, 2), 1);
        assert!(matches!(
            no_assets.initial_population(5),
            Err(TilemapError::InvalidCatalog(_))
        ));
    }

    #[test]
    fn same_seed_same_result() {
        let mut matrix = CompatibilityMatrix::build(3);
        matrix.set_symmetric(0, 1, 0.9).unwrap();
        let grid = GridSize::new(5, 4);

        let a = engine(&matrix, grid, 42).run(&mut Counting { seen: Vec::new() }).unwrap();
        let b = engine(&matrix, grid, 42).run(&mut Counting { seen: Vec::new() }).unwrap();
        assert_eq!(a.genome, b.genome);
        assert_eq!(a.fitness, b.fitness);
    }

    #[test]
    fn run_reports_every_generation() {
        let matrix = CompatibilityMatrix::build(2);
        let mut callback = Counting { seen: Vec::new() };
        let outcome = engine(&matrix, GridSize::new(3, 3), 9).run(&mut callback).unwrap();
        assert_eq!(callback.seen, vec![0, 1, 2, 3]);
        assert_eq!(outcome.genome.len(), 9);
    }

    #[test]
    fn best_of_prefers_first_on_tie() {
        let scored = vec![(vec![0], 1.0), (vec![1], 2.0), (vec![2], 2.0)];
        let best = best_of(scored).unwrap();
        assert_eq!(best.genome, vec![1]);
        assert!(best_of(Vec::new()).is_none());
    }
}
