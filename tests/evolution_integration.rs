use proptest::prelude::*;
use tilemapgen::engines::evaluation::FitnessEvaluator;
use tilemapgen::engines::generation::evolution_engine::{
    EvolutionConfig, EvolutionEngine, ProgressCallback,
};
use tilemapgen::engines::generation::{operators, CompatibilityMatrix};
use tilemapgen::{GridSize, TilemapError};

/// Simple progress callback for testing
struct TestProgressCallback {
    generations: Vec<usize>,
}

impl ProgressCallback for TestProgressCallback {
    fn on_generation_complete(&mut self, generation: usize, best_fitness: f64) {
        assert!(best_fitness.is_finite());
        self.generations.push(generation);
    }
}

fn create_test_engine(
    population_size: usize,
    seed: u64,
    grid: GridSize,
    matrix: &CompatibilityMatrix,
) -> EvolutionEngine<'_> {
    let config = create_test_config(population_size, seed);
    EvolutionEngine::new(config, grid, matrix, FitnessEvaluator::default())
}

fn create_test_config(population_size: usize, seed: u64) -> EvolutionConfig {
    EvolutionConfig {
        population_size,
        generations: 1,
        seed: Some(seed),
        ..Default::default()
    }
}

#[test]
fn test_two_assets_two_by_two_single_generation() {
    let matrix = CompatibilityMatrix::build(2);
    let grid = GridSize::new(2, 2);
    let mut engine = create_test_engine(4, 7, grid, &matrix);

    let population = engine.initial_population(4).unwrap();
    let next = engine.evolve_once(population).unwrap();
    assert_eq!(next.len(), 4);

    for (genome, fitness) in engine.evaluate_population(next).unwrap() {
        assert_eq!(genome.len(), 4);
        assert!(genome.iter().all(|&id| id < 2));
        assert!(fitness.is_finite());
        assert!(fitness >= 0.0);
    }
}

#[test]
fn test_elites_survive_unchanged() {
    let mut matrix = CompatibilityMatrix::build(4);
    matrix.set_symmetric(0, 0, 1.0).unwrap();
    matrix.set_symmetric(1, 2, 0.0).unwrap();
    let grid = GridSize::new(4, 4);
    let mut engine = create_test_engine(30, 21, grid, &matrix);

    let population = engine.initial_population(30).unwrap();
    let mut ranked = engine.evaluate_population(population.clone()).unwrap();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let next = engine.evolve_once(population).unwrap();
    assert_eq!(next.len(), 30);
    for (elite, _) in ranked.iter().take(10) {
        assert!(next.contains(elite), "elite genome missing from next generation");
    }
    let top: Vec<_> = ranked[..10].iter().map(|(genome, _)| genome.clone()).collect();
    assert_eq!(&next[..10], top.as_slice());
}

#[test]
fn test_small_population_keeps_size() {
    let matrix = CompatibilityMatrix::build(3);
    let grid = GridSize::new(3, 2);
    let mut engine = create_test_engine(3, 5, grid, &matrix);

    let mut population = engine.initial_population(3).unwrap();
    for _ in 0..5 {
        population = engine.evolve_once(population).unwrap();
        assert_eq!(population.len(), 3);
    }
}

#[test]
fn test_run_evolution_basic() {
    let matrix = CompatibilityMatrix::build(3);
    let config = EvolutionConfig {
        population_size: 20,
        generations: 5,
        seed: Some(42),
        ..Default::default()
    };
    let grid = GridSize::new(6, 4);
    let mut engine = EvolutionEngine::new(config, grid, &matrix, FitnessEvaluator::default());

    let mut callback = TestProgressCallback { generations: Vec::new() };
    let outcome = engine.run(&mut callback).unwrap();

    assert_eq!(callback.generations, vec![0, 1, 2, 3, 4]);
    assert_eq!(outcome.genome.len(), 24);
    assert!(outcome.fitness > 0.0);
}

#[test]
fn test_empty_catalog_fails_cleanly() {
    let matrix = CompatibilityMatrix::build(0);
    let mut engine = create_test_engine(4, 1, GridSize::new(2, 2), &matrix);

    assert!(matches!(engine.initial_population(4), Err(TilemapError::InvalidCatalog(_))));
    assert!(matches!(
        FitnessEvaluator::default().evaluate(&[0, 0, 0, 0], GridSize::new(2, 2), &matrix, 0),
        Err(TilemapError::EmptyCatalog)
    ));
}

#[test]
fn test_mismatched_population_aborts_generation() {
    let matrix = CompatibilityMatrix::build(2);
    let mut engine = create_test_engine(2, 1, GridSize::new(2, 2), &matrix);

    let result = engine.evolve_once(vec![vec![0, 1, 0, 1], vec![0, 1]]);
    assert!(matches!(
        result,
        Err(TilemapError::DimensionMismatch { expected: 4, actual: 2 })
    ));
}

proptest! {
    #[test]
    fn generated_genomes_respect_shape(
        width in 1usize..8,
        height in 1usize..8,
        assets in 1usize..6,
        seed in any::<u64>(),
    ) {
        let matrix = CompatibilityMatrix::build(assets);
        let grid = GridSize::new(width, height);
        let mut engine = create_test_engine(6, seed, grid, &matrix);

        let population = engine.initial_population(6).unwrap();
        let next = engine.evolve_once(population).unwrap();
        prop_assert_eq!(next.len(), 6);
        for genome in &next {
            prop_assert_eq!(genome.len(), width * height);
            prop_assert!(genome.iter().all(|&id| (id as usize) < assets));
        }
    }

    #[test]
    fn crossover_child_comes_from_parents(
        len in 1usize..40,
        seed in any::<u64>(),
    ) {
        use rand::SeedableRng;
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let a: Vec<u32> = (0..len as u32).collect();
        let b: Vec<u32> = (100..100 + len as u32).collect();

        let child = operators::crossover(&a, &b, &mut rng).unwrap();
        prop_assert_eq!(child.len(), len);

        // Single split point: a prefix of `a` followed by the matching suffix of `b`
        let split = child.iter().zip(&a).take_while(|(c, p)| c == p).count();
        prop_assert!(split < len);
        prop_assert_eq!(&child[split..], &b[split..]);
    }
}
