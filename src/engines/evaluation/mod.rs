pub mod fitness;

pub use fitness::{FitnessBreakdown, FitnessEvaluator};
