pub mod layer;

pub use layer::{composite, LayerRenderer};
