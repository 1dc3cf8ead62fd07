use thiserror::Error;

#[derive(Error, Debug)]
pub enum TilemapError {
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Catalog is empty")]
    EmptyCatalog,

    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Dimension mismatch: expected {expected} cells, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Asset id {id} out of range for matrix of size {size}")]
    OutOfRange { id: usize, size: usize },

    #[error("Asset index {id} out of range for catalog of {catalog_size} sprites")]
    AssetIndexOutOfRange { id: usize, catalog_size: usize },

    #[error("Parent length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("Compatibility score must be within [0, 1], got {0}")]
    InvalidScore(f64),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Map format error: {0}")]
    MapFormat(String),

    #[error("Generation cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TilemapError>;
