use super::traits::{ConfigSection, ConfigManifest, FieldManifest};
use crate::error::TilemapError;
use crate::types::GridSize;
use serde::{Deserialize, Serialize};

pub const MAX_MAP_SIDE: usize = 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub width: usize,
    pub height: usize,
    pub tile_size: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 32,
            height: 32,
            tile_size: 32,
        }
    }
}

impl MapConfig {
    pub fn grid(&self) -> GridSize {
        GridSize::new(self.width, self.height)
    }
}

impl ConfigSection for MapConfig {
    fn section_name() -> &'static str {
        "map"
    }

    fn validate(&self) -> Result<(), TilemapError> {
        if self.width == 0 || self.height == 0 {
            return Err(TilemapError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.width > MAX_MAP_SIDE || self.height > MAX_MAP_SIDE {
            return Err(TilemapError::Configuration(format!(
                "Map sides are limited to {} tiles",
                MAX_MAP_SIDE
            )));
        }
        if self.tile_size == 0 {
            return Err(TilemapError::Configuration(
                "Tile size must be at least 1 pixel".to_string()
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        let side = Some((1.0, MAX_MAP_SIDE as f64));
        ConfigManifest {
            section: "Map".to_string(),
            fields: vec![
                FieldManifest::new(
                    "width",
                    "integer",
                    serde_json::json!(self.width),
                    side,
                    "Map width in tiles",
                ),
                FieldManifest::new(
                    "height",
                    "integer",
                    serde_json::json!(self.height),
                    side,
                    "Map height in tiles",
                ),
                FieldManifest::new(
                    "tile_size",
                    "integer",
                    serde_json::json!(self.tile_size),
                    Some((1.0, 512.0)),
                    "Tile edge in pixels",
                ),
            ],
        }
    }
}
