use super::traits::{ConfigSection, ConfigManifest, FieldManifest};
use crate::error::TilemapError;
use crate::types::AssetId;
use serde::{Deserialize, Serialize};

/// An authored adjacency score applied over the default matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityRule {
    pub a: AssetId,
    pub b: AssetId,
    pub score: f64,
    #[serde(default = "default_symmetric")]
    pub symmetric: bool,
}

fn default_symmetric() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompatibilityConfig {
    pub rules: Vec<CompatibilityRule>,
}

impl ConfigSection for CompatibilityConfig {
    fn section_name() -> &'static str {
        "compatibility"
    }

    // Id bounds depend on the catalog and are checked when the matrix is built.
    fn validate(&self) -> Result<(), TilemapError> {
        for rule in &self.rules {
            if !rule.score.is_finite() || !(0.0..=1.0).contains(&rule.score) {
                return Err(TilemapError::InvalidScore(rule.score));
            }
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Compatibility".to_string(),
            fields: vec![FieldManifest::new(
                "rules",
                "list",
                serde_json::json!([]),
                None,
                "Adjacency scores between tile pairs (a, b, score in [0, 1])",
            )],
        }
    }
}
