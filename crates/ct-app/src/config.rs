//! Engine configuration file.

use std::path::Path;

use ct_curves::SynthConfig;
use ct_edit::EditConfig;
use ct_lod::LodConfig;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Every engine tunable in one YAML document. Missing sections and fields
/// keep their defaults.
///
/// ```yaml
/// synth:
///   cadenceMinutes: 5
/// lod:
///   detailThresholdMs: 1800000
/// edit:
///   historyCap: 20
/// maxPoints: 1500
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub synth: SynthConfig,
    pub lod: LodConfig,
    pub edit: EditConfig,
    /// Point budget for rendered windows.
    pub max_points: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            synth: SynthConfig::default(),
            lod: LodConfig::default(),
            edit: EditConfig::default(),
            max_points: 1_500,
        }
    }
}

pub fn load_config(path: &Path) -> AppResult<EngineConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_yaml::from_str(&content)
        .map_err(|e| AppError::Config(format!("Failed to parse config YAML: {}", e)))
}

pub fn load_config_or_default(path: Option<&Path>) -> AppResult<EngineConfig> {
    match path {
        Some(path) => load_config(path),
        None => Ok(EngineConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let cfg: EngineConfig =
            serde_yaml::from_str("edit:\n  historyCap: 20\nmaxPoints: 800\n").unwrap();
        assert_eq!(cfg.edit.history_cap, 20);
        assert_eq!(cfg.edit.hit_radius_px, 60.0);
        assert_eq!(cfg.max_points, 800);
        assert_eq!(cfg.synth, SynthConfig::default());
        assert_eq!(cfg.lod.detail_threshold_ms, 30 * 60_000);
    }

    #[test]
    fn empty_document_is_default() {
        let cfg: EngineConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(cfg, EngineConfig::default());
    }
}
