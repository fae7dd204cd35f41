use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    collision::RayRange,
    octree::{DEFAULT_MAX_LEVELS, MAX_SUPPORTED_LEVELS},
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Build and query settings for an [`Octree`](crate::octree::Octree)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OctreeConfig {
    pub max_levels: u32,
    /// Fixed ray parameter window. If unset, the window is derived per ray from the tree bounds.
    pub ray_range: Option<RayRange>,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            max_levels: DEFAULT_MAX_LEVELS,
            ray_range: None,
        }
    }
}

impl OctreeConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<OctreeConfig, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<OctreeConfig, ConfigError> {
        let config: OctreeConfig = serde_json::from_str(json)?;
        config.validate()
    }

    fn validate(self) -> Result<OctreeConfig, ConfigError> {
        if self.max_levels > MAX_SUPPORTED_LEVELS {
            return Err(ConfigError::InvalidValue(format!(
                "max_levels {} exceeds {MAX_SUPPORTED_LEVELS}",
                self.max_levels
            )));
        }
        if let Some(range) = self.ray_range {
            if range.t_min.is_nan() || range.t_max.is_nan() || range.t_min > range.t_max {
                return Err(ConfigError::InvalidValue(format!(
                    "ray_range {}..{} is empty",
                    range.t_min, range.t_max
                )));
            }
        }
        Ok(self)
    }
}
