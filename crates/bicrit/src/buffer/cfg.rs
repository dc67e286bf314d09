//! Buffer configuration.

use serde::{Deserialize, Serialize};

use crate::error::CfgError;

/// Key that orders cells inside the staging window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Cached distance-to-front bound of the cell.
    #[default]
    DistanceToFront,
    /// Spacing of the front points around the cell's lower corner.
    CrowdingDistance,
}

/// Staged buffer settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferCfg {
    /// Staging window size before overflow spills to the global tier.
    pub capacity: usize,
    pub policy: SelectionPolicy,
    /// Skip lazy re-prioritization in `top`; used when another front-quality
    /// metric replaces per-cell distance tightening.
    pub hypervolume_only: bool,
}

impl Default for BufferCfg {
    fn default() -> Self {
        Self {
            capacity: 4,
            policy: SelectionPolicy::DistanceToFront,
            hypervolume_only: false,
        }
    }
}

impl BufferCfg {
    pub fn validate(&self) -> Result<(), CfgError> {
        if self.capacity == 0 {
            return Err(CfgError::Invalid(
                "buffer capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
