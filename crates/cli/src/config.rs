use anyhow::{Context, Result};
use bicrit::buffer::BufferCfg;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Driver settings for the demo problem.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunCfg {
    /// Cells whose distance bound is at most `eps` are closed without bisection.
    pub eps: f64,
    pub max_iters: usize,
    /// Seeds the target point of the second objective.
    pub seed: u64,
    pub dim: usize,
}

impl Default for RunCfg {
    fn default() -> Self {
        Self {
            eps: 1e-3,
            max_iters: 2_000,
            seed: 0,
            dim: 2,
        }
    }
}

/// Contents of a `--config` TOML file; missing sections take defaults.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCfg {
    pub buffer: BufferCfg,
    pub run: RunCfg,
}

impl FileCfg {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        self.buffer.validate()?;
        anyhow::ensure!(self.run.dim >= 1, "run.dim must be at least 1");
        anyhow::ensure!(
            self.run.eps.is_finite() && self.run.eps >= 0.0,
            "run.eps must be finite and non-negative"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bicrit::buffer::SelectionPolicy;
    use tempfile::tempdir;

    #[test]
    fn missing_file_means_defaults() {
        let cfg = FileCfg::load(None).unwrap();
        assert_eq!(cfg, FileCfg::default());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.toml");
        fs::write(
            &path,
            "[buffer]\ncapacity = 8\npolicy = \"crowding_distance\"\n\n[run]\ndim = 3\n",
        )
        .unwrap();
        let cfg = FileCfg::load(Some(&path)).unwrap();
        assert_eq!(cfg.buffer.capacity, 8);
        assert_eq!(cfg.buffer.policy, SelectionPolicy::CrowdingDistance);
        assert!(!cfg.buffer.hypervolume_only);
        assert_eq!(cfg.run.dim, 3);
        assert_eq!(cfg.run.max_iters, RunCfg::default().max_iters);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[buffer]\ncapacity = 0\n").unwrap();
        let cfg = FileCfg::load(Some(&path)).unwrap();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn unreadable_file_reports_path() {
        let err = FileCfg::load(Some(Path::new("/nonexistent/run.toml"))).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/run.toml"));
    }
}
