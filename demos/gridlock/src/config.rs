//! `gridlock.toml` / `gridlock.json` run configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use gl_core::{RoadId, SimConfig};
use gl_mobility::DEFAULT_MOVE_RATE;
use gl_population::{PopulationColumns, Replication};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failure reading {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("failure decoding {0}: {1}")]
    Decode(PathBuf, String),

    #[error("unsupported file type: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

// ── Sections ──────────────────────────────────────────────────────────────────

/// Input files.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DataConfig {
    /// Road line shapefile.
    pub roads: PathBuf,
    /// Census tract polygon shapefile; only widens the model extent.
    #[serde(default)]
    pub areas: Option<PathBuf>,
    /// Commuter table.
    pub population: PathBuf,
    /// Road attribute holding the stable identifier.
    #[serde(default = "default_road_id_field")]
    pub road_id_field: String,
}

fn default_road_id_field() -> String {
    "ID_ID".to_string()
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PopulationConfig {
    pub columns:     PopulationColumns,
    pub replication: Replication,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AgentConfig {
    /// Map units per tick on a free edge.
    pub move_rate: f64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self { move_rate: DEFAULT_MOVE_RATE }
    }
}

// ── GridlockConfig ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GridlockConfig {
    /// Destination roads; each agent's goal is drawn from these.
    pub goals: Vec<RoadId>,
    pub data:  DataConfig,
    #[serde(default)]
    pub population: PopulationConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub sim: SimConfig,
}

impl GridlockConfig {
    /// Read a `.toml` or `.json` file.  Relative data paths are resolved
    /// against the file's directory.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let s = std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        let mut config: GridlockConfig = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(&s)
                .map_err(|e| ConfigError::Decode(path.to_path_buf(), e.to_string()))?,
            Some("json") => serde_json::from_str(&s)
                .map_err(|e| ConfigError::Decode(path.to_path_buf(), e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// Prefix every relative data path with `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.data.roads);
        resolve(&mut self.data.population);
        if let Some(areas) = self.data.areas.as_mut() {
            resolve(areas);
        }
    }

    /// Command-line values take precedence over the file.
    pub fn apply_overrides(&mut self, ticks: Option<u64>, seed: Option<u64>) {
        if ticks.is_some() {
            self.sim.total_ticks = ticks;
        }
        if let Some(seed) = seed {
            self.sim.seed = seed;
        }
    }

    /// Checks that need no network.  Goal ids are checked against the
    /// network once it is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.goals.is_empty() {
            return Err(ConfigError::Invalid("goals must not be empty".to_string()));
        }
        if !(self.agent.move_rate.is_finite() && self.agent.move_rate > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "agent.move_rate must be positive, got {}",
                self.agent.move_rate
            )));
        }
        self.sim.validate().map_err(|e| ConfigError::Invalid(format!("[sim] {e}")))?;
        let files = [Some(&self.data.roads), Some(&self.data.population), self.data.areas.as_ref()];
        for path in files.into_iter().flatten() {
            if !path.is_file() {
                return Err(ConfigError::Invalid(format!("missing required data file {}", path.display())));
            }
        }
        Ok(())
    }
}
