// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::geocode::DEFAULT_GEOCODER_URL;
use crate::sort::SortSpec;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub backend_url: String,
    pub geocoder_url: String,
    /// Nominatim rejects requests without an identifying agent.
    pub user_agent: String,
    pub timeout_secs: u64,
    pub default_sort: SortSpec,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:3001/api".to_string(),
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
            user_agent: format!("storm-coord/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            default_sort: SortSpec::default(),
        }
    }
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new(crate::get_config_root().join("config.json"))
    }
}

impl ConfigManager {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Missing file means defaults.
    pub fn load(&self) -> Result<Config> {
        if !self.config_path.exists() {
            log::debug!(
                "No config file; using defaults — path={}",
                self.config_path.display()
            );
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&self.config_path).context("Failed to read config.json")?;

        serde_json::from_str(&content).context("Failed to parse config.json")
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).context("Failed to create config directory")?;
            }
        }

        let content = serde_json::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&self.config_path, content).context("Failed to write config.json")
    }
}
