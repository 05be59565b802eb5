// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::Error;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Finboard", "finboard"));

const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub currency_symbol: String,
    pub load_latency_ms: u64,
    pub add_latency_ms: u64,
    pub request_timeout_ms: u64,
    /// When set, panels load from this HTTP API instead of the built-in fixtures.
    pub api_base_url: Option<String>,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            currency_symbol: "₦".to_string(),
            load_latency_ms: 1000,
            add_latency_ms: 500,
            request_timeout_ms: 10_000,
            api_base_url: None,
            log_filter: "warn".to_string(),
        }
    }
}

impl Settings {
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from(APP.0, APP.1, APP.2).map(|p| p.config_dir().join(SETTINGS_FILE))
    }

    /// Read settings from `path`, falling back to defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, Error> {
        match fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|e| Error::Config(format!("{}: {}", path.display(), e))),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("no settings at {}, using defaults", path.display());
                Ok(Settings::default())
            }
            Err(e) => Err(Error::Config(format!("{}: {}", path.display(), e))),
        }
    }

    /// An explicit path must exist; otherwise the platform config dir is tried.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, Error> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::Config(format!("{} does not exist", path.display())));
            }
            return Settings::load_from(path);
        }
        match Settings::default_path() {
            Some(path) => Settings::load_from(&path),
            None => Ok(Settings::default()),
        }
    }

    pub fn load_latency(&self) -> Duration {
        Duration::from_millis(self.load_latency_ms)
    }

    pub fn add_latency(&self) -> Duration {
        Duration::from_millis(self.add_latency_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
