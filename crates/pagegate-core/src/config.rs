//! Site configuration management.
//!
//! This module handles loading and saving the configuration that picks the
//! credential source, the login page and where session state is kept.
//!
//! Configuration is stored at `~/.config/pagegate/config.json`, or at the
//! path named by `PAGEGATE_CONFIG`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::auth::http::DEFAULT_REQUEST_TIMEOUT_SECS;
use crate::auth::remote_text::spreadsheet_csv_url;
use crate::auth::static_list::default_users;
use crate::auth::{
    CredentialRecord, EndpointMethod, RemoteEndpointVerifier, RemoteTextVerifier, StaticListVerifier, Verifier,
};
use crate::guard::DEFAULT_LOGIN_PAGE;
use crate::session::DEFAULT_STORAGE_KEY;

/// Application name used for config/data directory paths
const APP_NAME: &str = "pagegate";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "PAGEGATE_CONFIG";

/// Which credential source the login page checks against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerifierMode {
    #[default]
    Static,
    Csv,
    Endpoint,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mode: VerifierMode,
    pub users: Vec<CredentialRecord>,
    pub csv_url: Option<String>,
    pub spreadsheet_id: Option<String>,
    pub endpoint_url: Option<String>,
    pub endpoint_method: EndpointMethod,
    pub login_page: String,
    pub storage_key: String,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: VerifierMode::default(),
            users: default_users(),
            csv_url: None,
            spreadsheet_id: None,
            endpoint_url: None,
            endpoint_method: EndpointMethod::default(),
            login_page: DEFAULT_LOGIN_PAGE.to_string(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the file-backed session storage
    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The CSV source: an explicit URL wins over a spreadsheet id
    pub fn resolved_csv_url(&self) -> Option<String> {
        self.csv_url
            .clone()
            .or_else(|| self.spreadsheet_id.as_deref().map(spreadsheet_csv_url))
    }

    /// Build the verifier selected by `mode`
    pub fn verifier(&self) -> Result<Verifier> {
        let verifier: Verifier = match self.mode {
            VerifierMode::Static => StaticListVerifier::new(self.users.clone()).into(),
            VerifierMode::Csv => {
                let url = self
                    .resolved_csv_url()
                    .ok_or_else(|| anyhow!("Mode 'csv' needs csv_url or spreadsheet_id"))?;
                RemoteTextVerifier::with_timeout(&url, self.request_timeout())
                    .context("Failed to build CSV verifier")?
                    .into()
            }
            VerifierMode::Endpoint => {
                let url = self
                    .endpoint_url
                    .as_deref()
                    .ok_or_else(|| anyhow!("Mode 'endpoint' needs endpoint_url"))?;
                RemoteEndpointVerifier::with_options(url, self.endpoint_method, self.request_timeout())
                    .context("Failed to build endpoint verifier")?
                    .into()
            }
        };
        Ok(verifier)
    }
}
