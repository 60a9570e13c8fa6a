use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_SERVER: &str = "http://opendata.cern.ch";
pub const DEFAULT_XROOTD_SERVER: &str = "root://eospublic.cern.ch//";

/// HTTP transport selection: `auto` uses libcurl when compiled in, otherwise the
/// chunked streaming client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpBackend {
    #[default]
    Auto,
    Curl,
    Stream,
}

/// Global configuration loaded from `~/.config/odc/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OdcConfig {
    /// Base URL of the record API and of HTTP file locations.
    pub server: String,
    /// XRootD server root; stripped from locations to obtain remote paths.
    pub xrootd_server: String,
    /// HTTP transport override; if missing, `auto`.
    #[serde(default)]
    pub http_backend: Option<HttpBackend>,
    /// Explicit path of the `xrdcp` binary (None = search PATH).
    #[serde(default)]
    pub xrdcp_path: Option<PathBuf>,
}

impl Default for OdcConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            xrootd_server: DEFAULT_XROOTD_SERVER.to_string(),
            http_backend: None,
            xrdcp_path: None,
        }
    }
}

impl OdcConfig {
    pub fn http_backend(&self) -> HttpBackend {
        self.http_backend.unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("odc")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<OdcConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = OdcConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let cfg: OdcConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
