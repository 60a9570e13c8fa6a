//! XRootD remote filesystem access through the `xrdcp` command-line client.

use super::TransferError;
use crate::config::OdcConfig;
use std::path::PathBuf;
use std::process::Command;

/// Read access to files on a remote filesystem rooted at one server.
pub trait RemoteFs {
    /// Short client name for logs.
    fn name(&self) -> &str;

    /// Reads the whole remote file at `remote_path` into memory.
    fn read_all(&self, remote_path: &str) -> Result<Vec<u8>, TransferError>;
}

/// Full XRootD URL for `remote_path` on `server_root`: `root://host//abs/path`.
pub fn xrootd_url(server_root: &str, remote_path: &str) -> String {
    format!(
        "{}//{}",
        server_root.trim_end_matches('/'),
        remote_path.trim_start_matches('/')
    )
}

/// Runs `xrdcp <url> -` and takes the payload from its stdout.
#[derive(Debug, Clone)]
pub struct XrdcpClient {
    binary: PathBuf,
    server_root: String,
}

impl XrdcpClient {
    pub fn new(binary: PathBuf, server_root: impl Into<String>) -> Self {
        Self {
            binary,
            server_root: server_root.into(),
        }
    }

    /// Looks for `xrdcp` in PATH.
    pub fn from_path(server_root: impl Into<String>) -> Option<Self> {
        which::which("xrdcp")
            .ok()
            .map(|binary| Self::new(binary, server_root))
    }
}

impl RemoteFs for XrdcpClient {
    fn name(&self) -> &str {
        "xrdcp"
    }

    fn read_all(&self, remote_path: &str) -> Result<Vec<u8>, TransferError> {
        let url = xrootd_url(&self.server_root, remote_path);
        tracing::debug!(binary = %self.binary.display(), url = %url, "xrdcp read");
        let output = Command::new(&self.binary)
            .arg("--silent")
            .arg(&url)
            .arg("-")
            .output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let msg = match stderr.trim() {
                "" => format!("xrdcp {} exited with {}", url, output.status),
                s => s.to_string(),
            };
            return Err(TransferError::Remote(msg));
        }
        Ok(output.stdout)
    }
}

/// XRootD client for this host, if any: the configured `xrdcp_path` when it
/// exists, otherwise `xrdcp` from PATH.
pub fn detect_xrootd(cfg: &OdcConfig) -> Option<XrdcpClient> {
    let client = match &cfg.xrdcp_path {
        Some(path) if path.is_file() => Some(XrdcpClient::new(path.clone(), cfg.xrootd_server.as_str())),
        Some(path) => {
            tracing::warn!(path = %path.display(), "configured xrdcp_path not found");
            None
        }
        None => XrdcpClient::from_path(cfg.xrootd_server.as_str()),
    };
    tracing::debug!(available = client.is_some(), "xrootd capability");
    client
}
