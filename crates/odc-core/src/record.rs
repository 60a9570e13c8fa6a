//! Record providers: where the ordered list of file locations comes from.

use crate::downloader::Protocol;
use serde::Deserialize;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("record API request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("record {recid} returned HTTP {status}")]
    Status { recid: u64, status: u16 },
    #[error("invalid record JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid server URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("read {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
}

/// Yields the ordered file locations of one record.
pub trait RecordProvider {
    fn file_locations(&self) -> Result<Vec<String>, RecordError>;
}

/// Locations listed one per line; blank lines and `#` comments are skipped.
#[derive(Debug, Clone, Default)]
pub struct LocationList {
    locations: Vec<String>,
}

impl LocationList {
    pub fn from_reader(reader: impl BufRead) -> io::Result<Self> {
        let mut locations = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            locations.push(line.to_string());
        }
        Ok(Self { locations })
    }

    pub fn from_path(path: &Path) -> Result<Self, RecordError> {
        let io_err = |source| RecordError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(io_err)?;
        Self::from_reader(BufReader::new(file)).map_err(io_err)
    }
}

impl RecordProvider for LocationList {
    fn file_locations(&self) -> Result<Vec<String>, RecordError> {
        Ok(self.locations.clone())
    }
}

#[derive(Debug, Deserialize)]
struct RecordResponse {
    metadata: RecordMetadata,
}

#[derive(Debug, Deserialize)]
struct RecordMetadata {
    #[serde(default)]
    files: Vec<RecordFile>,
}

#[derive(Debug, Deserialize)]
struct RecordFile {
    uri: String,
}

/// Extracts `metadata.files[].uri` from a record document. For `http`, XRootD
/// URIs under `xrootd_server` are rewritten onto `server`.
pub fn parse_record_files(
    json: &str,
    protocol: Protocol,
    server: &str,
    xrootd_server: &str,
) -> Result<Vec<String>, RecordError> {
    let record: RecordResponse = serde_json::from_str(json)?;
    let prefix = format!("{}/", xrootd_server.trim_end_matches('/'));
    let server = server.trim_end_matches('/');
    Ok(record
        .metadata
        .files
        .into_iter()
        .map(|f| match protocol {
            Protocol::Http => match f.uri.strip_prefix(&prefix) {
                Some(rest) => format!("{}{}", server, rest),
                None => f.uri,
            },
            Protocol::Xrootd => f.uri,
        })
        .collect())
}

/// A record fetched from the open data API: `GET {server}/api/records/{recid}`.
#[derive(Debug, Clone)]
pub struct ApiRecord {
    pub server: String,
    pub xrootd_server: String,
    pub recid: u64,
    pub protocol: Protocol,
}

impl ApiRecord {
    pub fn record_url(&self) -> Result<url::Url, RecordError> {
        let base = url::Url::parse(&format!("{}/", self.server.trim_end_matches('/')))?;
        Ok(base.join(&format!("api/records/{}", self.recid))?)
    }
}

impl RecordProvider for ApiRecord {
    fn file_locations(&self) -> Result<Vec<String>, RecordError> {
        let url = self.record_url()?;
        tracing::debug!(url = %url, "fetching record");
        let response = reqwest::blocking::get(url)?;
        let status = response.status();
        if !status.is_success() {
            return Err(RecordError::Status {
                recid: self.recid,
                status: status.as_u16(),
            });
        }
        let body = response.text()?;
        let locations = parse_record_files(&body, self.protocol, &self.server, &self.xrootd_server)?;
        tracing::info!(recid = self.recid, files = locations.len(), "record loaded");
        Ok(locations)
    }
}
