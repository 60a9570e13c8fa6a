//! Single-file downloader.
//!
//! Transfers one file location into a destination directory over `http` or
//! `xrootd`, naming it by the location's basename. No retries: a failed
//! transfer may leave a partial file behind.

use crate::config::OdcConfig;
use crate::location::{destination_path, remote_path};
use crate::progress::{DownloadObserver, DownloadProgress};
use crate::transport::{detect_xrootd, select_http_transport, HttpTransport, RemoteFs, TransferError};
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Transport protocol for file locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Protocol {
    #[default]
    Http,
    Xrootd,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Http => write!(f, "http"),
            Protocol::Xrootd => write!(f, "xrootd"),
        }
    }
}

impl FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "http" => Ok(Protocol::Http),
            "xrootd" => Ok(Protocol::Xrootd),
            other => Err(format!("unknown protocol '{}' (expected http or xrootd)", other)),
        }
    }
}

/// Error from a single-file download.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// The protocol needs a client that is not installed. Callers treat this as fatal.
    #[error("{protocol} is not installed on system. Please use the 'http' protocol instead.")]
    MissingCapability { protocol: Protocol },
    #[error(transparent)]
    Transfer(#[from] TransferError),
}

impl From<std::io::Error> for DownloadError {
    fn from(e: std::io::Error) -> Self {
        DownloadError::Transfer(TransferError::Io(e))
    }
}

/// Prefix stripped from XRootD locations: the server root with one trailing `/`.
fn xrootd_prefix(xrootd_server: &str) -> String {
    format!("{}/", xrootd_server.trim_end_matches('/'))
}

pub struct Downloader {
    http: Box<dyn HttpTransport>,
    xrootd: Option<Box<dyn RemoteFs>>,
    xrootd_prefix: String,
}

impl Downloader {
    pub fn new(
        http: Box<dyn HttpTransport>,
        xrootd: Option<Box<dyn RemoteFs>>,
        xrootd_server: &str,
    ) -> Self {
        Self {
            http,
            xrootd,
            xrootd_prefix: xrootd_prefix(xrootd_server),
        }
    }

    /// Builds a downloader from the transports detected on this host.
    pub fn detect(cfg: &OdcConfig) -> Result<Self, TransferError> {
        let http = select_http_transport(cfg.http_backend())?;
        let xrootd = detect_xrootd(cfg).map(|c| Box::new(c) as Box<dyn RemoteFs>);
        Ok(Self::new(http, xrootd, &cfg.xrootd_server))
    }

    pub fn http_transport_name(&self) -> &'static str {
        self.http.name()
    }

    /// Fails with `MissingCapability` when `protocol` cannot be served here.
    pub fn ensure_capability(&self, protocol: Protocol) -> Result<(), DownloadError> {
        match protocol {
            Protocol::Http => Ok(()),
            Protocol::Xrootd if self.xrootd.is_some() => Ok(()),
            Protocol::Xrootd => Err(DownloadError::MissingCapability { protocol }),
        }
    }

    /// Downloads one file into `dest_dir/<basename>` and returns that path.
    ///
    /// `observer.on_start` fires exactly once, before any byte moves. For
    /// `xrootd` the client check happens before the destination is created.
    pub fn download_single_file(
        &self,
        dest_dir: &Path,
        location: &str,
        protocol: Protocol,
        observer: &mut dyn DownloadObserver,
    ) -> Result<PathBuf, DownloadError> {
        let dest = destination_path(dest_dir, location);
        match protocol {
            Protocol::Http => {
                let mut file = File::create(&dest)?;
                observer.on_start(&dest);
                tracing::debug!(location, transport = self.http.name(), "http download starting");
                let mut on_progress = |p: DownloadProgress| observer.on_progress(p);
                let written = self.http.fetch(location, &mut file, &mut on_progress)?;
                file.flush()?;
                observer.on_finish();
                tracing::info!(location, bytes = written, dest = %dest.display(), "downloaded");
            }
            Protocol::Xrootd => {
                let fs = self
                    .xrootd
                    .as_ref()
                    .ok_or(DownloadError::MissingCapability { protocol })?;
                let src = remote_path(location, &self.xrootd_prefix);
                let mut file = File::create(&dest)?;
                observer.on_start(&dest);
                tracing::debug!(location, remote = src, client = fs.name(), "xrootd download starting");
                let data = fs.read_all(src)?;
                file.write_all(&data)?;
                tracing::info!(location, bytes = data.len(), dest = %dest.display(), "downloaded");
            }
        }
        Ok(dest)
    }

    /// Downloads `locations` one after another, stopping at the first error.
    pub fn download_files(
        &self,
        dest_dir: &Path,
        locations: &[String],
        protocol: Protocol,
        observer: &mut dyn DownloadObserver,
    ) -> Result<Vec<PathBuf>, DownloadError> {
        self.ensure_capability(protocol)?;
        let mut out = Vec::with_capacity(locations.len());
        for location in locations {
            out.push(self.download_single_file(dest_dir, location, protocol, observer)?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io;

    /// Serves canned bodies, emitting progress every `step` bytes.
    struct FakeHttp {
        bodies: HashMap<String, Vec<u8>>,
        step: usize,
    }

    impl HttpTransport for FakeHttp {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn fetch(
            &self,
            url: &str,
            sink: &mut dyn Write,
            on_progress: &mut dyn FnMut(DownloadProgress),
        ) -> Result<u64, TransferError> {
            let body = self.bodies.get(url).ok_or(TransferError::Status(404))?;
            let total = body.len() as u64;
            let mut done = 0u64;
            for chunk in body.chunks(self.step) {
                sink.write_all(chunk)?;
                done += chunk.len() as u64;
                on_progress(DownloadProgress::new(done, total));
            }
            Ok(done)
        }
    }

    struct FakeRemote {
        files: HashMap<String, Vec<u8>>,
    }

    impl RemoteFs for FakeRemote {
        fn name(&self) -> &str {
            "fake-remote"
        }

        fn read_all(&self, remote_path: &str) -> Result<Vec<u8>, TransferError> {
            self.files
                .get(remote_path)
                .cloned()
                .ok_or_else(|| TransferError::Remote(format!("{}: not found", remote_path)))
        }
    }

    #[derive(Default)]
    struct Recorder {
        started: Vec<PathBuf>,
        progress: Vec<DownloadProgress>,
        finished: usize,
    }

    impl DownloadObserver for Recorder {
        fn on_start(&mut self, destination: &Path) {
            self.started.push(destination.to_path_buf());
        }
        fn on_progress(&mut self, progress: DownloadProgress) {
            self.progress.push(progress);
        }
        fn on_finish(&mut self) {
            self.finished += 1;
        }
    }

    fn http_only(bodies: &[(&str, &str)]) -> Downloader {
        let http = FakeHttp {
            bodies: bodies
                .iter()
                .map(|(k, v)| (k.to_string(), v.as_bytes().to_vec()))
                .collect(),
            step: 4,
        };
        Downloader::new(Box::new(http), None, "root://eospublic.cern.ch//")
    }

    #[test]
    fn protocol_parse_and_display() {
        assert_eq!("http".parse::<Protocol>().unwrap(), Protocol::Http);
        assert_eq!("xrootd".parse::<Protocol>().unwrap(), Protocol::Xrootd);
        assert!("ftp".parse::<Protocol>().is_err());
        assert_eq!(Protocol::Xrootd.to_string(), "xrootd");
    }

    #[test]
    fn http_writes_basename_in_dest_dir() {
        let dir = tempfile::tempdir().unwrap();
        let d = http_only(&[("http://x/data/a.txt", "0123456789")]);
        let mut rec = Recorder::default();
        let dest = d
            .download_single_file(dir.path(), "http://x/data/a.txt", Protocol::Http, &mut rec)
            .unwrap();
        assert_eq!(dest, dir.path().join("a.txt"));
        assert_eq!(std::fs::read(&dest).unwrap(), b"0123456789");
        assert_eq!(rec.started, vec![dest]);
        assert_eq!(rec.finished, 1);
        assert_eq!(rec.progress.len(), 3);
        assert_eq!(rec.progress.last(), Some(&DownloadProgress::new(10, 10)));
    }

    #[test]
    fn http_failure_leaves_file_and_skips_finish() {
        let dir = tempfile::tempdir().unwrap();
        let d = http_only(&[]);
        let mut rec = Recorder::default();
        let err = d
            .download_single_file(dir.path(), "http://x/gone.bin", Protocol::Http, &mut rec)
            .unwrap_err();
        assert!(matches!(err, DownloadError::Transfer(TransferError::Status(404))));
        assert_eq!(rec.started.len(), 1);
        assert_eq!(rec.finished, 0);
        assert!(dir.path().join("gone.bin").exists());
    }

    #[test]
    fn xrootd_missing_client_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let d = http_only(&[]);
        let mut rec = Recorder::default();
        let err = d
            .download_single_file(
                dir.path(),
                "root://eospublic.cern.ch//eos/opendata/a.root",
                Protocol::Xrootd,
                &mut rec,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            DownloadError::MissingCapability { protocol: Protocol::Xrootd }
        ));
        assert!(err.to_string().contains("'http' protocol"));
        assert!(rec.started.is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn download_files_checks_capability_first() {
        let dir = tempfile::tempdir().unwrap();
        let d = http_only(&[]);
        let locations = vec!["root://eospublic.cern.ch//eos/a.root".to_string()];
        let err = d
            .download_files(dir.path(), &locations, Protocol::Xrootd, &mut Recorder::default())
            .unwrap_err();
        assert!(matches!(err, DownloadError::MissingCapability { .. }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn xrootd_strips_server_root_and_copies_payload() {
        let dir = tempfile::tempdir().unwrap();
        let mut files = HashMap::new();
        files.insert("/eos/opendata/cms/b.root".to_string(), b"payload".to_vec());
        let remote = FakeRemote { files };
        let d = Downloader::new(
            Box::new(FakeHttp {
                bodies: HashMap::new(),
                step: 1,
            }),
            Some(Box::new(remote)),
            "root://eospublic.cern.ch//",
        );
        let mut rec = Recorder::default();
        let dest = d
            .download_single_file(
                dir.path(),
                "root://eospublic.cern.ch//eos/opendata/cms/b.root",
                Protocol::Xrootd,
                &mut rec,
            )
            .unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"payload");
        assert_eq!(rec.started.len(), 1);
        assert!(rec.progress.is_empty());
        assert_eq!(rec.finished, 0);
    }

    #[test]
    fn xrootd_remote_error_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let remote = FakeRemote {
            files: HashMap::new(),
        };
        let d = Downloader::new(
            Box::new(FakeHttp {
                bodies: HashMap::new(),
                step: 1,
            }),
            Some(Box::new(remote)),
            "root://eospublic.cern.ch//",
        );
        let err = d
            .download_single_file(
                dir.path(),
                "root://eospublic.cern.ch//eos/missing.root",
                Protocol::Xrootd,
                &mut Recorder::default(),
            )
            .unwrap_err();
        assert!(matches!(err, DownloadError::Transfer(TransferError::Remote(_))));
    }

    #[test]
    fn download_files_sequential_stops_at_first_error() {
        let dir = tempfile::tempdir().unwrap();
        let d = http_only(&[("http://x/a.txt", "aa"), ("http://x/c.txt", "cc")]);
        let locations: Vec<String> = ["http://x/a.txt", "http://x/b.txt", "http://x/c.txt"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut rec = Recorder::default();
        let err = d
            .download_files(dir.path(), &locations, Protocol::Http, &mut rec)
            .unwrap_err();
        assert!(matches!(err, DownloadError::Transfer(TransferError::Status(404))));
        assert_eq!(rec.started.len(), 2);
        assert!(dir.path().join("a.txt").exists());
        assert!(!dir.path().join("c.txt").exists());
    }

    #[test]
    fn missing_dest_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let d = http_only(&[("http://x/a.txt", "aa")]);
        let err = d
            .download_single_file(
                &dir.path().join("nope"),
                "http://x/a.txt",
                Protocol::Http,
                &mut Recorder::default(),
            )
            .unwrap_err();
        match err {
            DownloadError::Transfer(TransferError::Io(e)) => {
                assert_eq!(e.kind(), io::ErrorKind::NotFound)
            }
            other => panic!("expected io error, got {:?}", other),
        }
    }
}
