//! Transfer backends.
//!
//! HTTP goes through an [`HttpTransport`]: libcurl when the `curl` feature is
//! built in, otherwise a chunked streaming client. XRootD goes through a
//! [`RemoteFs`], which may be absent on a given host.

#[cfg(feature = "curl")]
mod libcurl;
mod error;
mod stream;
mod xrootd;

#[cfg(feature = "curl")]
pub use libcurl::CurlTransport;
pub use error::TransferError;
pub use stream::{StreamTransport, CHUNK_SIZE};
pub use xrootd::{detect_xrootd, xrootd_url, RemoteFs, XrdcpClient};

use crate::config::HttpBackend;
use crate::progress::DownloadProgress;
use std::io::Write;

/// Whole-file HTTP GET into a writer.
pub trait HttpTransport {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Streams the body of `url` into `sink`, reporting progress as data arrives.
    /// Returns the number of body bytes written.
    fn fetch(
        &self,
        url: &str,
        sink: &mut dyn Write,
        on_progress: &mut dyn FnMut(DownloadProgress),
    ) -> Result<u64, TransferError>;
}

/// Picks the HTTP transport for this process.
pub fn select_http_transport(backend: HttpBackend) -> Result<Box<dyn HttpTransport>, TransferError> {
    let transport: Box<dyn HttpTransport> = match backend {
        HttpBackend::Stream => Box::new(StreamTransport::new()?),
        HttpBackend::Auto | HttpBackend::Curl => curl_or_stream(backend)?,
    };
    tracing::info!(backend = ?backend, transport = transport.name(), "http transport selected");
    Ok(transport)
}

#[cfg(feature = "curl")]
fn curl_or_stream(_backend: HttpBackend) -> Result<Box<dyn HttpTransport>, TransferError> {
    Ok(Box::new(CurlTransport::new()))
}

#[cfg(not(feature = "curl"))]
fn curl_or_stream(backend: HttpBackend) -> Result<Box<dyn HttpTransport>, TransferError> {
    if backend == HttpBackend::Curl {
        tracing::warn!("curl transport requested but not built in; using streaming client");
    }
    Ok(Box::new(StreamTransport::new()?))
}
