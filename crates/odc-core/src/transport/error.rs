//! Transfer error type.

/// Failure while moving bytes from a remote source to disk. Never retried.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// Local I/O failed (destination create/write, spawning a client).
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// libcurl reported an error (connection, timeout, aborted write).
    #[cfg(feature = "curl")]
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// The streaming HTTP client failed.
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    /// The server answered with a non-2xx status.
    #[error("HTTP {0}")]
    Status(u32),
    /// The remote filesystem client failed (e.g. path not found).
    #[error("remote: {0}")]
    Remote(String),
}
