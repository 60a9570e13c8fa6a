pub mod config;
pub mod logging;

pub mod downloader;
pub mod filter;
pub mod location;
pub mod progress;
pub mod range;
pub mod record;
pub mod transport;
