//! Download progress events.
//!
//! The core only produces plain data; how a line is drawn (and redrawn) is up
//! to the observer.

use std::fmt;
use std::path::Path;

const KIB: u64 = 1024;

/// Snapshot of one transfer: bytes received so far and the declared total
/// (0 when unknown).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DownloadProgress {
    pub downloaded: u64,
    pub total: u64,
}

impl DownloadProgress {
    pub fn new(downloaded: u64, total: u64) -> Self {
        Self { downloaded, total }
    }

    pub fn downloaded_kib(&self) -> u64 {
        self.downloaded / KIB
    }

    pub fn total_kib(&self) -> u64 {
        self.total / KIB
    }

    /// Whole percent, floored; 0 when the total is unknown.
    pub fn percent(&self) -> u64 {
        if self.total == 0 {
            return 0;
        }
        (u128::from(self.downloaded) * 100 / u128::from(self.total)) as u64
    }
}

impl fmt::Display for DownloadProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Progress: {}/{} kiB ({}%)",
            self.downloaded_kib(),
            self.total_kib(),
            self.percent()
        )
    }
}

/// Receives the lifecycle of each single-file download.
pub trait DownloadObserver {
    /// Called once per file, before any byte is transferred.
    fn on_start(&mut self, destination: &Path);
    /// Called as data arrives (not called for transfers without progress).
    fn on_progress(&mut self, progress: DownloadProgress);
    /// Called after a whole-file HTTP transfer has completed.
    fn on_finish(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_way() {
        let p = DownloadProgress::new(512 * 1024, 1024 * 1024);
        assert_eq!(p.downloaded_kib(), 512);
        assert_eq!(p.total_kib(), 1024);
        assert_eq!(p.percent(), 50);
    }

    #[test]
    fn unknown_total_is_zero_percent() {
        let p = DownloadProgress::new(0, 0);
        assert_eq!(p.percent(), 0);
        assert_eq!(DownloadProgress::new(4096, 0).percent(), 0);
    }

    #[test]
    fn values_are_floored() {
        let p = DownloadProgress::new(1023, 3000);
        assert_eq!(p.downloaded_kib(), 0);
        assert_eq!(p.total_kib(), 2);
        assert_eq!(p.percent(), 34);
        assert_eq!(DownloadProgress::new(2, 3).percent(), 66);
    }

    #[test]
    fn display_line() {
        let p = DownloadProgress::new(512 * 1024, 1024 * 1024);
        assert_eq!(p.to_string(), "Progress: 512/1024 kiB (50%)");
    }

    #[test]
    fn large_sizes_do_not_overflow() {
        let p = DownloadProgress::new(u64::MAX / 2, u64::MAX);
        assert_eq!(p.percent(), 49);
    }
}
