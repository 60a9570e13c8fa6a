//! Console display: message kinds and the progress-line observer.

use odc_core::progress::{DownloadObserver, DownloadProgress};
use std::io::{self, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Note,
    Error,
    /// Redrawn in place: carriage-return terminated, no newline.
    Progress,
}

/// Formats `msg` for `kind` without printing it.
pub fn format_message(kind: MessageKind, msg: &str) -> String {
    match kind {
        MessageKind::Note => format!("==> {}", msg),
        MessageKind::Error => format!("==> ERROR: {}", msg),
        MessageKind::Progress => format!("{}\r", msg),
    }
}

pub fn display_message(kind: MessageKind, msg: &str) {
    let line = format_message(kind, msg);
    match kind {
        MessageKind::Note => println!("{}", line),
        MessageKind::Error => eprintln!("{}", line),
        MessageKind::Progress => {
            let mut out = io::stdout().lock();
            let _ = out.write_all(line.as_bytes());
            let _ = out.flush();
        }
    }
}

/// Path as shown to the user: relative paths get a leading `./`.
pub fn display_path(path: &Path) -> String {
    if path.is_relative() && !path.starts_with(".") {
        format!("./{}", path.display())
    } else {
        path.display().to_string()
    }
}

/// Renders download events on the terminal.
#[derive(Debug, Default)]
pub struct ConsoleObserver;

impl DownloadObserver for ConsoleObserver {
    fn on_start(&mut self, destination: &Path) {
        display_message(
            MessageKind::Note,
            &format!("File: {}", display_path(destination)),
        );
    }

    fn on_progress(&mut self, progress: DownloadProgress) {
        display_message(MessageKind::Progress, &progress.to_string());
    }

    fn on_finish(&mut self) {
        println!();
    }
}
