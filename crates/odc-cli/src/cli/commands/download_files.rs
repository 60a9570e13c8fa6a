//! `odc download-files` – download the selected files one after another.

use anyhow::{Context, Result};
use odc_core::config::OdcConfig;
use odc_core::downloader::{Downloader, Protocol};
use odc_core::location::destination_path;
use std::fs;
use std::path::PathBuf;

use super::select_locations;
use crate::cli::display::{display_message, display_path, ConsoleObserver, MessageKind};
use crate::cli::{FilterArgs, SourceArgs};

/// Default destination: `./<recid>` for records, `.` for location lists.
pub(crate) fn default_download_dir(source: &SourceArgs) -> PathBuf {
    match source.recid {
        Some(recid) => PathBuf::from(recid.to_string()),
        None => PathBuf::from("."),
    }
}

pub fn run_download_files(
    cfg: &OdcConfig,
    source: &SourceArgs,
    filters: &FilterArgs,
    protocol: Protocol,
    download_dir: Option<PathBuf>,
    dry_run: bool,
) -> Result<()> {
    let locations = select_locations(cfg, source, filters, protocol)?;
    let dest_dir = download_dir.unwrap_or_else(|| default_download_dir(source));

    if dry_run {
        for location in &locations {
            let dest = destination_path(&dest_dir, location);
            println!("{} -> {}", location, display_path(&dest));
        }
        return Ok(());
    }

    // Fails before anything is created when xrootd is unavailable.
    let downloader = Downloader::detect(cfg)?;
    downloader.ensure_capability(protocol)?;

    if locations.is_empty() {
        display_message(MessageKind::Note, "No files matched the filters.");
        return Ok(());
    }

    fs::create_dir_all(&dest_dir)
        .with_context(|| format!("create {}", dest_dir.display()))?;
    tracing::info!(
        files = locations.len(),
        protocol = %protocol,
        transport = downloader.http_transport_name(),
        dest = %dest_dir.display(),
        "download starting"
    );

    let mut observer = ConsoleObserver;
    let written = downloader.download_files(&dest_dir, &locations, protocol, &mut observer)?;

    display_message(
        MessageKind::Note,
        &format!("Success! Downloaded {} file(s).", written.len()),
    );
    Ok(())
}
