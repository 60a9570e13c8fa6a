//! CLI command handlers, one per file.

mod completions;
mod download_files;
mod get_file_locations;

pub use completions::run_completions;
pub use download_files::run_download_files;
#[cfg(test)]
pub(crate) use download_files::default_download_dir;
pub use get_file_locations::run_get_file_locations;

use anyhow::{Context, Result};
use odc_core::config::OdcConfig;
use odc_core::downloader::Protocol;
use odc_core::filter::apply_filters;
use odc_core::record::{ApiRecord, LocationList, RecordProvider};
use std::io;

use super::{FilterArgs, SourceArgs};

/// Loads the record's locations and narrows them with the requested filters.
fn select_locations(
    cfg: &OdcConfig,
    source: &SourceArgs,
    filters: &FilterArgs,
    protocol: Protocol,
) -> Result<Vec<String>> {
    let locations = match (&source.recid, &source.locations_file) {
        (Some(recid), _) => ApiRecord {
            server: cfg.server.clone(),
            xrootd_server: cfg.xrootd_server.clone(),
            recid: *recid,
            protocol,
        }
        .file_locations()?,
        (None, Some(path)) if path.as_os_str() == "-" => {
            LocationList::from_reader(io::stdin().lock())
                .context("read locations from stdin")?
                .file_locations()?
        }
        (None, Some(path)) => LocationList::from_path(path)?.file_locations()?,
        (None, None) => anyhow::bail!("either --recid or --locations-file is required"),
    };
    tracing::debug!(total = locations.len(), "file locations loaded");

    let selected = apply_filters(&filters.to_specs(), &locations)?;
    tracing::debug!(selected = selected.len(), "file locations selected");
    Ok(selected)
}
