//! `odc get-file-locations` – print the selected file locations.

use anyhow::Result;
use odc_core::config::OdcConfig;
use odc_core::downloader::Protocol;

use super::select_locations;
use crate::cli::{FilterArgs, SourceArgs};

pub fn run_get_file_locations(
    cfg: &OdcConfig,
    source: &SourceArgs,
    filters: &FilterArgs,
    protocol: Protocol,
) -> Result<()> {
    for location in select_locations(cfg, source, filters, protocol)? {
        println!("{}", location);
    }
    Ok(())
}
