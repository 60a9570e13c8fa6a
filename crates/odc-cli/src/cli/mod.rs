//! CLI for the ODC open data client.

mod commands;
mod display;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use odc_core::config::{self, OdcConfig};
use odc_core::downloader::{DownloadError, Protocol};
use odc_core::filter::{FilterError, FilterSpec};
use std::path::PathBuf;

use commands::{run_completions, run_download_files, run_get_file_locations};
use display::{display_message, MessageKind};

/// Top-level CLI for the ODC open data client.
#[derive(Debug, Parser)]
#[command(name = "odc")]
#[command(about = "ODC: select and download files of an open data record", long_about = None)]
pub struct Cli {
    /// Open data server base URL (overrides config).
    #[arg(long, global = true, value_name = "URL")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Where the record's file locations come from.
#[derive(Debug, Clone, Args)]
#[group(required = true, multiple = false)]
pub struct SourceArgs {
    /// Record ID on the open data server.
    #[arg(long)]
    pub recid: Option<u64>,

    /// File with one location per line ("-" for stdin).
    #[arg(long, value_name = "PATH")]
    pub locations_file: Option<PathBuf>,
}

/// Filters, applied in the order name, regexp, range.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Keep files with this exact name (repeatable, or comma-separated).
    #[arg(long, value_delimiter = ',', value_name = "NAME")]
    pub filter_name: Vec<String>,

    /// Keep files whose name contains a match for this regexp.
    #[arg(long, value_name = "REGEXP")]
    pub filter_regexp: Option<String>,

    /// Keep files at these 1-indexed positions, e.g. 1-3,7 (repeatable).
    #[arg(long, value_delimiter = ',', value_name = "RANGE")]
    pub filter_range: Vec<String>,
}

impl FilterArgs {
    pub fn to_specs(&self) -> Vec<FilterSpec> {
        let mut specs = Vec::new();
        if !self.filter_name.is_empty() {
            specs.push(FilterSpec::ByName(self.filter_name.clone()));
        }
        if let Some(re) = self.filter_regexp.as_ref().filter(|r| !r.is_empty()) {
            specs.push(FilterSpec::ByRegexp(re.clone()));
        }
        if !self.filter_range.is_empty() {
            specs.push(FilterSpec::ByRange(self.filter_range.clone()));
        }
        specs
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Print the (filtered) file locations of a record.
    GetFileLocations {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        filters: FilterArgs,

        /// Protocol the locations are meant for (http or xrootd).
        #[arg(long, default_value = "http")]
        protocol: Protocol,
    },

    /// Download the (filtered) files of a record.
    DownloadFiles {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        filters: FilterArgs,

        /// Transfer protocol (http or xrootd).
        #[arg(long, default_value = "http")]
        protocol: Protocol,

        /// Destination directory (default: ./<recid>, or . for a locations file).
        #[arg(long, value_name = "DIR")]
        download_dir: Option<PathBuf>,

        /// Only print what would be downloaded.
        #[arg(long)]
        dry_run: bool,
    },

    /// Print a shell completion script.
    Completions {
        /// Target shell.
        shell: clap_complete::Shell,
    },
}

fn load_config(server: Option<String>) -> OdcConfig {
    let mut cfg = config::load_or_init().unwrap_or_else(|e| {
        tracing::warn!("could not load config, using defaults: {:#}", e);
        OdcConfig::default()
    });
    if let Some(server) = server {
        cfg.server = server;
    }
    cfg
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = load_config(cli.server);
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::GetFileLocations {
                source,
                filters,
                protocol,
            } => run_get_file_locations(&cfg, &source, &filters, protocol)?,
            CliCommand::DownloadFiles {
                source,
                filters,
                protocol,
                download_dir,
                dry_run,
            } => run_download_files(&cfg, &source, &filters, protocol, download_dir, dry_run)?,
            CliCommand::Completions { shell } => run_completions(shell),
        }

        Ok(())
    }
}

/// Prints a failure for the user. Capability and filter errors get a display
/// message; everything else the full error chain.
pub fn report_error(err: &anyhow::Error) {
    if let Some(e) = err.downcast_ref::<DownloadError>() {
        if matches!(e, DownloadError::MissingCapability { .. }) {
            display_message(MessageKind::Error, &e.to_string());
            return;
        }
    }
    if let Some(e) = err.downcast_ref::<FilterError>() {
        display_message(MessageKind::Error, &e.to_string());
        return;
    }
    eprintln!("odc error: {:#}", err);
}

#[cfg(test)]
mod tests;
