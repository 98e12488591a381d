//! Dash CLI
//!
//! `dash` inspects index pattern specs, flattens hits, previews forwarded
//! search parameters and imports saved object export files.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod commands;
pub mod config;

pub use config::{DashConfig, ImportConfig, DEFAULT_DASHBOARDS_URL};

use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;

/// Command line definition
#[must_use]
pub fn cli() -> Command {
    Command::new("dash")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Index pattern and saved object tools")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("Increase log verbosity"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("inspect")
                .about("Summarize an index pattern spec")
                .arg(
                    Arg::new("spec")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Index pattern spec (JSON)"),
                ),
        )
        .subcommand(
            Command::new("flatten")
                .about("Flatten a search hit against an index pattern")
                .arg(
                    Arg::new("spec")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Index pattern spec (JSON)"),
                )
                .arg(
                    Arg::new("hit")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Search hit (JSON)"),
                )
                .arg(
                    Arg::new("deep")
                        .long("deep")
                        .action(ArgAction::SetTrue)
                        .help("Walk arrays of non-nested objects"),
                ),
        )
        .subcommand(
            Command::new("params")
                .about("Show the parameters forwarded for a search request")
                .arg(
                    Arg::new("request")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Search request {indexType?, params, dataSourceId?} (JSON)"),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Import a saved objects export file")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Export file (ndjson)"),
                )
                .arg(
                    Arg::new("overwrite")
                        .long("overwrite")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("create-new-copies")
                        .help("Overwrite objects with conflicting ids"),
                )
                .arg(
                    Arg::new("create-new-copies")
                        .long("create-new-copies")
                        .action(ArgAction::SetTrue)
                        .help("Import every object under a new id"),
                )
                .arg(
                    Arg::new("data-source-id")
                        .long("data-source-id")
                        .help("Target data source"),
                )
                .arg(
                    Arg::new("url")
                        .long("url")
                        .help("Dashboards base URL (overrides config)"),
                ),
        )
}
