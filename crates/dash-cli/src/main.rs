use anyhow::{Context, Result};
use dash_cli::{cli, commands, DashConfig};
use dash_saved_objects::{ImportMode, ReqwestHttpClient};
use serde_json::Value;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: u8, json: bool) {
    let filter = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn path_arg(args: &clap::ArgMatches, name: &str) -> Result<PathBuf> {
    args.get_one::<PathBuf>(name)
        .cloned()
        .with_context(|| format!("missing argument <{name}>"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_count("verbose"), matches.get_flag("json-logs"));

    let config = DashConfig::load(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))?;

    match matches.subcommand() {
        Some(("inspect", args)) => {
            print(&commands::inspect(&path_arg(args, "spec")?, &config)?)?;
        }
        Some(("flatten", args)) => {
            let value = commands::flatten(
                &path_arg(args, "spec")?,
                &path_arg(args, "hit")?,
                args.get_flag("deep"),
                &config,
            )?;
            print(&value)?;
        }
        Some(("params", args)) => {
            print(&commands::params(&path_arg(args, "request")?, &config)?)?;
        }
        Some(("import", args)) => {
            let mode = if args.get_flag("create-new-copies") {
                ImportMode::new_copies()
            } else {
                ImportMode {
                    create_new_copies: false,
                    overwrite: args.get_flag("overwrite"),
                }
            };
            let url = args
                .get_one::<String>("url")
                .cloned()
                .unwrap_or_else(|| config.import.url.clone());
            let http = ReqwestHttpClient::new(url);

            let response = commands::import(
                &http,
                &path_arg(args, "file")?,
                mode,
                args.get_one::<String>("data-source-id").map(String::as_str),
                &config,
            )
            .await?;
            print(&serde_json::to_value(&response)?)?;
            if !response.success {
                std::process::exit(1);
            }
        }
        Some((other, _)) => anyhow::bail!("unknown subcommand {other}"),
        None => anyhow::bail!("a subcommand is required"),
    }

    Ok(())
}
