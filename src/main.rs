//! ndk-crosstool - Android NDK toolchain generator
//!
//! Loads the generator configuration, applies command line overrides and
//! writes the ARM toolchain definitions.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use ndk_crosstool::commands::{GenerateCommand, ListCommand};
use ndk_crosstool::core::{GeneratorConfig, OutputFormat, APP_NAME, VERSION};

/// Android NDK crosstool generator
#[derive(Parser)]
#[command(name = "ndk-crosstool", version, about = "Generate ARM toolchain definitions for the Android NDK")]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true, env = "NDK_CROSSTOOL_CONFIG")]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    ndk: NdkOverrides,

    #[command(subcommand)]
    command: Command,
}

/// Overrides for the `[ndk]` configuration table
#[derive(Args)]
struct NdkOverrides {
    /// External repository the NDK is mounted as
    #[arg(long, global = true)]
    repository: Option<String>,

    /// Prebuilt host platform, e.g. linux-x86_64
    #[arg(long, global = true)]
    host: Option<String>,

    /// Android API level of the sysroots
    #[arg(long, global = true)]
    api_level: Option<u32>,
}

#[derive(Subcommand)]
enum Command {
    /// Write every toolchain definition
    Generate {
        /// Output format: json, toml or crosstool
        #[arg(long)]
        format: Option<OutputFormat>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List toolchain identifiers
    List,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    info!("{} v{}", APP_NAME, VERSION);

    let mut config = match &cli.config {
        Some(path) => GeneratorConfig::load_from(path).await?,
        None => GeneratorConfig::load().await?,
    };

    if let Some(repository) = cli.ndk.repository {
        config.ndk.repository_name = repository;
    }
    if let Some(host) = cli.ndk.host {
        config.ndk.host_platform = host;
    }
    if let Some(api_level) = cli.ndk.api_level {
        config.ndk.api_level = api_level;
    }

    match cli.command {
        Command::Generate { format, output } => {
            if let Some(format) = format {
                config.output.format = format;
            }
            if output.is_some() {
                config.output.path = output;
            }

            if let Some(text) = (GenerateCommand { config }).execute().await? {
                print!("{}", text);
            }
        }
        Command::List => {
            for line in (ListCommand { config }).execute()? {
                println!("{}", line);
            }
        }
    }

    Ok(())
}
