//! Korporus CLI - inspect manifests and mount apps from the command line.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use korporus_config::Config;
use korporus_shell::Host;
use korporus_shell::config_bridge::to_log_config;

mod commands;

use commands::{discover, mount, ports, resolve, validate};

/// Korporus - micro-frontend host shell
#[derive(Parser)]
#[command(name = "korporus")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Workspace root holding `.korporus/config.toml` (defaults to cwd)
    #[arg(long, global = true, env = "KORPORUS_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Host origin, overriding `shell.base_url`
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a manifest file and print every error
    Validate {
        /// Path to the manifest JSON
        file: PathBuf,
    },

    /// Print the manifest JSON Schema
    Schema,

    /// Fetch the configured manifests and list the valid apps
    Discover {
        /// Additional manifest URL (repeatable)
        #[arg(long = "manifest")]
        manifests: Vec<String>,
    },

    /// Resolve a remote entry against the host origin
    Resolve {
        /// Entry as written in a manifest, e.g. `/apps/hello/remoteEntry.js`
        entry: String,
    },

    /// List dev and preview server ports
    Ports,

    /// Discover, load and mount an app, then print the rendered layout
    Mount {
        /// App id from the manifest
        app_id: String,

        /// Load remotes from their dev servers
        #[arg(long)]
        dev: bool,

        /// Render with the settings panel open
        #[arg(long)]
        settings: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let workspace_root = cli
        .workspace
        .clone()
        .or_else(|| std::env::current_dir().ok());
    let (mut config, config_warning) = match Config::load(workspace_root.as_deref()) {
        Ok(resolved) => (resolved.config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    if let Some(base_url) = cli.base_url {
        config.shell.base_url = base_url;
    }

    let mut log_config = to_log_config(&config);
    if cli.verbose {
        "debug".clone_into(&mut log_config.level);
    }
    if let Err(e) = korporus_telemetry::setup_logging(&log_config) {
        eprintln!("Failed to initialize logging: {e}");
    }
    if let Some(e) = config_warning {
        tracing::warn!(error = %e, "Using default configuration");
    }

    match cli.command {
        Commands::Validate { file } => validate::run(&file)?,
        Commands::Schema => validate::print_schema()?,
        Commands::Discover { manifests } => {
            config.manifests.urls.extend(manifests);
            discover::run(&Host::over_http(config)?).await;
        },
        Commands::Resolve { entry } => resolve::run(&config, &entry)?,
        Commands::Ports => ports::run(&config),
        Commands::Mount {
            app_id,
            dev,
            settings,
        } => {
            config.shell.dev_mode |= dev;
            mount::run(&Host::over_http(config)?, &app_id, settings).await?;
        },
    }

    Ok(())
}
