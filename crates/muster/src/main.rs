// SPDX-FileCopyrightText: 2026 Muster Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Muster - elastic distributed-training launcher.
//!
//! This is the binary entry point for the launcher. It wires configuration,
//! logging, and the rendezvous backend registry together; the rendezvous
//! protocol itself lives behind the handlers the registry creates.

use clap::{Parser, Subcommand};

mod backends;
mod config;
mod launch;

use launch::{parse_conf_pair, LaunchArgs};

/// Muster - elastic distributed-training launcher.
#[derive(Parser, Debug)]
#[command(name = "muster", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List available rendezvous backends (built-in and discovered).
    Backends,
    /// Resolve a rendezvous backend and launch a training job.
    Launch {
        /// Rendezvous backend name.
        #[arg(long = "rdzv-backend", default_value = "static")]
        backend: String,
        /// Backend-specific endpoint (host:port, directory path, ...).
        #[arg(long = "rdzv-endpoint", default_value = "")]
        endpoint: String,
        /// Run identifier shared by all nodes of the job.
        #[arg(long = "run-id")]
        run_id: String,
        /// Minimum number of nodes.
        #[arg(long = "min-nodes", default_value_t = 1)]
        min_nodes: u32,
        /// Maximum number of nodes.
        #[arg(long = "max-nodes", default_value_t = 1)]
        max_nodes: u32,
        /// Backend-specific key=value override, repeatable.
        #[arg(long = "rdzv-conf", value_parser = parse_conf_pair)]
        conf: Vec<(String, String)>,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match config::load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    init_tracing(&config.log_level);

    match cli.command {
        Some(Commands::Backends) => backends::run_backends(&config),
        Some(Commands::Launch {
            backend,
            endpoint,
            run_id,
            min_nodes,
            max_nodes,
            conf,
        }) => {
            let args = LaunchArgs {
                backend,
                endpoint,
                run_id,
                min_nodes,
                max_nodes,
                conf,
            };
            if let Err(e) = launch::run_launch(&config, args) {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        None => {
            println!("muster: use --help for available commands");
        }
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("muster={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
