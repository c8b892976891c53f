// SPDX-FileCopyrightText: 2026 Postino Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Postino - turns chat messages into ready-to-publish social posts.
//!
//! Binary entry point: loads and validates configuration, initializes
//! logging, and dispatches subcommands.

mod local;
mod shell;

use clap::{Parser, Subcommand};
use colored::Colorize;

/// Postino - conversational content intake for social posts.
#[derive(Parser, Debug)]
#[command(name = "postino", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch an interactive conversation shell with local adapters.
    Shell,
    /// Print the effective configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration before doing anything else.
    let config = match postino_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            postino_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config);

    match cli.command {
        Some(Commands::Shell) => {
            if let Err(e) = shell::run_shell(config).await {
                eprintln!("{}: {e}", "error".red());
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => match toml::to_string_pretty(&config) {
            Ok(rendered) => print!("{rendered}"),
            Err(e) => {
                eprintln!("{}: failed to render config: {e}", "error".red());
                std::process::exit(1);
            }
        },
        None => {
            println!("postino: use --help for available commands");
        }
    }
}

/// Initializes the tracing subscriber on stderr. `RUST_LOG` overrides
/// the configured level.
fn init_tracing(config: &postino_config::PostinoConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.agent.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        super::Cli::command().debug_assert();
    }
}
