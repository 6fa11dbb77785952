//! CLI module for Tether.
//!
//! Subcommands:
//! - `inspect`: Build the container and report the default services
//! - `settings`: Print the merged framework settings

mod inspect;
mod settings;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tether - service container for the web framework
#[derive(Parser)]
#[command(name = "tether")]
#[command(about = "Service container adapter - inspect the container a configuration produces")]
#[command(version)]
pub struct App {
    /// Run in verbose mode
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Settings file (.toml or .json); defaults to ./tether.toml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build the container and list the default services
    Inspect {
        /// Resolve every default service and report failures
        #[arg(long)]
        resolve: bool,
    },

    /// Print the merged framework settings as JSON
    Settings,
}

impl App {
    /// Run the CLI application.
    pub fn run(self) -> color_eyre::Result<()> {
        match self.command {
            Command::Inspect { resolve } => self.run_inspect(resolve),
            Command::Settings => self.run_settings(),
        }
    }
}
