//! JMC command-line driver
//!
//! Locates the analyses of a jamovi module, synchronizes their layouts with
//! the option schemas and writes back the layouts that changed.

#![allow(missing_docs)]

pub mod commands;
pub mod config;
pub mod logging;
pub mod package;
pub mod project;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

pub use commands::SyncOptions;
pub use package::PackageInfo;
pub use project::{AnalysisFiles, Project};

/// Analysis layout synchronizer
#[derive(Debug, Parser)]
#[command(name = "jmc")]
#[command(about = "Keep analysis layouts in step with their option schemas", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Synchronize and write the layouts of a module
    Sync {
        /// Module directory (holds DESCRIPTION)
        #[arg(default_value = ".")]
        module: PathBuf,

        /// Only this analysis
        #[arg(long)]
        analysis: Option<String>,

        /// Report changes without writing
        #[arg(long)]
        dry_run: bool,

        /// Config file (default: jmc.toml in the module)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Fail if any layout is out of date or invalid
    Check {
        /// Module directory (holds DESCRIPTION)
        #[arg(default_value = ".")]
        module: PathBuf,

        /// Config file (default: jmc.toml in the module)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the control element list of an analysis as JSON
    Elements {
        /// Analysis definition (`*.a.yaml`)
        definition: PathBuf,

        /// Layout file (default: the `.u.yaml` beside the definition)
        #[arg(long)]
        layout: Option<PathBuf>,
    },
}

/// Execute a parsed command line
///
/// # Errors
/// Returns the first failure, with file context
pub fn run(cli: Cli, out: &mut impl Write) -> Result<ExitCode> {
    match cli.command {
        Command::Sync {
            module,
            analysis,
            dry_run,
            config,
        } => {
            let options = SyncOptions {
                analysis,
                dry_run,
                config,
            };
            commands::sync(&module, &options, out)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { module, config } => {
            let up_to_date = commands::check(&module, config.as_deref(), out)?;
            Ok(if up_to_date {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Elements { definition, layout } => {
            commands::elements(&definition, layout.as_deref(), out)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
