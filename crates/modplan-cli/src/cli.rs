//! CLI argument definitions for modplan.
//!
//! Uses `clap` derive macros to define the full command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "modplan",
    version,
    about = "Build planner for multi-module projects",
    long_about = "modplan turns a declarative module manifest into a dependency-ordered, \
                  conflict-resolved build plan: module registry, build graph, version \
                  forcing, per-axis dependency sets, and topological ordering."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the module manifest
    #[arg(short, long, global = true, default_value = "Modplan.toml")]
    pub manifest: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute the ordered build plan
    Plan {
        /// Axis value to expand conditional dependencies for (e.g. a target platform version)
        #[arg(short, long)]
        axis: Option<String>,
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Render the resolved dependency tree
    Tree {
        /// Axis value to expand conditional dependencies for
        #[arg(short, long)]
        axis: Option<String>,
        /// Restrict the tree to a single module path
        #[arg(long)]
        module: Option<String>,
    },

    /// Show version conflicts and how they were resolved
    Conflicts {
        /// Axis value to expand conditional dependencies for
        #[arg(short, long)]
        axis: Option<String>,
    },

    /// List declared modules in declaration order
    Modules,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn parse() -> Cli {
    Cli::parse()
}
