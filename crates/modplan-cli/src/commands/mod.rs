//! Command dispatch and handler modules.

mod conflicts;
mod modules;
mod plan;
mod tree;

use std::path::Path;

use miette::Result;

use modplan_core::error::PlanError;
use modplan_core::manifest::Manifest;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    let manifest = load_manifest(&cli.manifest)?;
    match cli.command {
        Command::Plan { axis, format } => {
            plan::exec(&manifest, axis.as_deref(), format, cli.verbose)
        }
        Command::Tree { axis, module } => tree::exec(&manifest, axis.as_deref(), module.as_deref()),
        Command::Conflicts { axis } => conflicts::exec(&manifest, axis.as_deref()),
        Command::Modules => modules::exec(&manifest),
    }
}

fn load_manifest(path: &Path) -> Result<Manifest> {
    if !path.is_file() {
        return Err(PlanError::Manifest {
            message: format!("no manifest found at {}", path.display()),
        }
        .into());
    }
    Ok(Manifest::load(path)?)
}
