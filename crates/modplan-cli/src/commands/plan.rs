//! Handler for `modplan plan`.

use console::style;
use miette::{IntoDiagnostic, Result};

use modplan_core::manifest::Manifest;
use modplan_resolver::session;

use crate::cli::OutputFormat;

pub fn exec(
    manifest: &Manifest,
    axis: Option<&str>,
    format: OutputFormat,
    verbose: bool,
) -> Result<()> {
    let outcome = session::plan_build(manifest, axis)?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&outcome.plan).into_diagnostic()?;
            println!("{json}");
        }
        OutputFormat::Text => {
            println!(
                "{} {} v{} ({} modules)",
                style("Plan for").bold(),
                manifest.project.name,
                manifest.effective_version(),
                outcome.plan.len()
            );
            for (i, module) in outcome.plan.modules.iter().enumerate() {
                println!("{:>3}. {}", i + 1, style(&module.path).cyan());
                for coord in &module.artifacts {
                    println!("       {coord}");
                }
            }
            if !outcome.conflicts.is_empty() {
                if verbose {
                    println!();
                    print!("{}", outcome.conflicts);
                } else {
                    println!(
                        "{} {} version conflict(s) resolved, run `modplan conflicts` for details",
                        style("note:").yellow().bold(),
                        outcome.conflicts.len()
                    );
                }
            }
        }
    }

    Ok(())
}
