//! Handler for `modplan conflicts`.

use miette::Result;

use modplan_core::manifest::Manifest;
use modplan_resolver::session;

pub fn exec(manifest: &Manifest, axis: Option<&str>) -> Result<()> {
    let outcome = session::plan_build(manifest, axis)?;
    println!("{}", outcome.conflicts);
    Ok(())
}
