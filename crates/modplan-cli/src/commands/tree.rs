//! Handler for `modplan tree`.

use miette::Result;

use modplan_core::error::PlanError;
use modplan_core::manifest::Manifest;
use modplan_core::module::ModulePath;
use modplan_resolver::session;

pub fn exec(manifest: &Manifest, axis: Option<&str>, module: Option<&str>) -> Result<()> {
    let outcome = session::plan_build(manifest, axis)?;

    let root = module.map(ModulePath::new);
    if let Some(ref path) = root {
        if outcome.graph.find_module(path).is_none() {
            return Err(PlanError::UnknownModule { path: path.clone() }.into());
        }
    }

    print!("{}", outcome.graph.render_tree(root.as_ref()));
    Ok(())
}
