//! Handler for `modplan modules`.

use console::style;
use miette::Result;

use modplan_core::manifest::Manifest;
use modplan_resolver::registry::ModuleRegistry;

pub fn exec(manifest: &Manifest) -> Result<()> {
    let registry = ModuleRegistry::from_manifest(manifest)?;
    for module in registry.modules() {
        println!(
            "{}  {} ({}:{})",
            style(&module.path).cyan(),
            module.display_name,
            module.group,
            module.display_name
        );
    }
    Ok(())
}
