//! Add-only registry of declared modules.

use std::collections::HashMap;

use modplan_core::error::{PlanError, PlanResult};
use modplan_core::manifest::{DependencyBlock, Manifest, ModuleSection};
use modplan_core::module::{DependencyDecl, DependencyTarget, EdgeKind, Module, ModulePath};

/// The set of declared modules, in declaration order.
///
/// Declaration order is preserved because it is the tie-breaker for the
/// planner's topological sort.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: Vec<Module>,
    index: HashMap<ModulePath, usize>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module. Fails if the path was already registered.
    pub fn register(&mut self, module: Module) -> PlanResult<()> {
        if self.index.contains_key(&module.path) {
            return Err(PlanError::DuplicateModule {
                path: module.path.clone(),
            });
        }
        self.index.insert(module.path.clone(), self.modules.len());
        self.modules.push(module);
        Ok(())
    }

    /// Look up a module by path, failing if it was never registered.
    pub fn resolve(&self, path: &ModulePath) -> PlanResult<&Module> {
        self.get(path).ok_or_else(|| PlanError::UnknownModule {
            path: path.clone(),
        })
    }

    pub fn get(&self, path: &ModulePath) -> Option<&Module> {
        self.index.get(path).map(|&i| &self.modules[i])
    }

    /// All modules in declaration order.
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Build a registry from a parsed manifest (pass one of two-pass graph
    /// construction: every module is registered before any edge is checked).
    pub fn from_manifest(manifest: &Manifest) -> PlanResult<Self> {
        let mut registry = Self::new();
        for section in &manifest.modules {
            registry.register(module_from_section(section, manifest)?)?;
        }
        Ok(registry)
    }
}

fn module_from_section(section: &ModuleSection, manifest: &Manifest) -> PlanResult<Module> {
    let path = ModulePath::new(section.path.as_str());
    let group = section
        .group
        .clone()
        .unwrap_or_else(|| manifest.project.group.clone());

    let mut module = Module::new(path.clone(), group);
    if let Some(ref name) = section.name {
        module.display_name = name.clone();
    }

    collect_block(&mut module, &section.dependencies, None)?;
    for (axis_value, block) in &section.axis {
        collect_block(&mut module, block, Some(axis_value.as_str()))?;
    }

    Ok(module)
}

fn collect_block(
    module: &mut Module,
    block: &DependencyBlock,
    axis: Option<&str>,
) -> PlanResult<()> {
    let groups = [
        (EdgeKind::Api, &block.api),
        (EdgeKind::AnnotationProcessor, &block.annotation_processor),
        (
            EdgeKind::InternalAnnotationProcessor,
            &block.internal_annotation_processor,
        ),
    ];
    for (kind, specs) in groups {
        for spec in specs {
            let target = DependencyTarget::parse(spec).ok_or_else(|| PlanError::Manifest {
                message: format!(
                    "module {}: invalid dependency {spec:?}, expected \":module:path\" or \"group:artifact:version\"",
                    module.path
                ),
            })?;
            module.dependencies.push(DependencyDecl {
                target,
                kind,
                axis: axis.map(str::to_string),
            });
        }
    }
    Ok(())
}
