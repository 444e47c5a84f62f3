//! The composed planning pipeline: manifest -> registry -> graph ->
//! axis expansion -> version resolution -> build plan.
//!
//! Every step is a pure function of its inputs, so re-running the session
//! under a different axis value is just another call.

use modplan_core::error::PlanResult;
use modplan_core::manifest::Manifest;

use crate::axis;
use crate::conflict::ConflictReport;
use crate::graph::{BuildGraph, GraphBuilder};
use crate::planner::{self, BuildPlan};
use crate::registry::ModuleRegistry;
use crate::resolver::{self, VersionOverrides};

/// Everything one planning invocation produces.
#[derive(Debug)]
pub struct PlanOutcome {
    pub plan: BuildPlan,
    pub conflicts: ConflictReport,
    /// The expanded, version-resolved graph the plan was computed from,
    /// kept for tree rendering and diagnostics.
    pub graph: BuildGraph,
}

/// Run the full pipeline for one axis value.
pub fn plan_build(manifest: &Manifest, axis_value: Option<&str>) -> PlanResult<PlanOutcome> {
    let selected = axis::select_axis(manifest, axis_value)?;

    let registry = ModuleRegistry::from_manifest(manifest)?;
    let declared = GraphBuilder::from_registry(&registry)?;

    let effective = match selected {
        Some(value) => axis::expand(&declared, value),
        None => declared,
    };

    let overrides = VersionOverrides::from_manifest(manifest)?;
    let (resolved, conflicts) = resolver::resolve(&effective, &overrides)?;
    let plan = planner::plan(&resolved)?;

    tracing::info!(
        modules = plan.len(),
        axis = selected.unwrap_or("-"),
        "build plan ready"
    );
    Ok(PlanOutcome {
        plan,
        conflicts,
        graph: resolved,
    })
}
