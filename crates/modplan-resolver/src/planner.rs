//! Topological build planning over the resolved graph.

use std::collections::{BTreeSet, HashMap, HashSet};

use petgraph::graph::NodeIndex;
use serde::Serialize;

use modplan_core::coordinate::ArtifactCoordinate;
use modplan_core::error::{PlanError, PlanResult};
use modplan_core::module::{EdgeKind, ModulePath};

use crate::graph::BuildGraph;

/// A dependency-respecting linear ordering of the project's modules.
#[derive(Debug, Clone, Serialize)]
pub struct BuildPlan {
    pub modules: Vec<PlannedModule>,
}

/// One step of the plan: a module plus the external artifacts its
/// compilation needs, fully resolved.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedModule {
    pub path: ModulePath,
    pub artifacts: Vec<ArtifactCoordinate>,
}

impl BuildPlan {
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Module paths in build order.
    pub fn order(&self) -> Vec<&ModulePath> {
        self.modules.iter().map(|m| &m.path).collect()
    }
}

/// Order the graph's modules so every dependency precedes its dependents.
///
/// Kahn's algorithm over module-to-module edges only; external artifacts are
/// leaves and are not scheduled. Ties between ready modules are broken by
/// declaration order, so identical input always yields identical output.
pub fn plan(graph: &BuildGraph) -> PlanResult<BuildPlan> {
    let modules: Vec<(NodeIndex, &ModulePath)> = graph.modules().collect();
    let position: HashMap<NodeIndex, usize> = modules
        .iter()
        .enumerate()
        .map(|(i, (idx, _))| (*idx, i))
        .collect();

    // Out-degree counting: a module is ready once everything it depends on
    // has been planned.
    let mut pending: HashMap<NodeIndex, usize> = HashMap::new();
    let mut dependents: HashMap<NodeIndex, Vec<NodeIndex>> = HashMap::new();
    for (idx, _) in &modules {
        let deps = graph.module_dependencies_of(*idx);
        pending.insert(*idx, deps.len());
        for (dep, _) in deps {
            dependents.entry(dep).or_default().push(*idx);
        }
    }

    let mut ready: BTreeSet<usize> = modules
        .iter()
        .enumerate()
        .filter(|(_, (idx, _))| pending[idx] == 0)
        .map(|(i, _)| i)
        .collect();

    let mut order: Vec<NodeIndex> = Vec::with_capacity(modules.len());
    while let Some(&pos) = ready.iter().next() {
        ready.remove(&pos);
        let (idx, _) = modules[pos];
        order.push(idx);
        if let Some(deps) = dependents.get(&idx) {
            for &dependent in deps {
                let remaining = pending.get_mut(&dependent).expect("counted above");
                *remaining -= 1;
                if *remaining == 0 {
                    ready.insert(position[&dependent]);
                }
            }
        }
    }

    if order.len() != modules.len() {
        let remaining: HashSet<NodeIndex> = modules
            .iter()
            .map(|(idx, _)| *idx)
            .filter(|idx| !order.contains(idx))
            .collect();
        return Err(PlanError::CyclicDependency {
            cycle: extract_cycle(graph, &remaining, &position),
        });
    }

    let planned = order
        .into_iter()
        .map(|idx| PlannedModule {
            path: graph
                .node(idx)
                .as_module()
                .expect("planned node is a module")
                .clone(),
            artifacts: collect_artifacts(graph, idx),
        })
        .collect();

    Ok(BuildPlan { modules: planned })
}

/// The resolved artifact set a module compiles against: its own artifact
/// edges of every kind, plus artifacts exported (API edges) by modules it
/// reaches transitively through API edges. Processor edges are not exported.
fn collect_artifacts(graph: &BuildGraph, module: NodeIndex) -> Vec<ArtifactCoordinate> {
    let mut artifacts: BTreeSet<ArtifactCoordinate> = graph
        .artifact_dependencies_of(module)
        .into_iter()
        .map(|(coord, _)| coord.clone())
        .collect();

    let mut visited = HashSet::new();
    visited.insert(module);
    let mut stack: Vec<NodeIndex> = graph
        .module_dependencies_of(module)
        .into_iter()
        .filter(|(_, edge)| edge.kind == EdgeKind::Api)
        .map(|(idx, _)| idx)
        .collect();

    while let Some(idx) = stack.pop() {
        if !visited.insert(idx) {
            continue;
        }
        for (coord, edge) in graph.artifact_dependencies_of(idx) {
            if edge.kind == EdgeKind::Api {
                artifacts.insert(coord.clone());
            }
        }
        for (next, edge) in graph.module_dependencies_of(idx) {
            if edge.kind == EdgeKind::Api {
                stack.push(next);
            }
        }
    }

    artifacts.into_iter().collect()
}

/// Walk module edges among the unplanned remainder until a node repeats,
/// then return the full cycle, rotated to start at its earliest-declared
/// member.
fn extract_cycle(
    graph: &BuildGraph,
    remaining: &HashSet<NodeIndex>,
    position: &HashMap<NodeIndex, usize>,
) -> Vec<ModulePath> {
    let start = remaining
        .iter()
        .min_by_key(|idx| position[*idx])
        .copied()
        .expect("cycle detection only runs with unplanned modules");

    let mut path: Vec<NodeIndex> = Vec::new();
    let mut seen: HashMap<NodeIndex, usize> = HashMap::new();
    let mut current = start;
    loop {
        if let Some(&at) = seen.get(&current) {
            let mut cycle = path[at..].to_vec();
            let min = cycle
                .iter()
                .enumerate()
                .min_by_key(|(_, idx)| position[*idx])
                .map(|(i, _)| i)
                .unwrap_or(0);
            cycle.rotate_left(min);
            return cycle
                .into_iter()
                .map(|idx| {
                    graph
                        .node(idx)
                        .as_module()
                        .expect("cycle members are modules")
                        .clone()
                })
                .collect();
        }
        seen.insert(current, path.len());
        path.push(current);
        current = graph
            .module_dependencies_of(current)
            .into_iter()
            .map(|(idx, _)| idx)
            .find(|idx| remaining.contains(idx))
            .expect("unplanned module keeps an unplanned dependency");
    }
}
