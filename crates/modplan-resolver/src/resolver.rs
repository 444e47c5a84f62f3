//! Version resolution: collapse competing artifact versions to one chosen
//! version per `group:artifact`, honoring global overrides.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use modplan_core::coordinate::CoordinateKey;
use modplan_core::error::{PlanError, PlanResult};
use modplan_core::manifest::Manifest;

use crate::conflict::{ConflictReason, ConflictReport, VersionConflict};
use crate::graph::{BuildGraph, GraphNode};
use crate::version;

/// Global `(group, artifact) -> version` forcing table.
///
/// Built from an ordered list; a later entry for the same key wins.
/// Passed explicitly to [`resolve`] rather than living as ambient state.
#[derive(Debug, Default)]
pub struct VersionOverrides {
    map: HashMap<CoordinateKey, String>,
}

impl VersionOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from ordered `(key, version)` pairs, last write wins.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (CoordinateKey, String)>,
    {
        let mut overrides = Self::new();
        for (key, version) in pairs {
            overrides.insert(key, version);
        }
        overrides
    }

    /// Build from the manifest's `[force]` table.
    pub fn from_manifest(manifest: &Manifest) -> PlanResult<Self> {
        let mut overrides = Self::new();
        for (spec, version) in &manifest.force {
            let key = CoordinateKey::parse(spec).ok_or_else(|| PlanError::Manifest {
                message: format!("invalid [force] key {spec:?}, expected \"group:artifact\""),
            })?;
            overrides.insert(key, version.clone());
        }
        Ok(overrides)
    }

    pub fn insert(&mut self, key: CoordinateKey, version: String) {
        self.map.insert(key, version);
    }

    pub fn get(&self, key: &CoordinateKey) -> Option<&str> {
        self.map.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Resolve every external artifact coordinate in the graph to exactly one
/// version.
///
/// A functional transformation: the input graph is left untouched and a new
/// graph is returned with every artifact edge rewritten to the chosen
/// version. Overrides win unconditionally and silently; otherwise the
/// highest requested version wins, and versions the scheme cannot order
/// fail with [`PlanError::UnresolvableVersionConflict`].
pub fn resolve(
    graph: &BuildGraph,
    overrides: &VersionOverrides,
) -> PlanResult<(BuildGraph, ConflictReport)> {
    // Group every requested version by coordinate key.
    let mut requested: BTreeMap<CoordinateKey, BTreeSet<String>> = BTreeMap::new();
    for (module_idx, _) in graph.modules() {
        for (coord, _) in graph.artifact_dependencies_of(module_idx) {
            requested
                .entry(coord.key())
                .or_default()
                .insert(coord.version.clone());
        }
    }

    // Choose one version per key.
    let mut chosen: HashMap<CoordinateKey, String> = HashMap::new();
    let mut conflicts = ConflictReport::new();
    for (key, versions) in &requested {
        let winner = match overrides.get(key) {
            Some(forced) => forced.to_string(),
            None if versions.len() == 1 => versions.iter().next().unwrap().clone(),
            None => version::highest(versions.iter().map(String::as_str))
                .ok_or_else(|| PlanError::UnresolvableVersionConflict {
                    group: key.group.clone(),
                    artifact: key.artifact.clone(),
                    versions: versions.iter().cloned().collect(),
                })?
                .to_string(),
        };

        for loser in versions.iter().filter(|v| **v != winner) {
            conflicts.add(VersionConflict {
                key: key.clone(),
                requested: loser.clone(),
                resolved: winner.clone(),
                reason: if overrides.get(key).is_some() {
                    ConflictReason::Forced
                } else {
                    ConflictReason::HighestWins
                },
            });
        }
        chosen.insert(key.clone(), winner);
    }

    // Rebuild the graph with one artifact node per key.
    let mut resolved = BuildGraph::new();
    for (_, path) in graph.modules() {
        resolved.add_module(path.clone());
    }
    for (module_idx, path) in graph.modules() {
        let from = resolved
            .find_module(path)
            .expect("module copied into resolved graph");
        for (to_idx, edge) in graph.dependencies_of(module_idx) {
            let to = match graph.node(to_idx) {
                GraphNode::Module(target) => resolved
                    .find_module(target)
                    .expect("module copied into resolved graph"),
                GraphNode::Artifact(coord) => {
                    let version = chosen
                        .get(&coord.key())
                        .expect("every requested key has a chosen version");
                    resolved.add_artifact(coord.with_version(version.clone()))
                }
            };
            resolved.add_edge(from, to, edge.clone());
        }
    }

    tracing::debug!(
        coordinates = requested.len(),
        conflicts = conflicts.len(),
        "resolved artifact versions"
    );
    Ok((resolved, conflicts))
}
