//! Build graph construction and traversal.

use std::collections::{HashMap, HashSet};
use std::fmt;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use modplan_core::coordinate::ArtifactCoordinate;
use modplan_core::error::{PlanError, PlanResult};
use modplan_core::module::{DependencyDecl, DependencyTarget, EdgeKind, ModulePath};

use crate::registry::ModuleRegistry;

/// A node in the build graph: a project module or an external artifact leaf.
///
/// Before version resolution, artifact nodes are keyed by the full
/// `group:artifact:version` string, so competing versions of the same
/// artifact coexist as distinct nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GraphNode {
    Module(ModulePath),
    Artifact(ArtifactCoordinate),
}

impl GraphNode {
    /// Unique lookup key for the node.
    pub fn key(&self) -> String {
        match self {
            GraphNode::Module(path) => path.to_string(),
            GraphNode::Artifact(coord) => coord.to_string(),
        }
    }

    pub fn as_module(&self) -> Option<&ModulePath> {
        match self {
            GraphNode::Module(path) => Some(path),
            GraphNode::Artifact(_) => None,
        }
    }

    pub fn as_artifact(&self) -> Option<&ArtifactCoordinate> {
        match self {
            GraphNode::Module(_) => None,
            GraphNode::Artifact(coord) => Some(coord),
        }
    }
}

impl fmt::Display for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphNode::Module(path) => path.fmt(f),
            GraphNode::Artifact(coord) => coord.fmt(f),
        }
    }
}

/// Edge label: the declared role plus an optional axis constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    pub kind: EdgeKind,
    pub axis: Option<String>,
}

impl GraphEdge {
    pub fn new(kind: EdgeKind) -> Self {
        Self { kind, axis: None }
    }
}

/// A directed graph of module and artifact nodes, backed by petgraph.
///
/// Module nodes keep their declaration order; artifact nodes are always
/// leaves. Constructed once and treated as an immutable snapshot by every
/// downstream transformation.
#[derive(Debug)]
pub struct BuildGraph {
    graph: DiGraph<GraphNode, GraphEdge>,
    /// Lookup from node key to index.
    index: HashMap<String, NodeIndex>,
    /// Module node indices in declaration order.
    module_order: Vec<NodeIndex>,
}

impl BuildGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            index: HashMap::new(),
            module_order: Vec::new(),
        }
    }

    /// Add or retrieve a module node.
    pub fn add_module(&mut self, path: ModulePath) -> NodeIndex {
        let node = GraphNode::Module(path);
        let key = node.key();
        if let Some(&idx) = self.index.get(&key) {
            return idx;
        }
        let idx = self.graph.add_node(node);
        self.index.insert(key, idx);
        self.module_order.push(idx);
        idx
    }

    /// Add or retrieve an artifact node.
    pub fn add_artifact(&mut self, coord: ArtifactCoordinate) -> NodeIndex {
        let node = GraphNode::Artifact(coord);
        let key = node.key();
        if let Some(&idx) = self.index.get(&key) {
            return idx;
        }
        let idx = self.graph.add_node(node);
        self.index.insert(key, idx);
        idx
    }

    /// Add an edge, deduplicating identical (target, kind, axis) triples.
    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, edge: GraphEdge) {
        let duplicate = self
            .graph
            .edges(from)
            .any(|e| e.target() == to && *e.weight() == edge);
        if !duplicate {
            self.graph.add_edge(from, to, edge);
        }
    }

    /// Look up a node by its key (`:module:path` or `group:artifact:version`).
    pub fn find(&self, key: &str) -> Option<NodeIndex> {
        self.index.get(key).copied()
    }

    pub fn find_module(&self, path: &ModulePath) -> Option<NodeIndex> {
        self.find(&path.to_string())
    }

    pub fn node(&self, idx: NodeIndex) -> &GraphNode {
        &self.graph[idx]
    }

    /// Module nodes in declaration order.
    pub fn modules(&self) -> impl Iterator<Item = (NodeIndex, &ModulePath)> {
        self.module_order.iter().map(|&idx| {
            match &self.graph[idx] {
                GraphNode::Module(path) => (idx, path),
                // Only module indices are recorded in module_order.
                GraphNode::Artifact(_) => unreachable!("artifact node in module order"),
            }
        })
    }

    /// Direct dependencies of a node, in edge declaration order.
    pub fn dependencies_of(&self, idx: NodeIndex) -> Vec<(NodeIndex, &GraphEdge)> {
        let mut deps: Vec<(NodeIndex, &GraphEdge)> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| (e.target(), e.weight()))
            .collect();
        // petgraph iterates outgoing edges in reverse insertion order.
        deps.reverse();
        deps
    }

    /// Direct module dependencies of a node.
    pub fn module_dependencies_of(&self, idx: NodeIndex) -> Vec<(NodeIndex, &GraphEdge)> {
        self.dependencies_of(idx)
            .into_iter()
            .filter(|(to, _)| self.graph[*to].as_module().is_some())
            .collect()
    }

    /// Direct artifact dependencies of a node.
    pub fn artifact_dependencies_of(&self, idx: NodeIndex) -> Vec<(&ArtifactCoordinate, &GraphEdge)> {
        self.dependencies_of(idx)
            .into_iter()
            .filter_map(|(to, edge)| self.graph[to].as_artifact().map(|c| (c, edge)))
            .collect()
    }

    /// Reverse module dependencies (who depends on this node).
    pub fn dependents_of(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.graph
            .edges_directed(idx, Direction::Incoming)
            .map(|e| e.source())
            .collect()
    }

    pub fn module_count(&self) -> usize {
        self.module_order.len()
    }

    pub fn artifact_count(&self) -> usize {
        self.graph.node_count() - self.module_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Render the graph as a tree, one top-level entry per root module
    /// (modules nobody depends on), or a single entry when `root` is given.
    pub fn render_tree(&self, root: Option<&ModulePath>) -> String {
        let mut output = String::new();
        let roots: Vec<NodeIndex> = match root {
            Some(path) => self.find_module(path).into_iter().collect(),
            None => self
                .module_order
                .iter()
                .copied()
                .filter(|&idx| {
                    !self
                        .dependents_of(idx)
                        .iter()
                        .any(|&from| self.graph[from].as_module().is_some())
                })
                .collect(),
        };

        for idx in roots {
            output.push_str(&format!("{}\n", self.graph[idx]));
            let mut visited = HashSet::new();
            visited.insert(idx);
            let deps = self.dependencies_of(idx);
            let count = deps.len();
            for (i, (child, edge)) in deps.into_iter().enumerate() {
                self.render_subtree(&mut output, child, edge, "", i == count - 1, &mut visited);
            }
        }

        output
    }

    fn render_subtree(
        &self,
        output: &mut String,
        idx: NodeIndex,
        edge: &GraphEdge,
        prefix: &str,
        is_last: bool,
        visited: &mut HashSet<NodeIndex>,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        let node = &self.graph[idx];
        let mut label = node.to_string();
        if edge.kind != EdgeKind::Api {
            label.push_str(&format!(" ({})", edge.kind));
        }
        if let Some(ref axis) = edge.axis {
            label.push_str(&format!(" [{axis}]"));
        }
        output.push_str(&format!("{prefix}{connector}{label}\n"));

        if !visited.insert(idx) {
            return;
        }

        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        let deps = self.dependencies_of(idx);
        let count = deps.len();
        for (i, (child, edge)) in deps.into_iter().enumerate() {
            self.render_subtree(output, child, edge, &child_prefix, i == count - 1, visited);
        }

        visited.remove(&idx);
    }
}

impl Default for BuildGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Two-pass graph construction over a complete registry.
///
/// Pass one (the registry) guarantees every module is known before any edge
/// is validated, so declaration order never causes forward-reference errors.
pub struct GraphBuilder<'a> {
    registry: &'a ModuleRegistry,
    graph: BuildGraph,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(registry: &'a ModuleRegistry) -> Self {
        let mut graph = BuildGraph::new();
        for module in registry.modules() {
            graph.add_module(module.path.clone());
        }
        Self { registry, graph }
    }

    /// Add one declared edge, validating both endpoints.
    pub fn add_edge(&mut self, from: &ModulePath, decl: &DependencyDecl) -> PlanResult<()> {
        self.registry.resolve(from)?;
        let from_idx = self
            .graph
            .find_module(from)
            .expect("registered module has a node");

        let to_idx = match &decl.target {
            DependencyTarget::Module(path) => {
                if path == from {
                    return Err(PlanError::SelfDependency { path: path.clone() });
                }
                self.registry.resolve(path)?;
                self.graph
                    .find_module(path)
                    .expect("registered module has a node")
            }
            DependencyTarget::Artifact(coord) => self.graph.add_artifact(coord.clone()),
        };

        self.graph.add_edge(
            from_idx,
            to_idx,
            GraphEdge {
                kind: decl.kind,
                axis: decl.axis.clone(),
            },
        );
        Ok(())
    }

    pub fn build(self) -> BuildGraph {
        self.graph
    }

    /// Build the full declarative graph: every module's declared edges.
    pub fn from_registry(registry: &'a ModuleRegistry) -> PlanResult<BuildGraph> {
        let mut builder = GraphBuilder::new(registry);
        for module in registry.modules() {
            for decl in &module.dependencies {
                builder.add_edge(&module.path, decl)?;
            }
        }
        let graph = builder.build();
        tracing::debug!(
            modules = graph.module_count(),
            artifacts = graph.artifact_count(),
            "constructed build graph"
        );
        Ok(graph)
    }
}
