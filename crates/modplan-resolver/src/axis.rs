//! Axis expansion: collapse per-axis conditional dependency sets into the
//! effective edge set for one axis value.
//!
//! Runs before version resolution, because the axis choice decides which
//! artifact versions compete for a coordinate.

use modplan_core::error::{PlanError, PlanResult};
use modplan_core::manifest::Manifest;

use crate::graph::{BuildGraph, GraphEdge, GraphNode};

/// Produce the effective graph for one axis value.
///
/// Keeps every unconstrained edge plus edges constrained to exactly
/// `axis_value`; artifact nodes referenced only by dropped edges disappear.
/// The output carries no constraints, they are resolved by construction.
pub fn expand(graph: &BuildGraph, axis_value: &str) -> BuildGraph {
    let mut expanded = BuildGraph::new();
    for (_, path) in graph.modules() {
        expanded.add_module(path.clone());
    }

    for (module_idx, path) in graph.modules() {
        let from = expanded
            .find_module(path)
            .expect("module copied into expanded graph");
        for (to_idx, edge) in graph.dependencies_of(module_idx) {
            match edge.axis.as_deref() {
                None => {}
                Some(v) if v == axis_value => {}
                Some(_) => continue,
            }
            let to = match graph.node(to_idx) {
                GraphNode::Module(target) => expanded
                    .find_module(target)
                    .expect("module copied into expanded graph"),
                GraphNode::Artifact(coord) => expanded.add_artifact(coord.clone()),
            };
            expanded.add_edge(from, to, GraphEdge::new(edge.kind));
        }
    }

    expanded
}

/// Check a requested axis value against the manifest's declared list.
///
/// Projects that declare no axis values accept only `None`; projects that do
/// declare them require a selection.
pub fn select_axis<'a>(manifest: &Manifest, requested: Option<&'a str>) -> PlanResult<Option<&'a str>> {
    let declared = &manifest.project.axis;
    match requested {
        Some(value) => {
            if declared.iter().any(|v| v == value) {
                Ok(Some(value))
            } else {
                Err(PlanError::UnknownAxis {
                    value: value.to_string(),
                    declared: declared.clone(),
                })
            }
        }
        None if declared.is_empty() => Ok(None),
        None => Err(PlanError::AxisRequired {
            declared: declared.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;
    use crate::registry::ModuleRegistry;
    use modplan_core::coordinate::ArtifactCoordinate;
    use modplan_core::module::{
        DependencyDecl, DependencyTarget, EdgeKind, Module, ModulePath,
    };

    fn constrained_graph() -> BuildGraph {
        let mut registry = ModuleRegistry::new();
        for path in ["util:mapping", "annotation-processing:autoload"] {
            registry
                .register(Module::new(ModulePath::new(path), "net.flintmc"))
                .unwrap();
        }
        let mut builder = GraphBuilder::new(&registry);
        let mapping = ModulePath::new("util:mapping");
        builder
            .add_edge(
                &mapping,
                &DependencyDecl::new(
                    DependencyTarget::Module(ModulePath::new("annotation-processing:autoload")),
                    EdgeKind::AnnotationProcessor,
                ),
            )
            .unwrap();
        builder
            .add_edge(
                &mapping,
                &DependencyDecl::constrained(
                    DependencyTarget::Artifact(
                        ArtifactCoordinate::parse("org.ow2.asm:asm:7.2-beta").unwrap(),
                    ),
                    EdgeKind::Api,
                    "1.15.2",
                ),
            )
            .unwrap();
        builder
            .add_edge(
                &mapping,
                &DependencyDecl::constrained(
                    DependencyTarget::Artifact(
                        ArtifactCoordinate::parse("org.ow2.asm:asm:9.2").unwrap(),
                    ),
                    EdgeKind::Api,
                    "1.16.5",
                ),
            )
            .unwrap();
        builder.build()
    }

    #[test]
    fn expand_keeps_matching_and_unconstrained_edges() {
        let graph = constrained_graph();
        let expanded = expand(&graph, "1.15.2");

        let mapping = expanded
            .find_module(&ModulePath::new("util:mapping"))
            .unwrap();
        let deps = expanded.dependencies_of(mapping);
        assert_eq!(deps.len(), 2);

        let artifacts = expanded.artifact_dependencies_of(mapping);
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].0.version, "7.2-beta");
        // Constraints are resolved away in the output.
        assert!(deps.iter().all(|(_, e)| e.axis.is_none()));
    }

    #[test]
    fn expand_drops_other_axis_edges() {
        let graph = constrained_graph();
        let expanded = expand(&graph, "1.16.5");
        let mapping = expanded
            .find_module(&ModulePath::new("util:mapping"))
            .unwrap();
        let artifacts = expanded.artifact_dependencies_of(mapping);
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].0.version, "9.2");
        // The 7.2-beta node is gone entirely.
        assert!(expanded.find("org.ow2.asm:asm:7.2-beta").is_none());
    }

    #[test]
    fn all_modules_survive_expansion() {
        let graph = constrained_graph();
        let expanded = expand(&graph, "1.15.2");
        assert_eq!(expanded.module_count(), graph.module_count());
    }

    #[test]
    fn select_axis_validates_declared_values() {
        let manifest = Manifest::parse_toml(
            r#"
[project]
name = "flint"
group = "net.flintmc"
axis = ["1.15.2", "1.16.5"]
"#,
        )
        .unwrap();

        assert_eq!(select_axis(&manifest, Some("1.15.2")).unwrap(), Some("1.15.2"));
        let err = select_axis(&manifest, Some("1.12.2")).unwrap_err();
        assert!(matches!(err, PlanError::UnknownAxis { value, .. } if value == "1.12.2"));
        let err = select_axis(&manifest, None).unwrap_err();
        assert!(matches!(err, PlanError::AxisRequired { .. }));
    }

    #[test]
    fn select_axis_without_declared_values() {
        let manifest = Manifest::parse_toml(
            r#"
[project]
name = "tool"
group = "org.example"
"#,
        )
        .unwrap();
        assert_eq!(select_axis(&manifest, None).unwrap(), None);
        assert!(select_axis(&manifest, Some("1.15.2")).is_err());
    }
}
