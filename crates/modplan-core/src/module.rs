use std::fmt;

use serde::{Deserialize, Serialize};

use crate::coordinate::ArtifactCoordinate;

/// Hierarchical module path within the project, e.g. `framework:eventbus`.
///
/// Stored without the leading colon; `Display` renders the Gradle-style
/// `:framework:eventbus` form used in diagnostics and manifests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModulePath(String);

impl ModulePath {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        Self(path.trim_start_matches(':').to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Flattened single-segment name, e.g. `framework-eventbus`.
    ///
    /// Mirrors how the declarative input renames nested modules so that
    /// published artifacts carry unambiguous names.
    pub fn flat_name(&self) -> String {
        self.0.replace(':', "-")
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.0)
    }
}

impl From<&str> for ModulePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// The role a dependency edge plays in the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeKind {
    /// Compile-time API dependency, exported to consumers of the module.
    Api,
    /// Annotation processor on the module's own compilation.
    AnnotationProcessor,
    /// Annotation processor applied to the module's internal sources only.
    InternalAnnotationProcessor,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EdgeKind::Api => "api",
            EdgeKind::AnnotationProcessor => "annotation-processor",
            EdgeKind::InternalAnnotationProcessor => "internal-annotation-processor",
        };
        f.write_str(s)
    }
}

/// Target of a dependency edge: a sibling module or an external artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DependencyTarget {
    Module(ModulePath),
    Artifact(ArtifactCoordinate),
}

impl DependencyTarget {
    /// Parse the manifest shorthand.
    ///
    /// A leading colon references a sibling module (`":framework:eventbus"`),
    /// anything else must be a full `group:artifact:version` coordinate.
    pub fn parse(s: &str) -> Option<Self> {
        if let Some(rest) = s.strip_prefix(':') {
            if rest.is_empty() || rest.split(':').any(str::is_empty) {
                return None;
            }
            Some(Self::Module(ModulePath::new(rest)))
        } else {
            ArtifactCoordinate::parse(s).map(Self::Artifact)
        }
    }
}

impl fmt::Display for DependencyTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DependencyTarget::Module(path) => path.fmt(f),
            DependencyTarget::Artifact(coord) => coord.fmt(f),
        }
    }
}

/// A declared dependency edge, optionally constrained to a single axis value
/// (e.g. one target platform version).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyDecl {
    pub target: DependencyTarget,
    pub kind: EdgeKind,
    pub axis: Option<String>,
}

impl DependencyDecl {
    pub fn new(target: DependencyTarget, kind: EdgeKind) -> Self {
        Self {
            target,
            kind,
            axis: None,
        }
    }

    pub fn constrained(target: DependencyTarget, kind: EdgeKind, axis: impl Into<String>) -> Self {
        Self {
            target,
            kind,
            axis: Some(axis.into()),
        }
    }
}

/// A module as declared in the manifest.
///
/// Immutable once graph construction begins; the registry hands out shared
/// references only.
#[derive(Debug, Clone)]
pub struct Module {
    pub path: ModulePath,
    pub display_name: String,
    pub group: String,
    pub dependencies: Vec<DependencyDecl>,
}

impl Module {
    pub fn new(path: ModulePath, group: impl Into<String>) -> Self {
        let display_name = path.flat_name();
        Self {
            path,
            display_name,
            group: group.into(),
            dependencies: Vec::new(),
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn with_dependency(mut self, decl: DependencyDecl) -> Self {
        self.dependencies.push(decl);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_path_strips_leading_colon() {
        let path = ModulePath::new(":framework:eventbus");
        assert_eq!(path.as_str(), "framework:eventbus");
        assert_eq!(path.to_string(), ":framework:eventbus");
    }

    #[test]
    fn module_path_flat_name() {
        let path = ModulePath::new("annotation-processing:autoload");
        assert_eq!(path.flat_name(), "annotation-processing-autoload");
    }

    #[test]
    fn target_parse_module_reference() {
        let target = DependencyTarget::parse(":util:csv").unwrap();
        assert_eq!(target, DependencyTarget::Module(ModulePath::new("util:csv")));
    }

    #[test]
    fn target_parse_artifact() {
        let target = DependencyTarget::parse("org.javassist:javassist:3.27.0-GA").unwrap();
        match target {
            DependencyTarget::Artifact(coord) => {
                assert_eq!(coord.artifact, "javassist");
                assert_eq!(coord.version, "3.27.0-GA");
            }
            other => panic!("expected artifact, got {other:?}"),
        }
    }

    #[test]
    fn target_parse_rejects_malformed() {
        assert!(DependencyTarget::parse(":").is_none());
        assert!(DependencyTarget::parse("::eventbus").is_none());
        assert!(DependencyTarget::parse("not-a-coordinate").is_none());
        assert!(DependencyTarget::parse("group:artifact").is_none());
    }

    #[test]
    fn module_defaults_display_name() {
        let module = Module::new(ModulePath::new("render:gui"), "net.flintmc");
        assert_eq!(module.display_name, "render-gui");
        let renamed = module.with_display_name("gui");
        assert_eq!(renamed.display_name, "gui");
    }
}
