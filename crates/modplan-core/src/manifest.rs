use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{PlanError, PlanResult};

/// Fallback project version when neither the environment nor the manifest
/// provides one.
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Environment variable that overrides the project version, mirroring
/// CI-driven release versioning.
pub const VERSION_ENV: &str = "VERSION";

/// The parsed representation of a `Modplan.toml` file.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    pub project: ProjectMetadata,

    /// Global version forcing table: `"group:artifact" = "version"`.
    #[serde(default)]
    pub force: BTreeMap<String, String>,

    #[serde(default, rename = "module")]
    pub modules: Vec<ModuleSection>,
}

/// Project identity and metadata from the `[project]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectMetadata {
    pub name: String,
    /// Default group coordinate for modules that do not declare their own.
    pub group: String,
    #[serde(default)]
    pub version: Option<String>,
    /// Declared axis values (e.g. supported target platform versions).
    #[serde(default)]
    pub axis: Vec<String>,
}

/// One `[[module]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleSection {
    pub path: String,
    /// Display name override; defaults to the flattened path.
    #[serde(default)]
    pub name: Option<String>,
    /// Group override; defaults to the project group.
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub dependencies: DependencyBlock,
    /// Per-axis dependency blocks, keyed by axis value.
    #[serde(default)]
    pub axis: BTreeMap<String, DependencyBlock>,
}

/// A block of dependency shorthand strings, grouped by edge kind.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DependencyBlock {
    #[serde(default)]
    pub api: Vec<String>,
    #[serde(default, rename = "annotation-processor")]
    pub annotation_processor: Vec<String>,
    #[serde(default, rename = "internal-annotation-processor")]
    pub internal_annotation_processor: Vec<String>,
}

impl Manifest {
    /// Parse manifest content from a TOML string.
    pub fn parse_toml(content: &str) -> PlanResult<Self> {
        let manifest: Manifest = toml::from_str(content).map_err(|e| PlanError::Manifest {
            message: e.to_string(),
        })?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Load and parse a manifest from disk.
    pub fn load(path: &Path) -> PlanResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let manifest = Self::parse_toml(&content)?;
        tracing::debug!(
            modules = manifest.modules.len(),
            "loaded manifest for {}",
            manifest.project.name
        );
        Ok(manifest)
    }

    /// The effective project version: `$VERSION` wins over the manifest value,
    /// which wins over [`DEFAULT_VERSION`].
    pub fn effective_version(&self) -> String {
        effective_version(std::env::var(VERSION_ENV).ok(), self.project.version.clone())
    }

    fn validate(&self) -> PlanResult<()> {
        for module in &self.modules {
            if module.path.trim_matches(':').is_empty() {
                return Err(PlanError::Manifest {
                    message: "module path must not be empty".to_string(),
                });
            }
            for axis_value in module.axis.keys() {
                if !self.project.axis.contains(axis_value) {
                    return Err(PlanError::UnknownAxis {
                        value: axis_value.clone(),
                        declared: self.project.axis.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn effective_version(env: Option<String>, manifest: Option<String>) -> String {
    env.filter(|v| !v.is_empty())
        .or(manifest)
        .unwrap_or_else(|| DEFAULT_VERSION.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[project]
name = "flint"
group = "net.flintmc"
"#;

    #[test]
    fn parse_minimal() {
        let manifest = Manifest::parse_toml(MINIMAL).unwrap();
        assert_eq!(manifest.project.name, "flint");
        assert_eq!(manifest.project.group, "net.flintmc");
        assert!(manifest.modules.is_empty());
        assert!(manifest.force.is_empty());
    }

    #[test]
    fn parse_modules_and_force() {
        let manifest = Manifest::parse_toml(
            r#"
[project]
name = "flint"
group = "net.flintmc"
axis = ["1.15.2", "1.16.5"]

[force]
"org.ow2.asm:asm" = "9.2"

[[module]]
path = "framework:eventbus"

[[module]]
path = "util:mapping"
name = "mapping"

[module.dependencies]
api = [":framework:eventbus", "com.google.code.gson:gson:2.8.6"]

[module.axis."1.15.2"]
annotation-processor = [":annotation-processing:autoload"]
"#,
        )
        .unwrap();

        assert_eq!(manifest.modules.len(), 2);
        assert_eq!(manifest.force.get("org.ow2.asm:asm").unwrap(), "9.2");

        let mapping = &manifest.modules[1];
        assert_eq!(mapping.name.as_deref(), Some("mapping"));
        assert_eq!(mapping.dependencies.api.len(), 2);
        assert_eq!(
            mapping.axis.get("1.15.2").unwrap().annotation_processor,
            vec![":annotation-processing:autoload"]
        );
    }

    #[test]
    fn axis_block_must_match_declared_values() {
        let err = Manifest::parse_toml(
            r#"
[project]
name = "flint"
group = "net.flintmc"
axis = ["1.15.2"]

[[module]]
path = "mcapi"

[module.axis."1.16.5"]
api = ["com.google.code.gson:gson:2.8.6"]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, PlanError::UnknownAxis { value, .. } if value == "1.16.5"));
    }

    #[test]
    fn empty_module_path_rejected() {
        let err = Manifest::parse_toml(
            r#"
[project]
name = "flint"
group = "net.flintmc"

[[module]]
path = ":"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, PlanError::Manifest { .. }));
    }

    #[test]
    fn bad_toml_is_a_manifest_error() {
        let err = Manifest::parse_toml("project = ").unwrap_err();
        assert!(matches!(err, PlanError::Manifest { .. }));
    }

    #[test]
    fn version_precedence() {
        assert_eq!(
            effective_version(Some("2.1.0".into()), Some("1.0.0".into())),
            "2.1.0"
        );
        assert_eq!(effective_version(None, Some("1.0.0".into())), "1.0.0");
        assert_eq!(effective_version(Some(String::new()), None), DEFAULT_VERSION);
        assert_eq!(effective_version(None, None), DEFAULT_VERSION);
    }
}
