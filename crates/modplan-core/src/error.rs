use miette::Diagnostic;
use thiserror::Error;

use crate::module::ModulePath;

/// Unified error type for all modplan operations.
///
/// Every failure here is a data-correctness problem in the declarative
/// input; nothing is transient and nothing is retried.
#[derive(Debug, Error, Diagnostic)]
pub enum PlanError {
    /// I/O operation failed (reading the manifest).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or malformed manifest (e.g. Modplan.toml).
    #[error("Manifest error: {message}")]
    #[diagnostic(help("Check your Modplan.toml for syntax errors"))]
    Manifest { message: String },

    /// The same module path was registered twice.
    #[error("duplicate module {path}")]
    #[diagnostic(help("Each [[module]] path may appear only once"))]
    DuplicateModule { path: ModulePath },

    /// An edge or lookup referenced a module that was never registered.
    #[error("unknown module {path}")]
    #[diagnostic(help("Module references must match a declared [[module]] path"))]
    UnknownModule { path: ModulePath },

    /// A module declared a dependency on itself.
    #[error("module {path} depends on itself")]
    SelfDependency { path: ModulePath },

    /// Multiple versions of the same artifact were requested, no override
    /// exists, and the versions are not ordered by the version scheme.
    #[error(
        "unresolvable version conflict for {group}:{artifact}: requested versions [{}]",
        .versions.join(", ")
    )]
    #[diagnostic(help("Add a [force] entry to pick one version explicitly"))]
    UnresolvableVersionConflict {
        group: String,
        artifact: String,
        versions: Vec<String>,
    },

    /// The module graph contains a dependency cycle.
    #[error(
        "dependency cycle: {}",
        .cycle.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(" -> ")
    )]
    CyclicDependency { cycle: Vec<ModulePath> },

    /// An axis value was used that the project does not declare.
    #[error(
        "unknown axis value {value:?}, declared values are [{}]",
        .declared.join(", ")
    )]
    UnknownAxis {
        value: String,
        declared: Vec<String>,
    },

    /// The project declares axis values but none was selected.
    #[error(
        "an axis value is required, declared values are [{}]",
        .declared.join(", ")
    )]
    #[diagnostic(help("Pass --axis to select a target platform version"))]
    AxisRequired { declared: Vec<String> },
}

/// Convenience alias used throughout the modplan crates.
pub type PlanResult<T> = Result<T, PlanError>;
