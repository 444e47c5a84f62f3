//! Core data types for the modplan build planner.
//!
//! This crate defines the declarative model of a multi-module project:
//! module paths, artifact coordinates, dependency edge declarations, the
//! `Modplan.toml` manifest, and the unified error type shared by every
//! modplan crate.
//!
//! This crate is intentionally free of graph algorithms and I/O beyond
//! reading the manifest file.

pub mod coordinate;
pub mod error;
pub mod manifest;
pub mod module;
