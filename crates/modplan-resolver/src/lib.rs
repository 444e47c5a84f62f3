//! Build-graph engine for modplan: turns a declarative module manifest into
//! a dependency-ordered, conflict-resolved build plan.
//!
//! The pipeline is a chain of pure, synchronous transformations over
//! immutable graph snapshots: registry -> graph construction -> axis
//! expansion -> version resolution -> topological planning. See
//! [`session::plan_build`] for the composed entry point.

pub mod axis;
pub mod conflict;
pub mod graph;
pub mod planner;
pub mod registry;
pub mod resolver;
pub mod session;
pub mod version;
