//! Version conflict reporting.
//!
//! Conflicts are diagnostics, not errors: the resolver always picks a single
//! winner (forced or highest) and records every losing request here so the
//! original declarative intent stays inspectable.

use std::fmt;

use modplan_core::coordinate::CoordinateKey;

/// A report of all version conflicts encountered during resolution.
#[derive(Debug, Default)]
pub struct ConflictReport {
    pub conflicts: Vec<VersionConflict>,
}

/// A single losing version request: `requested` was asked for but `resolved`
/// was chosen.
#[derive(Debug, Clone)]
pub struct VersionConflict {
    pub key: CoordinateKey,
    pub requested: String,
    pub resolved: String,
    pub reason: ConflictReason,
}

/// Why a particular version won.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictReason {
    /// A global version override forced the winner.
    Forced,
    /// No override existed; the highest requested version won.
    HighestWins,
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictReason::Forced => f.write_str("forced"),
            ConflictReason::HighestWins => f.write_str("highest version wins"),
        }
    }
}

impl ConflictReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, conflict: VersionConflict) {
        self.conflicts.push(conflict);
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conflicts.len()
    }
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.conflicts.is_empty() {
            return write!(f, "No version conflicts.");
        }
        writeln!(f, "Version conflicts ({}):", self.conflicts.len())?;
        for c in &self.conflicts {
            writeln!(
                f,
                "  {} requested {} but resolved {} ({})",
                c.key, c.requested, c.resolved, c.reason
            )?;
        }
        Ok(())
    }
}
