//! Artifact version parsing and partial ordering.
//!
//! Versions are split on `.` and `-`; numeric segments compare as numbers
//! and well-known qualifiers have a defined ordering:
//! `alpha` < `beta` < `milestone` < `rc` < `snapshot` < `""` (release) < `sp`.
//!
//! Unlike a full Maven comparator, unrecognized text qualifiers do not get a
//! guessed position: any ordering decision that would rest on one yields
//! `None`, and the resolver reports the conflict instead of silently picking
//! a side.

use std::cmp::Ordering;
use std::fmt;

/// A parsed artifact version with comparable segments.
#[derive(Debug, Clone)]
pub struct ArtifactVersion {
    pub original: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
enum Segment {
    Numeric(u64),
    Qualifier(QualifierKind),
    Text(String),
}

/// Well-known version qualifiers with defined ordering.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
enum QualifierKind {
    Alpha,
    Beta,
    Milestone,
    Rc,
    Snapshot,
    Release,
    Sp,
}

impl ArtifactVersion {
    pub fn parse(version: &str) -> Self {
        Self {
            original: version.to_string(),
            segments: parse_segments(version),
        }
    }

    /// Compare two versions where the scheme defines an order.
    ///
    /// Returns `None` when the decision would rest on an unrecognized text
    /// qualifier (e.g. `1.0-jre` vs `1.0-android`).
    pub fn try_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.original == other.original {
            return Some(Ordering::Equal);
        }
        let max_len = self.segments.len().max(other.segments.len());
        for i in 0..max_len {
            let ord = compare_segments(self.segments.get(i), other.segments.get(i))?;
            if ord != Ordering::Equal {
                return Some(ord);
            }
        }
        Some(Ordering::Equal)
    }
}

impl fmt::Display for ArtifactVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

fn compare_segments(a: Option<&Segment>, b: Option<&Segment>) -> Option<Ordering> {
    match (a, b) {
        (None, None) => Some(Ordering::Equal),
        (Some(s), None) => compare_segment_to_empty(s),
        (None, Some(s)) => compare_segment_to_empty(s).map(Ordering::reverse),
        (Some(a), Some(b)) => compare_two_segments(a, b),
    }
}

fn compare_segment_to_empty(seg: &Segment) -> Option<Ordering> {
    match seg {
        Segment::Numeric(0) => Some(Ordering::Equal),
        Segment::Numeric(_) => Some(Ordering::Greater),
        Segment::Qualifier(q) => Some(q.cmp(&QualifierKind::Release)),
        Segment::Text(_) => None,
    }
}

fn compare_two_segments(a: &Segment, b: &Segment) -> Option<Ordering> {
    match (a, b) {
        (Segment::Numeric(a), Segment::Numeric(b)) => Some(a.cmp(b)),
        (Segment::Qualifier(a), Segment::Qualifier(b)) => Some(a.cmp(b)),
        (Segment::Numeric(_), Segment::Qualifier(_)) => Some(Ordering::Greater),
        (Segment::Qualifier(_), Segment::Numeric(_)) => Some(Ordering::Less),
        (Segment::Text(a), Segment::Text(b)) if a.eq_ignore_ascii_case(b) => Some(Ordering::Equal),
        // Any other comparison against free-form text is undefined.
        _ => None,
    }
}

fn parse_segments(version: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current = String::new();

    for ch in version.chars() {
        if ch == '.' || ch == '-' {
            if !current.is_empty() {
                segments.push(classify(&current));
                current.clear();
            }
        } else {
            current.push(ch);
        }
    }
    if !current.is_empty() {
        segments.push(classify(&current));
    }

    segments
}

fn classify(token: &str) -> Segment {
    if let Ok(n) = token.parse::<u64>() {
        return Segment::Numeric(n);
    }
    match token.to_lowercase().as_str() {
        "alpha" | "a" => Segment::Qualifier(QualifierKind::Alpha),
        "beta" | "b" => Segment::Qualifier(QualifierKind::Beta),
        "milestone" | "m" => Segment::Qualifier(QualifierKind::Milestone),
        "rc" | "cr" => Segment::Qualifier(QualifierKind::Rc),
        "snapshot" => Segment::Qualifier(QualifierKind::Snapshot),
        "ga" | "final" | "release" => Segment::Qualifier(QualifierKind::Release),
        "sp" => Segment::Qualifier(QualifierKind::Sp),
        _ => Segment::Text(token.to_string()),
    }
}

/// Pick the highest of a non-empty version list, or `None` if any needed
/// comparison is undefined.
pub fn highest<'a, I>(versions: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&str, ArtifactVersion)> = None;
    for raw in versions {
        let parsed = ArtifactVersion::parse(raw);
        best = match best {
            None => Some((raw, parsed)),
            Some((best_raw, best_parsed)) => match parsed.try_cmp(&best_parsed)? {
                Ordering::Greater => Some((raw, parsed)),
                _ => Some((best_raw, best_parsed)),
            },
        };
    }
    best.map(|(raw, _)| raw)
}
