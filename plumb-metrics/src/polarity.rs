//! Polarity resolution.
//!
//! Decides which metric names are inverted for aggregation. The mode is
//! global to the active set: one declared flag anywhere switches every
//! metric to declared mode, where undeclared metrics count as direct.
//! With no declared flag at all, the legacy defaults apply.

use crate::descriptor::{MetricDescriptor, Polarity};
use plumb_core::{CONTRADICTION_PRESSURE, GOAL_DRIFT, SEMANTIC_DIFFUSION};
use std::collections::BTreeSet;

/// Metrics inverted in legacy mode.
pub const LEGACY_INVERTED: [&str; 3] = [GOAL_DRIFT, CONTRADICTION_PRESSURE, SEMANTIC_DIFFUSION];

/// How the inverted set was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolarityMode {
    /// At least one active metric declared its polarity
    Declared,
    /// No active metric declared its polarity
    Legacy,
}

/// Names whose values are flipped (`1 - value`) before aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvertedSet {
    mode: PolarityMode,
    names: BTreeSet<String>,
}

impl InvertedSet {
    /// The legacy default set.
    pub fn legacy() -> Self {
        Self {
            mode: PolarityMode::Legacy,
            names: LEGACY_INVERTED.iter().map(|n| n.to_string()).collect(),
        }
    }

    /// Declared-mode set inverting exactly `names`.
    pub fn declared<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mode: PolarityMode::Declared,
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn mode(&self) -> PolarityMode {
        self.mode
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Resolve the inverted set for the active descriptors.
pub fn resolve_inverted<'a, I>(descriptors: I) -> InvertedSet
where
    I: IntoIterator<Item = &'a MetricDescriptor>,
{
    let descriptors: Vec<&MetricDescriptor> = descriptors.into_iter().collect();
    let any_declared = descriptors.iter().any(|d| d.polarity().is_declared());

    if !any_declared {
        return InvertedSet::legacy();
    }

    InvertedSet::declared(
        descriptors
            .iter()
            .filter(|d| d.polarity() == Polarity::Inverted)
            .map(|d| d.name().to_string()),
    )
}

// =============================================================================
// TESTS
// =============================================================================
