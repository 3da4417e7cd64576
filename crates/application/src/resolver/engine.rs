//! Variable resolution engine
//!
//! Thin orchestration over [`LayerSet`]: single lookups delegate directly,
//! batched lookups accumulate every miss so callers can report all gaps in
//! one pass.

use stencil_domain::{LayerSet, Resolution, ResolvedVariable};
use tracing::debug;

use crate::template::{ParseError, extract_variables};

/// Batched outcome of resolving a list of references.
#[derive(Debug, Clone, Default)]
pub struct ResolutionOutcome {
    /// Per-reference outcomes in template order, duplicates preserved.
    pub resolutions: Vec<Resolution>,

    /// Missing names in first-occurrence order, deduplicated.
    pub unresolved: Vec<String>,
}

impl ResolutionOutcome {
    /// Returns true if every reference resolved.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// The number of references that resolved.
    #[must_use]
    pub fn resolved_count(&self) -> usize {
        self.resolutions
            .iter()
            .filter(|resolution| resolution.is_resolved())
            .count()
    }

    /// The number of distinct missing names.
    #[must_use]
    pub fn unresolved_count(&self) -> usize {
        self.unresolved.len()
    }
}

/// The variable resolution engine.
///
/// Canonicalizes names to uppercase and consults layers in precedence
/// order; the first usable (non-empty) value wins. Absence is an outcome,
/// never an error.
#[derive(Debug, Clone, Default)]
pub struct VariableResolver {
    layers: LayerSet,
}

impl VariableResolver {
    /// Creates a resolver over the given layers.
    #[must_use]
    pub const fn new(layers: LayerSet) -> Self {
        Self { layers }
    }

    /// Creates a resolver with no layers; every lookup misses.
    #[must_use]
    pub const fn empty() -> Self {
        Self::new(LayerSet::new())
    }

    /// The layers this resolver consults.
    #[must_use]
    pub const fn layers(&self) -> &LayerSet {
        &self.layers
    }

    /// Replaces the layers.
    pub fn set_layers(&mut self, layers: LayerSet) {
        self.layers = layers;
    }

    /// Resolves a single reference.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<ResolvedVariable> {
        self.layers.resolve(name)
    }

    /// Resolves a single reference to just its value.
    #[must_use]
    pub fn resolve_value(&self, name: &str) -> Option<String> {
        self.layers.resolve_value(name)
    }

    /// Resolves every reference, accumulating all misses.
    #[must_use]
    pub fn resolve_all(&self, references: &[String]) -> ResolutionOutcome {
        let mut resolutions = Vec::with_capacity(references.len());
        let mut unresolved: Vec<String> = Vec::new();

        for reference in references {
            let resolved = self.layers.resolve(reference);
            if resolved.is_none() && !unresolved.iter().any(|seen| seen == reference) {
                unresolved.push(reference.clone());
            }
            resolutions.push(Resolution {
                reference: reference.clone(),
                resolved,
            });
        }

        debug!(
            total = references.len(),
            missing = unresolved.len(),
            "resolved template references"
        );

        ResolutionOutcome {
            resolutions,
            unresolved,
        }
    }

    /// Parses the input and returns the references with no usable value.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the input violates the grammar.
    pub fn find_unresolved(&self, input: &str) -> Result<Vec<String>, ParseError> {
        let references = extract_variables(input)?;
        Ok(self.resolve_all(&references).unresolved)
    }
}
