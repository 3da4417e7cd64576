//! Variable resolution
//!
//! Resolves extracted references against precedence-ordered value layers.

mod engine;

pub use engine::{ResolutionOutcome, VariableResolver};
