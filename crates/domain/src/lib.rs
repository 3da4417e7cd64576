//! Stencil Domain - Core template and variable types
//!
//! This crate defines the domain model for Stencil template rendering.
//! All types here are pure Rust with no I/O dependencies.

pub mod coerce;
pub mod error;
pub mod layers;
pub mod template;

pub use coerce::{coerce_boolean, is_truthy_literal};
pub use error::{DomainError, DomainResult};
pub use layers::{
    ENVIRONMENT_LAYER, LayerSet, Resolution, ResolvedVariable, SECRETS_LAYER, VARS_LAYER,
    ValueLayer, canonical_key,
};
pub use template::{Expr, Statement, Template};
