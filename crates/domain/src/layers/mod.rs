//! Value layers and precedence-ordered resolution

mod layer;
mod resolution;

pub use layer::{ValueLayer, canonical_key};
pub use resolution::{
    ENVIRONMENT_LAYER, LayerSet, Resolution, ResolvedVariable, SECRETS_LAYER, VARS_LAYER,
};
