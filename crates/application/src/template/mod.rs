//! Template parsing
//!
//! Turns `{{ }}` template text into the owned AST defined by the domain
//! crate and extracts the referenced variable names.

mod parser;

pub use parser::{ParseError, extract_variables, has_variables, parse};
