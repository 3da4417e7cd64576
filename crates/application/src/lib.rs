//! Stencil Application - parsing, resolution, and rendering engines
//!
//! This crate turns template text into a rendered configuration document:
//! parse the `{{ }}` grammar into an owned AST, resolve every referenced
//! variable against precedence-ordered value layers, and substitute only
//! when every reference has a usable value.
//!
//! # Usage
//!
//! ```
//! use stencil_application::renderer::render;
//! use stencil_domain::LayerSet;
//!
//! let layers = LayerSet::standard(
//!     [("API_KEY", "sk-123")],
//!     [("HOST", "localhost")],
//!     [],
//! );
//!
//! let rendered = render(r#"{"host": "{{host}}", "key": "{{api_key}}"}"#, &layers)?;
//! assert_eq!(rendered.text, r#"{"host":"localhost","key":"sk-123"}"#);
//! # Ok::<(), stencil_application::ApplicationError>(())
//! ```

pub mod error;
pub mod renderer;
pub mod resolver;
pub mod template;

pub use error::{ApplicationError, ApplicationResult};
pub use renderer::{Rendered, ResolutionReport, render, render_with_json_layers};
pub use resolver::{ResolutionOutcome, VariableResolver};
pub use template::{ParseError, extract_variables, has_variables, parse};
