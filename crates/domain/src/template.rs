//! Owned grammar model for `{{ }}` substitution templates
//!
//! The parser in the application layer produces these nodes; nothing here
//! depends on any third-party templating engine.

/// An expression appearing inside a `{{ }}` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A path reference such as `name` or `outer.inner`, kept in its
    /// dotted form exactly as written.
    Path(String),

    /// A double-quoted string literal, without the quotes.
    StringLiteral(String),

    /// A numeric literal, kept as its original lexeme.
    Number(String),

    /// A `true`/`false` literal.
    Boolean(bool),
}

impl Expr {
    /// The raw text of this expression as it appeared in the template:
    /// the dotted form for paths, the lexeme for literals.
    #[must_use]
    pub fn original(&self) -> String {
        match self {
            Self::Path(path) | Self::StringLiteral(path) | Self::Number(path) => path.clone(),
            Self::Boolean(value) => value.to_string(),
        }
    }

    /// Returns the dotted path string if this expression is a path.
    #[must_use]
    pub fn as_path(&self) -> Option<&str> {
        match self {
            Self::Path(path) => Some(path),
            _ => None,
        }
    }
}

/// One node of a parsed template body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// Raw text copied through untouched.
    Literal(String),

    /// A bare `{{name}}` substitution.
    Substitution {
        /// The referenced path, in dotted form.
        path: String,
    },

    /// A `{{helper arg ...}}` invocation. The first argument is the
    /// variable of interest; the rest parameterize the helper.
    Helper {
        /// The helper name.
        name: String,
        /// Positional arguments, at least one.
        args: Vec<Expr>,
    },

    /// A `{{#name}} ... {{/name}}` section. The inverted form `{{^name}}`
    /// renders its body when the section value is falsy instead.
    Block {
        /// The section path, in dotted form.
        path: String,
        /// Whether this is an inverted (`^`) section.
        inverted: bool,
        /// Nested statements between open and close.
        body: Vec<Statement>,
    },

    /// A `{{! ... }}` comment, never rendered.
    Comment(String),
}

/// A parsed template: top-level statements in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Template {
    /// Top-level statements in document order.
    pub statements: Vec<Statement>,
}

impl Template {
    /// Wraps a list of statements.
    #[must_use]
    pub const fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    /// Names referenced by top-level substitution and helper statements,
    /// in document order, duplicates preserved, no case normalization.
    ///
    /// A helper invocation contributes its first argument rather than the
    /// helper name, since that argument is the variable of interest.
    /// Statements inside block bodies are not enumerated.
    #[must_use]
    pub fn substitution_references(&self) -> Vec<String> {
        self.statements
            .iter()
            .filter_map(|statement| match statement {
                Statement::Substitution { path } => Some(path.clone()),
                Statement::Helper { args, .. } => args.first().map(Expr::original),
                Statement::Literal(_) | Statement::Block { .. } | Statement::Comment(_) => None,
            })
            .collect()
    }

    /// Returns true if the template contains no statements at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}
