//! Parser for the `{{ }}` substitution grammar
//!
//! A hand-rolled scanner: literal text runs until the next `{{`, expression
//! content runs until the matching `}}`. Inside an expression, a leading
//! `!` marks a comment, `#`/`^` open a (possibly inverted) block, `/`
//! closes one, and anything else is a path or a helper invocation.

use stencil_domain::template::{Expr, Statement, Template};
use thiserror::Error;

/// Errors raised when template text violates the substitution grammar.
///
/// Parsing is all-or-nothing: any of these aborts the parse with no
/// partial result. Offsets are byte positions of the offending `{{`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A `{{` was opened but never closed with `}}`.
    #[error("unclosed expression starting at byte {offset}")]
    UnclosedExpression {
        /// Byte position of the opening `{{`.
        offset: usize,
    },

    /// A `{{ }}` pair with nothing inside it.
    #[error("empty expression at byte {offset}")]
    EmptyExpression {
        /// Byte position of the opening `{{`.
        offset: usize,
    },

    /// A `{{#name}}` block that reaches end of input without `{{/name}}`.
    #[error("unclosed block {name:?} opened at byte {offset}")]
    UnclosedBlock {
        /// The block path as written.
        name: String,
        /// Byte position of the block-opening `{{`.
        offset: usize,
    },

    /// A `{{/name}}` close without a matching open.
    #[error("unexpected block close {name:?} at byte {offset}")]
    UnexpectedBlockClose {
        /// The name in the close tag.
        name: String,
        /// Byte position of the closing `{{`.
        offset: usize,
    },

    /// A block close naming a different block than the one open.
    #[error("block {open:?} closed as {found:?} at byte {offset}")]
    MismatchedBlockClose {
        /// The block currently open.
        open: String,
        /// The name found in the close tag.
        found: String,
        /// Byte position of the closing `{{`.
        offset: usize,
    },

    /// An expression that cannot be read as a path or helper invocation.
    #[error("malformed expression at byte {offset}: {message}")]
    MalformedExpression {
        /// Byte position of the opening `{{`.
        offset: usize,
        /// What made the expression unreadable.
        message: String,
    },
}

/// Parses template text into an owned AST.
///
/// # Errors
///
/// Returns a [`ParseError`] when the text violates the grammar; no partial
/// template is produced.
pub fn parse(input: &str) -> Result<Template, ParseError> {
    let mut parser = Parser { input, pos: 0 };
    let statements = parser.statements(None)?;
    Ok(Template::new(statements))
}

/// Extracts the referenced variable names from template text.
///
/// References appear in document order with duplicates preserved and no
/// case normalization. A helper invocation contributes its first argument;
/// blocks, comments, and literal text contribute nothing.
///
/// # Errors
///
/// Returns a [`ParseError`] when the text violates the grammar; no partial
/// extraction is attempted.
pub fn extract_variables(input: &str) -> Result<Vec<String>, ParseError> {
    Ok(parse(input)?.substitution_references())
}

/// Returns true if the input contains any `{{ }}` expression candidates.
#[must_use]
pub fn has_variables(input: &str) -> bool {
    input.contains("{{") && input.contains("}}")
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    /// Parses statements until end of input, or until the close tag of
    /// `open_block` when one is given.
    fn statements(
        &mut self,
        open_block: Option<(&'a str, usize)>,
    ) -> Result<Vec<Statement>, ParseError> {
        let input = self.input;
        let mut out = Vec::new();

        loop {
            let Some(rel) = input[self.pos..].find("{{") else {
                if let Some((name, offset)) = open_block {
                    return Err(ParseError::UnclosedBlock {
                        name: name.to_string(),
                        offset,
                    });
                }
                if self.pos < input.len() {
                    out.push(Statement::Literal(input[self.pos..].to_string()));
                    self.pos = input.len();
                }
                return Ok(out);
            };

            let open = self.pos + rel;
            if open > self.pos {
                out.push(Statement::Literal(input[self.pos..open].to_string()));
            }

            let inner_start = open + 2;
            let close = inner_start
                + input[inner_start..]
                    .find("}}")
                    .ok_or(ParseError::UnclosedExpression { offset: open })?;
            self.pos = close + 2;

            let trimmed = input[inner_start..close].trim();
            if trimmed.is_empty() {
                return Err(ParseError::EmptyExpression { offset: open });
            }

            if let Some(comment) = trimmed.strip_prefix('!') {
                out.push(Statement::Comment(comment.trim().to_string()));
                continue;
            }

            if let Some(rest) = trimmed.strip_prefix('/') {
                let name = rest.trim();
                return match open_block {
                    Some((open_name, _)) if open_name == name => Ok(out),
                    Some((open_name, _)) => Err(ParseError::MismatchedBlockClose {
                        open: open_name.to_string(),
                        found: name.to_string(),
                        offset: open,
                    }),
                    None => Err(ParseError::UnexpectedBlockClose {
                        name: name.to_string(),
                        offset: open,
                    }),
                };
            }

            let (inverted, block_path) = match trimmed.strip_prefix('#') {
                Some(rest) => (false, Some(rest)),
                None => (true, trimmed.strip_prefix('^')),
            };
            if let Some(rest) = block_path {
                let name = rest.trim();
                if !is_path_word(name) {
                    return Err(ParseError::MalformedExpression {
                        offset: open,
                        message: "block open takes a single path".to_string(),
                    });
                }
                let body = self.statements(Some((name, open)))?;
                out.push(Statement::Block {
                    path: name.to_string(),
                    inverted,
                    body,
                });
                continue;
            }

            out.push(expression(trimmed, open)?);
        }
    }
}

/// Reads a trimmed, non-empty expression body as a substitution or helper.
fn expression(trimmed: &str, offset: usize) -> Result<Statement, ParseError> {
    let exprs = tokens(trimmed, offset)?;
    match exprs.split_first() {
        None => Err(ParseError::EmptyExpression { offset }),
        Some((Expr::Path(path), [])) => Ok(Statement::Substitution { path: path.clone() }),
        Some((_, [])) => Err(ParseError::MalformedExpression {
            offset,
            message: "substitution requires a path".to_string(),
        }),
        Some((Expr::Path(name), args)) => Ok(Statement::Helper {
            name: name.clone(),
            args: args.to_vec(),
        }),
        Some((_, _)) => Err(ParseError::MalformedExpression {
            offset,
            message: "helper name must be a path".to_string(),
        }),
    }
}

/// Lexes an expression body into whitespace-separated expressions, with
/// double-quoted strings kept whole.
fn tokens(raw: &str, offset: usize) -> Result<Vec<Expr>, ParseError> {
    let mut exprs = Vec::new();
    let mut chars = raw.chars().peekable();

    while let Some(&ch) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
        } else if ch == '"' {
            chars.next();
            let mut literal = String::new();
            let mut closed = false;
            for c in chars.by_ref() {
                if c == '"' {
                    closed = true;
                    break;
                }
                literal.push(c);
            }
            if !closed {
                return Err(ParseError::MalformedExpression {
                    offset,
                    message: "unterminated string literal".to_string(),
                });
            }
            exprs.push(Expr::StringLiteral(literal));
        } else {
            let mut word = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                word.push(c);
                chars.next();
            }
            exprs.push(classify(word, offset)?);
        }
    }

    Ok(exprs)
}

fn classify(word: String, offset: usize) -> Result<Expr, ParseError> {
    if word == "true" {
        return Ok(Expr::Boolean(true));
    }
    if word == "false" {
        return Ok(Expr::Boolean(false));
    }
    let starts_numeric = word
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || c == '-');
    if starts_numeric && word.parse::<f64>().is_ok() {
        return Ok(Expr::Number(word));
    }
    if is_path_word(&word) {
        return Ok(Expr::Path(word));
    }
    Err(ParseError::MalformedExpression {
        offset,
        message: format!("invalid token {word:?}"),
    })
}

fn is_path_word(word: &str) -> bool {
    !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '$'))
}
