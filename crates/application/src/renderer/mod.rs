//! Template rendering pipeline
//!
//! Orchestrates the parser and resolver: enumerate references, require a
//! usable value for every one of them, and only then substitute. The
//! rendered text must come out as valid JSON; it is re-emitted in
//! normalized compact form.

mod report;

pub use report::{MASKED_VALUE, ReportRow, ResolutionReport};

use serde_json::Value;
use stencil_domain::template::{Expr, Statement, Template};
use stencil_domain::{
    ENVIRONMENT_LAYER, LayerSet, Resolution, SECRETS_LAYER, VARS_LAYER, ValueLayer, coerce_boolean,
};
use tracing::{debug, warn};

use crate::error::{ApplicationError, ApplicationResult};
use crate::resolver::VariableResolver;
use crate::template::parse;

/// A successfully rendered document.
#[derive(Debug, Clone)]
pub struct Rendered {
    /// Normalized (compact) JSON text of the output document.
    pub text: String,

    /// The parsed output document.
    pub document: Value,

    /// Per-reference outcomes in template order, duplicates preserved.
    pub resolutions: Vec<Resolution>,
}

impl Rendered {
    /// Builds the per-reference summary report for this rendering.
    #[must_use]
    pub fn report(&self) -> ResolutionReport {
        ResolutionReport::from_resolutions(&self.resolutions)
    }
}

/// Renders template text against the given layers.
///
/// The pipeline is all-or-nothing: a grammar violation, any unresolved
/// reference, or output that fails to parse as JSON each abort with no
/// partial result. Every unresolved name is reported, not just the first.
///
/// # Errors
///
/// [`ApplicationError::Parse`] for grammar violations,
/// [`ApplicationError::Unresolved`] listing every missing name,
/// [`ApplicationError::UnknownHelper`] for helpers without an
/// implementation, and [`ApplicationError::InvalidOutput`] when the
/// rendered text is not valid JSON.
pub fn render(input: &str, layers: &LayerSet) -> ApplicationResult<Rendered> {
    let template = parse(input)?;
    let references = template.substitution_references();
    debug!(count = references.len(), "extracted template references");

    let resolver = VariableResolver::new(layers.clone());
    let outcome = resolver.resolve_all(&references);
    if !outcome.is_complete() {
        for name in &outcome.unresolved {
            warn!(variable = %name, "no usable value in any layer");
        }
        return Err(ApplicationError::Unresolved {
            names: outcome.unresolved,
        });
    }

    let raw = evaluate(&template, &resolver)?;
    let document: Value = serde_json::from_str(&raw)?;
    let text = document.to_string();
    debug!(references = outcome.resolutions.len(), "rendered template");

    Ok(Rendered {
        text,
        document,
        resolutions: outcome.resolutions,
    })
}

/// Renders after building the standard layers from raw JSON inputs.
///
/// Each input is an optional JSON object (`{"NAME": "value", ...}`);
/// absent or empty inputs contribute an empty layer. Precedence is the
/// standard order: secrets, then vars, then environment.
///
/// # Errors
///
/// [`ApplicationError::Domain`] when an input is present but is not a JSON
/// object of scalar values, plus everything [`render`] can return.
pub fn render_with_json_layers(
    input: &str,
    raw_secrets: Option<&str>,
    raw_vars: Option<&str>,
    raw_environment: Option<&str>,
) -> ApplicationResult<Rendered> {
    let layers = LayerSet::from_layers(vec![
        layer_from_raw(SECRETS_LAYER, raw_secrets)?,
        layer_from_raw(VARS_LAYER, raw_vars)?,
        layer_from_raw(ENVIRONMENT_LAYER, raw_environment)?,
    ]);
    render(input, &layers)
}

fn layer_from_raw(name: &'static str, raw: Option<&str>) -> ApplicationResult<ValueLayer> {
    match raw {
        Some(text) if !text.is_empty() => Ok(ValueLayer::from_json_str(name, text)?),
        _ => Ok(ValueLayer::new(name)),
    }
}

fn evaluate(template: &Template, resolver: &VariableResolver) -> ApplicationResult<String> {
    let mut out = String::new();
    evaluate_statements(&template.statements, resolver, &mut out)?;
    Ok(out)
}

fn evaluate_statements(
    statements: &[Statement],
    resolver: &VariableResolver,
    out: &mut String,
) -> ApplicationResult<()> {
    for statement in statements {
        match statement {
            Statement::Literal(text) => out.push_str(text),
            Statement::Comment(_) => {}
            Statement::Substitution { path } => match resolver.resolve_value(path) {
                Some(value) => out.push_str(&value),
                // Top-level references were validated before evaluation;
                // only block-body references can reach this.
                None => {
                    return Err(ApplicationError::Unresolved {
                        names: vec![path.clone()],
                    });
                }
            },
            Statement::Helper { name, args } => {
                out.push_str(&apply_helper(name, args, resolver)?);
            }
            Statement::Block {
                path,
                inverted,
                body,
            } => {
                let value = resolver.resolve_value(path);
                let truthy = coerce_boolean(value.as_deref());
                if truthy != *inverted {
                    evaluate_statements(body, resolver, out)?;
                }
            }
        }
    }
    Ok(())
}

fn apply_helper(
    name: &str,
    args: &[Expr],
    resolver: &VariableResolver,
) -> ApplicationResult<String> {
    let values: Vec<String> = args
        .iter()
        .map(|arg| evaluate_expr(arg, resolver))
        .collect();

    match name {
        "default" => Ok(values
            .into_iter()
            .find(|value| !value.is_empty())
            .unwrap_or_default()),
        "upper" => Ok(values.first().map(|v| v.to_uppercase()).unwrap_or_default()),
        "lower" => Ok(values.first().map(|v| v.to_lowercase()).unwrap_or_default()),
        _ => Err(ApplicationError::UnknownHelper(name.to_string())),
    }
}

/// Helper arguments are values: an unresolved path argument evaluates to
/// the empty string so helpers like `default` can fall through it.
fn evaluate_expr(arg: &Expr, resolver: &VariableResolver) -> String {
    match arg {
        Expr::Path(path) => resolver.resolve_value(path).unwrap_or_default(),
        Expr::StringLiteral(text) | Expr::Number(text) => text.clone(),
        Expr::Boolean(flag) => flag.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn create_test_layers() -> LayerSet {
        LayerSet::standard(
            [("API_KEY", "sk-secret-123")],
            [("HOST", "localhost"), ("VERBOSE", "true")],
            [("PORT", "8080")],
        )
    }

    #[test]
    fn test_render_substitutes_and_normalizes() {
        let rendered = render(
            r#"{ "host": "{{host}}",   "port": "{{PORT}}" }"#,
            &create_test_layers(),
        )
        .expect("should render");

        assert_eq!(rendered.text, r#"{"host":"localhost","port":"8080"}"#);
        assert_eq!(rendered.document["host"], "localhost");
        assert_eq!(rendered.document["port"], "8080");
    }

    #[test]
    fn test_render_aborts_with_every_missing_name() {
        let err = render(
            r#"{"a": "{{host}}", "b": "{{gone}}", "c": "{{also_gone}}"}"#,
            &create_test_layers(),
        )
        .expect_err("should fail");

        match err {
            ApplicationError::Unresolved { names } => {
                assert_eq!(names, vec!["gone", "also_gone"]);
            }
            other => panic!("expected Unresolved, got {other:?}"),
        }
    }

    #[test]
    fn test_render_propagates_parse_errors() {
        let err = render(r#"{"a": "{{broken"}"#, &create_test_layers()).expect_err("should fail");
        assert!(matches!(err, ApplicationError::Parse(_)));
    }

    #[test]
    fn test_render_rejects_non_json_output() {
        let err = render("not json at all", &create_test_layers()).expect_err("should fail");
        assert!(matches!(err, ApplicationError::InvalidOutput(_)));
    }

    #[test]
    fn test_render_helper_default_uses_resolved_value() {
        let rendered = render(
            r#"{"host": "{{default HOST "fallback"}}"}"#,
            &create_test_layers(),
        )
        .expect("should render");
        assert_eq!(rendered.document["host"], "localhost");
    }

    #[test]
    fn test_render_helper_case_transforms() {
        let rendered = render(
            r#"{"up": "{{upper host}}", "down": "{{lower host}}"}"#,
            &create_test_layers(),
        )
        .expect("should render");
        assert_eq!(rendered.document["up"], "LOCALHOST");
        assert_eq!(rendered.document["down"], "localhost");
    }

    #[test]
    fn test_render_unknown_helper_fails() {
        let err = render(r#"{"x": "{{frobnicate host}}"}"#, &create_test_layers())
            .expect_err("should fail");
        assert!(matches!(err, ApplicationError::UnknownHelper(name) if name == "frobnicate"));
    }

    #[test]
    fn test_render_block_gated_by_boolean_literal() {
        let layers = create_test_layers();

        let rendered = render(
            r#"{"flags": [true{{#verbose}}, "extra-logging"{{/verbose}}]}"#,
            &layers,
        )
        .expect("should render");
        assert_eq!(rendered.text, r#"{"flags":[true,"extra-logging"]}"#);

        // An unresolved block path counts as false, not as a failure.
        let rendered = render(
            r#"{"flags": [true{{#undefined_flag}}, "never"{{/undefined_flag}}]}"#,
            &layers,
        )
        .expect("should render");
        assert_eq!(rendered.text, r#"{"flags":[true]}"#);
    }

    #[test]
    fn test_render_inverted_block() {
        let rendered = render(
            r#"{"mode": {{^undefined_flag}}"quiet"{{/undefined_flag}}}"#,
            &create_test_layers(),
        )
        .expect("should render");
        assert_eq!(rendered.document["mode"], "quiet");
    }

    #[test]
    fn test_render_block_body_misses_still_abort() {
        // References inside block bodies are resolved lazily, but a miss
        // is still a failure rather than partial output.
        let err = render(
            r#"{"x": "{{#verbose}}{{missing_inner}}{{/verbose}}"}"#,
            &create_test_layers(),
        )
        .expect_err("should fail");
        assert!(matches!(err, ApplicationError::Unresolved { names } if names == ["missing_inner"]));
    }

    #[test]
    fn test_render_comment_disappears() {
        let rendered = render(
            r#"{{! rendered by stencil }}{"host": "{{host}}"}"#,
            &create_test_layers(),
        )
        .expect("should render");
        assert_eq!(rendered.text, r#"{"host":"localhost"}"#);
    }

    #[test]
    fn test_render_duplicate_references_each_substituted() {
        let rendered = render(
            r#"{"primary": "{{host}}", "backup": "{{host}}"}"#,
            &create_test_layers(),
        )
        .expect("should render");

        assert_eq!(rendered.document["primary"], "localhost");
        assert_eq!(rendered.document["backup"], "localhost");
        assert_eq!(rendered.resolutions.len(), 2);
    }

    #[test]
    fn test_render_with_json_layers() {
        let rendered = render_with_json_layers(
            r#"{"key": "{{api_key}}", "host": "{{host}}"}"#,
            Some(r#"{"API_KEY": "sk-from-secrets"}"#),
            Some(r#"{"HOST": "vars-host", "API_KEY": "sk-from-vars"}"#),
            None,
        )
        .expect("should render");

        assert_eq!(rendered.document["key"], "sk-from-secrets");
        assert_eq!(rendered.document["host"], "vars-host");
    }

    #[test]
    fn test_render_with_json_layers_rejects_bad_input() {
        let err = render_with_json_layers(r#"{"x": "{{a}}"}"#, Some("[1, 2]"), None, None)
            .expect_err("should fail");
        assert!(matches!(err, ApplicationError::Domain(_)));
    }

    #[test]
    fn test_render_with_json_layers_treats_empty_as_absent() {
        let err = render_with_json_layers(r#"{"x": "{{a}}"}"#, Some(""), None, None)
            .expect_err("should fail on the reference, not the input");
        assert!(matches!(err, ApplicationError::Unresolved { .. }));
    }
}
