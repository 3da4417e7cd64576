//! Boolean coercion for configuration literals

/// Returns `true` only for the exact literals `"true"`, `"True"`, and
/// `"TRUE"`.
///
/// This is deliberately not a general boolean parser: `"1"`, `"yes"`,
/// `"on"`, and every other spelling are `false`, as are `None` and the
/// empty string. Callers depend on the narrow literal set staying fixed.
#[must_use]
pub fn coerce_boolean(value: Option<&str>) -> bool {
    matches!(value, Some("true" | "True" | "TRUE"))
}

/// Convenience wrapper for call sites that already hold a `&str`.
#[must_use]
pub fn is_truthy_literal(value: &str) -> bool {
    coerce_boolean(Some(value))
}
