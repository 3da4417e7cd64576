//! Per-reference resolution summary
//!
//! The in-memory equivalent of the job-summary table the surrounding
//! automation prints: one row per reference, in template order, with
//! secret values masked.

use stencil_domain::Resolution;

/// Placeholder shown instead of values that came from the secrets layer.
pub const MASKED_VALUE: &str = "***";

/// One row of the resolution report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    /// The reference exactly as written in the template.
    pub reference: String,

    /// Whether a usable value was found.
    pub replaced: bool,

    /// The displayed value; secrets are masked, misses are empty.
    pub value: String,
}

/// Per-reference resolution summary, in template order.
///
/// Duplicate references each get their own row, since each occurrence is
/// independently checked and reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionReport {
    rows: Vec<ReportRow>,
}

impl ResolutionReport {
    /// Builds a report from per-reference outcomes.
    #[must_use]
    pub fn from_resolutions(resolutions: &[Resolution]) -> Self {
        let rows = resolutions
            .iter()
            .map(|resolution| match &resolution.resolved {
                Some(resolved) => ReportRow {
                    reference: resolution.reference.clone(),
                    replaced: true,
                    value: if resolved.is_secret() {
                        MASKED_VALUE.to_string()
                    } else {
                        resolved.value.clone()
                    },
                },
                None => ReportRow {
                    reference: resolution.reference.clone(),
                    replaced: false,
                    value: String::new(),
                },
            })
            .collect();

        Self { rows }
    }

    /// The rows in template order.
    #[must_use]
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// The number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the report has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns true if every row was replaced.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.rows.iter().all(|row| row.replaced)
    }

    /// Renders the report as a GitHub-flavored Markdown table.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::from(
            "| :hammer_and_wrench: Config :wrench: | :white_check_mark: Replaced :x: | Value |\n",
        );
        out.push_str("| --- | :---: | --- |\n");
        for row in &self.rows {
            let mark = if row.replaced {
                ":white_check_mark:"
            } else {
                ":x:"
            };
            out.push_str(&format!("| {} | {} | {} |\n", row.reference, mark, row.value));
        }
        out
    }
}
