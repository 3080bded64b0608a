//! The validation suite battery.
//!
//! Each suite is a self-contained set of checks over the already-extracted
//! views (flattened items, queries, charts) and the raw document texts. No
//! suite depends on another's outcome; they run strictly sequentially in the
//! order declared in [`SUITES`], and the runner isolates each one so that a
//! complete report is always produced.

pub mod charts;
pub mod grids;
pub mod limits;
pub mod links;
pub mod parameters;
pub mod queries;
pub mod resources;
pub mod structure;
pub mod versioning;

use crate::document::WorkbookDocument;
use crate::engine::Accumulator;
use crate::extract::{ChartRecord, QueryRecord};
use crate::flatten::FlatItem;

/// Everything a suite body may look at. Immutable for the whole run.
#[derive(Debug, Clone, Copy)]
pub struct SuiteInput<'a> {
    pub workbook: &'a WorkbookDocument,
    pub changelog: &'a str,
    pub items: &'a [FlatItem<'a>],
    pub queries: &'a [QueryRecord<'a>],
    pub charts: &'a [ChartRecord<'a>],
}

type SuiteFn = fn(&SuiteInput<'_>, &mut Accumulator);

/// The battery, in its fixed execution order.
pub const SUITES: &[(&str, SuiteFn)] = &[
    ("JSON Structure Validation", structure::json_structure),
    ("Item Structure Validation", structure::item_structure),
    ("KQL Query Validation", queries::query_validation),
    ("KQL Query Robustness", queries::query_robustness),
    ("Parameter Validation", parameters::parameter_validation),
    ("Visualization Validation", charts::visualization_validation),
    ("Chart Configuration Validation", charts::chart_configuration),
    ("Chart Sort Order", charts::chart_sort_order),
    ("Grid Settings Validation", grids::grid_settings),
    ("Grid Link Formatters", grids::grid_link_formatters),
    ("Resource Scoping", resources::resource_scoping),
    ("Tab Navigation", links::tab_navigation),
    ("Portal Link Safety", links::portal_link_safety),
    ("Version Consistency", versioning::version_consistency),
    ("Document Size", structure::document_size),
    ("Regression Guards", structure::regression_guards),
    ("Clusters Updating Link Rule", links::clusters_updating_link),
    ("Chart Index 24 Fix", charts::chart_index_24),
    ("Markdown Content Validation", versioning::markdown_content),
    ("Parameter Query Validation", queries::parameter_queries),
];

/// Run every suite against the input, in declared order.
pub fn run_all(input: &SuiteInput<'_>, acc: &mut Accumulator) {
    for (name, body) in SUITES {
        acc.run_suite(name, |acc| body(input, acc));
    }
}

/// Render a short, comma-separated offender list for actual-value messages.
pub(crate) fn offender_list<S: AsRef<str>>(offenders: &[S]) -> String {
    const SHOWN: usize = 8;
    if offenders.is_empty() {
        return "none".to_string();
    }
    let shown: Vec<&str> = offenders.iter().take(SHOWN).map(AsRef::as_ref).collect();
    let hidden = offenders.len().saturating_sub(SHOWN);
    let mut out = shown.join(", ");
    if hidden > 0 {
        out.push_str(&format!(" (+{hidden} more)"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::offender_list;

    #[test]
    fn offender_list_truncates() {
        assert_eq!(offender_list::<&str>(&[]), "none");
        assert_eq!(offender_list(&["a", "b"]), "a, b");
        let many: Vec<String> = (0..12).map(|i| format!("q{i}")).collect();
        let rendered = offender_list(&many);
        assert!(rendered.starts_with("q0, "));
        assert!(rendered.ends_with("(+4 more)"));
    }
}
