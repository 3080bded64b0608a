//! Query-text suites: well-formedness and parameter reference resolution.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::engine::Accumulator;
use crate::extract::{self, QueryOrigin, UNNAMED};

use super::{offender_list, SuiteInput};

/// `{Param}` or `{Param:modifier}` placeholder inside query text.
fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)(?::[^{}]*)?\}").expect("placeholder regex")
    })
}

pub(crate) fn query_validation(input: &SuiteInput<'_>, acc: &mut Accumulator) {
    let total = input.queries.len();

    let empty: Vec<&str> = input
        .queries
        .iter()
        .filter(|record| record.query.trim().is_empty())
        .map(|record| record.name.as_str())
        .collect();
    acc.check(
        empty.is_empty(),
        "Queries are non-empty",
        format!("all {total} queries non-empty"),
        format!("empty: {}", offender_list(&empty)),
    );

    let unbalanced: Vec<&str> = input
        .queries
        .iter()
        .filter(|record| !quotes_balanced(&record.query))
        .map(|record| record.name.as_str())
        .collect();
    acc.check(
        unbalanced.is_empty(),
        "Query quoting is balanced",
        format!("all {total} queries balanced"),
        format!("unbalanced: {}", offender_list(&unbalanced)),
    );
}

pub(crate) fn query_robustness(input: &SuiteInput<'_>, acc: &mut Accumulator) {
    let declared: BTreeSet<String> =
        extract::declared_parameter_names(input.items).into_iter().collect();

    let mut orphans: BTreeSet<String> = BTreeSet::new();
    for record in input.queries {
        for capture in placeholder_regex().captures_iter(&record.query) {
            let name = &capture[1];
            if !declared.contains(name) {
                orphans.insert(name.to_string());
            }
        }
    }
    let orphans: Vec<String> = orphans.into_iter().collect();
    acc.check(
        orphans.is_empty(),
        "Parameter references resolve to declared parameters",
        "no orphaned parameter references",
        format!("orphaned: {}", offender_list(&orphans)),
    );
}

pub(crate) fn parameter_queries(input: &SuiteInput<'_>, acc: &mut Accumulator) {
    let parameter_queries: Vec<_> = input
        .queries
        .iter()
        .filter(|record| record.origin == QueryOrigin::Parameter)
        .collect();
    let total = parameter_queries.len();

    let empty: Vec<&str> = parameter_queries
        .iter()
        .filter(|record| record.query.trim().is_empty())
        .map(|record| record.name.as_str())
        .collect();
    acc.check(
        empty.is_empty(),
        "Query-backed parameters have query text",
        format!("all {total} parameter queries non-empty"),
        format!("empty: {}", offender_list(&empty)),
    );

    let unnamed = parameter_queries
        .iter()
        .filter(|record| record.name == UNNAMED)
        .count();
    acc.check(
        unnamed == 0,
        "Query-backed parameters are named",
        "every parameter query named or labelled",
        format!("{unnamed} unnamed"),
    );
}

/// Both quote kinds must pair up, ignoring backslash-escaped quotes.
fn quotes_balanced(query: &str) -> bool {
    let mut double = 0usize;
    let mut single = 0usize;
    let mut escaped = false;
    for ch in query.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '"' => double += 1,
            '\'' => single += 1,
            _ => {}
        }
    }
    double % 2 == 0 && single % 2 == 0
}

#[cfg(test)]
mod tests {
    use super::{placeholder_regex, quotes_balanced};

    #[test]
    fn balanced_quotes() {
        assert!(quotes_balanced("Heartbeat | where Computer == 'web-01'"));
        assert!(quotes_balanced(r#"print "a", 'b'"#));
        assert!(!quotes_balanced("print 'unterminated"));
        // Escaped quotes do not count toward the pairing.
        assert!(quotes_balanced(r#"print "she said \"hi\"""#));
    }

    #[test]
    fn placeholders_capture_base_name() {
        let names: Vec<&str> = placeholder_regex()
            .captures_iter("T | where Site in ({ClusterFilter}) | project {TimeRange:start}")
            .map(|c| c.get(1).unwrap().as_str())
            .collect();
        assert_eq!(names, ["ClusterFilter", "TimeRange"]);
    }

    #[test]
    fn json_braces_are_not_placeholders() {
        assert!(placeholder_regex()
            .captures_iter(r#"datatable(x: string)["{}"] | extend y = "{not a param"#)
            .next()
            .is_none());
    }
}
