//! Condensed Markdown summary of a persisted report.
//!
//! A downstream transformer over the report XML only: it never re-reads the
//! workbook, and it tolerates the report not existing yet.

use std::fmt::Write as _;
use std::path::Path;

use crate::engine::{FAIL_GLYPH, PASS_GLYPH};
use crate::error::{Error, Result};
use crate::report::REPORT_NAMESPACE;

/// Read a report file and render its Markdown summary.
///
/// Returns `Ok(None)` when the file does not exist; that is the caller's
/// cue to warn and exit cleanly rather than fail.
pub fn summarize_file(path: &Path) -> Result<Option<String>> {
    let xml = match std::fs::read_to_string(path) {
        Ok(xml) => xml,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    render_summary(&xml).map(Some)
}

/// Render the Markdown table for a report document.
pub fn render_summary(xml: &str) -> Result<String> {
    let doc = roxmltree::Document::parse(xml)
        .map_err(|err| Error::report(format!("malformed report XML: {err}")))?;
    let root = doc.root_element();
    if root.tag_name().name() != "test-run" {
        return Err(Error::report(format!(
            "unexpected root element <{}>",
            root.tag_name().name()
        )));
    }

    let total = root.attribute("total").unwrap_or("0");
    let passed = root.attribute("passed").unwrap_or("0");
    let failed = root.attribute("failed").unwrap_or("0");

    let mut out = String::new();
    let _ = writeln!(out, "# Workbook Validation Summary");
    let _ = writeln!(out);
    let _ = writeln!(out, "**{passed} passed / {failed} failed ({total} total)**");
    let _ = writeln!(out);
    let _ = writeln!(out, "| Suite | Check | Result |");
    let _ = writeln!(out, "|---|---|---|");

    for suite in doc
        .descendants()
        .filter(|node| node.has_tag_name("test-suite"))
    {
        let suite_name = suite.attribute("name").unwrap_or("");
        for case in suite
            .descendants()
            .filter(|node| node.has_tag_name("test-case"))
        {
            let case_name = case.attribute("name").unwrap_or("");
            let display = strip_prefixes(case_name, suite_name);
            let glyph = if case.attribute("result") == Some("Passed") {
                PASS_GLYPH
            } else {
                FAIL_GLYPH
            };
            let _ = writeln!(out, "| {suite_name} | {display} | {glyph} |");
        }
    }
    Ok(out)
}

/// Drop the namespace and suite-name prefixes from a case name.
fn strip_prefixes<'a>(name: &'a str, suite: &str) -> &'a str {
    let name = name
        .strip_prefix(REPORT_NAMESPACE)
        .and_then(|rest| rest.strip_prefix('.'))
        .unwrap_or(name);
    name.strip_prefix(suite)
        .and_then(|rest| rest.strip_prefix('.'))
        .unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::{render_summary, strip_prefixes, summarize_file};
    use crate::engine::Accumulator;
    use crate::report::render_nunit;

    #[test]
    fn strips_namespace_and_suite_prefixes() {
        assert_eq!(
            strip_prefixes("WorkbookValidation.Suite.the check", "Suite"),
            "the check"
        );
        assert_eq!(strip_prefixes("Suite.the check", "Suite"), "the check");
        assert_eq!(strip_prefixes("the check", "Suite"), "the check");
        // Suite name appearing mid-string is untouched.
        assert_eq!(strip_prefixes("check of Suite", "Suite"), "check of Suite");
    }

    #[test]
    fn summary_table_mirrors_the_report() {
        let mut acc = Accumulator::new().quiet(true);
        acc.run_suite("Structure", |acc| {
            acc.check(true, "has items", "x", "x");
            acc.check(false, "has version", "x", "y");
        });
        let xml = render_nunit(&acc);

        let summary = render_summary(&xml).expect("summary");
        assert!(summary.contains("**1 passed / 1 failed (2 total)**"));
        assert!(summary.contains("| Structure | has items | ✓ |"));
        assert!(summary.contains("| Structure | has version | ✗ |"));
    }

    #[test]
    fn missing_report_is_not_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let absent = dir.path().join("nope.xml");
        let result = summarize_file(&absent).expect("clean result");
        assert!(result.is_none());
    }

    #[test]
    fn malformed_report_is_an_error() {
        assert!(render_summary("not xml at all").is_err());
        assert!(render_summary("<wrong-root />").is_err());
    }
}
