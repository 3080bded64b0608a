//! NUnit-shaped XML report generation.
//!
//! Pure: the renderer returns the document text; the caller persists it.

use std::fmt::Write as _;

use chrono::{SecondsFormat, Utc};

use crate::engine::{Accumulator, AssertionRecord};

/// File name the runner writes under the output directory.
pub const REPORT_FILE_NAME: &str = "validation-results.xml";

/// Namespace prefix carried by test-case fullnames.
pub const REPORT_NAMESPACE: &str = "WorkbookValidation";

/// Render the accumulated records as an NUnit-shaped XML document.
///
/// One `test-suite` fixture element per suite (first-seen order preserved),
/// one `test-case` per assertion. Failed cases carry a `failure` block with
/// the expected/actual values. Every free-form string is entity-escaped.
#[must_use]
pub fn render_nunit(acc: &Accumulator) -> String {
    let mut suites: Vec<(&str, Vec<&AssertionRecord>)> = Vec::new();
    for record in acc.records() {
        match suites.iter_mut().find(|(name, _)| *name == record.suite) {
            Some((_, records)) => records.push(record),
            None => suites.push((&record.suite, vec![record])),
        }
    }

    let result = overall_result(acc.failed());
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

    let mut out = String::new();
    let _ = writeln!(out, r#"<?xml version="1.0" encoding="utf-8"?>"#);
    let _ = writeln!(
        out,
        r#"<test-run id="workbook-validate" testcasecount="{total}" total="{total}" passed="{passed}" failed="{failed}" result="{result}" start-time="{time}">"#,
        total = acc.total(),
        passed = acc.passed(),
        failed = acc.failed(),
        result = result,
        time = xml_escape(&timestamp),
    );

    for (suite, records) in suites {
        let passed = records.iter().filter(|record| record.passed).count();
        let failed = records.len() - passed;
        let _ = writeln!(
            out,
            r#"  <test-suite type="TestFixture" name="{name}" fullname="{ns}.{name}" testcasecount="{total}" total="{total}" passed="{passed}" failed="{failed}" result="{result}">"#,
            name = xml_escape(suite),
            ns = REPORT_NAMESPACE,
            total = records.len(),
            passed = passed,
            failed = failed,
            result = overall_result(failed as u64),
        );
        for record in records {
            let case_result = if record.passed { "Passed" } else { "Failed" };
            let _ = write!(
                out,
                r#"    <test-case name="{name}" fullname="{ns}.{suite}.{name}" result="{result}" start-time="{time}""#,
                name = xml_escape(&record.name),
                ns = REPORT_NAMESPACE,
                suite = xml_escape(suite),
                result = case_result,
                time = xml_escape(&record.timestamp_rfc3339()),
            );
            if record.passed {
                let _ = writeln!(out, " />");
            } else {
                let _ = writeln!(out, ">");
                let _ = writeln!(out, "      <failure>");
                let _ = writeln!(
                    out,
                    "        <message>Expected: {expected}; Actual: {actual}</message>",
                    expected = xml_escape(&record.expected),
                    actual = xml_escape(&record.actual),
                );
                let _ = writeln!(out, "      </failure>");
                let _ = writeln!(out, "    </test-case>");
            }
        }
        let _ = writeln!(out, "  </test-suite>");
    }
    let _ = writeln!(out, "</test-run>");
    out
}

const fn overall_result(failed: u64) -> &'static str {
    if failed == 0 {
        "Passed"
    } else {
        "Failed"
    }
}

/// Escape the five XML reserved characters, for attributes and bodies alike.
#[must_use]
pub fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{render_nunit, xml_escape};
    use crate::engine::Accumulator;

    #[test]
    fn escapes_all_reserved_characters() {
        assert_eq!(
            xml_escape(r#"<a & "b" & 'c'>"#),
            "&lt;a &amp; &quot;b&quot; &amp; &apos;c&apos;&gt;"
        );
        assert_eq!(xml_escape("plain"), "plain");
    }

    #[test]
    fn report_round_trips_through_an_xml_parser() {
        let mut acc = Accumulator::new().quiet(true);
        acc.run_suite("Nasty <Suite> & Co", |acc| {
            acc.check(true, r#"check with "quotes""#, "x", "x");
            acc.check(false, "check with <angle> & 'apostrophe'", "<want>", "got & got");
        });

        let xml = render_nunit(&acc);
        let doc = roxmltree::Document::parse(&xml).expect("well-formed XML");
        let root = doc.root_element();
        assert_eq!(root.tag_name().name(), "test-run");
        assert_eq!(root.attribute("total"), Some("2"));
        assert_eq!(root.attribute("passed"), Some("1"));
        assert_eq!(root.attribute("failed"), Some("1"));
        assert_eq!(root.attribute("result"), Some("Failed"));

        let cases: Vec<_> = doc
            .descendants()
            .filter(|node| node.has_tag_name("test-case"))
            .collect();
        assert_eq!(cases.len(), 2);
        let failed = cases
            .iter()
            .find(|case| case.attribute("result") == Some("Failed"))
            .expect("failed case");
        let message = failed
            .descendants()
            .find(|node| node.has_tag_name("message"))
            .and_then(|node| node.text())
            .expect("failure message");
        assert_eq!(message, "Expected: <want>; Actual: got & got");
    }

    #[test]
    fn suites_keep_first_seen_order() {
        let mut acc = Accumulator::new().quiet(true);
        acc.run_suite("Beta", |acc| {
            acc.check(true, "b", "x", "x");
        });
        acc.run_suite("Alpha", |acc| {
            acc.check(true, "a", "x", "x");
        });

        let xml = render_nunit(&acc);
        let beta = xml.find(r#"name="Beta""#).expect("beta fixture");
        let alpha = xml.find(r#"name="Alpha""#).expect("alpha fixture");
        assert!(beta < alpha);
    }

    #[test]
    fn all_passing_run_reports_passed() {
        let mut acc = Accumulator::new().quiet(true);
        acc.run_suite("Suite", |acc| {
            acc.check(true, "a", "x", "x");
        });
        let xml = render_nunit(&acc);
        assert!(xml.contains(r#"result="Passed""#));
        assert!(!xml.contains("<failure>"));
    }
}
