//! Raw-text version banner checks and markdown content validation.
//!
//! These deliberately scan the serialized document text rather than the
//! parsed structure: the banner lives inside a markdown field, and a
//! formatting regression there is invisible to a structural walk.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::document::{self, ItemKind};
use crate::engine::Accumulator;

use super::{offender_list, SuiteInput};

/// `Workbook Version: vX.Y[.Z]` banner embedded in the workbook text.
fn banner_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"Workbook Version:\s*(v\d+\.\d+(?:\.\d+)*)").expect("banner regex")
    })
}

/// Dotted version following the changelog's "latest version" heading.
fn latest_version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)latest version.{0,80}?(v\d+\.\d+(?:\.\d+)*)")
            .expect("latest version regex")
    })
}

/// Dotted version following the changelog's "recent changes" heading.
fn recent_changes_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)recent changes.{0,80}?(v\d+\.\d+(?:\.\d+)*)")
            .expect("recent changes regex")
    })
}

fn first_capture<'t>(regex: &Regex, text: &'t str) -> Option<&'t str> {
    regex
        .captures(text)
        .and_then(|capture| capture.get(1))
        .map(|m| m.as_str())
}

pub(crate) fn version_consistency(input: &SuiteInput<'_>, acc: &mut Accumulator) {
    let banner = first_capture(banner_regex(), &input.workbook.raw);
    let latest = first_capture(latest_version_regex(), input.changelog);
    let recent = first_capture(recent_changes_regex(), input.changelog);

    acc.check(
        banner.is_some(),
        "Workbook version banner present",
        "Workbook Version: v<major>.<minor> banner",
        banner.unwrap_or("not found"),
    );
    acc.check(
        latest.is_some(),
        "Changelog latest version heading present",
        "latest version heading with dotted version",
        latest.unwrap_or("not found"),
    );
    acc.check(
        recent.is_some(),
        "Changelog recent changes version present",
        "recent changes heading with dotted version",
        recent.unwrap_or("not found"),
    );

    // Match checks only run when both sides were found.
    if let (Some(banner), Some(latest)) = (banner, latest) {
        acc.check(
            banner == latest,
            "Banner matches changelog latest version",
            latest,
            banner,
        );
    }
    if let (Some(banner), Some(recent)) = (banner, recent) {
        acc.check(
            banner == recent,
            "Banner matches recent changes version",
            recent,
            banner,
        );
    }
}

pub(crate) fn markdown_content(input: &SuiteInput<'_>, acc: &mut Accumulator) {
    let markdown_items: Vec<_> = input
        .items
        .iter()
        .filter(|entry| {
            document::item_type_code(entry.item) == Some(ItemKind::Markdown.code())
        })
        .collect();
    let total = markdown_items.len();

    let empty: Vec<&str> = markdown_items
        .iter()
        .filter(|entry| {
            !document::item_content(entry.item)
                .and_then(|content| content.get("json"))
                .and_then(Value::as_str)
                .is_some_and(|text| !text.trim().is_empty())
        })
        .map(|entry| document::item_name(entry.item).unwrap_or("<unnamed>"))
        .collect();
    acc.check(
        empty.is_empty(),
        "Markdown items carry text",
        format!("all {total} markdown items non-empty"),
        format!("empty: {}", offender_list(&empty)),
    );

    let has_banner = markdown_items.iter().any(|entry| {
        document::item_content(entry.item)
            .and_then(|content| content.get("json"))
            .and_then(Value::as_str)
            .is_some_and(|text| banner_regex().is_match(text))
    });
    acc.check(
        has_banner,
        "A markdown item carries the version banner",
        "banner inside a markdown field",
        if has_banner { "present" } else { "missing" },
    );
}

#[cfg(test)]
mod tests {
    use super::{banner_regex, first_capture, latest_version_regex, recent_changes_regex};

    #[test]
    fn banner_extraction() {
        let raw = r###"{"json":"## Cluster Health\n\nWorkbook Version: v1.12.3"}"###;
        assert_eq!(first_capture(banner_regex(), raw), Some("v1.12.3"));
        assert_eq!(first_capture(banner_regex(), "no banner"), None);
    }

    #[test]
    fn changelog_headings_capture_versions() {
        let changelog = "\
# Cluster Workbook

## Latest Version

v1.12.3

## Recent Changes (v1.12.3)

- fixed the updating tab
";
        assert_eq!(
            first_capture(latest_version_regex(), changelog),
            Some("v1.12.3")
        );
        assert_eq!(
            first_capture(recent_changes_regex(), changelog),
            Some("v1.12.3")
        );
    }

    #[test]
    fn heading_match_is_case_insensitive() {
        let changelog = "LATEST VERSION: v2.0";
        assert_eq!(first_capture(latest_version_regex(), changelog), Some("v2.0"));
        // The version must sit close to the heading.
        let far = format!("latest version\n{}\nv2.0", "x".repeat(200));
        assert_eq!(first_capture(latest_version_regex(), &far), None);
    }
}
