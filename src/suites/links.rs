//! Tab navigation and link safety suites.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::document::{self, ItemKind};
use crate::engine::Accumulator;

use super::limits::{CLUSTERS_UPDATING_LINK_TEXT, CLUSTERS_UPDATING_RULE_ENABLED};
use super::{offender_list, SuiteInput};

/// A subscription GUID following a `subscriptions` path separator, in either
/// raw or percent-encoded form.
fn subscription_guid_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)subscriptions(?:/|%2f)[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}",
        )
        .expect("subscription guid regex")
    })
}

/// Portal deep-link occurrences in the raw document text.
fn portal_link_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"https://portal\.azure\.com[^"\\\s]*"#).expect("portal link regex")
    })
}

pub(crate) fn tab_navigation(input: &SuiteInput<'_>, acc: &mut Accumulator) {
    let tab_groups: Vec<_> = input
        .items
        .iter()
        .filter(|entry| {
            entry.depth == 0
                && document::item_type_code(entry.item) == Some(ItemKind::Group.code())
        })
        .collect();
    let total = tab_groups.len();

    let missing_visibility: Vec<&str> = tab_groups
        .iter()
        .filter(|entry| entry.item.get("conditionalVisibility").is_none())
        .map(|entry| document::item_name(entry.item).unwrap_or("<unnamed>"))
        .collect();
    acc.check(
        missing_visibility.is_empty(),
        "Top-level tab groups declare conditionalVisibility",
        format!("all {total} tab groups gated"),
        format!("ungated: {}", offender_list(&missing_visibility)),
    );

    let selector_values: Vec<&str> = tab_groups
        .iter()
        .filter_map(|entry| {
            entry
                .item
                .get("conditionalVisibility")
                .and_then(|visibility| visibility.get("value"))
                .and_then(Value::as_str)
        })
        .collect();
    let distinct: BTreeSet<&str> = selector_values.iter().copied().collect();
    acc.check(
        distinct.len() == selector_values.len(),
        "Tab selector values are pairwise distinct",
        format!("{} distinct selector values", selector_values.len()),
        format!("{} distinct of {}", distinct.len(), selector_values.len()),
    );

    let has_link_set = input.items.iter().any(|entry| {
        document::item_type_code(entry.item) == Some(ItemKind::LinkSet.code())
            && document::item_content(entry.item)
                .and_then(|content| content.get("links"))
                .and_then(Value::as_array)
                .is_some_and(|links| !links.is_empty())
    });
    acc.check(
        has_link_set,
        "A link-set item provides the tab links",
        "link-set with at least one link",
        if has_link_set { "present" } else { "missing" },
    );
}

pub(crate) fn portal_link_safety(input: &SuiteInput<'_>, acc: &mut Accumulator) {
    let raw = &input.workbook.raw;

    let guid_hits: Vec<String> = subscription_guid_regex()
        .find_iter(raw)
        .map(|hit| hit.as_str().to_string())
        .collect();
    acc.check(
        guid_hits.is_empty(),
        "No raw subscription identifiers are embedded",
        "no subscription GUIDs in document text",
        format!("found: {}", offender_list(&guid_hits)),
    );

    let unencoded: Vec<String> = portal_link_regex()
        .find_iter(raw)
        .map(|hit| hit.as_str())
        .filter(|link| link.contains("/subscriptions/"))
        .map(ToString::to_string)
        .collect();
    acc.check(
        unencoded.is_empty(),
        "Portal deep-links URL-encode resource-id separators",
        "resource ids embedded with %2F separators",
        format!("raw separators in: {}", offender_list(&unencoded)),
    );
}

/// One-off rule: the link that jumps to the updating-clusters tab must keep
/// its label and point at a real tab group.
pub(crate) fn clusters_updating_link(input: &SuiteInput<'_>, acc: &mut Accumulator) {
    if !CLUSTERS_UPDATING_RULE_ENABLED {
        return;
    }

    let mut target: Option<String> = None;
    for entry in input.items {
        if document::item_type_code(entry.item) != Some(ItemKind::LinkSet.code()) {
            continue;
        }
        let Some(links) = document::item_content(entry.item)
            .and_then(|content| content.get("links"))
            .and_then(Value::as_array)
        else {
            continue;
        };
        for link in links {
            let label = link.get("linkLabel").and_then(Value::as_str);
            if label == Some(CLUSTERS_UPDATING_LINK_TEXT) {
                target = Some(
                    link.get("subTarget")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                );
            }
        }
    }

    acc.check(
        target.is_some(),
        "Updating-clusters tab link is present",
        format!("link labelled '{CLUSTERS_UPDATING_LINK_TEXT}'"),
        if target.is_some() { "present" } else { "missing" },
    );

    let Some(target) = target else {
        return;
    };

    let group_names: BTreeSet<&str> = input
        .items
        .iter()
        .filter(|entry| document::item_type_code(entry.item) == Some(ItemKind::Group.code()))
        .filter_map(|entry| document::item_name(entry.item))
        .collect();
    let resolves = group_names.contains(target.as_str());
    acc.check(
        resolves,
        "Updating-clusters tab link targets a defined tab group",
        "subTarget names an existing group",
        if resolves {
            format!("targets '{target}'")
        } else {
            format!("no group named '{target}'")
        },
    );
}
