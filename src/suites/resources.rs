//! Resource scoping suites: cross-component placeholders and resource types.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::document;
use crate::engine::Accumulator;

use super::limits::{REQUIRED_RESOURCE_TOKEN, VALID_RESOURCE_TYPES};
use super::{offender_list, SuiteInput};

pub(crate) fn resource_scoping(input: &SuiteInput<'_>, acc: &mut Accumulator) {
    let mut literal_resources: Vec<String> = Vec::new();
    let mut entries = 0usize;
    for entry in input.items {
        let Some(resources) = document::item_content(entry.item)
            .and_then(|content| content.get("crossComponentResources"))
            .and_then(Value::as_array)
        else {
            continue;
        };
        for resource in resources {
            let Some(resource) = resource.as_str() else {
                continue;
            };
            entries += 1;
            if !resource.contains(REQUIRED_RESOURCE_TOKEN) {
                literal_resources.push(resource.to_string());
            }
        }
    }
    acc.check(
        literal_resources.is_empty(),
        "Cross-component resources carry the subscription placeholder",
        format!("all {entries} entries contain {REQUIRED_RESOURCE_TOKEN}"),
        format!("literal entries: {}", offender_list(&literal_resources)),
    );

    let mut unknown_types: BTreeSet<String> = BTreeSet::new();
    for entry in input.items {
        let Some(resource_type) = document::item_content(entry.item)
            .and_then(|content| content.get("resourceType"))
            .and_then(Value::as_str)
        else {
            continue;
        };
        let normalized = resource_type.to_ascii_lowercase();
        if !VALID_RESOURCE_TYPES.contains(&normalized.as_str()) {
            unknown_types.insert(resource_type.to_string());
        }
    }
    let unknown_types: Vec<String> = unknown_types.into_iter().collect();
    acc.check(
        unknown_types.is_empty(),
        "Resource types are drawn from the allow-list",
        "no unknown resource types",
        format!("unknown: {}", offender_list(&unknown_types)),
    );
}
