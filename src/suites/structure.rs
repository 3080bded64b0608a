//! Document- and item-level structural suites.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::document::{self, ItemKind, WORKBOOK_SCHEMA_VERSION};
use crate::engine::Accumulator;

use super::limits::{
    DUPLICATE_NAME_TOLERANCE, MAX_DOCUMENT_BYTES, MIN_CHART_COUNT, MIN_ITEM_COUNT,
    MIN_QUERY_COUNT,
};
use super::{offender_list, SuiteInput};

pub(crate) fn json_structure(input: &SuiteInput<'_>, acc: &mut Accumulator) {
    let version = input.workbook.version();
    acc.check(
        version == Some(WORKBOOK_SCHEMA_VERSION),
        "Workbook schema version matches",
        WORKBOOK_SCHEMA_VERSION,
        version.unwrap_or("missing"),
    );

    let items_field = input.workbook.root.get("items");
    acc.check(
        items_field.is_some_and(Value::is_array),
        "Items field is an array",
        "array",
        items_field.map_or("missing", value_type_name),
    );

    let item_count = input.workbook.items().len();
    acc.check(
        item_count > 0,
        "Items array is not empty",
        "at least 1 item",
        format!("{item_count} items"),
    );

    acc.check(
        input.workbook.has_fallback_resource_ids(),
        "fallbackResourceIds is declared",
        "present",
        if input.workbook.has_fallback_resource_ids() {
            "present"
        } else {
            "missing"
        },
    );
}

pub(crate) fn item_structure(input: &SuiteInput<'_>, acc: &mut Accumulator) {
    let total = input.items.len();

    let missing_type = input
        .items
        .iter()
        .filter(|entry| entry.item.get("type").is_none())
        .count();
    acc.check(
        missing_type == 0,
        "Every item has a type field",
        format!("all {total} items typed"),
        format!("{missing_type} items missing type"),
    );

    let missing_content = input
        .items
        .iter()
        .filter(|entry| document::item_content(entry.item).is_none())
        .count();
    acc.check(
        missing_content == 0,
        "Every item has a content field",
        format!("all {total} items with content"),
        format!("{missing_content} items missing content"),
    );

    let invalid: Vec<String> = input
        .items
        .iter()
        .filter_map(|entry| document::item_type_code(entry.item))
        .filter(|code| ItemKind::from_code(*code).is_none())
        .map(|code| code.to_string())
        .collect();
    acc.check(
        invalid.is_empty(),
        "Item type values are valid",
        format!("codes within {:?}", ItemKind::VALID_CODES),
        format!("unknown codes: {}", offender_list(&invalid)),
    );

    let mut name_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for entry in input.items {
        if let Some(name) = document::item_name(entry.item) {
            *name_counts.entry(name).or_default() += 1;
        }
    }
    let duplicates: usize = name_counts
        .values()
        .map(|count| count.saturating_sub(1))
        .sum();
    acc.check(
        duplicates <= DUPLICATE_NAME_TOLERANCE,
        "Named items are unique within tolerance",
        format!("at most {DUPLICATE_NAME_TOLERANCE} duplicate names"),
        format!("{duplicates} duplicate names"),
    );
}

pub(crate) fn document_size(input: &SuiteInput<'_>, acc: &mut Accumulator) {
    let size = input.workbook.raw.len();
    acc.check(
        size < MAX_DOCUMENT_BYTES,
        "Serialized document stays under the size ceiling",
        format!("under {MAX_DOCUMENT_BYTES} bytes"),
        format!("{size} bytes"),
    );
}

pub(crate) fn regression_guards(input: &SuiteInput<'_>, acc: &mut Accumulator) {
    acc.check(
        input.items.len() >= MIN_ITEM_COUNT,
        "Total item count held",
        format!("at least {MIN_ITEM_COUNT} items"),
        format!("{} items", input.items.len()),
    );
    acc.check(
        input.queries.len() >= MIN_QUERY_COUNT,
        "Total query count held",
        format!("at least {MIN_QUERY_COUNT} queries"),
        format!("{} queries", input.queries.len()),
    );
    acc.check(
        input.charts.len() >= MIN_CHART_COUNT,
        "Total chart count held",
        format!("at least {MIN_CHART_COUNT} charts"),
        format!("{} charts", input.charts.len()),
    );
}

const fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
