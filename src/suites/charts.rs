//! Visualization and chart configuration suites.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::document;
use crate::engine::Accumulator;

use super::limits::{
    AXIS_VISUALIZATIONS, CHART_INDEX_24, CHART_INDEX_24_RULE_ENABLED, VALID_VISUALIZATIONS,
};
use super::{offender_list, SuiteInput};

pub(crate) fn visualization_validation(input: &SuiteInput<'_>, acc: &mut Accumulator) {
    let mut unknown: BTreeSet<&str> = BTreeSet::new();
    for entry in input.items {
        let Some(viz) = document::item_content(entry.item)
            .and_then(|content| content.get("visualization"))
            .and_then(Value::as_str)
        else {
            continue;
        };
        if !VALID_VISUALIZATIONS.contains(&viz) {
            unknown.insert(viz);
        }
    }
    let unknown: Vec<&str> = unknown.into_iter().collect();
    acc.check(
        unknown.is_empty(),
        "Visualization values are drawn from the allow-list",
        "no unknown visualizations",
        format!("unknown: {}", offender_list(&unknown)),
    );
}

pub(crate) fn chart_configuration(input: &SuiteInput<'_>, acc: &mut Accumulator) {
    let axis_charts: Vec<_> = input
        .charts
        .iter()
        .filter(|chart| AXIS_VISUALIZATIONS.contains(&chart.visualization))
        .collect();
    let total = axis_charts.len();

    let with_x = axis_charts
        .iter()
        .filter(|chart| chart.settings.get("xAxis").is_some())
        .count();
    acc.check(
        with_x == total,
        "Axis charts declare an xAxis",
        total,
        with_x,
    );

    let with_y = axis_charts
        .iter()
        .filter(|chart| {
            chart
                .settings
                .get("yAxis")
                .and_then(Value::as_array)
                .is_some_and(|axes| !axes.is_empty())
        })
        .count();
    acc.check(
        with_y == total,
        "Axis charts declare a yAxis",
        total,
        with_y,
    );
}

pub(crate) fn chart_sort_order(input: &SuiteInput<'_>, acc: &mut Accumulator) {
    let mut malformed: Vec<&str> = Vec::new();
    for chart in input.charts {
        let Some(sort_by) = chart.sort_by else {
            continue;
        };
        if !sort_entries_well_formed(sort_by) {
            malformed.push(chart.name.as_str());
        }
    }
    acc.check(
        malformed.is_empty(),
        "Declared sort orders reference a field and a known direction",
        "every sortBy entry well-formed",
        format!("malformed: {}", offender_list(&malformed)),
    );
}

/// One-off rule for the chart that historically shipped without a sort
/// order. Applies only while the rule flag is set and the chart exists.
pub(crate) fn chart_index_24(input: &SuiteInput<'_>, acc: &mut Accumulator) {
    if !CHART_INDEX_24_RULE_ENABLED {
        return;
    }
    match input.charts.get(CHART_INDEX_24) {
        Some(chart) => {
            acc.check(
                chart.sort_by.is_some(),
                "Chart at index 24 declares an explicit sort order",
                "sortBy present",
                if chart.sort_by.is_some() {
                    "sortBy present".to_string()
                } else {
                    format!("sortBy missing on '{}'", chart.name)
                },
            );
        }
        None => {
            acc.check(
                true,
                "Chart at index 24 declares an explicit sort order",
                "sortBy present when the chart exists",
                format!("only {} charts, rule not applicable", input.charts.len()),
            );
        }
    }
}

/// `sortBy` must be a non-empty array of `{itemKey, sortOrder}` entries
/// with sortOrder 1 (ascending) or 2 (descending).
fn sort_entries_well_formed(sort_by: &Value) -> bool {
    let Some(entries) = sort_by.as_array() else {
        return false;
    };
    if entries.is_empty() {
        return false;
    }
    entries.iter().all(|entry| {
        let has_key = entry
            .get("itemKey")
            .and_then(Value::as_str)
            .is_some_and(|key| !key.is_empty());
        let valid_order = matches!(entry.get("sortOrder").and_then(Value::as_i64), Some(1 | 2));
        has_key && valid_order
    })
}

#[cfg(test)]
mod tests {
    use super::sort_entries_well_formed;
    use serde_json::json;

    #[test]
    fn sort_entry_shapes() {
        assert!(sort_entries_well_formed(&json!([
            { "itemKey": "count_", "sortOrder": 2 }
        ])));
        assert!(!sort_entries_well_formed(&json!([])));
        assert!(!sort_entries_well_formed(&json!([{ "sortOrder": 2 }])));
        assert!(!sort_entries_well_formed(&json!([
            { "itemKey": "count_", "sortOrder": 3 }
        ])));
        assert!(!sort_entries_well_formed(&json!("not an array")));
    }
}
