//! Grid settings suites: row limits and link/hidden formatter pairing.

use serde_json::Value;

use crate::document::{self, FORMATTER_HIDDEN, FORMATTER_LINK};
use crate::engine::Accumulator;

use super::limits::MIN_ROW_LIMIT;
use super::{offender_list, SuiteInput};

pub(crate) fn grid_settings(input: &SuiteInput<'_>, acc: &mut Accumulator) {
    let mut low: Vec<String> = Vec::new();
    let mut declared = 0usize;
    for entry in input.items {
        let Some(limit) = document::item_content(entry.item)
            .and_then(|content| content.get("gridSettings"))
            .and_then(|grid| grid.get("rowLimit"))
            .and_then(Value::as_i64)
        else {
            continue;
        };
        declared += 1;
        if limit < MIN_ROW_LIMIT {
            let name = document::item_name(entry.item).unwrap_or("<unnamed>");
            low.push(format!("{name} ({limit})"));
        }
    }
    acc.check(
        low.is_empty(),
        "Declared grid row limits meet the floor",
        format!("all {declared} row limits >= {MIN_ROW_LIMIT}"),
        format!("below floor: {}", offender_list(&low)),
    );
}

pub(crate) fn grid_link_formatters(input: &SuiteInput<'_>, acc: &mut Accumulator) {
    let mut dangling: Vec<String> = Vec::new();
    for entry in input.items {
        let Some(content) = document::item_content(entry.item) else {
            continue;
        };
        let formatters = document::grid_formatters(content);
        if formatters.is_empty() {
            continue;
        }

        for formatter in &formatters {
            if formatter.formatter != Some(FORMATTER_LINK) {
                continue;
            }
            let Some(link_column) = formatter
                .format_options
                .as_ref()
                .and_then(|opts| opts.link_column.as_deref())
            else {
                // A link formatter without a target column is itself dangling.
                let name = document::item_name(entry.item).unwrap_or("<unnamed>");
                dangling.push(format!("{name}: link formatter without linkColumn"));
                continue;
            };
            let hidden_backing = formatters.iter().any(|other| {
                other.formatter == Some(FORMATTER_HIDDEN)
                    && other.column_match.as_deref() == Some(link_column)
            });
            if !hidden_backing {
                let name = document::item_name(entry.item).unwrap_or("<unnamed>");
                dangling.push(format!("{name}: {link_column}"));
            }
        }
    }
    acc.check(
        dangling.is_empty(),
        "Link formatters are backed by a hidden column formatter",
        "every linkColumn has a hidden-column formatter",
        format!("dangling: {}", offender_list(&dangling)),
    );
}
