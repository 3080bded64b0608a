//! Pure extractors deriving query and chart views from the flattened tree.

use std::fmt;

use serde_json::Value;

use crate::document::{self, ItemKind};
use crate::flatten::FlatItem;

/// Display-name fallback when neither `name`, `title`, `label` resolve.
pub const UNNAMED: &str = "<unnamed>";

/// What a query record was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOrigin {
    /// A content item carrying a `query` field; payload is the item type code.
    Item(i64),
    /// A query-backed parameter inside a parameter-set item.
    Parameter,
}

impl fmt::Display for QueryOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Item(code) => match ItemKind::from_code(*code) {
                Some(kind) => write!(f, "{kind}"),
                None => write!(f, "type-{code}"),
            },
            Self::Parameter => f.write_str("parameter"),
        }
    }
}

/// A query with its owning item's identity.
#[derive(Debug, Clone)]
pub struct QueryRecord<'a> {
    pub name: String,
    pub origin: QueryOrigin,
    pub visualization: Option<&'a str>,
    pub query: String,
}

/// A chart: an item carrying both `visualization` and `chartSettings`.
#[derive(Debug, Clone)]
pub struct ChartRecord<'a> {
    pub name: String,
    pub visualization: &'a str,
    pub settings: &'a Value,
    pub sort_by: Option<&'a Value>,
    pub query: Option<&'a str>,
}

/// Resolve a display name: `item.name`, then `content.title`, then fallback.
fn display_name(item: &Value, content: &Value) -> String {
    document::item_name(item)
        .or_else(|| content.get("title").and_then(Value::as_str))
        .unwrap_or(UNNAMED)
        .to_string()
}

/// Extract every query in the flattened sequence.
///
/// Items whose content carries a `query` field produce one record each.
/// Parameter-set items additionally contribute one record per query-backed
/// parameter, with a `parameter` origin marker and the name resolved from
/// `parameter.name`, then `parameter.label`, then the fallback.
pub fn extract_queries<'a>(items: &[FlatItem<'a>]) -> Vec<QueryRecord<'a>> {
    let mut out = Vec::new();
    for entry in items {
        let Some(content) = document::item_content(entry.item) else {
            continue;
        };
        let type_code = document::item_type_code(entry.item).unwrap_or(-1);

        if let Some(query) = content.get("query").and_then(Value::as_str) {
            out.push(QueryRecord {
                name: display_name(entry.item, content),
                origin: QueryOrigin::Item(type_code),
                visualization: content.get("visualization").and_then(Value::as_str),
                query: query.to_string(),
            });
        }

        if type_code == ItemKind::ParameterSet.code() {
            for parameter in document::content_parameters(content) {
                let Some(query) = parameter.query else {
                    continue;
                };
                let name = parameter
                    .name
                    .or(parameter.label)
                    .unwrap_or_else(|| UNNAMED.to_string());
                out.push(QueryRecord {
                    name,
                    origin: QueryOrigin::Parameter,
                    visualization: None,
                    query,
                });
            }
        }
    }
    out
}

/// Extract every chart in the flattened sequence.
pub fn extract_charts<'a>(items: &[FlatItem<'a>]) -> Vec<ChartRecord<'a>> {
    let mut out = Vec::new();
    for entry in items {
        let Some(content) = document::item_content(entry.item) else {
            continue;
        };
        let Some(visualization) = content.get("visualization").and_then(Value::as_str) else {
            continue;
        };
        let Some(settings) = content.get("chartSettings") else {
            continue;
        };
        out.push(ChartRecord {
            name: display_name(entry.item, content),
            visualization,
            settings,
            sort_by: settings.get("sortBy"),
            query: content.get("query").and_then(Value::as_str),
        });
    }
    out
}

/// All declared parameter names across every parameter-set item.
pub fn declared_parameter_names(items: &[FlatItem<'_>]) -> Vec<String> {
    let mut out = Vec::new();
    for entry in items {
        if document::item_type_code(entry.item) != Some(ItemKind::ParameterSet.code()) {
            continue;
        }
        let Some(content) = document::item_content(entry.item) else {
            continue;
        };
        for parameter in document::content_parameters(content) {
            if let Some(name) = parameter.name {
                out.push(name);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::flatten_items;
    use serde_json::json;

    #[test]
    fn query_extraction_resolves_names_in_priority_order() {
        let items = json!([
            { "name": "named", "type": 3,
              "content": { "query": "Heartbeat", "visualization": "timechart" } },
            { "type": 3, "content": { "query": "Usage", "title": "Titled" } },
            { "type": 3, "content": { "query": "Perf" } }
        ]);
        let flat = flatten_items(items.as_array().unwrap());
        let queries = extract_queries(&flat);
        assert_eq!(queries.len(), 3);
        assert_eq!(queries[0].name, "named");
        assert_eq!(queries[0].visualization, Some("timechart"));
        assert_eq!(queries[1].name, "Titled");
        assert_eq!(queries[2].name, UNNAMED);
        assert_eq!(queries[0].origin, QueryOrigin::Item(3));
    }

    #[test]
    fn parameter_queries_get_the_parameter_marker() {
        let items = json!([
            { "name": "params", "type": 9, "content": { "parameters": [
                { "name": "ClusterFilter", "query": "Cluster | distinct Name" },
                { "label": "Only label", "query": "Cluster | take 1" },
                { "name": "TimeRange" }
            ]}}
        ]);
        let flat = flatten_items(items.as_array().unwrap());
        let queries = extract_queries(&flat);
        assert_eq!(queries.len(), 2);
        assert!(queries.iter().all(|q| q.origin == QueryOrigin::Parameter));
        assert_eq!(queries[0].name, "ClusterFilter");
        assert_eq!(queries[1].name, "Only label");
        assert_eq!(format!("{}", queries[0].origin), "parameter");
    }

    #[test]
    fn charts_need_both_visualization_and_settings() {
        let items = json!([
            { "name": "chart", "type": 3, "content": {
                "query": "Perf | summarize count() by bin(TimeGenerated, 1h)",
                "visualization": "barchart",
                "chartSettings": { "xAxis": "TimeGenerated", "yAxis": ["count_"],
                                   "sortBy": [{ "itemKey": "count_", "sortOrder": 2 }] } } },
            { "name": "viz-only", "type": 3,
              "content": { "query": "Perf", "visualization": "table" } },
            { "name": "settings-only", "type": 3,
              "content": { "query": "Perf", "chartSettings": {} } }
        ]);
        let flat = flatten_items(items.as_array().unwrap());
        let charts = extract_charts(&flat);
        assert_eq!(charts.len(), 1);
        assert_eq!(charts[0].name, "chart");
        assert_eq!(charts[0].visualization, "barchart");
        assert!(charts[0].sort_by.is_some());
        assert!(charts[0].query.is_some());
    }

    #[test]
    fn nested_queries_are_reached_through_groups() {
        let items = json!([
            { "name": "tab", "type": 12, "content": { "items": [
                { "name": "inner", "type": 3, "content": { "query": "Event" } }
            ]}}
        ]);
        let flat = flatten_items(items.as_array().unwrap());
        let queries = extract_queries(&flat);
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].name, "inner");
    }

    #[test]
    fn declared_names_span_all_parameter_sets() {
        let items = json!([
            { "type": 9, "content": { "parameters": [
                { "name": "TimeRange" }, { "name": "Subscription" }
            ]}},
            { "type": 12, "content": { "items": [
                { "type": 9, "content": { "parameters": [{ "name": "ClusterFilter" }] } }
            ]}}
        ]);
        let flat = flatten_items(items.as_array().unwrap());
        let names = declared_parameter_names(&flat);
        assert_eq!(names, ["TimeRange", "Subscription", "ClusterFilter"]);
    }
}
