//! Workbook document loading and typed access over the parsed JSON tree.
//!
//! The workbook is held as a raw `serde_json::Value` rather than a fully
//! typed schema: item content payloads are polymorphic (their shape depends
//! on the item type code), and the validator needs to observe malformed
//! shapes rather than reject them at parse time. Typed accessors live here;
//! the raw serialized text is retained alongside the tree for the raw-text
//! checks (version banner, hardcoded-identifier scans).

use std::fmt;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// Expected value of the workbook's top-level `version` field.
pub const WORKBOOK_SCHEMA_VERSION: &str = "Notebook/1.0";

/// A parsed workbook plus the raw text it was parsed from.
#[derive(Debug, Clone)]
pub struct WorkbookDocument {
    pub root: Value,
    pub raw: String,
}

impl WorkbookDocument {
    /// Parse a workbook from its serialized text.
    pub fn from_text(raw: String) -> Result<Self> {
        let root: Value = serde_json::from_str(&raw)?;
        Ok(Self { root, raw })
    }

    /// Top-level `version` field, if present and a string.
    pub fn version(&self) -> Option<&str> {
        self.root.get("version").and_then(Value::as_str)
    }

    /// Top-level `items` array, or an empty slice when missing/not an array.
    pub fn items(&self) -> &[Value] {
        self.root
            .get("items")
            .and_then(Value::as_array)
            .map_or(&[], Vec::as_slice)
    }

    /// Whether the document declares `fallbackResourceIds` at the top level.
    pub fn has_fallback_resource_ids(&self) -> bool {
        self.root.get("fallbackResourceIds").is_some()
    }
}

/// Both validator inputs, loaded once and held immutably for the run.
#[derive(Debug, Clone)]
pub struct Inputs {
    pub workbook: WorkbookDocument,
    pub changelog: String,
}

/// Load the workbook JSON and the companion changelog text.
///
/// Either file missing, or the JSON failing to parse, is a fatal
/// precondition failure: the caller gets an error and no partial result.
pub fn load(workbook_path: &Path, changelog_path: &Path) -> Result<Inputs> {
    let raw = std::fs::read_to_string(workbook_path)
        .map_err(|err| Error::document(workbook_path.display().to_string(), err.to_string()))?;
    let workbook = WorkbookDocument::from_text(raw).map_err(|err| {
        Error::document(workbook_path.display().to_string(), err.to_string())
    })?;
    let changelog = std::fs::read_to_string(changelog_path)
        .map_err(|err| Error::document(changelog_path.display().to_string(), err.to_string()))?;
    Ok(Inputs {
        workbook,
        changelog,
    })
}

/// Item type codes used by the workbook schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ItemKind {
    Markdown,
    Query,
    ParameterSet,
    NotebookGroup,
    LinkSet,
    Group,
}

impl ItemKind {
    /// All known type codes, in ascending order.
    pub const VALID_CODES: [i64; 6] = [1, 3, 9, 10, 11, 12];

    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Markdown),
            3 => Some(Self::Query),
            9 => Some(Self::ParameterSet),
            10 => Some(Self::NotebookGroup),
            11 => Some(Self::LinkSet),
            12 => Some(Self::Group),
            _ => None,
        }
    }

    pub const fn code(self) -> i64 {
        match self {
            Self::Markdown => 1,
            Self::Query => 3,
            Self::ParameterSet => 9,
            Self::NotebookGroup => 10,
            Self::LinkSet => 11,
            Self::Group => 12,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Markdown => "markdown",
            Self::Query => "query",
            Self::ParameterSet => "parameter-set",
            Self::NotebookGroup => "notebook-group",
            Self::LinkSet => "link-set",
            Self::Group => "group",
        };
        f.write_str(name)
    }
}

/// A declared workbook parameter.
///
/// Deserialized leniently: only the fields the validator consumes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Parameter {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
}

/// A grid column formatter entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Formatter {
    #[serde(default)]
    pub formatter: Option<i64>,
    #[serde(default)]
    pub column_match: Option<String>,
    #[serde(default)]
    pub format_options: Option<FormatOptions>,
}

/// Formatter code for a hidden column.
pub const FORMATTER_HIDDEN: i64 = 5;
/// Formatter code for a link column.
pub const FORMATTER_LINK: i64 = 7;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatOptions {
    #[serde(default)]
    pub link_column: Option<String>,
}

/// `item["type"]` as an integer code, if present.
pub fn item_type_code(item: &Value) -> Option<i64> {
    item.get("type").and_then(Value::as_i64)
}

/// `item["content"]`, if present.
pub fn item_content(item: &Value) -> Option<&Value> {
    item.get("content")
}

/// `item["name"]`, if present and a string.
pub fn item_name(item: &Value) -> Option<&str> {
    item.get("name").and_then(Value::as_str)
}

/// Declared parameters of a parameter-set item's content, lenient on shape.
pub fn content_parameters(content: &Value) -> Vec<Parameter> {
    content
        .get("parameters")
        .and_then(Value::as_array)
        .map_or_else(Vec::new, |entries| {
            entries
                .iter()
                .map(|entry| {
                    serde_json::from_value(entry.clone()).unwrap_or_default()
                })
                .collect()
        })
}

/// Grid formatters of a content payload, lenient on shape.
pub fn grid_formatters(content: &Value) -> Vec<Formatter> {
    content
        .get("gridSettings")
        .and_then(|grid| grid.get("formatters"))
        .and_then(Value::as_array)
        .map_or_else(Vec::new, |entries| {
            entries
                .iter()
                .map(|entry| {
                    serde_json::from_value(entry.clone()).unwrap_or_default()
                })
                .collect()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_minimal_workbook() {
        let doc = WorkbookDocument::from_text(
            r#"{"version":"Notebook/1.0","items":[],"fallbackResourceIds":[]}"#.to_string(),
        )
        .expect("parse");
        assert_eq!(doc.version(), Some(WORKBOOK_SCHEMA_VERSION));
        assert!(doc.items().is_empty());
        assert!(doc.has_fallback_resource_ids());
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = WorkbookDocument::from_text("{not json".to_string());
        assert!(err.is_err());
    }

    #[test]
    fn missing_items_reads_as_empty() {
        let doc = WorkbookDocument::from_text(r#"{"version":"Notebook/1.0"}"#.to_string())
            .expect("parse");
        assert!(doc.items().is_empty());
        assert!(!doc.has_fallback_resource_ids());
    }

    #[test]
    fn item_kind_codes_round_trip() {
        for code in ItemKind::VALID_CODES {
            let kind = ItemKind::from_code(code).expect("known code");
            assert_eq!(kind.code(), code);
        }
        assert_eq!(ItemKind::from_code(99), None);
    }

    #[test]
    fn lenient_parameter_deserialization() {
        let content = json!({
            "parameters": [
                { "name": "TimeRange", "label": "Time range" },
                { "label": "Only label", "query": "Heartbeat | take 1" },
                "not an object"
            ]
        });
        let params = content_parameters(&content);
        assert_eq!(params.len(), 3);
        assert_eq!(params[0].name.as_deref(), Some("TimeRange"));
        assert_eq!(params[1].query.as_deref(), Some("Heartbeat | take 1"));
        assert!(params[2].name.is_none());
    }

    #[test]
    fn grid_formatters_survive_odd_shapes() {
        let content = json!({
            "gridSettings": {
                "formatters": [
                    { "formatter": 5, "columnMatch": "ClusterId" },
                    { "formatter": 7, "columnMatch": "Name",
                      "formatOptions": { "linkColumn": "ClusterId" } }
                ]
            }
        });
        let formatters = grid_formatters(&content);
        assert_eq!(formatters.len(), 2);
        assert_eq!(formatters[0].formatter, Some(FORMATTER_HIDDEN));
        assert_eq!(
            formatters[1]
                .format_options
                .as_ref()
                .and_then(|opts| opts.link_column.as_deref()),
            Some("ClusterId")
        );
    }
}
