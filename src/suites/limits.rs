//! Named thresholds and allow-lists shared by the suites.
//!
//! These are project constants, not tunables: they live in one place so a
//! threshold change never touches suite logic.

/// How many duplicate names among named items are tolerated.
pub const DUPLICATE_NAME_TOLERANCE: usize = 5;

/// Minimum acceptable `gridSettings.rowLimit` when one is declared.
pub const MIN_ROW_LIMIT: i64 = 2000;

/// Ceiling on the serialized workbook size, in bytes.
pub const MAX_DOCUMENT_BYTES: usize = 1_048_576;

/// Regression floors: the live workbook never shrinks below these.
pub const MIN_ITEM_COUNT: usize = 25;
pub const MIN_QUERY_COUNT: usize = 15;
pub const MIN_CHART_COUNT: usize = 5;

/// The well-known parameters the main parameter set must declare.
pub const REQUIRED_PARAMETERS: [&str; 4] =
    ["TimeRange", "Subscription", "ResourceGroup", "ClusterFilter"];

/// Placeholder token every `crossComponentResources` entry must carry.
pub const REQUIRED_RESOURCE_TOKEN: &str = "{Subscription}";

/// Visualization strings the workbook is allowed to use.
pub const VALID_VISUALIZATIONS: [&str; 11] = [
    "areachart",
    "barchart",
    "categoricalbar",
    "graph",
    "linechart",
    "map",
    "piechart",
    "scatterchart",
    "table",
    "tiles",
    "timechart",
];

/// Visualizations that carry x/y axes and therefore must configure both.
pub const AXIS_VISUALIZATIONS: [&str; 5] = [
    "areachart",
    "barchart",
    "linechart",
    "scatterchart",
    "timechart",
];

/// `resourceType` values the workbook may scope queries to.
pub const VALID_RESOURCE_TYPES: [&str; 4] = [
    "microsoft.azurestackhci/clusters",
    "microsoft.operationalinsights/workspaces",
    "microsoft.resourcegraph/resources",
    "microsoft.resources/subscriptions",
];

/// One-off rule: the updating-clusters tab link. Retire by flipping the flag.
pub const CLUSTERS_UPDATING_RULE_ENABLED: bool = true;
pub const CLUSTERS_UPDATING_LINK_TEXT: &str = "Clusters Currently Updating";

/// One-off rule: the historically misconfigured chart at this index must
/// keep its explicit sort order. Retire by flipping the flag.
pub const CHART_INDEX_24_RULE_ENABLED: bool = true;
pub const CHART_INDEX_24: usize = 24;
