//! Pre-order flattening of the workbook's nested item tree.

use serde_json::Value;

/// An item from the workbook tree annotated with its nesting depth.
///
/// Depth is synthetic: root items are depth 0, items inside a group's
/// `content.items` are one deeper, and so on.
#[derive(Debug, Clone, Copy)]
pub struct FlatItem<'a> {
    pub item: &'a Value,
    pub depth: usize,
}

/// Flatten the item tree into a single pre-order sequence.
///
/// Each item appears in place; if its content payload carries a nested
/// `items` array, that array is flattened immediately after it with depth
/// incremented by one. Missing or non-array nested fields are treated as
/// empty. Pure, handles arbitrary nesting.
pub fn flatten_items(items: &[Value]) -> Vec<FlatItem<'_>> {
    let mut out = Vec::new();
    push_items(items, 0, &mut out);
    out
}

fn push_items<'a>(items: &'a [Value], depth: usize, out: &mut Vec<FlatItem<'a>>) {
    for item in items {
        out.push(FlatItem { item, depth });
        let nested = item
            .get("content")
            .and_then(|content| content.get("items"))
            .and_then(Value::as_array);
        if let Some(nested) = nested {
            push_items(nested, depth + 1, out);
        }
    }
}
