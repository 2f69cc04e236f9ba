//! Boundary pre-processing for the JSON container surface form
//!
//! Plan text arrives in two shapes: plain indented operator text, or a JSON
//! document with `PhysicalQueryPlanRows` / `LogicalQueryPlanRows` arrays
//! whose entries expose the line text as `IndentedOperation`. Unwrapping
//! the container is a boundary step performed before tokenizing, never a
//! grammar rule: the grammar only ever sees the plain-text form.

use serde::Deserialize;

/// The JSON container shape. Either row array may be absent; at least one
/// must be present for the input to count as a container at all.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanDocument {
    #[serde(rename = "PhysicalQueryPlanRows")]
    pub physical_rows: Option<Vec<PlanDocumentRow>>,
    #[serde(rename = "LogicalQueryPlanRows")]
    pub logical_rows: Option<Vec<PlanDocumentRow>>,
}

/// One row of the JSON container.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanDocumentRow {
    #[serde(rename = "IndentedOperation")]
    pub indented_operation: String,
}

/// Unwrap the JSON container into plain indented text: physical rows
/// first, then logical rows, newline-joined. Returns `None` when the input
/// does not deserialize into the container shape (anything other than a
/// JSON object carrying at least one of the two row arrays).
pub fn unwrap_container(input: &str) -> Option<String> {
    let doc: PlanDocument = serde_json::from_str(input).ok()?;
    if doc.physical_rows.is_none() && doc.logical_rows.is_none() {
        return None;
    }

    let lines: Vec<&str> = doc
        .physical_rows
        .iter()
        .flatten()
        .chain(doc.logical_rows.iter().flatten())
        .map(|row| row.indented_operation.as_str())
        .collect();
    Some(lines.join("\n"))
}

/// Produce the plain-text form of either accepted input shape.
pub fn prepare_source(input: &str) -> String {
    match unwrap_container(input) {
        Some(text) => text,
        None => input.to_string(),
    }
}
