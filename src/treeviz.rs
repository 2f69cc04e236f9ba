//! Treeviz formatter for parsed plan forests

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ast::{Operator, PlanRow};
use crate::hierarchy::Edge;

static GUID_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)_[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("GUID suffix pattern is valid")
});

/// Strip the GUID suffix from auto-generated table names
/// (`LocalDateTable_e9fc8ccc-f97b-4356-9f53-95b869d235bd` -> `LocalDateTable`).
pub fn clean_table_name(table: &str) -> String {
    GUID_SUFFIX.replace(table, "").into_owned()
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

/// Human-oriented operator label, with table-name GUID suffixes stripped.
pub fn operator_label(op: &Operator) -> String {
    match op {
        Operator::Simple(name) => name.clone(),
        Operator::FreeText(text) => text.clone(),
        Operator::ColumnRef(col) => {
            format!("{} [{}]", clean_table_name(&col.table), col.column)
        }
        Operator::Complex { name, param } => match param {
            Some(param) => format!("{}<{}>", name, operator_label(param)),
            None => format!("{}<>", name),
        },
    }
}

/// Render a parsed forest as an indented tree with box-drawing connectors.
pub fn to_treeviz_str(rows: &[PlanRow], edges: &[Edge]) -> String {
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); rows.len()];
    let mut has_parent = vec![false; rows.len()];
    for edge in edges {
        children[edge.parent].push(edge.child);
        has_parent[edge.child] = true;
    }
    let roots: Vec<usize> = (0..rows.len()).filter(|&i| !has_parent[i]).collect();

    let mut result = String::new();
    for (i, &root) in roots.iter().enumerate() {
        let is_last = i == roots.len() - 1;
        append_row(&mut result, rows, &children, root, "", is_last);
    }
    result
}

fn append_row(
    result: &mut String,
    rows: &[PlanRow],
    children: &[Vec<usize>],
    index: usize,
    prefix: &str,
    is_last: bool,
) {
    let connector = if is_last { "└─" } else { "├─" };
    let row = &rows[index];
    let label = truncate(&operator_label(&row.operator), 40);

    result.push_str(&format!(
        "{}{} {}: {}\n",
        prefix, connector, row.op_type, label
    ));

    let new_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    for (i, &child) in children[index].iter().enumerate() {
        let child_is_last = i == children[index].len() - 1;
        append_row(result, rows, children, child, &new_prefix, child_is_last);
    }
}
