//! Parent/child reconstruction from indentation
//!
//! Rows carry no explicit structure; the only signal is each row's indent
//! and the source order of the list. A row's parent is the nearest
//! preceding row with strictly smaller indent ("nearest" meaning latest in
//! line order when several qualify). Equal indent always means sibling.
//! Rows with no preceding smaller indent are roots, so the result is a
//! forest: physical-plan and logical-plan sections typically sit side by
//! side as top-level groups.
//!
//! The reconstruction keeps a monotonic stack of (indent, ordinal) pairs,
//! popping entries with indent >= the current row's before reading the
//! parent off the top. One pass, O(n); the relation is recomputed from
//! scratch on every call.

use crate::ast::PlanRow;

/// A parent/child edge between two rows, by their `line` ordinals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Edge {
    pub parent: usize,
    pub child: usize,
}

/// Compute the parent/child edges for an ordered row list.
pub fn reconstruct(rows: &[PlanRow]) -> Vec<Edge> {
    let mut edges = Vec::new();
    // Invariant: indents on the stack are strictly increasing bottom to top.
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for (ordinal, row) in rows.iter().enumerate() {
        while stack.last().is_some_and(|&(indent, _)| indent >= row.indent) {
            stack.pop();
        }
        if let Some(&(_, parent)) = stack.last() {
            edges.push(Edge {
                parent,
                child: ordinal,
            });
        }
        stack.push((row.indent, ordinal));
    }

    edges
}

/// The ordinals of all rows without a parent, in source order.
pub fn roots(rows: &[PlanRow]) -> Vec<usize> {
    let mut smallest_so_far = usize::MAX;
    let mut roots = Vec::new();

    for (ordinal, row) in rows.iter().enumerate() {
        if row.indent <= smallest_so_far {
            roots.push(ordinal);
            smallest_so_far = row.indent;
        }
    }

    roots
}
