use super::{paginate, ConnectionPlan, NodePlan};
use crate::{Cursor, Edge, Node, PageResult, Result};

use keyset_core::{stmt::ValueRecord, Schema};

/// Shapes one parent's trimmed rows into a page.
///
/// `nodes` is present when `node` was selected and lines up with `rows`.
pub(super) fn page(
    schema: &Schema,
    plan: &ConnectionPlan,
    rows: Vec<ValueRecord>,
    nodes: Option<Vec<Node>>,
    overflow: bool,
    total_count: Option<u64>,
) -> Result<PageResult> {
    let entity = schema.entity(plan.entity);
    let mut nodes = nodes.map(Vec::into_iter);

    let edges = rows
        .iter()
        .map(|row| {
            Ok(Edge {
                node: nodes.as_mut().and_then(Iterator::next),
                cursor: Cursor::encode(&plan.order, entity, &plan.cursor_values(row))?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut page_info = paginate::page_info(plan, overflow);
    page_info.start_cursor = edges.first().map(|edge| edge.cursor.clone());
    page_info.end_cursor = edges.last().map(|edge| edge.cursor.clone());

    Ok(PageResult {
        edges,
        page_info,
        total_count,
    })
}

/// A page without edges, answered from counts alone.
pub(super) fn counts_only(plan: &ConnectionPlan, overflow: bool, total_count: Option<u64>) -> PageResult {
    PageResult {
        edges: vec![],
        page_info: paginate::page_info(plan, overflow),
        total_count,
    }
}

/// The page of a parent that has no related rows.
pub(super) fn empty(plan: &ConnectionPlan) -> PageResult {
    counts_only(plan, false, plan.total_count.then_some(0))
}

/// Copies the selected scalar fields of `row` into a node.
pub(super) fn node(plan: &NodePlan, row: &ValueRecord) -> Node {
    let mut node = Node::new(plan.entity, row[0].clone());

    for (key, index) in &plan.fields {
        node.fields.insert(key.clone(), row[*index].clone());
    }

    node
}
