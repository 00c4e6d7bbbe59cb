//! Builds the storage queries that load rows for many parents at once.
//!
//! Every query of a linked load is scoped to the parent key set with an
//! `IN` list on the partition column, and projects the partition column
//! last so fetched rows can be grouped back by parent. A connection's rows
//! query additionally carries a per-partition [`Window`] so each parent
//! gets at most `page_size + 1` rows from a single round trip. Root
//! connections are the degenerate case with no partition and a plain
//! `LIMIT`.

use super::{paginate, ConnectionPlan, Link, NodePlan, RelatedPlan};
use crate::Scan;

use keyset_core::{
    schema::EntityId,
    stmt::{ColumnRef, Direction, Expr, OrderByExpr, QuerySpec, Returning, Source, Value, Window},
    Schema,
};

/// Rows of a connection page for every parent in `keys`.
pub(super) fn rows(
    schema: &Schema,
    plan: &ConnectionPlan,
    node: &NodePlan,
    link: Option<&Link>,
    keys: Option<&[Value]>,
) -> QuerySpec {
    let mut query = QuerySpec::new(
        source(schema, plan.entity, link),
        Returning::Columns(columns(schema, node, link)),
    );

    query.and_filter(scope(link, keys, plan.filter.as_ref()));
    query.and_filter(paginate::boundary_filter(schema, plan));
    query.order_by = plan.order.order_by(schema, plan.scan);

    // One probe row past the page tells whether more rows exist.
    let limit = plan.page_size.map(|page_size| page_size + 1);

    match (link, limit) {
        (Some(link), Some(limit)) => {
            query.window = Some(Window {
                partition_by: link.partition.clone(),
                limit,
            });
        }
        (None, limit) => query.limit = limit,
        (Some(_), None) => {}
    }

    query
}

/// Counts a connection's rows per parent. When `bounded`, only rows between
/// the cursors are counted.
pub(super) fn count(
    schema: &Schema,
    plan: &ConnectionPlan,
    link: Option<&Link>,
    keys: Option<&[Value]>,
    bounded: bool,
) -> QuerySpec {
    let mut query = QuerySpec::new(
        source(schema, plan.entity, link),
        Returning::Count {
            group_by: link.map(|link| link.partition.clone()),
        },
    );

    query.and_filter(scope(link, keys, plan.filter.as_ref()));

    if bounded {
        query.and_filter(paginate::boundary_filter(schema, plan));
    }

    query
}

/// Every target row of a to-one or list edge.
pub(super) fn related(
    schema: &Schema,
    plan: &RelatedPlan,
    link: &Link,
    keys: &[Value],
) -> QuerySpec {
    let mut query = QuerySpec::new(
        source(schema, plan.node.entity, Some(link)),
        Returning::Columns(columns(schema, &plan.node, Some(link))),
    );

    query.and_filter(scope(Some(link), Some(keys), plan.filter.as_ref()));
    query.order_by = plan.order.order_by(schema, Scan::Forward);
    query
}

/// Rows of `node`'s entity by identifier.
pub(super) fn lookup(schema: &Schema, node: &NodePlan, ids: &[Value]) -> QuerySpec {
    let identifier = schema.column(schema.entity(node.entity).identifier);

    let mut query = QuerySpec::new(
        source(schema, node.entity, None),
        Returning::Columns(columns(schema, node, None)),
    );

    query.and_filter(Expr::in_list(&identifier, ids.to_vec()));
    query.order_by = vec![OrderByExpr::new(identifier, Direction::Asc)];
    query
}

fn source(schema: &Schema, entity: EntityId, link: Option<&Link>) -> Source {
    let source = Source::table(&schema.entity(entity).table_name);

    match link.and_then(|link| link.join.clone()) {
        Some(join) => source.with_join(join),
        None => source,
    }
}

fn columns(schema: &Schema, node: &NodePlan, link: Option<&Link>) -> Vec<ColumnRef> {
    node.columns
        .iter()
        .map(|field| schema.column(*field))
        .chain(link.map(|link| link.partition.clone()))
        .collect()
}

fn scope(link: Option<&Link>, keys: Option<&[Value]>, filter: Option<&Expr>) -> Expr {
    let parents = match (link, keys) {
        (Some(link), Some(keys)) => Expr::in_list(&link.partition, keys.to_vec()),
        _ => Expr::default(),
    };

    match filter {
        Some(filter) => Expr::and(parents, filter.clone()),
        None => parents,
    }
}
