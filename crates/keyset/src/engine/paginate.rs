use crate::{engine::ConnectionPlan, CursorValues, OrderSpec, PageInfo, Scan};

use keyset_core::{
    stmt::{ColumnRef, Direction, Expr, Value},
    Schema,
};

/// Restricts rows to those strictly between the `after` and `before`
/// cursors of the connection, in client-facing order.
pub(super) fn boundary_filter(schema: &Schema, plan: &ConnectionPlan) -> Expr {
    let mut filter = Expr::default();

    if let Some(after) = &plan.after {
        filter = Expr::and(filter, beyond(schema, &plan.order, after, plan.order.direction));
    }

    if let Some(before) = &plan.before {
        filter = Expr::and(
            filter,
            beyond(schema, &plan.order, before, plan.order.direction.reverse()),
        );
    }

    filter
}

/// Rows positioned strictly past `cursor` when reading in `direction`:
///
/// ```text
/// primary > v OR (primary = v AND id > tie_break)
/// ```
///
/// with comparisons flipped for descending reads.
fn beyond(schema: &Schema, order: &OrderSpec, cursor: &CursorValues, direction: Direction) -> Expr {
    let id = schema.column(order.tie_break);
    let past_id = past(&id, &cursor.id, direction, false);

    match &cursor.primary {
        Some(value) if !order.is_identifier_only() => {
            let field = schema.field(order.primary);
            let primary = schema.column(order.primary);

            Expr::or(
                past(&primary, value, direction, field.nullable),
                Expr::and(same(&primary, value), past_id),
            )
        }
        _ => past_id,
    }
}

/// `column` sorts strictly after `value` in `direction`. Nulls sort before
/// every other value.
fn past(column: &ColumnRef, value: &Value, direction: Direction, nullable: bool) -> Expr {
    match (direction, value.is_null()) {
        (Direction::Asc, false) => Expr::gt(column, value.clone()),
        (Direction::Asc, true) => Expr::is_not_null(column),
        (Direction::Desc, false) if nullable => {
            Expr::or(Expr::lt(column, value.clone()), Expr::is_null(column))
        }
        (Direction::Desc, false) => Expr::lt(column, value.clone()),
        (Direction::Desc, true) => false.into(),
    }
}

fn same(column: &ColumnRef, value: &Value) -> Expr {
    if value.is_null() {
        Expr::is_null(column)
    } else {
        Expr::eq(column, value.clone())
    }
}

/// Drops the probe row fetched past the page and restores client order.
///
/// Returns `true` when more rows exist beyond the page in scan direction.
pub(super) fn trim<T>(rows: &mut Vec<T>, page_size: Option<u64>, scan: Scan) -> bool {
    let overflow = match page_size {
        Some(page_size) if rows.len() as u64 > page_size => {
            rows.truncate(page_size as usize);
            true
        }
        _ => false,
    };

    if scan == Scan::Backward {
        rows.reverse();
    }

    overflow
}

/// Computes `hasNextPage` / `hasPreviousPage`.
///
/// The flag in scan direction comes from the probe row. A cursor on the
/// opposite side means rows exist past it, so that side's flag is set too.
pub(super) fn page_info(plan: &ConnectionPlan, overflow: bool) -> PageInfo {
    let forward = plan.scan == Scan::Forward;

    PageInfo {
        has_next_page: (forward && overflow) || plan.args.before.is_some(),
        has_previous_page: (!forward && overflow) || plan.args.after.is_some(),
        start_cursor: None,
        end_cursor: None,
    }
}
