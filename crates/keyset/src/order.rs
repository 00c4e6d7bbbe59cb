use crate::{CursorValues, Result, Scan};

use keyset_core::{
    schema::{Entity, FieldId, Name},
    stmt::{Direction, OrderByExpr},
    Error, Schema,
};
use std::cmp::Ordering;

/// A total order over an entity's rows.
///
/// Rows are ordered by `primary`, then by `tie_break` (always the
/// identifier) in the same direction. Because the identifier is unique, no
/// two distinct rows compare equal.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct OrderSpec {
    pub primary: FieldId,
    pub direction: Direction,
    pub tie_break: FieldId,
}

impl OrderSpec {
    /// Orders by identifier, ascending.
    pub fn identifier(entity: &Entity) -> OrderSpec {
        OrderSpec {
            primary: entity.identifier,
            direction: Direction::Asc,
            tie_break: entity.identifier,
        }
    }

    /// Resolves a client-requested ordering.
    ///
    /// `field` may be given by its GraphQL name (`createdAt`) or as an enum
    /// value (`CREATED_AT`). Without a field the entity is ordered by
    /// identifier.
    pub fn resolve(
        entity: &Entity,
        field: Option<&str>,
        direction: Option<Direction>,
    ) -> Result<OrderSpec> {
        let direction = direction.unwrap_or_default();

        let Some(requested) = field else {
            return Ok(OrderSpec {
                direction,
                ..OrderSpec::identifier(entity)
            });
        };

        let field = entity
            .fields
            .iter()
            .find(|field| {
                field.name.app_name == requested
                    || Name::new(&field.name.app_name).upper_snake_case() == requested
            })
            .filter(|field| field.orderable)
            .ok_or_else(|| Error::unknown_order_field(entity.name.as_str(), requested))?;

        Ok(OrderSpec {
            primary: field.id,
            direction,
            tie_break: entity.identifier,
        })
    }

    /// Returns `true` when the ordering is by identifier alone.
    pub fn is_identifier_only(&self) -> bool {
        self.primary == self.tie_break
    }

    /// Fields participating in the ordering, primary first.
    pub fn fields(&self) -> impl Iterator<Item = FieldId> {
        let primary = (!self.is_identifier_only()).then_some(self.primary);
        primary.into_iter().chain(Some(self.tie_break))
    }

    /// Direction in which storage is scanned.
    pub fn scan_direction(&self, scan: Scan) -> Direction {
        match scan {
            Scan::Forward => self.direction,
            Scan::Backward => self.direction.reverse(),
        }
    }

    /// `ORDER BY` terms for a scan. Backward scans read the ordering in
    /// reverse.
    pub fn order_by(&self, schema: &Schema, scan: Scan) -> Vec<OrderByExpr> {
        let direction = self.scan_direction(scan);

        self.fields()
            .map(|field| OrderByExpr::new(schema.column(field), direction))
            .collect()
    }

    /// Compares two row positions under this ordering.
    pub fn compare(&self, lhs: &CursorValues, rhs: &CursorValues) -> Ordering {
        let primary = match (&lhs.primary, &rhs.primary) {
            (Some(a), Some(b)) if !self.is_identifier_only() => a.cmp_sort(b),
            _ => Ordering::Equal,
        };

        let ordering = primary.then_with(|| lhs.id.cmp_sort(&rhs.id));

        match self.direction {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }
}
