use super::{ColumnRef, Direction};

#[derive(Debug, Clone, PartialEq)]
pub struct OrderByExpr {
    /// The column to order by
    pub column: ColumnRef,

    /// Ascending or descending
    pub direction: Direction,
}

impl OrderByExpr {
    pub fn new(column: ColumnRef, direction: Direction) -> Self {
        Self { column, direction }
    }

    /// Flips the direction by which the query is ordered.
    pub fn reverse(&mut self) {
        self.direction = self.direction.reverse();
    }
}
