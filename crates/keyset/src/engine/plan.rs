use crate::{CursorValues, OrderSpec, PaginationArgs, Scan};

use keyset_core::{
    schema::{EdgeId, EntityId, FieldId},
    stmt::{ColumnRef, Expr, Join, ValueRecord},
};

/// How to load one connection: ordering, window and the parts of the
/// connection the selection asked for.
#[derive(Debug, Clone)]
pub struct ConnectionPlan {
    pub entity: EntityId,
    pub order: OrderSpec,
    pub args: PaginationArgs,
    pub scan: Scan,

    /// Number of edges per page; `None` when unbounded
    pub page_size: Option<u64>,

    /// Caller supplied `where` predicate
    pub filter: Option<Expr>,

    /// Present when `edges` is selected
    pub edges: Option<EdgesPlan>,

    pub page_info: bool,
    pub total_count: bool,

    pub(crate) after: Option<CursorValues>,
    pub(crate) before: Option<CursorValues>,
}

#[derive(Debug, Clone)]
pub struct EdgesPlan {
    pub node: NodePlan,

    /// Whether `node` itself was selected, as opposed to only `cursor`
    pub select_node: bool,

    /// Column index of the primary order field, unless ordering by
    /// identifier only
    pub(crate) primary_column: Option<usize>,
}

/// Columns and nested edges to load for each row of an entity.
#[derive(Debug, Clone)]
pub struct NodePlan {
    pub entity: EntityId,

    /// Projected fields. The identifier is always the first column.
    pub columns: Vec<FieldId>,

    /// Selected scalar fields: response key and column index
    pub fields: Vec<(String, usize)>,

    /// Selected edges keyed by response key
    pub edges: Vec<(String, EdgePlan)>,
}

/// A selected edge and how to load it.
#[derive(Debug, Clone)]
pub struct EdgePlan {
    pub link: Link,
    pub load: EdgeLoad,
}

#[derive(Debug, Clone)]
pub enum EdgeLoad {
    One(RelatedPlan),
    List(RelatedPlan),
    Connection(ConnectionPlan),
}

/// Loads every target row of a to-one edge or a list edge.
#[derive(Debug, Clone)]
pub struct RelatedPlan {
    pub order: OrderSpec,
    pub filter: Option<Expr>,
    pub node: NodePlan,
}

/// Stitches target rows back onto their parents.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub edge: EdgeId,

    /// Index of the parent row column holding the key
    pub parent_key: usize,

    /// Column of the queried rows holding the parent key
    pub partition: ColumnRef,

    /// Join reaching the partition column, for edges through a join table
    pub join: Option<Join>,
}

impl ConnectionPlan {
    /// Returns `true` if either cursor was given.
    pub fn has_bounds(&self) -> bool {
        self.after.is_some() || self.before.is_some()
    }

    /// `totalCount` needs its own query only when the fetched rows may not
    /// be the whole set.
    pub fn needs_count_query(&self) -> bool {
        self.total_count && (self.page_size.is_some() || self.has_bounds())
    }

    pub(crate) fn cursor_values(&self, row: &ValueRecord) -> CursorValues {
        let primary = self
            .edges
            .as_ref()
            .and_then(|edges| edges.primary_column)
            .map(|index| row[index].clone());

        CursorValues {
            id: row[0].clone(),
            primary,
        }
    }
}

impl NodePlan {
    pub(crate) fn new(entity: EntityId, identifier: FieldId) -> NodePlan {
        NodePlan {
            entity,
            columns: vec![identifier],
            fields: vec![],
            edges: vec![],
        }
    }

    /// Ensures `field` is projected and returns its column index.
    pub(crate) fn require(&mut self, field: FieldId) -> usize {
        match self.columns.iter().position(|column| *column == field) {
            Some(index) => index,
            None => {
                self.columns.push(field);
                self.columns.len() - 1
            }
        }
    }

    /// Number of columns of a fetched row, including the partition key of
    /// a linked query.
    pub(crate) fn width(&self, link: Option<&Link>) -> usize {
        self.columns.len() + usize::from(link.is_some())
    }
}
