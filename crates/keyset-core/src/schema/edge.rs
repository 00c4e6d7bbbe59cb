use super::*;

#[derive(Debug, Clone)]
pub struct Edge {
    /// Uniquely identifies the edge within the source entity
    pub id: EdgeId,

    /// GraphQL name of the edge
    pub name: String,

    /// Entity the edge points at
    pub target: EntityId,

    pub cardinality: Cardinality,

    /// How source and target rows are linked in storage
    pub link: EdgeLink,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct EdgeId {
    pub entity: EntityId,
    pub index: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Cardinality {
    /// At most one target row per source row
    One,

    /// Any number of target rows. A paginated edge is exposed as a Relay
    /// connection; otherwise as a plain list.
    Many { paginated: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeLink {
    /// The source row stores the target's identifier in `field`
    Owned { field: FieldId },

    /// The target row stores the source's identifier in `field`
    Inverse { field: FieldId },

    /// Source and target are linked through rows of a join table
    Through(JoinTable),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinTable {
    pub table: String,

    /// Column holding the source identifier
    pub source_column: String,

    /// Column holding the target identifier
    pub target_column: String,
}

impl Edge {
    pub fn is_to_one(&self) -> bool {
        matches!(self.cardinality, Cardinality::One)
    }

    pub fn is_connection(&self) -> bool {
        matches!(self.cardinality, Cardinality::Many { paginated: true })
    }

    pub fn is_list(&self) -> bool {
        matches!(self.cardinality, Cardinality::Many { paginated: false })
    }
}

impl std::fmt::Debug for EdgeId {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(fmt, "EdgeId({}/{})", self.entity.0, self.index)
    }
}
