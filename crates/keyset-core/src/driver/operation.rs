use crate::stmt::QuerySpec;

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Read rows, or count them, according to a structured query
    Query(QuerySpec),
}

impl Operation {
    pub fn as_query(&self) -> Option<&QuerySpec> {
        match self {
            Self::Query(query) => Some(query),
        }
    }

    pub fn is_query(&self) -> bool {
        matches!(self, Self::Query(_))
    }

    /// Returns `true` for a query that counts rows instead of returning them.
    pub fn is_count(&self) -> bool {
        matches!(self, Self::Query(query) if query.is_count())
    }

    /// Returns `true` for a query ranked per partition.
    pub fn is_windowed(&self) -> bool {
        matches!(self, Self::Query(query) if query.is_windowed())
    }

    /// Name of the table the operation reads from.
    pub fn table(&self) -> &str {
        match self {
            Self::Query(query) => &query.source.table,
        }
    }
}

impl From<QuerySpec> for Operation {
    fn from(value: QuerySpec) -> Self {
        Self::Query(value)
    }
}
