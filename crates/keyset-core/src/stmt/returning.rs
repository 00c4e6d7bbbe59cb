use super::ColumnRef;

#[derive(Debug, Clone, PartialEq)]
pub enum Returning {
    /// One record per matching row, holding the listed columns in order.
    Columns(Vec<ColumnRef>),

    /// Number of matching rows. When grouped, one `(key, count)` record per
    /// distinct key.
    Count { group_by: Option<ColumnRef> },
}

impl Returning {
    pub fn is_count(&self) -> bool {
        matches!(self, Self::Count { .. })
    }

    pub fn columns(&self) -> Option<&[ColumnRef]> {
        match self {
            Self::Columns(columns) => Some(columns),
            Self::Count { .. } => None,
        }
    }
}
