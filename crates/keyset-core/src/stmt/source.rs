use super::ColumnRef;

/// The rows a query reads from.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    /// Table holding the entity rows
    pub table: String,

    /// Optional inner join, used to reach rows linked through a join table
    pub join: Option<Join>,
}

/// `INNER JOIN {table} ON {table}.{column} = {on}`
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub table: String,
    pub column: String,
    pub on: ColumnRef,
}

impl Source {
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            join: None,
        }
    }

    pub fn with_join(mut self, join: Join) -> Self {
        self.join = Some(join);
        self
    }
}
