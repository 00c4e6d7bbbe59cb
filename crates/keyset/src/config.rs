use crate::Result;

use keyset_core::Error;

/// Planner configuration. Built once and shared immutably.
#[derive(Debug, Clone)]
pub struct Config {
    /// Page size used when a connection is queried without `first` or
    /// `last`. `None` returns every row.
    pub default_page_size: Option<u64>,

    /// Largest `first` / `last` a client may request.
    pub max_page_size: Option<u64>,

    /// GraphQL names the field-selection walker recognizes.
    pub names: ConnectionNames,
}

/// Names of the Relay connection fields and arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionNames {
    pub edges: String,
    pub node: String,
    pub cursor: String,
    pub page_info: String,
    pub total_count: String,
    pub has_next_page: String,
    pub has_previous_page: String,
    pub start_cursor: String,
    pub end_cursor: String,
    pub first: String,
    pub last: String,
    pub after: String,
    pub before: String,
    pub order_by: String,
    pub order_field: String,
    pub order_direction: String,
    pub filter: String,
}

impl Config {
    pub const DEFAULT_PAGE_SIZE: u64 = 1000;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_page_size(&mut self, size: impl Into<Option<u64>>) -> &mut Self {
        self.default_page_size = size.into();
        self
    }

    pub fn max_page_size(&mut self, size: impl Into<Option<u64>>) -> &mut Self {
        self.max_page_size = size.into();
        self
    }

    pub fn names(&mut self, names: ConnectionNames) -> &mut Self {
        self.names = names;
        self
    }

    pub(crate) fn verify(&self) -> Result<()> {
        if let (Some(default), Some(max)) = (self.default_page_size, self.max_page_size) {
            if default > max {
                return Err(Error::invalid_argument(format!(
                    "default page size {default} exceeds the maximum page size {max}"
                )));
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_page_size: Some(Self::DEFAULT_PAGE_SIZE),
            max_page_size: None,
            names: ConnectionNames::default(),
        }
    }
}

impl ConnectionNames {
    /// Returns `true` if `name` is one of the `pageInfo` fields.
    pub fn is_page_info_field(&self, name: &str) -> bool {
        name == self.has_next_page
            || name == self.has_previous_page
            || name == self.start_cursor
            || name == self.end_cursor
    }
}

impl Default for ConnectionNames {
    fn default() -> Self {
        Self {
            edges: "edges".into(),
            node: "node".into(),
            cursor: "cursor".into(),
            page_info: "pageInfo".into(),
            total_count: "totalCount".into(),
            has_next_page: "hasNextPage".into(),
            has_previous_page: "hasPreviousPage".into(),
            start_cursor: "startCursor".into(),
            end_cursor: "endCursor".into(),
            first: "first".into(),
            last: "last".into(),
            after: "after".into(),
            before: "before".into(),
            order_by: "orderBy".into(),
            order_field: "field".into(),
            order_direction: "direction".into(),
            filter: "where".into(),
        }
    }
}
