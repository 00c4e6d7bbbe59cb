use super::*;

/// A structured, read-only query handed to the storage driver.
///
/// Built fresh for every dispatch and moved into the driver exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    pub source: Source,

    /// Rows are kept when the filter evaluates to `true`.
    pub filter: Expr,

    pub order_by: Vec<OrderByExpr>,

    /// Global cap on the number of returned rows, applied after `window`.
    pub limit: Option<u64>,

    pub returning: Returning,

    pub window: Option<Window>,
}

impl QuerySpec {
    pub fn new(source: Source, returning: Returning) -> Self {
        Self {
            source,
            filter: Expr::default(),
            order_by: vec![],
            limit: None,
            returning,
            window: None,
        }
    }

    /// Adds a conjunct to the filter.
    pub fn and_filter(&mut self, expr: impl Into<Expr>) {
        let filter = std::mem::take(&mut self.filter);
        self.filter = Expr::and(filter, expr);
    }

    pub fn is_count(&self) -> bool {
        self.returning.is_count()
    }

    pub fn is_windowed(&self) -> bool {
        self.window.is_some()
    }
}
