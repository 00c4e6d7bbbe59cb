use super::ColumnRef;

/// Caps the number of rows returned per partition.
///
/// Rows are ranked within each partition by the query's `order_by` and
/// only those ranked `1..=limit` are kept. Storage typically implements
/// this with `ROW_NUMBER() OVER (PARTITION BY ..)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    pub partition_by: ColumnRef,
    pub limit: u64,
}
