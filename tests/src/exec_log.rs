use crate::logging_driver::DriverOp;
use keyset_core::{
    driver::{Operation, Response},
    stmt::QuerySpec,
};
use std::sync::{Arc, Mutex};

/// A wrapper around the operations log that provides a clean API for tests
pub struct ExecLog {
    ops: Arc<Mutex<Vec<DriverOp>>>,
}

impl ExecLog {
    pub(crate) fn new(ops: Arc<Mutex<Vec<DriverOp>>>) -> Self {
        Self { ops }
    }

    /// Get the number of logged operations
    pub fn len(&self) -> usize {
        self.ops.lock().unwrap().len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.ops.lock().unwrap().is_empty()
    }

    /// Check if any operation matches the given predicate
    pub fn any<F>(&self, predicate: F) -> bool
    where
        F: Fn(&Operation) -> bool,
    {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .any(|op| predicate(&op.operation))
    }

    /// Count operations matching the given predicate
    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&Operation) -> bool,
    {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter(|op| predicate(&op.operation))
            .count()
    }

    /// Number of queries returning rows from `table`
    pub fn row_queries(&self, table: &str) -> usize {
        self.count(|op| !op.is_count() && op.table() == table)
    }

    /// Number of count queries against `table`
    pub fn count_queries(&self, table: &str) -> usize {
        self.count(|op| op.is_count() && op.table() == table)
    }

    /// Queries dispatched so far, in order
    pub fn queries(&self) -> Vec<QuerySpec> {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter_map(|op| op.operation.as_query().cloned())
            .collect()
    }

    /// Clear the log
    pub fn clear(&mut self) {
        self.ops.lock().unwrap().clear();
    }

    /// Remove and return the first operation from the log
    /// Returns None if the log is empty
    pub fn pop(&mut self) -> Option<(Operation, Response)> {
        let mut ops = self.ops.lock().unwrap();
        if ops.is_empty() {
            None
        } else {
            let driver_op = ops.remove(0);
            Some((driver_op.operation, driver_op.response))
        }
    }
}
