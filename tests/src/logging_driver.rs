use keyset_core::{
    async_trait,
    driver::{Driver, Operation, Response},
    Result, Schema,
};
use std::sync::{Arc, Mutex};

/// A driver wrapper that logs all operations for testing purposes
#[derive(Debug)]
pub struct LoggingDriver {
    /// The underlying driver that actually executes operations
    inner: Box<dyn Driver>,

    /// Log of all operations executed through this driver
    /// Using Arc<Mutex> for thread-safe access from tests
    ops_log: Arc<Mutex<Vec<DriverOp>>>,
}

#[derive(Debug)]
pub struct DriverOp {
    pub operation: Operation,
    pub response: Response,
}

impl LoggingDriver {
    pub fn new(driver: impl Driver) -> Self {
        Self {
            inner: Box::new(driver),
            ops_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get a handle to access the operations log
    pub fn ops_log_handle(&self) -> Arc<Mutex<Vec<DriverOp>>> {
        self.ops_log.clone()
    }
}

#[async_trait]
impl Driver for LoggingDriver {
    async fn exec(&self, schema: &Arc<Schema>, operation: Operation) -> Result<Response> {
        let operation_clone = operation.clone();

        let mut response = self.inner.exec(schema, operation).await?;

        // Buffer the rows so both the caller and the log can read them
        let rows = response.rows.dup().await?;

        self.ops_log
            .lock()
            .expect("Failed to acquire ops log lock")
            .push(DriverOp {
                operation: operation_clone,
                response: Response { rows },
            });

        Ok(response)
    }
}
