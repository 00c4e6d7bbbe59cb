mod response;
pub use response::{Response, Rows};

pub mod operation;
pub use operation::Operation;

use crate::{async_trait, schema::Schema};

use std::{fmt::Debug, sync::Arc};

/// Storage collaborator that executes structured queries.
///
/// Implementations translate each [`Operation`] into their own query
/// language. Errors are returned to the caller unchanged.
#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Execute a database operation
    async fn exec(&self, schema: &Arc<Schema>, op: Operation) -> crate::Result<Response>;
}

#[async_trait]
impl<T: Driver + ?Sized> Driver for Arc<T> {
    async fn exec(&self, schema: &Arc<Schema>, op: Operation) -> crate::Result<Response> {
        (**self).exec(schema, op).await
    }
}
