mod builder;
pub use builder::Builder;

use crate::{
    engine::{ConnectionPlan, Exec, NodePlan, Walker},
    Config, FieldSelection, Node, PageResult, Result,
};

use keyset_core::{driver::Driver, stmt::Value, Error, Schema};

use std::sync::Arc;

/// Plans and executes connection queries against a storage driver.
///
/// The planner holds no mutable state. Cloning is cheap and clones may be
/// used concurrently.
#[derive(Debug, Clone)]
pub struct Planner {
    schema: Arc<Schema>,
    config: Arc<Config>,
    driver: Arc<dyn Driver>,
}

impl Planner {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Plans a root connection over `entity` without executing it.
    ///
    /// Every argument is validated and every cursor decoded, so errors
    /// surface here before any query reaches storage.
    pub fn plan_connection(&self, entity: &str, selection: &FieldSelection) -> Result<ConnectionPlan> {
        let entity = self.schema.resolve_entity(entity)?;
        Walker::new(&self.schema, &self.config).connection(entity.id, selection)
    }

    /// Plans a node lookup over `entity` without executing it.
    pub fn plan_node(&self, entity: &str, selection: &FieldSelection) -> Result<NodePlan> {
        let entity = self.schema.resolve_entity(entity)?;
        Walker::new(&self.schema, &self.config).node(entity.id, &selection.selections)
    }

    /// Resolves a root connection field.
    #[tracing::instrument(skip(self, selection), fields(field = %selection.name))]
    pub async fn connection(&self, entity: &str, selection: &FieldSelection) -> Result<PageResult> {
        let plan = self.plan_connection(entity, selection)?;
        self.exec_connection(&plan).await
    }

    /// Resolves Relay `node` / `nodes` lookups. Returns one entry per
    /// requested id, `None` where no row matches. Ids that are not of the
    /// identifier's type are rejected.
    #[tracing::instrument(skip(self, ids, selection), fields(ids = ids.len()))]
    pub async fn nodes(
        &self,
        entity: &str,
        ids: &[Value],
        selection: &FieldSelection,
    ) -> Result<Vec<Option<Node>>> {
        let identifier = self.schema.resolve_entity(entity)?.identifier();

        if let Some(id) = ids.iter().find(|id| !id.is_a(identifier.ty)) {
            return Err(Error::invalid_argument(format!(
                "`{entity}.{}` is {} but got {id:?}",
                identifier.name.app_name, identifier.ty
            )));
        }

        let plan = self.plan_node(entity, selection)?;
        self.exec().lookup(&plan, ids).await
    }

    /// Executes a connection plan built by [`Planner::plan_connection`].
    pub async fn exec_connection(&self, plan: &ConnectionPlan) -> Result<PageResult> {
        self.exec()
            .connection(plan, None, None)
            .await?
            .swap_remove(&Value::Null)
            .ok_or_else(|| Error::invalid_result("root connection produced no page"))
    }

    fn exec(&self) -> Exec<'_> {
        Exec {
            schema: &self.schema,
            driver: &*self.driver,
        }
    }
}
