use super::Planner;
use crate::{Config, Result};

use keyset_core::{driver::Driver, Schema};

use std::sync::Arc;

#[derive(Debug, Default)]
pub struct Builder {
    config: Config,
}

impl Builder {
    /// Replaces the planner configuration.
    pub fn config(&mut self, config: Config) -> &mut Self {
        self.config = config;
        self
    }

    pub fn default_page_size(&mut self, size: impl Into<Option<u64>>) -> &mut Self {
        self.config.default_page_size(size);
        self
    }

    pub fn max_page_size(&mut self, size: impl Into<Option<u64>>) -> &mut Self {
        self.config.max_page_size(size);
        self
    }

    pub fn build(&self, schema: impl Into<Arc<Schema>>, driver: impl Driver) -> Result<Planner> {
        self.config.verify()?;

        Ok(Planner {
            schema: schema.into(),
            config: Arc::new(self.config.clone()),
            driver: Arc::new(driver),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyset_driver_memory::Memory;
    use std_util::assert_err;

    #[test]
    fn rejects_default_above_max() {
        let err = assert_err!(Planner::builder()
            .default_page_size(50u64)
            .max_page_size(10u64)
            .build(Schema::default(), Memory::new()));

        assert!(err.is_invalid_argument());
    }

    #[test]
    fn keeps_config() {
        let planner = Planner::builder()
            .default_page_size(None)
            .build(Schema::default(), Memory::new())
            .unwrap();

        assert_eq!(planner.config().default_page_size, None);
    }
}
