use crate::{
    stmt::{ValueRecord, ValueStream},
    Error, Result,
};

#[derive(Debug)]
pub struct Response {
    pub rows: Rows,
}

#[derive(Debug)]
pub enum Rows {
    /// Number of rows matching an ungrouped count query
    Count(u64),

    /// Operation result, as a stream of records
    Values(ValueStream),
}

impl Response {
    pub fn count(count: u64) -> Self {
        Self {
            rows: Rows::Count(count),
        }
    }

    pub fn value_stream(values: impl Into<ValueStream>) -> Self {
        Self {
            rows: Rows::value_stream(values),
        }
    }

    pub fn empty_value_stream() -> Self {
        Self {
            rows: Rows::Values(ValueStream::default()),
        }
    }
}

impl Rows {
    pub fn value_stream(values: impl Into<ValueStream>) -> Self {
        Self::Values(values.into())
    }

    pub fn is_count(&self) -> bool {
        matches!(self, Self::Count(_))
    }

    pub fn is_values(&self) -> bool {
        matches!(self, Self::Values(_))
    }

    pub async fn dup(&mut self) -> Result<Self> {
        match self {
            Rows::Count(count) => Ok(Rows::Count(*count)),
            Rows::Values(values) => Ok(Rows::Values(values.dup().await?)),
        }
    }

    pub fn into_count(self) -> Result<u64> {
        match self {
            Rows::Count(count) => Ok(count),
            Rows::Values(_) => Err(Error::invalid_result("expected Count, got Values")),
        }
    }

    pub fn into_values(self) -> Result<ValueStream> {
        match self {
            Self::Values(values) => Ok(values),
            Self::Count(_) => Err(Error::invalid_result("expected Values, got Count")),
        }
    }

    /// Drains the rows into records.
    pub async fn into_records(self) -> Result<Vec<ValueRecord>> {
        self.into_values()?.collect_records().await
    }
}
