//! In-process storage driver.
//!
//! Holds rows per table and answers [`QuerySpec`]s by scanning them. Filters
//! use SQL's three-valued comparison semantics and null values sort first,
//! matching what the SQL serializer emits, so the driver can stand in for a
//! database in tests.

use keyset_core::{
    async_trait,
    driver::{Driver, Operation, Response},
    stmt::{ColumnRef, Direction, QuerySpec, Returning, Value, ValueRecord},
    Error, Result, Schema,
};

use indexmap::IndexMap;
use std::{
    cmp::Ordering,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

#[derive(Debug, Default)]
pub struct Memory {
    store: Mutex<Store>,
}

#[derive(Debug, Default)]
struct Store {
    tables: IndexMap<String, Vec<Row>>,

    /// When set, the next matching operation fails
    fail_next: Option<Failure>,
}

#[derive(Debug)]
struct Failure {
    /// Only operations reading this table fail. Any operation when `None`.
    table: Option<String>,
    message: String,
}

/// Column name to value
type Row = IndexMap<String, Value>;

/// One candidate row of a query: the source row and, when the source
/// joins, the matching join table row.
#[derive(Debug, Clone, Copy)]
struct Scope<'a> {
    table: &'a str,
    row: &'a Row,
    joined: Option<(&'a str, &'a Row)>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row to `table`. Columns left out read as null.
    pub fn insert<'a>(&self, table: &str, row: impl IntoIterator<Item = (&'a str, Value)>) {
        let row = row
            .into_iter()
            .map(|(column, value)| (column.to_string(), value))
            .collect();

        self.store()
            .tables
            .entry(table.to_string())
            .or_default()
            .push(row);
    }

    /// Makes the next operation fail with a driver error carrying `message`.
    pub fn fail_next(&self, message: impl Into<String>) {
        self.store().fail_next = Some(Failure {
            table: None,
            message: message.into(),
        });
    }

    /// Makes the next operation reading `table` fail. Operations on other
    /// tables are unaffected.
    pub fn fail_next_on(&self, table: impl Into<String>, message: impl Into<String>) {
        self.store().fail_next = Some(Failure {
            table: Some(table.into()),
            message: message.into(),
        });
    }

    fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Driver for Memory {
    async fn exec(&self, _schema: &Arc<Schema>, op: Operation) -> Result<Response> {
        let Operation::Query(query) = op;
        let mut store = self.store();

        let fails = store.fail_next.as_ref().is_some_and(|failure| {
            failure
                .table
                .as_ref()
                .map_or(true, |table| *table == query.source.table)
        });

        if let Some(failure) = fails.then(|| store.fail_next.take()).flatten() {
            return Err(Error::driver(std::io::Error::new(
                std::io::ErrorKind::Other,
                failure.message,
            )));
        }

        store.query(&query)
    }
}

impl Store {
    fn query(&self, query: &QuerySpec) -> Result<Response> {
        let mut scopes = vec![];

        for row in self.rows(&query.source.table) {
            let scope = Scope {
                table: &query.source.table,
                row,
                joined: None,
            };

            match &query.source.join {
                None => scopes.push(scope),
                Some(join) => {
                    let key = scope.resolve(&join.on)?;

                    if key.is_null() {
                        continue;
                    }

                    for joined in self.rows(&join.table) {
                        let matches = joined
                            .get(&join.column)
                            .is_some_and(|value| value.sort_eq(&key));

                        if matches {
                            scopes.push(Scope {
                                joined: Some((&join.table, joined)),
                                ..scope
                            });
                        }
                    }
                }
            }
        }

        let mut selected = vec![];

        for scope in scopes {
            if query.filter.eval_filter(&|column| scope.resolve(column))? {
                let sort_key = query
                    .order_by
                    .iter()
                    .map(|order_by| scope.resolve(&order_by.column))
                    .collect::<Result<Vec<_>>>()?;

                selected.push((sort_key, scope));
            }
        }

        selected.sort_by(|(lhs, _), (rhs, _)| {
            query
                .order_by
                .iter()
                .zip(lhs.iter().zip(rhs))
                .map(|(order_by, (a, b))| match order_by.direction {
                    Direction::Asc => a.cmp_sort(b),
                    Direction::Desc => b.cmp_sort(a),
                })
                .find(|ordering| ordering.is_ne())
                .unwrap_or(Ordering::Equal)
        });

        let mut selected: Vec<_> = selected.into_iter().map(|(_, scope)| scope).collect();

        if let Some(window) = &query.window {
            let mut ranks = IndexMap::<Value, u64>::new();
            let mut kept = vec![];

            for scope in selected {
                let rank = ranks.entry(scope.resolve(&window.partition_by)?).or_default();
                *rank += 1;

                if *rank <= window.limit {
                    kept.push(scope);
                }
            }

            selected = kept;
        }

        if let Some(limit) = query.limit {
            selected.truncate(limit as usize);
        }

        tracing::trace!(table = %query.source.table, rows = selected.len(), "memory query");

        match &query.returning {
            Returning::Columns(columns) => {
                let records = selected
                    .iter()
                    .map(|scope| {
                        let fields = columns
                            .iter()
                            .map(|column| scope.resolve(column))
                            .collect::<Result<Vec<_>>>()?;
                        Ok(Value::Record(ValueRecord::from_vec(fields)))
                    })
                    .collect::<Result<Vec<_>>>()?;

                Ok(Response::value_stream(records))
            }
            Returning::Count { group_by: None } => Ok(Response::count(selected.len() as u64)),
            Returning::Count {
                group_by: Some(column),
            } => {
                let mut counts = IndexMap::<Value, i64>::new();

                for scope in &selected {
                    *counts.entry(scope.resolve(column)?).or_default() += 1;
                }

                let records: Vec<Value> = counts
                    .into_iter()
                    .map(|(key, count)| Value::record_from_vec(vec![key, Value::I64(count)]))
                    .collect();

                Ok(Response::value_stream(records))
            }
        }
    }

    fn rows(&self, table: &str) -> &[Row] {
        self.tables.get(table).map(Vec::as_slice).unwrap_or_default()
    }
}

impl Scope<'_> {
    fn resolve(&self, column: &ColumnRef) -> Result<Value> {
        let row = if column.table == self.table {
            self.row
        } else {
            match self.joined {
                Some((table, row)) if column.table == table => row,
                _ => {
                    return Err(Error::driver(std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        format!("table `{}` is not part of the query", column.table),
                    )))
                }
            }
        };

        Ok(row.get(&column.column).cloned().unwrap_or_default())
    }
}
