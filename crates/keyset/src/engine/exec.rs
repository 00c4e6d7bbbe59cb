use super::{assemble, paginate, window, ConnectionPlan, EdgeLoad, EdgePlan, Link, NodePlan};
use crate::{EdgeValue, Node, PageResult, Result};

use async_recursion::async_recursion;
use futures::future::try_join_all;
use indexmap::{IndexMap, IndexSet};
use keyset_core::{
    driver::{Driver, Rows},
    stmt::{QuerySpec, Value, ValueRecord},
    Error, Schema,
};
use std::sync::Arc;

/// Dispatches the queries of a plan and stitches the results together.
///
/// Holds no state of its own; every call builds fresh queries from the
/// immutable plan.
pub(crate) struct Exec<'a> {
    pub(crate) schema: &'a Arc<Schema>,
    pub(crate) driver: &'a dyn Driver,
}

/// Fetched rows grouped by parent key. Unlinked queries use `Value::Null`.
type Grouped<T> = IndexMap<Value, Vec<T>>;

impl Exec<'_> {
    /// Loads a connection for every parent in `keys`, or the root connection
    /// when unlinked. Every requested key gets a page.
    pub(crate) async fn connection(
        &self,
        plan: &ConnectionPlan,
        link: Option<&Link>,
        keys: Option<&[Value]>,
    ) -> Result<IndexMap<Value, PageResult>> {
        let schema = &**self.schema;
        let partitions = keys.map(<[Value]>::to_vec).unwrap_or_else(|| vec![Value::Null]);

        let Some(edges) = &plan.edges else {
            return self.count_pages(plan, link, keys, partitions).await;
        };

        let rows = self.fetch_rows(
            window::rows(schema, plan, &edges.node, link, keys),
            edges.node.width(link),
            link.is_some(),
        );

        let totals = async {
            if plan.needs_count_query() {
                let query = window::count(schema, plan, link, keys, false);
                self.fetch_counts(query, link.is_some()).await.map(Some)
            } else {
                Ok(None)
            }
        };

        let (mut rows, totals) = futures::try_join!(rows, totals)?;

        let mut trimmed = vec![];
        let mut slices = vec![];

        for key in partitions {
            let mut page_rows = rows.swap_remove(&key).unwrap_or_default();

            // Without a page cap or cursors the fetched rows are the whole set.
            let total = match &totals {
                Some(counts) => count_of(counts, &key),
                None => page_rows.len() as u64,
            };

            let overflow = paginate::trim(&mut page_rows, plan.page_size, plan.scan);
            slices.push((key, page_rows.len(), overflow, total));
            trimmed.extend(page_rows);
        }

        let mut built = if edges.select_node {
            Some(nodes(self, &edges.node, &trimmed).await?.into_iter())
        } else {
            None
        };

        let mut trimmed = trimmed.into_iter();
        let mut pages = IndexMap::with_capacity(slices.len());

        for (key, len, overflow, total) in slices {
            let rows = trimmed.by_ref().take(len).collect();
            let nodes = built
                .as_mut()
                .map(|built| built.by_ref().take(len).collect());
            let total = plan.total_count.then_some(total);

            let page = assemble::page(schema, plan, rows, nodes, overflow, total)?;
            pages.insert(key, page);
        }

        Ok(pages)
    }

    /// Answers `totalCount` and `pageInfo` without transferring rows.
    async fn count_pages(
        &self,
        plan: &ConnectionPlan,
        link: Option<&Link>,
        keys: Option<&[Value]>,
        partitions: Vec<Value>,
    ) -> Result<IndexMap<Value, PageResult>> {
        let schema = &**self.schema;
        let grouped = link.is_some();

        // Without cursors the bounded set is the whole set, so one count
        // serves both.
        let count_total = plan.total_count || (plan.page_info && !plan.has_bounds());
        let count_bounded = plan.page_info && plan.has_bounds();

        let totals = async {
            if count_total {
                let query = window::count(schema, plan, link, keys, false);
                self.fetch_counts(query, grouped).await.map(Some)
            } else {
                Ok(None)
            }
        };

        let bounded = async {
            if count_bounded {
                let query = window::count(schema, plan, link, keys, true);
                self.fetch_counts(query, grouped).await.map(Some)
            } else {
                Ok(None)
            }
        };

        let (totals, bounded) = futures::try_join!(totals, bounded)?;

        Ok(partitions
            .into_iter()
            .map(|key| {
                let total = totals.as_ref().map(|counts| count_of(counts, &key));
                let matching = bounded
                    .as_ref()
                    .map(|counts| count_of(counts, &key))
                    .or(total)
                    .unwrap_or(0);

                let overflow = plan
                    .page_size
                    .is_some_and(|page_size| matching > page_size);

                let total = total.filter(|_| plan.total_count);
                (key, assemble::counts_only(plan, overflow, total))
            })
            .collect())
    }

    /// Looks up nodes by identifier, in the order requested.
    pub(crate) async fn lookup(&self, plan: &NodePlan, ids: &[Value]) -> Result<Vec<Option<Node>>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let query = window::lookup(self.schema, plan, ids);
        let rows = self
            .fetch_rows(query, plan.width(None), false)
            .await?
            .swap_remove(&Value::Null)
            .unwrap_or_default();

        let by_id: IndexMap<_, _> = nodes(self, plan, &rows)
            .await?
            .into_iter()
            .map(|node| (node.id.clone(), node))
            .collect();

        Ok(ids.iter().map(|id| by_id.get(id).cloned()).collect())
    }

    /// Loads one edge for every parent row. Returns a value per row.
    async fn edge(&self, edge: &EdgePlan, rows: &[ValueRecord]) -> Result<Vec<EdgeValue>> {
        let link = &edge.link;
        let parent_key = |row: &ValueRecord| row[link.parent_key].clone();

        let keys: Vec<Value> = rows
            .iter()
            .map(parent_key)
            .filter(|key| !key.is_null())
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect();

        match &edge.load {
            EdgeLoad::Connection(plan) => {
                let pages = if keys.is_empty() {
                    IndexMap::new()
                } else {
                    self.connection(plan, Some(link), Some(&keys[..])).await?
                };

                Ok(rows
                    .iter()
                    .map(|row| {
                        let page = pages
                            .get(&parent_key(row))
                            .cloned()
                            .unwrap_or_else(|| assemble::empty(plan));
                        EdgeValue::Connection(page)
                    })
                    .collect())
            }
            EdgeLoad::One(plan) | EdgeLoad::List(plan) => {
                let related = if keys.is_empty() {
                    IndexMap::new()
                } else {
                    let query = window::related(self.schema, plan, link, &keys);
                    let grouped = self
                        .fetch_rows(query, plan.node.width(Some(link)), true)
                        .await?;
                    self.group_nodes(&plan.node, grouped).await?
                };

                let to_one = matches!(edge.load, EdgeLoad::One(_));

                Ok(rows
                    .iter()
                    .map(|row| {
                        let nodes = related.get(&parent_key(row));

                        if to_one {
                            let node = nodes.and_then(|nodes| nodes.first()).cloned();
                            EdgeValue::One(node.map(Box::new))
                        } else {
                            EdgeValue::List(nodes.cloned().unwrap_or_default())
                        }
                    })
                    .collect())
            }
        }
    }

    /// Builds nodes for rows fetched for many parents at once, keeping the
    /// grouping.
    async fn group_nodes(
        &self,
        plan: &NodePlan,
        grouped: Grouped<ValueRecord>,
    ) -> Result<Grouped<Node>> {
        let mut lens = Vec::with_capacity(grouped.len());
        let mut rows = vec![];

        for (key, group) in grouped {
            lens.push((key, group.len()));
            rows.extend(group);
        }

        let mut built = nodes(self, plan, &rows).await?.into_iter();

        Ok(lens
            .into_iter()
            .map(|(key, len)| (key, built.by_ref().take(len).collect()))
            .collect())
    }

    /// Runs a rows query and groups the records by the trailing partition
    /// column when `partitioned`.
    async fn fetch_rows(
        &self,
        query: QuerySpec,
        width: usize,
        partitioned: bool,
    ) -> Result<Grouped<ValueRecord>> {
        let records = self.query(query).await?.into_records().await?;
        let mut grouped = Grouped::new();

        for record in records {
            if record.len() != width {
                return Err(Error::invalid_result(format!(
                    "expected {width} columns, got {}",
                    record.len()
                )));
            }

            let (key, record) = if partitioned {
                let mut fields = record.into_vec();
                let key = fields.pop().unwrap_or_default();
                (key, ValueRecord::from_vec(fields))
            } else {
                (Value::Null, record)
            };

            grouped.entry(key).or_default().push(record);
        }

        Ok(grouped)
    }

    /// Runs a count query. Grouped counts come back as `[key, count]`
    /// records; an ungrouped count is reported under `Value::Null`.
    async fn fetch_counts(&self, query: QuerySpec, grouped: bool) -> Result<IndexMap<Value, u64>> {
        let rows = self.query(query).await?;

        if !grouped {
            return Ok(IndexMap::from([(Value::Null, rows.into_count()?)]));
        }

        rows.into_records()
            .await?
            .into_iter()
            .map(|record| match &record[..] {
                [key, Value::I64(count)] if *count >= 0 => Ok((key.clone(), *count as u64)),
                _ => Err(Error::invalid_result(format!(
                    "expected a `[key, count]` record, got {record:?}"
                ))),
            })
            .collect()
    }

    async fn query(&self, query: QuerySpec) -> Result<Rows> {
        tracing::debug!(
            table = %query.source.table,
            count = query.is_count(),
            limit = ?query.limit,
            window = ?query.window.as_ref().map(|window| window.limit),
            "dispatching query"
        );

        let response = self.driver.exec(self.schema, query.into()).await?;
        Ok(response.rows)
    }
}

fn count_of(counts: &IndexMap<Value, u64>, key: &Value) -> u64 {
    counts.get(key).copied().unwrap_or(0)
}

/// Builds nodes for `rows` and eager-loads their selected edges. Sibling
/// edges load concurrently.
#[async_recursion]
pub(crate) async fn nodes(
    exec: &Exec<'_>,
    plan: &NodePlan,
    rows: &[ValueRecord],
) -> Result<Vec<Node>> {
    let mut nodes: Vec<_> = rows.iter().map(|row| assemble::node(plan, row)).collect();

    if rows.is_empty() {
        return Ok(nodes);
    }

    let loads = plan
        .edges
        .iter()
        .map(|(key, edge)| async move { Ok::<_, Error>((key, exec.edge(edge, rows).await?)) });

    for (key, values) in try_join_all(loads).await? {
        for (node, value) in nodes.iter_mut().zip(values) {
            node.edges.insert(key.clone(), value);
        }
    }

    Ok(nodes)
}
