use super::{Comma, Formatter, Ident, Params, ToSql};

use keyset_core::stmt::{ColumnRef, Expr, OrderByExpr, QuerySpec, Returning, Source, Value, Window};

/// Name of the ranked sub-query of a windowed select
const SRC_QUERY: &str = "src_query";

/// Name of the per-partition rank column
const ROW_NUMBER: &str = "row_number";

struct Filter<'a>(&'a Expr);

struct OrderBy<'a>(&'a [OrderByExpr]);

struct Limit(Option<u64>);

/// A projected column renamed so the outer select of a windowed query can
/// refer to it.
struct Aliased<'a>(usize, &'a ColumnRef);

struct Alias(usize);

impl ToSql for &QuerySpec {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match (&self.returning, &self.window) {
            (Returning::Columns(columns), Some(window)) => windowed(self, columns, window, f),
            (Returning::Columns(columns), None) => {
                fmt!(f,
                    "SELECT " Comma(columns) " FROM " {&self.source}
                    Filter(&self.filter) OrderBy(&self.order_by) Limit(self.limit)
                );
            }
            (Returning::Count { group_by: Some(key) }, _) => {
                fmt!(f,
                    "SELECT " key ", COUNT(*) FROM " {&self.source}
                    Filter(&self.filter) " GROUP BY " key
                );
            }
            (Returning::Count { group_by: None }, _) => {
                fmt!(f, "SELECT COUNT(*) FROM " {&self.source} Filter(&self.filter));
            }
        }
    }
}

/// Ranks rows within each partition in a CTE and keeps the first
/// `window.limit` of each.
fn windowed<P: Params>(
    query: &QuerySpec,
    columns: &[ColumnRef],
    window: &Window,
    f: &mut Formatter<'_, P>,
) {
    let aliased = columns.iter().enumerate().map(|(i, column)| Aliased(i, column));

    fmt!(f,
        "WITH " Ident(SRC_QUERY) " AS (SELECT " Comma(aliased)
        ", ROW_NUMBER() OVER (PARTITION BY " {&window.partition_by}
    );

    if !query.order_by.is_empty() {
        fmt!(f, " ORDER BY " Comma(&query.order_by));
    }

    fmt!(f, ") AS " Ident(ROW_NUMBER) " FROM " {&query.source} Filter(&query.filter) ")");

    // Pushed after the filter so positional placeholders stay in order.
    let limit = f.params.push(&limit_value(window.limit));

    fmt!(f,
        " SELECT " Comma((0..columns.len()).map(Alias)) " FROM " Ident(SRC_QUERY)
        " WHERE " Ident(ROW_NUMBER) " <= " limit
        " ORDER BY " Ident(ROW_NUMBER) Limit(query.limit)
    );
}

impl ToSql for &Source {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, Ident(&self.table));

        if let Some(join) = &self.join {
            fmt!(f,
                " INNER JOIN " Ident(&join.table)
                " ON " Ident(&join.table) "." Ident(&join.column) " = " {&join.on}
            );
        }
    }
}

impl ToSql for Filter<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        if !self.0.is_true() {
            fmt!(f, " WHERE " self.0);
        }
    }
}

impl ToSql for OrderBy<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        if !self.0.is_empty() {
            fmt!(f, " ORDER BY " Comma(self.0));
        }
    }
}

/// Limits past `i64::MAX` saturate.
fn limit_value(limit: u64) -> Value {
    Value::I64(i64::try_from(limit).unwrap_or(i64::MAX))
}

impl ToSql for Limit {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        if let Some(limit) = self.0 {
            let placeholder = f.params.push(&limit_value(limit));
            fmt!(f, " LIMIT " placeholder);
        }
    }
}

impl ToSql for Aliased<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, self.1 " AS " Alias(self.0));
    }
}

impl ToSql for Alias {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, Ident(format!("c{}", self.0)));
    }
}
