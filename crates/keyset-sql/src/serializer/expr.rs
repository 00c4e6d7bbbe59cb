use super::{Comma, Delimited, Formatter, Ident, Params, ToSql};

use keyset_core::stmt::{self, BinaryOp, Expr};

/// An operand of `AND` / `OR`. Nested conjunctions and disjunctions are
/// parenthesized.
struct Operand<'a>(&'a Expr);

impl ToSql for &Expr {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            Expr::And(expr) => {
                fmt!(f, Delimited(expr.operands.iter().map(Operand), " AND "));
            }
            Expr::BinaryOp(expr) => {
                let op = match expr.op {
                    BinaryOp::Eq => "=",
                    BinaryOp::Ne => "<>",
                    BinaryOp::Gt => ">",
                    BinaryOp::Ge => ">=",
                    BinaryOp::Lt => "<",
                    BinaryOp::Le => "<=",
                };

                fmt!(f, &*expr.lhs " " op " " {&*expr.rhs});
            }
            Expr::Column(column) => column.to_sql(f),
            Expr::InList(expr) if expr.list.is_empty() => fmt!(f, "FALSE"),
            Expr::InList(expr) => {
                fmt!(f, &*expr.expr " IN (" Comma(&expr.list) ")");
            }
            Expr::IsNull(expr) => {
                let negate = if expr.negate { "NOT " } else { "" };
                fmt!(f, &*expr.expr " IS " negate "NULL");
            }
            Expr::Or(expr) => {
                fmt!(f, Delimited(expr.operands.iter().map(Operand), " OR "));
            }
            Expr::Value(value) => value.to_sql(f),
        }
    }
}

impl ToSql for Operand<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self.0 {
            Expr::And(_) | Expr::Or(_) => fmt!(f, "(" self.0 ")"),
            expr => expr.to_sql(f),
        }
    }
}

impl ToSql for &stmt::ColumnRef {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, Ident(&self.table) "." Ident(&self.column));
    }
}

impl ToSql for &stmt::OrderByExpr {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let direction = match self.direction {
            stmt::Direction::Asc => " ASC",
            stmt::Direction::Desc => " DESC",
        };

        fmt!(f, &self.column direction);

        // Nulls sort before every other value. MySQL and SQLite already
        // order them that way, PostgreSQL needs telling.
        if f.serializer.is_postgresql() {
            let nulls = match self.direction {
                stmt::Direction::Asc => " NULLS FIRST",
                stmt::Direction::Desc => " NULLS LAST",
            };

            fmt!(f, nulls);
        }
    }
}
