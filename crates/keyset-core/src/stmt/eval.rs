use super::*;
use crate::Result;

impl Expr {
    /// Evaluates the expression against one row.
    ///
    /// `input` resolves column references. Comparisons follow SQL's
    /// three-valued logic: comparing against `Null` yields `Null`, and `AND`
    /// / `OR` propagate `Null` unless the outcome is already decided.
    pub fn eval<F>(&self, input: &F) -> Result<Value>
    where
        F: Fn(&ColumnRef) -> Result<Value>,
    {
        Ok(match self {
            Expr::And(expr) => {
                let mut unknown = false;
                for operand in expr {
                    match operand.eval(input)? {
                        Value::Bool(false) => return Ok(false.into()),
                        Value::Bool(true) => {}
                        Value::Null => unknown = true,
                        value => return Err(non_boolean(&value)),
                    }
                }
                if unknown {
                    Value::Null
                } else {
                    true.into()
                }
            }
            Expr::Or(expr) => {
                let mut unknown = false;
                for operand in expr {
                    match operand.eval(input)? {
                        Value::Bool(true) => return Ok(true.into()),
                        Value::Bool(false) => {}
                        Value::Null => unknown = true,
                        value => return Err(non_boolean(&value)),
                    }
                }
                if unknown {
                    Value::Null
                } else {
                    false.into()
                }
            }
            Expr::BinaryOp(expr) => {
                let lhs = expr.lhs.eval(input)?;
                let rhs = expr.rhs.eval(input)?;

                if lhs.is_null() || rhs.is_null() {
                    Value::Null
                } else {
                    expr.op.matches(lhs.cmp_sort(&rhs)).into()
                }
            }
            Expr::Column(column) => input(column)?,
            Expr::InList(expr) => {
                let value = expr.expr.eval(input)?;

                if value.is_null() {
                    Value::Null
                } else {
                    expr.list.iter().any(|item| item.sort_eq(&value)).into()
                }
            }
            Expr::IsNull(expr) => {
                let value = expr.expr.eval(input)?;
                (value.is_null() != expr.negate).into()
            }
            Expr::Value(value) => value.clone(),
        })
    }

    /// Evaluates a filter. Only a definite `true` selects the row.
    pub fn eval_filter<F>(&self, input: &F) -> Result<bool>
    where
        F: Fn(&ColumnRef) -> Result<Value>,
    {
        match self.eval(input)? {
            Value::Bool(selected) => Ok(selected),
            Value::Null => Ok(false),
            value => Err(non_boolean(&value)),
        }
    }
}

fn non_boolean(value: &Value) -> crate::Error {
    crate::err!("expected boolean expression, evaluated to {value:?}")
}
