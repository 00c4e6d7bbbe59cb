use super::*;

/// Boolean and scalar expressions used in query filters.
///
/// Filters supplied by the caller (`where` arguments) are carried through
/// to storage untouched; the planner only ever adds conjuncts.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// AND a set of boolean expressions
    And(ExprAnd),

    /// Binary comparison
    BinaryOp(ExprBinaryOp),

    /// Reference to a column of the queried source
    Column(ColumnRef),

    /// Whether an expression is contained in a list of values
    InList(ExprInList),

    /// Whether an expression is (or is not) null
    IsNull(ExprIsNull),

    /// OR a set of boolean expressions
    Or(ExprOr),

    /// Evaluates to a constant value
    Value(Value),
}

impl Expr {
    pub fn column(column: ColumnRef) -> Self {
        Self::Column(column)
    }

    /// Returns true if the expression is the `true` boolean literal.
    pub fn is_true(&self) -> bool {
        matches!(self, Self::Value(Value::Bool(true)))
    }

    /// Returns true if the expression is the `false` boolean literal.
    pub fn is_false(&self) -> bool {
        matches!(self, Self::Value(Value::Bool(false)))
    }

    pub fn is_value_null(&self) -> bool {
        matches!(self, Self::Value(Value::Null))
    }
}

impl Default for Expr {
    fn default() -> Self {
        Self::Value(Value::Bool(true))
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Self::Value(Value::Bool(value))
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<ColumnRef> for Expr {
    fn from(value: ColumnRef) -> Self {
        Self::Column(value)
    }
}

impl From<&ColumnRef> for Expr {
    fn from(value: &ColumnRef) -> Self {
        Self::Column(value.clone())
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Self::Value(value.into())
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Self::Value(value.into())
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Self::Value(value.into())
    }
}
