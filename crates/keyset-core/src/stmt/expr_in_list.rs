use super::*;

/// Tests whether an expression equals any value of a list.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprInList {
    pub expr: Box<Expr>,
    pub list: Vec<Value>,
}

impl Expr {
    pub fn in_list(expr: impl Into<Self>, list: impl Into<Vec<Value>>) -> Self {
        ExprInList {
            expr: Box::new(expr.into()),
            list: list.into(),
        }
        .into()
    }
}

impl From<ExprInList> for Expr {
    fn from(value: ExprInList) -> Self {
        Self::InList(value)
    }
}
