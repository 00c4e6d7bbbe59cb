use super::*;

use std::ops;

#[derive(Debug, Clone, PartialEq)]
pub struct ExprOr {
    pub operands: Vec<Expr>,
}

impl Expr {
    pub fn or(lhs: impl Into<Self>, rhs: impl Into<Self>) -> Self {
        let mut lhs = lhs.into();
        let rhs = rhs.into();

        match (&mut lhs, rhs) {
            (expr, rhs) if expr.is_false() => rhs,
            (_, expr) if expr.is_false() => lhs,
            (expr, _) if expr.is_true() => lhs,
            (_, expr) if expr.is_true() => expr,
            (Self::Or(lhs_or), Self::Or(rhs_or)) => {
                lhs_or.operands.extend(rhs_or.operands);
                lhs
            }
            (Self::Or(lhs_or), rhs) => {
                lhs_or.operands.push(rhs);
                lhs
            }
            (_, Self::Or(mut rhs_or)) => {
                rhs_or.operands.insert(0, lhs);
                rhs_or.into()
            }
            (_, rhs) => ExprOr {
                operands: vec![lhs, rhs],
            }
            .into(),
        }
    }

    /// Folds the operands into a disjunction. An empty set is `false`.
    pub fn or_from_vec(operands: Vec<Self>) -> Self {
        operands
            .into_iter()
            .fold(Expr::from(false), |acc, operand| Expr::or(acc, operand))
    }
}

impl ops::Deref for ExprOr {
    type Target = [Expr];

    fn deref(&self) -> &Self::Target {
        self.operands.deref()
    }
}

impl<'a> IntoIterator for &'a ExprOr {
    type IntoIter = std::slice::Iter<'a, Expr>;
    type Item = &'a Expr;

    fn into_iter(self) -> Self::IntoIter {
        self.operands.iter()
    }
}

impl From<ExprOr> for Expr {
    fn from(value: ExprOr) -> Self {
        Self::Or(value)
    }
}
