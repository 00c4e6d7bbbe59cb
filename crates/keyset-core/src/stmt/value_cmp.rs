use super::Value;

use std::cmp::Ordering;

impl Value {
    /// Compares two values under the sort order used for keyset pagination.
    ///
    /// `Null` sorts before every other value. Integers compare numerically
    /// across widths. Values of unrelated types are ordered by kind so that
    /// the order stays total.
    pub fn cmp_sort(&self, other: &Value) -> Ordering {
        use Value::*;

        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Null, _) => Ordering::Less,
            (_, Null) => Ordering::Greater,
            (Bool(a), Bool(b)) => a.cmp(b),
            (I32(a), I32(b)) => a.cmp(b),
            (I64(a), I64(b)) => a.cmp(b),
            (I32(a), I64(b)) => (*a as i64).cmp(b),
            (I64(a), I32(b)) => a.cmp(&(*b as i64)),
            (String(a), String(b)) => a.cmp(b),
            (Uuid(a), Uuid(b)) => a.cmp(b),
            (List(a), List(b)) => cmp_slice(a, b),
            (Record(a), Record(b)) => cmp_slice(a, b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }

    /// Returns `true` if both values are equal under the sort order.
    ///
    /// Unlike `==`, this treats `I32(1)` and `I64(1)` as the same value.
    pub fn sort_eq(&self, other: &Value) -> bool {
        self.cmp_sort(other).is_eq()
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::I32(_) | Value::I64(_) => 2,
            Value::String(_) => 3,
            Value::Uuid(_) => 4,
            Value::List(_) => 5,
            Value::Record(_) => 6,
        }
    }
}

fn cmp_slice(lhs: &[Value], rhs: &[Value]) -> Ordering {
    for (a, b) in lhs.iter().zip(rhs) {
        match a.cmp_sort(b) {
            Ordering::Equal => {}
            ordering => return ordering,
        }
    }

    lhs.len().cmp(&rhs.len())
}
