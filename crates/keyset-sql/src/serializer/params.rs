use super::{Flavor, Formatter, ToSql};

use keyset_core::stmt;

pub trait Params {
    fn push(&mut self, param: &stmt::Value) -> Placeholder;
}

/// One-based position of a bound parameter.
pub struct Placeholder(pub usize);

impl Params for Vec<stmt::Value> {
    fn push(&mut self, value: &stmt::Value) -> Placeholder {
        self.push(value.clone());
        Placeholder(self.len())
    }
}

impl ToSql for Placeholder {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match f.serializer.flavor {
            Flavor::Mysql => fmt!(f, "?"),
            Flavor::Postgresql => fmt!(f, "$" self.0),
            Flavor::Sqlite => fmt!(f, "?" self.0),
        }
    }
}
