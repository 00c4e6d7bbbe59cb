use super::{Comma, Formatter, Params, ToSql};

use keyset_core::stmt::Value;

impl ToSql for &Value {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            Value::Null => fmt!(f, "NULL"),
            Value::Bool(true) => fmt!(f, "TRUE"),
            Value::Bool(false) => fmt!(f, "FALSE"),
            Value::List(values) => fmt!(f, "(" Comma(values) ")"),
            Value::Record(record) => fmt!(f, "(" Comma(&record[..]) ")"),
            value => {
                let placeholder = f.params.push(value);
                fmt!(f, placeholder);
            }
        }
    }
}
