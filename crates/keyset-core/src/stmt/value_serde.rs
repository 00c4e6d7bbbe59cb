use super::Value;

use serde::ser::{Serialize, SerializeSeq, Serializer};

/// Values serialize to their plain JSON form: scalars as JSON scalars,
/// `Null` as `null`, lists and records as arrays.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::I32(v) => serializer.serialize_i32(*v),
            Value::I64(v) => serializer.serialize_i64(*v),
            Value::Null => serializer.serialize_none(),
            Value::String(v) => serializer.serialize_str(v),
            Value::Uuid(v) => v.serialize(serializer),
            Value::List(items) => serialize_seq(items, serializer),
            Value::Record(record) => serialize_seq(&record.fields, serializer),
        }
    }
}

fn serialize_seq<S: Serializer>(items: &[Value], serializer: S) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(items.len()))?;
    for item in items {
        seq.serialize_element(item)?;
    }
    seq.end()
}
