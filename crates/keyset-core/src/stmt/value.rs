use super::*;

use uuid::Uuid;

#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// Boolean value
    Bool(bool),

    /// Signed 32-bit integer
    I32(i32),

    /// Signed 64-bit integer
    I64(i64),

    /// A list of values of the same type
    List(Vec<Value>),

    /// Null value
    #[default]
    Null,

    /// Record value, one entry per projected column
    Record(ValueRecord),

    /// String value
    String(String),

    /// UUID value
    Uuid(Uuid),
}

impl Value {
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub const fn is_record(&self) -> bool {
        matches!(self, Self::Record(_))
    }

    pub fn record_from_vec(fields: Vec<Self>) -> Self {
        ValueRecord::from_vec(fields).into()
    }

    pub fn list_from_vec(items: Vec<Self>) -> Self {
        Self::List(items)
    }

    /// Returns `true` if the value is a non-null instance of `ty`.
    pub fn is_a(&self, ty: Type) -> bool {
        matches!(
            (self, ty),
            (Self::Bool(_), Type::Bool)
                | (Self::I32(_), Type::I32)
                | (Self::I64(_), Type::I64)
                | (Self::String(_), Type::String)
                | (Self::Uuid(_), Type::Uuid)
        )
    }

    /// Returns the type of a scalar value, or `None` for null, lists and
    /// records.
    pub fn ty(&self) -> Option<Type> {
        match self {
            Self::Bool(_) => Some(Type::Bool),
            Self::I32(_) => Some(Type::I32),
            Self::I64(_) => Some(Type::I64),
            Self::String(_) => Some(Type::String),
            Self::Uuid(_) => Some(Type::Uuid),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Bool(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the value as an `i64`, widening 32-bit integers.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::I32(v) => Some(v as i64),
            Self::I64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_record(self) -> Option<ValueRecord> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(src: bool) -> Self {
        Self::Bool(src)
    }
}

impl From<i32> for Value {
    fn from(src: i32) -> Self {
        Self::I32(src)
    }
}

impl From<i64> for Value {
    fn from(src: i64) -> Self {
        Self::I64(src)
    }
}

impl From<String> for Value {
    fn from(src: String) -> Self {
        Self::String(src)
    }
}

impl From<&String> for Value {
    fn from(src: &String) -> Self {
        Self::String(src.clone())
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Self {
        Self::String(src.to_string())
    }
}

impl From<Uuid> for Value {
    fn from(src: Uuid) -> Self {
        Self::Uuid(src)
    }
}

impl From<ValueRecord> for Value {
    fn from(src: ValueRecord) -> Self {
        Self::Record(src)
    }
}

impl<T> From<Option<T>> for Value
where
    Value: From<T>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::from(value),
            None => Self::Null,
        }
    }
}
