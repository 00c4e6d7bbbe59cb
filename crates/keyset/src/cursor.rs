use crate::{OrderSpec, Result};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use keyset_core::{schema::Entity, stmt::Value, Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque position of a row within an ordering.
///
/// Encodes the row's tie-break (identifier) value and, unless the ordering
/// is by identifier alone, its primary order value. Clients must treat the
/// token as an opaque string.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

/// The values a cursor points at.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorValues {
    /// Tie-break value
    pub id: Value,

    /// Primary order value, absent when ordering by identifier only
    pub primary: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Payload {
    i: Scalar,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    f: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    v: Option<Scalar>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Scalar {
    Null,
    Bool(bool),
    I32(i32),
    I64(i64),
    String(String),
    Uuid(Uuid),
}

impl Cursor {
    /// Wraps a token received from a client.
    pub fn new(token: impl Into<String>) -> Cursor {
        Cursor(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Encodes the position of a row under `order`.
    ///
    /// Encoding is deterministic: the same values always produce the same
    /// token.
    pub fn encode(order: &OrderSpec, entity: &Entity, values: &CursorValues) -> Result<Cursor> {
        let (f, v) = match &values.primary {
            Some(value) if !order.is_identifier_only() => {
                let field = entity.field(order.primary);
                (Some(field.name.app_name.clone()), Some(Scalar::from_value(value)?))
            }
            _ => (None, None),
        };

        let payload = Payload {
            i: Scalar::from_value(&values.id)?,
            f,
            v,
        };

        let json = serde_json::to_vec(&payload).map_err(anyhow::Error::from)?;
        Ok(Cursor(URL_SAFE_NO_PAD.encode(json)))
    }

    /// Decodes the cursor against `order`.
    ///
    /// Fails with `InvalidCursor` if the token is malformed, if it was
    /// produced under an ordering by a different field, or if its values do
    /// not fit the ordering's field types.
    pub fn decode(&self, order: &OrderSpec, entity: &Entity) -> Result<CursorValues> {
        let json = URL_SAFE_NO_PAD
            .decode(self.0.as_bytes())
            .map_err(|err| Error::invalid_cursor(format!("malformed token: {err}")))?;

        let payload: Payload = serde_json::from_slice(&json)
            .map_err(|err| Error::invalid_cursor(format!("malformed payload: {err}")))?;

        let identifier = entity.identifier();
        let id = payload.i.into_value();

        if !id.is_a(identifier.ty) {
            return Err(Error::invalid_cursor(format!(
                "`{}.{}` is {} but the cursor holds {id:?}",
                entity.name, identifier.name.app_name, identifier.ty
            )));
        }

        let primary = match (order.is_identifier_only(), payload.f, payload.v) {
            (true, None, None) => None,
            (false, Some(name), Some(value)) => {
                let field = entity.field(order.primary);

                if name != field.name.app_name {
                    return Err(Error::invalid_cursor(format!(
                        "cursor was produced ordering by `{name}`, not `{}`",
                        field.name.app_name
                    )));
                }

                let value = value.into_value();

                if !field.accepts(&value) {
                    return Err(Error::invalid_cursor(format!(
                        "`{}.{}` is {} but the cursor holds {value:?}",
                        entity.name, field.name.app_name, field.ty
                    )));
                }

                Some(value)
            }
            _ => {
                return Err(Error::invalid_cursor(
                    "cursor was produced under a different ordering",
                ))
            }
        };

        Ok(CursorValues { id, primary })
    }
}

impl Scalar {
    fn from_value(value: &Value) -> Result<Scalar> {
        Ok(match value {
            Value::Null => Scalar::Null,
            Value::Bool(v) => Scalar::Bool(*v),
            Value::I32(v) => Scalar::I32(*v),
            Value::I64(v) => Scalar::I64(*v),
            Value::String(v) => Scalar::String(v.clone()),
            Value::Uuid(v) => Scalar::Uuid(*v),
            Value::List(_) | Value::Record(_) => {
                return Err(Error::invalid_argument(format!(
                    "{value:?} cannot be encoded in a cursor"
                )))
            }
        })
    }

    fn into_value(self) -> Value {
        match self {
            Scalar::Null => Value::Null,
            Scalar::Bool(v) => Value::Bool(v),
            Scalar::I32(v) => Value::I32(v),
            Scalar::I64(v) => Value::I64(v),
            Scalar::String(v) => Value::String(v),
            Scalar::Uuid(v) => Value::Uuid(v),
        }
    }
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cursor({})", self.0)
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Cursor {
    fn from(value: &str) -> Self {
        Cursor::new(value)
    }
}

impl From<String> for Cursor {
    fn from(value: String) -> Self {
        Cursor::new(value)
    }
}
