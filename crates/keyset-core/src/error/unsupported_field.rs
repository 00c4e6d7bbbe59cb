use super::Error;

/// Error when a selection references a field or edge the entity does not
/// declare.
#[derive(Debug)]
pub(super) struct UnsupportedField {
    entity: Box<str>,
    field: Box<str>,
}

impl std::error::Error for UnsupportedField {}

impl core::fmt::Display for UnsupportedField {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unsupported field: `{}.{}`", self.entity, self.field)
    }
}

impl Error {
    /// Creates an unsupported field error.
    pub fn unsupported_field(entity: impl Into<String>, field: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnsupportedField(UnsupportedField {
            entity: entity.into().into(),
            field: field.into().into(),
        }))
    }

    /// Returns `true` if this error is an unsupported field error.
    pub fn is_unsupported_field(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnsupportedField(_))
    }
}
