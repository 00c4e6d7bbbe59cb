use super::Error;

/// Error when an ordering names a field that is missing or not orderable.
#[derive(Debug)]
pub(super) struct UnknownOrderField {
    entity: Box<str>,
    field: Box<str>,
}

impl std::error::Error for UnknownOrderField {}

impl core::fmt::Display for UnknownOrderField {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unknown order field: `{}.{}`", self.entity, self.field)
    }
}

impl Error {
    /// Creates an unknown order field error.
    pub fn unknown_order_field(entity: impl Into<String>, field: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnknownOrderField(UnknownOrderField {
            entity: entity.into().into(),
            field: field.into().into(),
        }))
    }

    /// Returns `true` if this error is an unknown order field error.
    pub fn is_unknown_order_field(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnknownOrderField(_))
    }
}
