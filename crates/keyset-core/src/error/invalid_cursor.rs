use super::Error;

/// Error when a cursor cannot be decoded against the active ordering.
///
/// Cursors are opaque to clients, so any failure (bad encoding, a payload
/// produced under a different ordering, values of the wrong type) is
/// reported the same way.
#[derive(Debug)]
pub(super) struct InvalidCursor {
    message: Box<str>,
}

impl std::error::Error for InvalidCursor {}

impl core::fmt::Display for InvalidCursor {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid cursor: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid cursor error.
    pub fn invalid_cursor(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidCursor(InvalidCursor {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid cursor error.
    pub fn is_invalid_cursor(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidCursor(_))
    }
}
