use super::Error;

/// Error when pagination arguments are malformed.
///
/// This occurs when:
/// - `first` and `last` are both supplied
/// - a count is negative or above the configured maximum page size
/// - an argument has the wrong shape (a string where an integer is expected)
/// - pagination arguments are passed to a to-one edge
#[derive(Debug)]
pub(super) struct InvalidArgument {
    message: Box<str>,
}

impl std::error::Error for InvalidArgument {}

impl core::fmt::Display for InvalidArgument {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid argument: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidArgument(InvalidArgument {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid argument error.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidArgument(_))
    }
}
