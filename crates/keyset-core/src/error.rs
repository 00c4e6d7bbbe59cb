mod adhoc;
mod driver;
mod invalid_argument;
mod invalid_cursor;
mod invalid_result;
mod invalid_schema;
mod unknown_order_field;
mod unsupported_field;

use adhoc::AdhocError;
use driver::DriverError;
use invalid_argument::InvalidArgument;
use invalid_cursor::InvalidCursor;
use invalid_result::InvalidResult;
use invalid_schema::InvalidSchema;
use std::sync::Arc;
use unknown_order_field::UnknownOrderField;
use unsupported_field::UnsupportedField;

/// Returns early with an ad-hoc error built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::from_args(format_args!($($arg)*)))
    };
}

/// Builds an ad-hoc error from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// An error raised while planning or executing a paginated query.
///
/// The error is a single pointer wide and cheap to clone. Use the `is_*`
/// predicates to branch on the kind of failure.
#[derive(Clone)]
pub struct Error {
    inner: Option<Arc<ErrorInner>>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

impl Error {
    /// Adds context to this error.
    ///
    /// Context is displayed in reverse order: the most recently added context
    /// is shown first, followed by earlier context, ending with the root cause.
    #[inline(always)]
    pub fn context(self, consequent: impl IntoError) -> Error {
        self.context_impl(consequent.into_error())
    }

    #[inline(never)]
    #[cold]
    fn context_impl(self, consequent: Error) -> Error {
        let kind = match consequent.inner {
            Some(inner) => match Arc::try_unwrap(inner) {
                Ok(inner) => inner.kind,
                Err(shared) => ErrorKind::Adhoc(AdhocError::new(shared.kind.to_string())),
            },
            None => ErrorKind::Unknown,
        };

        Error {
            inner: Some(Arc::new(ErrorInner {
                kind,
                cause: Some(self),
            })),
        }
    }

    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.as_ref().and_then(|inner| inner.cause.as_ref())?;
            Some(err)
        }))
    }

    /// Returns the innermost error of the context chain.
    pub fn root(&self) -> &Error {
        let mut root = self;
        for err in self.chain() {
            root = err;
        }
        root
    }

    fn kind(&self) -> &ErrorKind {
        self.inner
            .as_ref()
            .map(|inner| &inner.kind)
            .unwrap_or(&ErrorKind::Unknown)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Driver(err) => Some(err),
            ErrorKind::Anyhow(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            let Some(ref inner) = self.inner else {
                return f.debug_struct("Error").field("kind", &"None").finish();
            };
            f.debug_struct("Error")
                .field("kind", &inner.kind)
                .field("cause", &inner.cause)
                .finish()
        }
    }
}

#[derive(Debug)]
enum ErrorKind {
    Anyhow(anyhow::Error),
    Adhoc(AdhocError),
    Driver(DriverError),
    InvalidArgument(InvalidArgument),
    InvalidCursor(InvalidCursor),
    InvalidResult(InvalidResult),
    InvalidSchema(InvalidSchema),
    UnknownOrderField(UnknownOrderField),
    UnsupportedField(UnsupportedField),
    Unknown,
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self {
            Anyhow(err) => core::fmt::Display::fmt(err, f),
            Adhoc(err) => core::fmt::Display::fmt(err, f),
            Driver(err) => core::fmt::Display::fmt(err, f),
            InvalidArgument(err) => core::fmt::Display::fmt(err, f),
            InvalidCursor(err) => core::fmt::Display::fmt(err, f),
            InvalidResult(err) => core::fmt::Display::fmt(err, f),
            InvalidSchema(err) => core::fmt::Display::fmt(err, f),
            UnknownOrderField(err) => core::fmt::Display::fmt(err, f),
            UnsupportedField(err) => core::fmt::Display::fmt(err, f),
            Unknown => f.write_str("unknown keyset error"),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Some(Arc::new(ErrorInner { kind, cause: None })),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        Error::from(ErrorKind::Anyhow(err))
    }
}

impl From<uuid::Error> for Error {
    fn from(err: uuid::Error) -> Error {
        Error::from(anyhow::Error::from(err))
    }
}

/// Trait for types that can be converted into an Error.
pub trait IntoError {
    /// Converts this type into an Error.
    fn into_error(self) -> Error;
}

impl IntoError for Error {
    #[inline(always)]
    fn into_error(self) -> Error {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_size() {
        // Error stays one word wide
        let expected_size = core::mem::size_of::<usize>();
        assert_eq!(expected_size, core::mem::size_of::<Error>());
    }

    #[test]
    fn error_from_args() {
        let err = Error::from_args(format_args!("page size {} exceeded", 42));
        assert_eq!(err.to_string(), "page size 42 exceeded");
    }

    #[test]
    fn error_chain_display() {
        let root = Error::invalid_cursor("not valid base64");
        let chained = root
            .context(err!("decoding `after`"))
            .context(err!("Todo.children"));

        assert_eq!(
            chained.to_string(),
            "Todo.children: decoding `after`: invalid cursor: not valid base64"
        );
    }

    #[test]
    fn context_keeps_root_kind() {
        let err = Error::unknown_order_field("Todo", "rank").context(err!("resolving orderBy"));

        assert!(!err.is_unknown_order_field());
        assert!(err.root().is_unknown_order_field());
    }

    #[test]
    fn anyhow_bridge() {
        let anyhow_err = anyhow::anyhow!("something failed");
        let our_err: Error = anyhow_err.into();
        assert_eq!(our_err.to_string(), "something failed");
    }

    #[test]
    fn invalid_argument_display() {
        let err = Error::invalid_argument("`first` and `last` cannot be used together");
        assert_eq!(
            err.to_string(),
            "invalid argument: `first` and `last` cannot be used together"
        );
        assert!(err.is_invalid_argument());
        assert!(!err.is_invalid_cursor());
    }

    #[test]
    fn unsupported_field_display() {
        let err = Error::unsupported_field("Todo", "color");
        assert_eq!(err.to_string(), "unsupported field: `Todo.color`");
        assert!(err.is_unsupported_field());
    }

    #[test]
    fn unknown_order_field_display() {
        let err = Error::unknown_order_field("Todo", "text");
        assert_eq!(err.to_string(), "unknown order field: `Todo.text`");
    }

    #[test]
    fn driver_error_passthrough() {
        let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "connection reset");
        let err = Error::driver(io_err);
        assert!(err.is_driver());
        assert_eq!(err.to_string(), "connection reset");
        assert!(std::error::Error::source(&err).is_some());
    }
}
