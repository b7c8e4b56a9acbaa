//! Error management.

use derive_more::Display;

/// The errors reported by the builders, loaders and kernels.
///
/// `InvalidArgument` and `UnsupportedOperation` are configuration mistakes made by the
/// caller, `RangeError` and `OutOfMemory` are resource failures. The remaining variants
/// come from the data sources.
#[derive(Debug, Display)]
pub enum Error {
    #[display(fmt = "invalid argument: {}", _0)]
    InvalidArgument(String),
    #[display(fmt = "range error: {}", _0)]
    RangeError(String),
    #[display(fmt = "unsupported operation: {}", _0)]
    UnsupportedOperation(String),
    #[display(fmt = "out of memory: {}", _0)]
    OutOfMemory(String),
    #[display(fmt = "io error: {}", _0)]
    Io(std::io::Error),
    #[display(fmt = "parse error: {}", _0)]
    Parse(String),
    #[display(fmt = "sqlite error: {}", _0)]
    Sqlite(rusqlite::Error),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Sqlite(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        Error::Sqlite(e)
    }
}

impl From<std::collections::TryReserveError> for Error {
    fn from(e: std::collections::TryReserveError) -> Self {
        Error::OutOfMemory(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub(crate) fn range_error<S: Into<String>>(msg: S) -> Self {
        Error::RangeError(msg.into())
    }

    pub(crate) fn unsupported<S: Into<String>>(msg: S) -> Self {
        Error::UnsupportedOperation(msg.into())
    }
}

/// Allocates an empty vector able to hold `len` elements, reporting allocation
/// failure as [`Error::OutOfMemory`] instead of aborting.
pub(crate) fn try_with_capacity<T>(len: usize) -> Result<Vec<T>> {
    let mut vec = Vec::new();
    vec.try_reserve_exact(len)?;
    Ok(vec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            Error::invalid_argument("empty edge list").to_string(),
            "invalid argument: empty edge list"
        );
        assert_eq!(
            Error::unsupported("semantic match").to_string(),
            "unsupported operation: semantic match"
        );
    }

    #[test]
    fn test_try_with_capacity() {
        let vec: Vec<u64> = try_with_capacity(16).unwrap();
        assert!(vec.is_empty());
        assert!(vec.capacity() >= 16);
        assert!(matches!(
            try_with_capacity::<u64>(usize::MAX),
            Err(Error::OutOfMemory(_))
        ));
    }
}
