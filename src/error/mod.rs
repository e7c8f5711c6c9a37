//! Error types.

use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// The error type used by the statistics propagation pass, the catalog and the plan builder.
///
/// Missing or imprecise statistics are never reported as errors. An error means that the caller
/// violated a contract (an invalid argument) or that the plan itself is malformed (an internal error).
#[derive(Debug)]
pub enum OptimizerError {
    /// A function has been called with an invalid argument.
    Argument(ArgumentError),
    /// One of the invariants of a logical plan or of the pass has been violated.
    Internal(InternalError),
}

impl OptimizerError {
    /// Creates an [argument error](OptimizerError::Argument).
    /// This method is a shorthand for `OptimizerError::Argument(ArgumentError::new(message))`.
    pub fn argument<T>(message: T) -> OptimizerError
    where
        T: Into<String>,
    {
        OptimizerError::Argument(ArgumentError::new(message))
    }

    /// Creates an [internal error](OptimizerError::Internal).
    /// This method is a shorthand for `OptimizerError::Internal(InternalError::new(message, None))`.
    pub fn internal<T>(message: T) -> OptimizerError
    where
        T: Into<String>,
    {
        OptimizerError::Internal(InternalError::new(message, None))
    }

    /// Returns a backtrace captured when this error has been created.
    pub fn backtrace(&self) -> &Backtrace {
        match self {
            OptimizerError::Argument(err) => &err.backtrace,
            OptimizerError::Internal(err) => &err.backtrace,
        }
    }
}

impl Display for OptimizerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OptimizerError::Argument(err) => write!(f, "Argument error: {}", err),
            OptimizerError::Internal(err) => write!(f, "Internal error: {}", err),
        }
    }
}

impl Error for OptimizerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            OptimizerError::Argument(_) => None,
            OptimizerError::Internal(InternalError { cause: Some(error), .. }) => Some(error),
            OptimizerError::Internal(_) => None,
        }
    }
}

impl From<ArgumentError> for OptimizerError {
    fn from(err: ArgumentError) -> Self {
        OptimizerError::Argument(err)
    }
}

impl From<InternalError> for OptimizerError {
    fn from(err: InternalError) -> Self {
        OptimizerError::Internal(err)
    }
}

/// Argument error. See [OptimizerError::Argument].
#[derive(Debug)]
pub struct ArgumentError {
    message: String,
    backtrace: Backtrace,
}

impl ArgumentError {
    /// Creates a new instance of an [ArgumentError].
    pub fn new<T>(message: T) -> Self
    where
        T: Into<String>,
    {
        ArgumentError {
            message: message.into(),
            backtrace: Backtrace::new(),
        }
    }
}

impl Display for ArgumentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", &self.message)
    }
}

/// Internal error. See [OptimizerError::Internal].
#[derive(Debug)]
pub struct InternalError {
    message: String,
    cause: Option<Box<OptimizerError>>,
    backtrace: Backtrace,
}

impl InternalError {
    /// Creates an instance of an [InternalError] with the given message and an optional cause.
    /// This method captures a backtrace.
    pub fn new<T>(message: T, err: Option<OptimizerError>) -> Self
    where
        T: Into<String>,
    {
        InternalError {
            message: message.into(),
            cause: err.map(Box::new),
            backtrace: Backtrace::new(),
        }
    }

    /// Creates an instance of an [InternalError] with the given message and cause.
    /// This method captures a backtrace.
    pub fn with_cause<T>(message: T, cause: OptimizerError) -> Self
    where
        T: Into<String>,
    {
        InternalError::new(message, Some(cause))
    }
}

impl Display for InternalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(cause) = self.cause.as_ref() {
            write!(f, " caused by: {}", cause)?
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::error::{InternalError, OptimizerError};
    use std::error::Error;

    #[test]
    fn internal_error_source() {
        let source_error = OptimizerError::argument("Table does not exist");
        let expected_source_error = format!("{}", source_error);

        let err = OptimizerError::Internal(InternalError::with_cause("Scan is not bound", source_error));
        assert!(err.source().is_some(), "no source error");

        let actual_source_error = err.source().unwrap();
        assert_eq!(format!("{}", actual_source_error), expected_source_error, "source error");
        assert_eq!(
            format!("{}", err),
            "Internal error: Scan is not bound caused by: Argument error: Table does not exist"
        );
    }

    #[test]
    fn argument_error_without_source() {
        let err = OptimizerError::argument("Unknown column: a9");
        assert!(err.source().is_none());
        assert_eq!(format!("{}", err), "Argument error: Unknown column: a9");
    }
}
