//! Crate-wide error type.
//!
//! Every fallible operation returns `AppError`. The `kind` drives the process exit
//! code in `main`, the message is printed as-is.

/// Error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid user configuration (CLI flags, env, config values).
    InvalidConfig,
    /// File system or serialization failure.
    Io,
    /// Likelihood requested on a model with no y/sigma bound.
    UnboundObservations,
    /// Input outside the mathematical domain (e.g. x with < 2 distinct values).
    InvalidDomainInput,
    /// Sampler state cannot satisfy the request (empty chain, bad interval).
    Sampling,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::InvalidConfig | ErrorKind::Io => 2,
            ErrorKind::UnboundObservations => 3,
            ErrorKind::InvalidDomainInput | ErrorKind::Sampling => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidConfig, message)
    }

    pub fn domain(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidDomainInput, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }

    pub fn sampling(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Sampling, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        self.kind.exit_code()
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_kind() {
        assert_eq!(AppError::config("x").exit_code(), 2);
        assert_eq!(AppError::new(ErrorKind::UnboundObservations, "x").exit_code(), 3);
        assert_eq!(AppError::domain("x").exit_code(), 4);
    }

    #[test]
    fn display_is_message_only() {
        let err = AppError::io("Failed to open 'a.csv'");
        assert_eq!(err.to_string(), "Failed to open 'a.csv'");
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
