//! Error types for the generator runtime.

use thiserror::Error;

/// Boxed error for generator construction and run failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Runtime error types.
#[derive(Debug, Error)]
pub enum Error {
    /// A generator with this name is already registered.
    #[error("generator {name} already registered")]
    AlreadyRegistered { name: String },

    /// Generator construction failed during registration.
    #[error("failed to construct generator {name}")]
    Construction {
        name: String,
        #[source]
        source: BoxError,
    },

    /// `stop` exceeded its deadline with generator tasks still running.
    #[error("runtime stop timed out after {secs}s")]
    ShutdownTimeout { secs: u64 },

    /// A store operation failed.
    #[error(transparent)]
    Store(#[from] steward_state::Error),

    /// A generator-specific failure.
    #[error("generator error: {0}")]
    Generator(#[source] BoxError),
}

impl Error {
    /// Create an already registered error.
    pub fn already_registered(name: impl Into<String>) -> Self {
        Self::AlreadyRegistered { name: name.into() }
    }

    /// Create a construction error.
    pub fn construction(name: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Construction {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Create a shutdown timeout error.
    pub fn shutdown_timeout(deadline: std::time::Duration) -> Self {
        Self::ShutdownTimeout {
            secs: deadline.as_secs(),
        }
    }

    /// Create a generator error.
    pub fn generator(source: impl Into<BoxError>) -> Self {
        Self::Generator(source.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::already_registered("network-interfaces");
        assert!(err.to_string().contains("network-interfaces"));

        let err = Error::shutdown_timeout(std::time::Duration::from_secs(5));
        assert!(err.to_string().contains("5"));
    }

    #[test]
    fn test_store_error_conversion() {
        let err = Error::from(steward_state::Error::not_found("NetworkInterface", "eth0"));
        assert!(err.to_string().contains("eth0"));
    }

    #[test]
    fn test_generator_error_wraps_source() {
        let err = Error::generator(std::io::Error::other("probe went away"));
        assert!(err.to_string().contains("generator error"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
