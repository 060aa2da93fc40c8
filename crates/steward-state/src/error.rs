//! Error types for store operations.

use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Store error types.
///
/// Variants carry structured fields so callers can discriminate without
/// parsing messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// No resource exists under `(kind, name)`.
    #[error("resource {kind}/{name} not found")]
    NotFound { kind: String, name: String },

    /// A resource already exists under `(kind, name)`.
    #[error("resource {kind}/{name} already exists")]
    AlreadyExists { kind: String, name: String },

    /// Deletion is blocked until the finalizer list is emptied.
    #[error("resource {kind}/{name} has pending finalizers")]
    FinalizersPending { kind: String, name: String },

    /// Mutation attempted against a resource held by another owner.
    #[error("cannot {action} resource {kind}/{name} owned by {owner}")]
    Ownership {
        kind: String,
        name: String,
        /// The owner recorded on the stored resource.
        owner: String,
        /// The operation that was refused.
        action: String,
    },

    /// Operation targeted a kind outside the wrapper's allowlist.
    #[error("access to resource kind {kind:?} is not allowed for operation: {action}")]
    TypeRestricted { kind: String, action: String },

    /// The resource failed structural validation.
    #[error("invalid resource: {reason}")]
    Validation { reason: String },

    /// A typed view met a resource holding a foreign spec variant.
    #[error("resource does not contain a spec of kind {kind}")]
    SpecMismatch { kind: String },
}

impl Error {
    /// Create a not found error.
    pub fn not_found(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Create an already exists error.
    pub fn already_exists(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::AlreadyExists {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Create a finalizers pending error.
    pub fn finalizers_pending(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::FinalizersPending {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Create an ownership error.
    pub fn ownership(
        kind: impl Into<String>,
        name: impl Into<String>,
        owner: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self::Ownership {
            kind: kind.into(),
            name: name.into(),
            owner: owner.into(),
            action: action.into(),
        }
    }

    /// Create a type restricted error.
    pub fn type_restricted(kind: impl Into<String>, action: impl Into<String>) -> Self {
        Self::TypeRestricted {
            kind: kind.into(),
            action: action.into(),
        }
    }

    /// Create a validation error.
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// Create a spec mismatch error.
    pub fn spec_mismatch(kind: impl Into<String>) -> Self {
        Self::SpecMismatch { kind: kind.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::not_found("NetworkInterface", "eth0");
        assert!(err.to_string().contains("NetworkInterface/eth0"));
    }

    #[test]
    fn test_ownership_error_fields() {
        let err = Error::ownership("NetworkInterface", "eth0", "other", "update");
        assert!(err.to_string().contains("update"));
        assert!(err.to_string().contains("other"));
        assert!(matches!(
            err,
            Error::Ownership { ref action, .. } if action == "update"
        ));
    }

    #[test]
    fn test_type_restricted_display() {
        let err = Error::type_restricted("DHCPClient", "create");
        assert!(err.to_string().contains("DHCPClient"));
        assert!(err.to_string().contains("create"));
    }
}
