//! Unified error type for domain operations.

use thiserror::Error;

/// Errors produced by domain rules. Business-rule variants
/// (`InsufficientFunds`, `InsufficientQuantity`) are not system faults;
/// callers report them to the user with enough detail to correct the
/// request, and no partial state is ever left behind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., missing or invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Entity not found
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Duplicate unique key
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A spend would take gold below zero
    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: i64, available: i64 },

    /// A removal asked for more than is held
    #[error("Insufficient quantity: requested {requested}, available {available}")]
    InsufficientQuantity { requested: u32, available: u32 },
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_display() {
        let err = DomainError::validation("name is required");
        assert_eq!(err.to_string(), "Validation failed: name is required");
    }

    #[test]
    fn not_found_carries_context() {
        let err = DomainError::not_found("Character", "abc123");
        assert!(err.is_not_found());
        assert!(err.to_string().contains("Character"));
        assert!(err.to_string().contains("abc123"));
    }

    #[test]
    fn insufficient_funds_display() {
        let err = DomainError::InsufficientFunds {
            required: 150,
            available: 100,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient funds: required 150, available 100"
        );
    }
}
