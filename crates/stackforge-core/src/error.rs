//! Unified error handling for Stackforge Core.
//!
//! This module provides a unified error type that wraps domain and resolver
//! errors, with user-actionable suggestions. The downstream ports
//! ([`crate::application::ports`]) return [`StackforgeResult`] so adapter
//! failures flow through the same surface.

use thiserror::Error;

use crate::domain::DomainError;
use crate::resolver::ResolverFault;

/// Root error type for Stackforge Core operations.
#[derive(Debug, Error, Clone)]
pub enum StackforgeError {
    /// Errors from the domain layer (values outside their field domains,
    /// malformed serialized input).
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// The fixpoint engine failed to converge — a rule-table authoring
    /// defect, never a user error.
    #[error("Resolver fault: {0}")]
    Resolver(#[from] ResolverFault),

    /// A downstream generator or installer failed.
    #[error("Generation failed: {message}")]
    Generation { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl StackforgeError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Resolver(_) => vec![
                "The compatibility rule table failed to converge".into(),
                "Please report this issue at: https://github.com/stackforge/stackforge/issues"
                    .into(),
            ],
            Self::Generation { message } => vec![
                format!("Project generation failed: {message}"),
                "Check write permissions on the target directory".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in Stackforge".into(),
                "Please report this issue at: https://github.com/stackforge/stackforge/issues"
                    .into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Compatibility => ErrorCategory::Compatibility,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Resolver(_) | Self::Internal { .. } => ErrorCategory::Internal,
            Self::Generation { .. } => ErrorCategory::Generation,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Compatibility,
    Generation,
    Internal,
}

/// Convenient result type alias.
pub type StackforgeResult<T> = Result<T, StackforgeError>;
