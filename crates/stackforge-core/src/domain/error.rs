use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (adapters may retry or re-prompt)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// A value outside its field's declared domain.
    #[error("unsupported value '{value}' for {field}")]
    UnsupportedValue {
        field: &'static str,
        value: String,
        supported: Vec<&'static str>,
    },

    /// A set-valued field received members that cannot coexist.
    #[error("invalid {field} selection: {reason}")]
    InvalidSelection { field: &'static str, reason: String },

    /// A serialized configuration (command string or URL state) that could
    /// not be decoded.
    #[error("malformed {source_kind}: {reason}")]
    MalformedInput {
        source_kind: &'static str,
        reason: String,
    },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::UnsupportedValue {
                field, supported, ..
            } => {
                let mut out = vec![format!("Supported values for --{field}:")];
                for v in supported {
                    out.push(format!("  • {v}"));
                }
                out
            }
            Self::InvalidSelection { field, reason } => vec![
                format!("The {field} selection is invalid: {reason}"),
                "Pick at most one web frontend; 'native' may be added alongside it".into(),
            ],
            Self::MalformedInput { source_kind, .. } => vec![
                format!("The {source_kind} could not be parsed"),
                "Re-create it with 'stackforge new' or the visual builder".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnsupportedValue { .. } | Self::InvalidSelection { .. } => {
                ErrorCategory::Validation
            }
            Self::MalformedInput { .. } => ErrorCategory::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Compatibility,
    Internal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_value_suggestions_list_domain() {
        let err = DomainError::UnsupportedValue {
            field: "database",
            value: "oracle".into(),
            supported: vec!["sqlite", "postgres"],
        };
        let s = err.suggestions();
        assert!(s.iter().any(|l| l.contains("sqlite")));
        assert!(s.iter().any(|l| l.contains("postgres")));
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn display_names_field_and_value() {
        let err = DomainError::UnsupportedValue {
            field: "orm",
            value: "hibernate".into(),
            supported: vec![],
        };
        let msg = err.to_string();
        assert!(msg.contains("orm"));
        assert!(msg.contains("hibernate"));
    }
}
