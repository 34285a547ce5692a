//! Comprehensive error handling for the Stackforge CLI.
//!
//! Provides structured errors with:
//! - User-friendly messages
//! - Actionable suggestions
//! - Proper error chaining
//! - Exit code mapping

use std::error::Error;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use thiserror::Error;

use stackforge_core::domain::DomainError;
use stackforge_core::error::StackforgeError;
use stackforge_core::resolver::{ResolveError, ResolverFault, RuleSetError, ValidationError};

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Comprehensive CLI error types.
#[derive(Debug, Error)]
pub enum CliError {
    /// Project already exists.
    #[error("Project already exists at {path}")]
    ProjectExists { path: PathBuf },

    /// Project name validation failed.
    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    /// Explicitly provided stack flags are mutually incompatible.
    ///
    /// Strict mode never silently overrides an explicit flag; each entry
    /// names both conflicting inputs.
    #[error("Incompatible stack selection ({} conflicting pair(s))", .conflicts.len())]
    StackConflict { conflicts: Vec<ValidationError> },

    /// A value outside its field's declared domain.
    #[error("Invalid value: {0}")]
    UnsupportedValue(#[from] DomainError),

    /// The fixpoint engine failed to converge — a rule-table authoring
    /// defect, never caused by user input.
    #[error("Internal resolver fault: {0}")]
    ResolverFault(#[from] ResolverFault),

    /// The built-in rule table failed startup validation.
    #[error("Internal rule table defect: {0}")]
    RuleTable(#[from] RuleSetError),

    // ── Config errors ──────────────────────────────────────────────────────
    /// A configuration file could not be read, parsed, or written.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The `--config` file does not exist.
    #[error("Configuration file not found: {path}")]
    ConfigFileNotFound { path: PathBuf },

    // ── Core errors ────────────────────────────────────────────────────────
    /// An error propagated from `stackforge-core` (generation, internal).
    #[error("Scaffolding failed: {0}")]
    Core(#[from] StackforgeError),

    // ── System errors ──────────────────────────────────────────────────────
    /// An I/O operation failed.
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Operation cancelled by user.
    #[error("Operation cancelled")]
    Cancelled,

    /// Feature not available (e.g., interactive mode without feature flag).
    #[error("Feature not available: {feature}")]
    FeatureNotAvailable { feature: &'static str },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<ResolveError> for CliError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::Rejected(conflicts) => CliError::StackConflict { conflicts },
            ResolveError::Fault(fault) => CliError::ResolverFault(fault),
        }
    }
}

impl CliError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ProjectExists { path } => vec![
                format!("The directory '{}' already exists", path.display()),
                "Use --force to overwrite (destructive)".into(),
                "Choose a different project name".into(),
            ],

            Self::InvalidProjectName { name, reason } => vec![
                format!("Project name '{name}' is invalid: {reason}"),
                "Use alphanumeric characters, hyphens, and underscores".into(),
                "Examples: my-app, my_api, project123".into(),
            ],

            Self::StackConflict { conflicts } => {
                let mut out: Vec<String> =
                    conflicts.iter().map(|c| format!("• {}", c.message)).collect();
                out.push("Drop one of the conflicting flags, or leave the dependent field".into());
                out.push("unset so it can be inferred".into());
                out.push("Run 'stackforge list' with your driving flags to see what fits".into());
                out
            }

            Self::UnsupportedValue(domain) => domain.suggestions(),

            Self::ResolverFault(_) | Self::RuleTable(_) => vec![
                "This is a defect in the built-in compatibility rules, not in your input".into(),
                "Please report this issue at: https://github.com/stackforge/stackforge/issues"
                    .into(),
            ],

            Self::ConfigError { message, .. } => vec![
                format!("Configuration issue: {message}"),
                "Check your config file with 'stackforge config path'".into(),
                "Keys look like 'defaults.database' or 'output.no_color'".into(),
            ],

            Self::ConfigFileNotFound { path } => vec![
                format!("No configuration file at '{}'", path.display()),
                "Create one with 'stackforge config set defaults.database sqlite'".into(),
                "Or omit --config to use the default location".into(),
            ],

            Self::Core(core_err) => core_err.suggestions(),

            Self::IoError { message, .. } => vec![
                format!("I/O operation failed: {message}"),
                "Check file permissions".into(),
                "Ensure the parent directory exists".into(),
            ],

            Self::Cancelled => vec![
                "Operation was cancelled".into(),
                "No changes were made".into(),
            ],

            Self::FeatureNotAvailable { feature } => vec![
                format!("The '{feature}' feature is not available in this build"),
                format!("Install with the feature enabled: cargo install stackforge-cli --features {feature}"),
                "Or pass the stack as flags: stackforge new my-app --yes".into(),
            ],
        }
    }

    /// Get the error category for styling and exit codes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ProjectExists { .. }
            | Self::InvalidProjectName { .. }
            | Self::StackConflict { .. }
            | Self::UnsupportedValue(_)
            | Self::Cancelled => ErrorCategory::UserError,
            Self::ConfigError { .. } | Self::FeatureNotAvailable { .. } => {
                ErrorCategory::Configuration
            }
            Self::ConfigFileNotFound { .. } => ErrorCategory::NotFound,
            Self::Core(core) => match core.category() {
                stackforge_core::error::ErrorCategory::Validation
                | stackforge_core::error::ErrorCategory::Compatibility => ErrorCategory::UserError,
                stackforge_core::error::ErrorCategory::Generation
                | stackforge_core::error::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::ResolverFault(_) | Self::RuleTable(_) | Self::IoError { .. } => {
                ErrorCategory::Internal
            }
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category      | Code |
    /// |---------------|------|
    /// | User error    |  2   |
    /// | Not found     |  3   |
    /// | Configuration |  4   |
    /// | Internal      |  1   |
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Internal => 1,
        }
    }

    /// Format the error for display with colors and suggestions.
    pub fn format_colored(&self, verbose: bool) -> String {
        let mut output = String::new();

        // Error header
        output.push_str(&format!(
            "\n{} {}\n\n",
            "✗".red().bold(),
            "Error:".red().bold()
        ));

        // Main error message
        output.push_str(&format!("  {}\n", self.to_string().red()));

        // Error chain (if verbose)
        if verbose {
            let mut source = self.source();
            while let Some(err) = source {
                output.push_str(&format!(
                    "\n  {} {}\n",
                    "→".dimmed(),
                    err.to_string().dimmed()
                ));
                source = err.source();
            }
        }

        // Suggestions
        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for suggestion in suggestions {
                output.push_str(&format!("  {suggestion}\n"));
            }
        }

        // Hint to re-run with -v
        if !verbose {
            output.push('\n');
            output.push_str(&format!(
                "{} {}\n",
                "\u{2139}".blue(), // ℹ
                "Use -v / --verbose for more details.".dimmed(),
            ));
        }

        output
    }

    /// Plain-text version of [`Self::format_colored`] — no ANSI codes.
    pub fn format_plain(&self, verbose: bool) -> String {
        let mut out = String::new();
        out.push_str(&format!("\nError: {self}\n"));

        if verbose {
            let mut src = Error::source(self);
            while let Some(err) = src {
                out.push_str(&format!("  Caused by: {err}\n"));
                src = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for s in &suggestions {
                out.push_str(&format!("  {s}\n"));
            }
        }

        if !verbose {
            out.push_str("\nUse -v / --verbose for more details.\n");
        }

        out
    }

    /// Log the error using tracing.
    ///
    /// Resolver faults get their own distinct event so rule-table defects
    /// are never mistaken for user errors in logs.
    pub fn log(&self) {
        match self {
            Self::ResolverFault(fault) => {
                tracing::error!(passes = fault.passes, "resolver failed to converge: {self}");
            }
            Self::RuleTable(_) => tracing::error!("rule table rejected at startup: {self}"),
            _ => match self.category() {
                ErrorCategory::UserError => tracing::warn!("User error: {self}"),
                ErrorCategory::NotFound => tracing::warn!("Not found: {self}"),
                ErrorCategory::Configuration => tracing::error!("Configuration error: {self}"),
                ErrorCategory::Internal => tracing::error!("Internal error: {self}"),
            },
        }

        if let Some(source) = self.source() {
            tracing::debug!("Caused by: {source}");
        }
    }
}

/// Error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// User input error (validation, invalid arguments, conflicts).
    UserError,
    /// Resource not found.
    NotFound,
    /// Configuration error.
    Configuration,
    /// Internal/system error.
    Internal,
}
