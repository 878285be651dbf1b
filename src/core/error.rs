//! Error handling for pomup
//!
//! This module provides the error types and user-facing error reporting for the
//! descriptor mutation engine. The error system follows two principles:
//! 1. **Strongly-typed errors** for precise handling inside the engine
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`PomError`] - Enumerated error types for every fatal failure in pomup
//! - [`ErrorContext`] - Wrapper that adds suggestions and details for display
//!
//! Non-fatal conditions (a parent descriptor that cannot be located, a property
//! placeholder that cannot be substituted) are *not* errors; they are reported as
//! [`crate::operation::Warning`]s alongside the produced output.
//!
//! # Error Categories
//!
//! - **Parsing**: [`PomError::DescriptorParseError`]
//! - **Requests**: [`PomError::InvalidCoordinate`]
//! - **Patching**: [`PomError::PatchTargetMissing`]
//! - **Checking**: [`PomError::PendingChanges`]
//! - **File System**: [`PomError::FileSystemError`], [`PomError::PermissionDenied`]
//! - **Configuration**: [`PomError::ConfigError`]
//!
//! # Examples
//!
//! ```rust,no_run
//! use pomup_cli::core::{ErrorContext, PomError};
//!
//! let context = ErrorContext::new(PomError::DescriptorNotFound {
//!     path: "pom.xml".to_string(),
//! })
//! .with_suggestion("Pass the descriptor location with --pom")
//! .with_details("pomup does not search parent directories for pom.xml");
//!
//! context.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for pomup operations.
///
/// Every variant is fatal for the operation that raised it: callers must treat a
/// returned error as "no change applied". The only exception is
/// [`PomError::InvalidCoordinate`], which the operation layer catches per request
/// entry and reports in [`crate::operation::ModifiedOutput::rejected`].
#[derive(Error, Debug)]
pub enum PomError {
    /// The descriptor is not well-formed XML
    ///
    /// Raised for unbalanced or mismatched tags, a missing root element, invalid
    /// UTF-8 input, or an unusable encoding declaration. No partial result is
    /// produced.
    #[error("Invalid descriptor syntax in {file}: {reason}")]
    DescriptorParseError {
        /// Path (or label) of the descriptor that failed to parse
        file: String,
        /// Specific reason for the parsing failure
        reason: String,
        /// Byte offset where the failure was detected, when known
        position: Option<usize>,
    },

    /// Descriptor file not found at the caller-supplied location
    #[error("Descriptor not found: {path}")]
    DescriptorNotFound {
        /// The path that was expected to hold a pom.xml
        path: String,
    },

    /// A requested coordinate is missing a required field
    #[error("Invalid dependency coordinate '{coordinate}': {reason}")]
    InvalidCoordinate {
        /// The coordinate as written by the caller
        coordinate: String,
        /// Which field is missing or malformed
        reason: String,
    },

    /// A patch target vanished between classification and application
    ///
    /// This indicates an engine bug; it cannot happen when actions are applied to
    /// the same document they were classified against.
    #[error("Patch target missing: {target}")]
    PatchTargetMissing {
        /// Description of the node that could not be located
        target: String,
    },

    /// `pomup check` found requested changes that are not applied yet
    #[error("{path} needs updating: {summary}")]
    PendingChanges {
        /// Descriptor that would change
        path: String,
        /// Human-readable count of pending changes
        summary: String,
    },

    /// The pomup config file holds a value that cannot be used
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// An ancestor or descriptor path could not be inspected
    #[error("File system error: {operation}")]
    FileSystemError {
        /// What was attempted, including the underlying cause
        operation: String,
        path: String,
    },

    #[error("Permission denied: {operation}")]
    PermissionDenied { operation: String, path: String },

    /// Anything without a dedicated variant; only the message is shown
    #[error("{message}")]
    Other { message: String },
}

impl PomError {
    /// Build a parse error for the descriptor labelled `file`.
    pub fn parse(
        file: impl Into<String>,
        reason: impl Into<String>,
        position: Option<usize>,
    ) -> Self {
        Self::DescriptorParseError {
            file: file.into(),
            reason: reason.into(),
            position,
        }
    }

    /// Whether this error is a malformed-descriptor error.
    #[must_use]
    pub const fn is_parse_error(&self) -> bool {
        matches!(self, Self::DescriptorParseError { .. })
    }
}

/// A [`PomError`] plus the extra lines printed under it on the terminal.
#[derive(Debug)]
pub struct ErrorContext {
    pub error: PomError,
    /// Printed as `suggestion:`, usually the command or flag to try next
    pub suggestion: Option<String>,
    /// Printed as `details:`, e.g. the failing file and OS error
    pub details: Option<String>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(error: PomError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print to stderr: the error in red, details in yellow, the suggestion in green.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}
