//! Core types and functionality for pomup
//!
//! This module holds the pieces every stage of the pipeline shares: the error
//! taxonomy, user-facing error formatting, file operation context, and the
//! immutable [`OperationContext`] that carries configuration from the caller down
//! to the patcher.
//!
//! # Modules
//!
//! - `error` - [`PomError`] and [`ErrorContext`]
//! - `error_formatting` - [`user_friendly_error`] for CLI display
//! - `file_error` - [`file_error::FileOperationError`] and the
//!   [`file_error::FileResultExt`] extension trait
//! - `operation_context` - [`OperationContext`]

pub mod error;
mod error_formatting;
pub mod file_error;
pub mod operation_context;

pub use error::{ErrorContext, PomError};
pub use error_formatting::{create_error_context, user_friendly_error};
pub use operation_context::{DEFAULT_MAX_INHERITANCE_DEPTH, OperationContext};
