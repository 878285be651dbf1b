//! Error formatting utilities for pomup
//!
//! Converts internal errors into clear, actionable messages for users.

use super::*;
use crate::core::file_error::FileOperationError;

/// Keywords that indicate permission-related errors
const PERMISSION_ERROR_KEYWORDS: &[&str] = &["permission", "denied", "access"];

/// Convert any error into a user-friendly format with contextual suggestions
///
/// Walks the error chain looking for a [`PomError`] or [`FileOperationError`] and
/// falls back to a generic context built from the top-level message.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let mut current_error: &dyn std::error::Error = error.as_ref();
    loop {
        if let Some(pom_error) = current_error.downcast_ref::<PomError>() {
            return create_error_context(pom_error);
        }

        if let Some(file_error) = current_error.downcast_ref::<FileOperationError>() {
            return file_error_context(file_error);
        }

        match current_error.source() {
            Some(source) => current_error = source,
            None => break,
        }
    }

    let error_msg = error.to_string();

    if PERMISSION_ERROR_KEYWORDS.iter().any(|&keyword| error_msg.contains(keyword)) {
        return ErrorContext::new(PomError::Other {
            message: error_msg,
        })
        .with_suggestion("Check file permissions and try running with appropriate privileges")
        .with_details("Permission was denied for the requested operation.");
    }

    ErrorContext::new(PomError::Other {
        message: error_msg,
    })
    .with_suggestion("Check the error message above for more details")
    .with_details("An unexpected error occurred. Please report this issue if it persists.")
}

fn file_error_context(file_error: &FileOperationError) -> ErrorContext {
    let path = file_error.file_path.to_string_lossy().to_string();
    if file_error.source.kind() == std::io::ErrorKind::PermissionDenied {
        return ErrorContext::new(PomError::PermissionDenied {
            operation: file_error.operation.to_string(),
            path,
        })
        .with_suggestion("Check file permissions and try running with appropriate privileges")
        .with_details(file_error.user_message());
    }

    ErrorContext::new(PomError::FileSystemError {
        operation: file_error.operation.to_string(),
        path,
    })
    .with_suggestion("Check that the path exists and you have the necessary permissions")
    .with_details(file_error.user_message())
}

/// Build an [`ErrorContext`] with suggestions tailored to a specific [`PomError`]
#[must_use]
pub fn create_error_context(error: &PomError) -> ErrorContext {
    match error {
        PomError::DescriptorParseError {
            file,
            reason,
            position,
        } => {
            let details = match position {
                Some(offset) => format!("{reason} (at byte offset {offset})"),
                None => reason.clone(),
            };
            ErrorContext::new(PomError::DescriptorParseError {
                file: file.clone(),
                reason: reason.clone(),
                position: *position,
            })
            .with_suggestion(
                "Check that every element is closed and the file is saved as UTF-8; \
                 no changes were written",
            )
            .with_details(details)
        }
        PomError::DescriptorNotFound {
            path,
        } => ErrorContext::new(PomError::DescriptorNotFound {
            path: path.clone(),
        })
        .with_suggestion("Pass the descriptor location explicitly with --pom")
        .with_details("pomup edits exactly the descriptor it is given"),
        PomError::InvalidCoordinate {
            coordinate,
            reason,
        } => ErrorContext::new(PomError::InvalidCoordinate {
            coordinate: coordinate.clone(),
            reason: reason.clone(),
        })
        .with_suggestion(
            "Use groupId:artifactId:version or groupId:artifactId:type[:classifier]:version",
        ),
        PomError::PatchTargetMissing {
            target,
        } => ErrorContext::new(PomError::PatchTargetMissing {
            target: target.clone(),
        })
        .with_suggestion("This is a bug in pomup; please report it with the descriptor attached")
        .with_details("No changes were written"),
        PomError::PendingChanges {
            path,
            summary,
        } => ErrorContext::new(PomError::PendingChanges {
            path: path.clone(),
            summary: summary.clone(),
        })
        .with_suggestion("Run `pomup add --write` with the same arguments to apply them"),
        PomError::ConfigError {
            message,
        } => ErrorContext::new(PomError::ConfigError {
            message: message.clone(),
        })
        .with_suggestion("Check ~/.pomup/config.toml or the file passed with --config"),
        PomError::FileSystemError {
            operation,
            path,
        } => ErrorContext::new(PomError::FileSystemError {
            operation: operation.clone(),
            path: path.clone(),
        })
        .with_suggestion("Check that the path exists and you have the necessary permissions"),
        PomError::PermissionDenied {
            operation,
            path,
        } => ErrorContext::new(PomError::PermissionDenied {
            operation: operation.clone(),
            path: path.clone(),
        })
        .with_suggestion("Check file permissions and try running with appropriate privileges"),
        PomError::Other {
            message,
        } => ErrorContext::new(PomError::Other {
            message: message.clone(),
        }),
    }
}
