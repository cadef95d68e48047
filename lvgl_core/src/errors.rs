//! # Error Types
//!
//! Structured error types for lvgl_core. Property writes, page and widget
//! lookups, document parsing and file operations all report through
//! [`LayoutError`].
//!
//! Problems that should not abort an import (an unknown widget tag, a
//! malformed number) are not errors; they are collected as
//! [`ImportWarning`](crate::deserialize::ImportWarning)s instead.
//!
//! ## Example
//!
//! ```rust
//! use lvgl_core::errors::{LayoutError, LayoutResult};
//!
//! fn require_page(page_id: &str, known: &[&str]) -> LayoutResult<()> {
//!     if !known.contains(&page_id) {
//!         return Err(LayoutError::page_not_found(page_id));
//!     }
//!     Ok(())
//! }
//!
//! assert!(require_page("main_page", &["main_page"]).is_ok());
//! assert_eq!(require_page("nope", &[]).unwrap_err().error_code(), "PAGE_NOT_FOUND");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for lvgl_core operations
pub type LayoutResult<T> = Result<T, LayoutError>;

/// Structured error type for model, serialization and file operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum LayoutError {
    /// Write to a property the widget's schema does not declare
    #[error("Unknown property '{property}' for widget type '{widget_type}'")]
    UnknownProperty {
        widget_type: String,
        property: String,
    },

    /// Write to a property that is fixed after construction
    #[error("Property '{property}' is read-only")]
    ReadOnlyProperty { property: String },

    /// A property value could not be coerced to the declared kind
    #[error("Invalid value for '{property}': {value} - {reason}")]
    InvalidProperty {
        property: String,
        value: String,
        reason: String,
    },

    /// Page id not present in the project
    #[error("Page not found: {page_id}")]
    PageNotFound { page_id: String },

    /// Widget id not present on the page
    #[error("Widget '{widget_id}' not found on page '{page_id}'")]
    WidgetNotFound { page_id: String, widget_id: String },

    /// Page id already in use
    #[error("Page already exists: {page_id}")]
    DuplicatePage { page_id: String },

    /// Input text could not be parsed at all
    #[error("Failed to parse {format} document: {reason}")]
    ParseError { format: String, reason: String },

    /// Input parsed, but is neither a project file nor an LVGL config
    #[error("Unrecognized document: {reason}")]
    UnrecognizedDocument { reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON/YAML serialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl LayoutError {
    /// Create an UnknownProperty error
    pub fn unknown_property(widget_type: impl Into<String>, property: impl Into<String>) -> Self {
        LayoutError::UnknownProperty {
            widget_type: widget_type.into(),
            property: property.into(),
        }
    }

    /// Create an InvalidProperty error
    pub fn invalid_property(
        property: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        LayoutError::InvalidProperty {
            property: property.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a PageNotFound error
    pub fn page_not_found(page_id: impl Into<String>) -> Self {
        LayoutError::PageNotFound {
            page_id: page_id.into(),
        }
    }

    /// Create a WidgetNotFound error
    pub fn widget_not_found(page_id: impl Into<String>, widget_id: impl Into<String>) -> Self {
        LayoutError::WidgetNotFound {
            page_id: page_id.into(),
            widget_id: widget_id.into(),
        }
    }

    /// Create a ParseError
    pub fn parse_error(format: impl Into<String>, reason: impl Into<String>) -> Self {
        LayoutError::ParseError {
            format: format.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        LayoutError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(
        path: impl Into<String>,
        locked_by: impl Into<String>,
        locked_at: impl Into<String>,
    ) -> Self {
        LayoutError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, LayoutError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            LayoutError::UnknownProperty { .. } => "UNKNOWN_PROPERTY",
            LayoutError::ReadOnlyProperty { .. } => "READ_ONLY_PROPERTY",
            LayoutError::InvalidProperty { .. } => "INVALID_PROPERTY",
            LayoutError::PageNotFound { .. } => "PAGE_NOT_FOUND",
            LayoutError::WidgetNotFound { .. } => "WIDGET_NOT_FOUND",
            LayoutError::DuplicatePage { .. } => "DUPLICATE_PAGE",
            LayoutError::ParseError { .. } => "PARSE_ERROR",
            LayoutError::UnrecognizedDocument { .. } => "UNRECOGNIZED_DOCUMENT",
            LayoutError::FileError { .. } => "FILE_ERROR",
            LayoutError::FileLocked { .. } => "FILE_LOCKED",
            LayoutError::SerializationError { .. } => "SERIALIZATION_ERROR",
            LayoutError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}
