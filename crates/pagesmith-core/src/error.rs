//! Editor error types.

use crate::element::{ElementId, ElementType};
use thiserror::Error;

/// Errors raised by element, layer and interaction operations.
///
/// A failed operation leaves the document untouched and records no history.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    #[error("Element not found: {0}")]
    NotFound(ElementId),
    #[error("Content for {found} cannot be stored on a {expected} element")]
    ContentMismatch {
        expected: ElementType,
        found: ElementType,
    },
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
    #[error("Unknown element type: {0}")]
    UnknownElementType(String),
    #[error("Cannot make {parent} the parent of {child}")]
    InvalidParent { child: ElementId, parent: ElementId },
}

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;
