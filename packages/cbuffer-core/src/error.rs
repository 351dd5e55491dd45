//! Library error types.

use thiserror::Error;

use crate::types::ElementType;

/// Errors from layout construction, buffer access, and registries.
#[derive(Error, Debug, Clone)]
pub enum LayoutError {
    /// Field not found at the active layout level
    #[error("Field '{field}' not found in layout")]
    FieldNotFound { field: String },

    /// Field name appended twice within one layout level
    #[error("Field '{field}' already exists in layout")]
    DuplicateField { field: String },

    /// Descend target is not a struct field
    #[error("Field '{field}' is not a struct")]
    NotAStruct { field: String },

    /// Field index past the end of the layout
    #[error("Field index {index} out of range (layout has {count} fields)")]
    FieldIndexOutOfRange { index: usize, count: usize },

    /// Element index past the end of the buffer
    #[error("Element index {index} out of range (buffer has {count} elements)")]
    ElementOutOfRange { index: usize, count: usize },

    /// Read or write on a cursor that has not resolved a field
    #[error("No field resolved; descend into a field before reading or writing")]
    NoFieldResolved,

    /// Read or write on a struct field
    #[error("Field '{field}' is a struct and has no direct value")]
    NotAValueField { field: String },

    /// Value kind disagrees with the field's declared kind
    #[error("Type mismatch on field '{field}': expected {expected}, got {got}")]
    TypeMismatch {
        field: String,
        expected: ElementType,
        got: ElementType,
    },

    /// Offset or allocation arithmetic overflow
    #[error("Size overflow during {operation}")]
    SizeOverflow { operation: &'static str },

    /// Declared offset behind the bytes already laid out in its scope
    #[error("Declared offset {offset} for field '{field}' is behind current scope size {current}")]
    OffsetRegression {
        field: String,
        offset: usize,
        current: usize,
    },

    /// Registry name collision
    #[error("Buffer '{name}' already registered")]
    BufferAlreadyRegistered { name: String },
}
