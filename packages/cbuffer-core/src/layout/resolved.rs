//! Finalized, read-only layout state.

use std::collections::HashMap;
use std::fmt;

use crate::error::LayoutError;
use crate::types::ElementType;

/// What a finalized field holds.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// A fixed-size scalar, vector, or matrix value
    Value(ElementType),
    /// A nested layout, exclusively owned by this field
    Struct(Layout),
    /// Anonymous filler, unaddressable by name
    Padding,
}

/// One entry of a finalized layout.
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    offset: usize,
    size: usize,
    kind: FieldKind,
}

impl Field {
    pub(crate) fn new(name: String, offset: usize, size: usize, kind: FieldKind) -> Self {
        Self {
            name,
            offset,
            size,
            kind,
        }
    }

    /// Field name; padding fields carry a placeholder that is absent from
    /// the lookup map.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Byte offset within the owning layout.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Byte size; for struct fields, the nested layout's stride.
    pub fn size(&self) -> usize {
        self.size
    }

    /// First byte past this field (offset + size).
    pub fn end_offset(&self) -> usize {
        self.offset + self.size
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Value kind for value fields, `None` for structs and padding.
    pub fn element_type(&self) -> Option<ElementType> {
        match self.kind {
            FieldKind::Value(ty) => Some(ty),
            _ => None,
        }
    }

    /// Nested layout for struct fields.
    pub fn nested(&self) -> Option<&Layout> {
        match &self.kind {
            FieldKind::Struct(layout) => Some(layout),
            _ => None,
        }
    }

    pub fn is_padding(&self) -> bool {
        matches!(self.kind, FieldKind::Padding)
    }
}

/// A finalized element layout: ordered fields with computed offsets and a
/// total stride.
///
/// Produced by [`LayoutBuilder::finalize`](crate::layout::LayoutBuilder::finalize)
/// and immutable from then on. `Clone` deep-copies nested layouts, so clones
/// own independent storage at every depth.
#[derive(Debug, Clone)]
pub struct Layout {
    fields: Vec<Field>,
    index: HashMap<String, usize>,
    stride: usize,
}

impl Layout {
    pub(crate) fn new(fields: Vec<Field>, index: HashMap<String, usize>, stride: usize) -> Self {
        Self {
            fields,
            index,
            stride,
        }
    }

    /// Total byte size of one element.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// All fields in declaration order, padding included.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Number of fields, padding included.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field metadata by declaration index.
    ///
    /// # Errors
    /// [`LayoutError::FieldIndexOutOfRange`] past the last field.
    pub fn field(&self, index: usize) -> Result<&Field, LayoutError> {
        self.fields
            .get(index)
            .ok_or(LayoutError::FieldIndexOutOfRange {
                index,
                count: self.fields.len(),
            })
    }

    /// Field metadata by name. Padding fields are unaddressable.
    ///
    /// # Errors
    /// [`LayoutError::FieldNotFound`] for an unknown name.
    pub fn field_by_name(&self, name: &str) -> Result<&Field, LayoutError> {
        let index = *self
            .index
            .get(name)
            .ok_or_else(|| LayoutError::FieldNotFound {
                field: name.to_string(),
            })?;
        Ok(&self.fields[index])
    }

    fn fmt_fields(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        for field in &self.fields {
            for _ in 0..indent {
                f.write_str("  ")?;
            }
            let type_name = match field.kind() {
                FieldKind::Value(ty) => ty.name(),
                FieldKind::Struct(_) => "Struct",
                FieldKind::Padding => "Padding",
            };
            writeln!(
                f,
                "{} (offset: {}, size: {}, type: {})",
                field.name(),
                field.offset(),
                field.size(),
                type_name
            )?;
            if let Some(nested) = field.nested() {
                nested.fmt_fields(f, indent + 1)?;
            }
        }
        Ok(())
    }
}

/// Recursive indented dump, one field per line. Not part of the binary
/// contract; the format may change freely.
impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_fields(f, 0)
    }
}
