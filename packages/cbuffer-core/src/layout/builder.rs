//! Open, appendable layout state.

use std::collections::HashMap;

use crate::error::LayoutError;
use crate::layout::{Field, FieldKind, Layout};
use crate::types::ElementType;

/// Placeholder name for padding entries in dumps. Padding never enters the
/// name map, so the name cannot be used to address the field.
const PADDING_NAME: &str = "<padding>";

/// An open layout under construction.
///
/// Fields are appended in declaration order; offsets do not exist yet.
/// [`finalize`](LayoutBuilder::finalize) consumes the builder and produces
/// the read-only [`Layout`], so mutation after finalization is
/// unrepresentable.
#[derive(Debug, Default)]
pub struct LayoutBuilder {
    fields: Vec<BuilderField>,
    /// Field index by name; padding entries are excluded.
    index: HashMap<String, usize>,
}

#[derive(Debug)]
struct BuilderField {
    name: String,
    kind: BuilderFieldKind,
}

#[derive(Debug)]
enum BuilderFieldKind {
    Value(ElementType),
    Struct(LayoutBuilder),
    Padding(usize),
}

impl LayoutBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a fixed-size value field.
    ///
    /// # Errors
    /// [`LayoutError::DuplicateField`] if `name` is already taken at this
    /// level.
    pub fn append(&mut self, ty: ElementType, name: impl Into<String>) -> Result<(), LayoutError> {
        let name = name.into();
        self.reserve_name(&name)?;
        self.index.insert(name.clone(), self.fields.len());
        self.fields.push(BuilderField {
            name,
            kind: BuilderFieldKind::Value(ty),
        });
        Ok(())
    }

    /// Appends a struct field, taking ownership of its nested builder. The
    /// nested builder may still be empty; [`descend`](LayoutBuilder::descend)
    /// can fill it in afterwards.
    ///
    /// # Errors
    /// [`LayoutError::DuplicateField`] if `name` is already taken at this
    /// level.
    pub fn append_struct(
        &mut self,
        name: impl Into<String>,
        nested: LayoutBuilder,
    ) -> Result<(), LayoutError> {
        let name = name.into();
        self.reserve_name(&name)?;
        self.index.insert(name.clone(), self.fields.len());
        self.fields.push(BuilderField {
            name,
            kind: BuilderFieldKind::Struct(nested),
        });
        Ok(())
    }

    /// Appends an anonymous filler field. A zero-byte request is a no-op.
    pub fn append_padding(&mut self, bytes: usize) {
        if bytes == 0 {
            return;
        }
        self.fields.push(BuilderField {
            name: PADDING_NAME.to_string(),
            kind: BuilderFieldKind::Padding(bytes),
        });
    }

    /// Returns a mutable handle to the nested builder of the struct field
    /// `name`, for configuring its members in place.
    ///
    /// # Errors
    /// [`LayoutError::FieldNotFound`] for an unknown name,
    /// [`LayoutError::NotAStruct`] when the field holds a value.
    pub fn descend(&mut self, name: &str) -> Result<&mut LayoutBuilder, LayoutError> {
        let index = *self
            .index
            .get(name)
            .ok_or_else(|| LayoutError::FieldNotFound {
                field: name.to_string(),
            })?;
        match &mut self.fields[index].kind {
            BuilderFieldKind::Struct(nested) => Ok(nested),
            _ => Err(LayoutError::NotAStruct {
                field: name.to_string(),
            }),
        }
    }

    /// Sum of the field sizes appended so far, recursing into nested
    /// builders. This is the padding math for producers that declare fields
    /// at known absolute offsets within a scope.
    pub fn current_size(&self) -> usize {
        self.fields
            .iter()
            .map(|field| match &field.kind {
                BuilderFieldKind::Value(ty) => ty.byte_size(),
                BuilderFieldKind::Struct(nested) => nested.current_size(),
                BuilderFieldKind::Padding(bytes) => *bytes,
            })
            .sum()
    }

    /// Number of fields appended so far, padding included.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Computes every field offset and the total stride, consuming the
    /// builder. Nested builders finalize first so their strides are known
    /// when the owning struct field's size is fixed.
    ///
    /// # Errors
    /// [`LayoutError::SizeOverflow`] if the accumulated offsets exceed
    /// `usize::MAX`.
    pub fn finalize(self) -> Result<Layout, LayoutError> {
        let mut fields = Vec::with_capacity(self.fields.len());
        let mut offset = 0usize;

        for builder_field in self.fields {
            let (kind, size) = match builder_field.kind {
                BuilderFieldKind::Value(ty) => (FieldKind::Value(ty), ty.byte_size()),
                BuilderFieldKind::Struct(nested) => {
                    let layout = nested.finalize()?;
                    let stride = layout.stride();
                    (FieldKind::Struct(layout), stride)
                }
                BuilderFieldKind::Padding(bytes) => (FieldKind::Padding, bytes),
            };

            fields.push(Field::new(builder_field.name, offset, size, kind));

            offset = offset
                .checked_add(size)
                .ok_or(LayoutError::SizeOverflow {
                    operation: "field offset accumulation",
                })?;
        }

        tracing::debug!(fields = fields.len(), stride = offset, "layout finalized");

        Ok(Layout::new(fields, self.index, offset))
    }

    fn reserve_name(&self, name: &str) -> Result<(), LayoutError> {
        if self.index.contains_key(name) {
            return Err(LayoutError::DuplicateField {
                field: name.to_string(),
            });
        }
        Ok(())
    }
}
