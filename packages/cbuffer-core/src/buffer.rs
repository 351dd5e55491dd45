//! Typed byte buffers mirroring one or more layout elements.

use crate::error::LayoutError;
use crate::layout::{Field, FieldKind, Layout, LayoutBuilder};
use crate::types::BufferValue;

/// An owned, zero-initialized byte region of `stride × count` bytes,
/// described by a finalized [`Layout`].
///
/// Element `i` occupies bytes `[i * stride, (i + 1) * stride)`. Access goes
/// through [`element`](ConstantBuffer::element) /
/// [`element_mut`](ConstantBuffer::element_mut) cursors; the packed region
/// itself is exposed by [`bytes`](ConstantBuffer::bytes) for upload.
#[derive(Debug, Clone)]
pub struct ConstantBuffer {
    layout: Layout,
    bytes: Vec<u8>,
}

impl ConstantBuffer {
    /// Finalizes `builder` and allocates a single element.
    pub fn new(builder: LayoutBuilder) -> Result<Self, LayoutError> {
        Self::with_elements(builder, 1)
    }

    /// Finalizes `builder` and allocates `count` elements.
    pub fn with_elements(builder: LayoutBuilder, count: usize) -> Result<Self, LayoutError> {
        let layout = builder.finalize()?;
        Self::from_layout(layout, count)
    }

    /// Allocates `count` elements for an already finalized layout.
    ///
    /// # Errors
    /// [`LayoutError::SizeOverflow`] if `stride × count` exceeds
    /// `usize::MAX`.
    pub fn from_layout(layout: Layout, count: usize) -> Result<Self, LayoutError> {
        let len = layout
            .stride()
            .checked_mul(count)
            .ok_or(LayoutError::SizeOverflow {
                operation: "buffer allocation",
            })?;

        tracing::debug!(
            stride = layout.stride(),
            count,
            bytes = len,
            "constant buffer allocated"
        );

        Ok(Self {
            layout,
            bytes: vec![0u8; len],
        })
    }

    /// The element layout.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Total byte length of the region.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Number of whole elements in the region; zero when the stride is
    /// zero.
    pub fn element_count(&self) -> usize {
        match self.layout.stride() {
            0 => 0,
            stride => self.bytes.len() / stride,
        }
    }

    /// The raw packed bytes, ready for upload.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Read-only cursor at the start of element `index`.
    ///
    /// # Errors
    /// [`LayoutError::ElementOutOfRange`] for `index >= element_count()`.
    pub fn element(&self, index: usize) -> Result<ElementRef<'_>, LayoutError> {
        let offset = self.element_offset(index)?;
        Ok(ElementRef {
            bytes: self.bytes.as_slice(),
            offset,
            layout: &self.layout,
            field: None,
        })
    }

    /// Mutable cursor at the start of element `index`.
    ///
    /// # Errors
    /// [`LayoutError::ElementOutOfRange`] for `index >= element_count()`.
    pub fn element_mut(&mut self, index: usize) -> Result<ElementMut<'_>, LayoutError> {
        let offset = self.element_offset(index)?;
        Ok(ElementMut {
            bytes: self.bytes.as_mut_slice(),
            offset,
            layout: &self.layout,
            field: None,
        })
    }

    fn element_offset(&self, index: usize) -> Result<usize, LayoutError> {
        let count = self.element_count();
        if index >= count {
            return Err(LayoutError::ElementOutOfRange { index, count });
        }
        Ok(index * self.layout.stride())
    }
}

/// Read-only cursor: an absolute byte position, the layout level names
/// resolve against, and the field resolved so far.
///
/// Cursors are transient borrows produced by [`ConstantBuffer::element`];
/// each [`field`](ElementRef::field) call returns a fresh cursor rather
/// than mutating in place. Descending into a struct field switches the
/// active level to its nested layout; resolving a value field keeps the
/// level, so sibling lookups stay valid on the parent cursor.
#[derive(Debug, Clone, Copy)]
pub struct ElementRef<'a> {
    bytes: &'a [u8],
    offset: usize,
    layout: &'a Layout,
    field: Option<&'a Field>,
}

impl<'a> ElementRef<'a> {
    /// Resolves `name` against the active layout level.
    ///
    /// # Errors
    /// [`LayoutError::FieldNotFound`] for an unknown name.
    pub fn field(self, name: &str) -> Result<ElementRef<'a>, LayoutError> {
        let (field, offset, layout) = resolve(self.layout, self.offset, name)?;
        Ok(ElementRef {
            bytes: self.bytes,
            offset,
            layout,
            field: Some(field),
        })
    }

    /// Copies the resolved field's bytes out and decodes them as `T`.
    ///
    /// # Errors
    /// [`LayoutError::NoFieldResolved`] on an element-root cursor,
    /// [`LayoutError::NotAValueField`] on a struct field,
    /// [`LayoutError::TypeMismatch`] when `T`'s tag differs from the
    /// field's.
    pub fn get<T: BufferValue>(&self) -> Result<T, LayoutError> {
        let span = value_span::<T>(self.field, self.offset)?;
        Ok(T::read_from(&self.bytes[span]))
    }
}

/// Mutable cursor; see [`ElementRef`] for the resolution rules.
#[derive(Debug)]
pub struct ElementMut<'a> {
    bytes: &'a mut [u8],
    offset: usize,
    layout: &'a Layout,
    field: Option<&'a Field>,
}

impl<'a> ElementMut<'a> {
    /// Resolves `name` against the active layout level, consuming the
    /// cursor.
    ///
    /// # Errors
    /// [`LayoutError::FieldNotFound`] for an unknown name.
    pub fn field(self, name: &str) -> Result<ElementMut<'a>, LayoutError> {
        let (field, offset, layout) = resolve(self.layout, self.offset, name)?;
        Ok(ElementMut {
            bytes: self.bytes,
            offset,
            layout,
            field: Some(field),
        })
    }

    /// Copies the resolved field's bytes out and decodes them as `T`.
    ///
    /// # Errors
    /// Same contracts as [`ElementRef::get`].
    pub fn get<T: BufferValue>(&self) -> Result<T, LayoutError> {
        let span = value_span::<T>(self.field, self.offset)?;
        Ok(T::read_from(&self.bytes[span]))
    }

    /// Encodes `value` into the resolved field's bytes.
    ///
    /// # Errors
    /// [`LayoutError::NoFieldResolved`] on an element-root cursor,
    /// [`LayoutError::NotAValueField`] on a struct field,
    /// [`LayoutError::TypeMismatch`] when the value's tag differs from the
    /// field's.
    pub fn set<T: BufferValue>(&mut self, value: T) -> Result<(), LayoutError> {
        let span = value_span::<T>(self.field, self.offset)?;
        value.write_to(&mut self.bytes[span]);
        Ok(())
    }
}

/// Shared name-resolution step: absolute offset advances by the field's
/// offset; struct fields switch the active layout level.
fn resolve<'a>(
    layout: &'a Layout,
    offset: usize,
    name: &str,
) -> Result<(&'a Field, usize, &'a Layout), LayoutError> {
    let field = layout.field_by_name(name)?;
    let offset = offset + field.offset();
    let level = match field.kind() {
        FieldKind::Struct(nested) => nested,
        _ => layout,
    };
    Ok((field, offset, level))
}

/// Checks the value-access contract and returns the field's byte range.
/// Per-field offsets come from the finalized layout's own accounting, so no
/// further bounds check is needed beyond the element-index check.
fn value_span<T: BufferValue>(
    field: Option<&Field>,
    offset: usize,
) -> Result<std::ops::Range<usize>, LayoutError> {
    let field = field.ok_or(LayoutError::NoFieldResolved)?;
    let ty = match field.kind() {
        FieldKind::Value(ty) => *ty,
        _ => {
            return Err(LayoutError::NotAValueField {
                field: field.name().to_string(),
            })
        }
    };
    if ty != T::ELEMENT_TYPE {
        return Err(LayoutError::TypeMismatch {
            field: field.name().to_string(),
            expected: ty,
            got: T::ELEMENT_TYPE,
        });
    }
    Ok(offset..offset + ty.byte_size())
}
