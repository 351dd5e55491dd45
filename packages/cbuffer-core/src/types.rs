//! Value kinds and their byte codecs.

use serde::{Deserialize, Serialize};

/// Wire representation of a boolean: a 32-bit 0/1 word.
pub type Bool32 = u32;

/// Data kinds a buffer field can hold directly.
///
/// Structs and padding are layout constructs, not value kinds; they live in
/// [`FieldKind`](crate::layout::FieldKind) instead, so a value append can
/// never name them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    Bool,
    Int,
    Float,
    Float3,
    Float4,
    Matrix4x4,
}

impl ElementType {
    /// Byte width of one value of this kind in the packed buffer.
    pub const fn byte_size(self) -> usize {
        match self {
            ElementType::Bool | ElementType::Int | ElementType::Float => 4,
            ElementType::Float3 => 12,
            ElementType::Float4 => 16,
            ElementType::Matrix4x4 => 64,
        }
    }

    /// Short display name, as used by the layout dump.
    pub const fn name(self) -> &'static str {
        match self {
            ElementType::Bool => "Bool",
            ElementType::Int => "Int",
            ElementType::Float => "Float",
            ElementType::Float3 => "Float3",
            ElementType::Float4 => "Float4",
            ElementType::Matrix4x4 => "Matrix4x4",
        }
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Conversion between a host value and the packed little-endian bytes of a
/// buffer field.
///
/// The slices passed to [`write_to`](BufferValue::write_to) and
/// [`read_from`](BufferValue::read_from) are exactly
/// `Self::ELEMENT_TYPE.byte_size()` long; the buffer checks the field tag
/// before invoking the codec, so each implementation only handles its own
/// fixed width.
pub trait BufferValue: Sized {
    /// The field tag this host type encodes.
    const ELEMENT_TYPE: ElementType;

    /// Encodes `self` into `dst`.
    fn write_to(&self, dst: &mut [u8]);

    /// Decodes a value from `src`.
    fn read_from(src: &[u8]) -> Self;
}

impl BufferValue for bool {
    const ELEMENT_TYPE: ElementType = ElementType::Bool;

    // Shader booleans are a 4-byte word; a host bool widens to 1 or 0.
    fn write_to(&self, dst: &mut [u8]) {
        let word: Bool32 = if *self { 1 } else { 0 };
        dst.copy_from_slice(&word.to_le_bytes());
    }

    fn read_from(src: &[u8]) -> Self {
        let mut word = [0u8; 4];
        word.copy_from_slice(src);
        Bool32::from_le_bytes(word) != 0
    }
}

impl BufferValue for i32 {
    const ELEMENT_TYPE: ElementType = ElementType::Int;

    fn write_to(&self, dst: &mut [u8]) {
        dst.copy_from_slice(&self.to_le_bytes());
    }

    fn read_from(src: &[u8]) -> Self {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(src);
        i32::from_le_bytes(bytes)
    }
}

// Reflection producers fold 32-bit unsigned scalars into the Int tag.
impl BufferValue for u32 {
    const ELEMENT_TYPE: ElementType = ElementType::Int;

    fn write_to(&self, dst: &mut [u8]) {
        dst.copy_from_slice(&self.to_le_bytes());
    }

    fn read_from(src: &[u8]) -> Self {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(src);
        u32::from_le_bytes(bytes)
    }
}

impl BufferValue for f32 {
    const ELEMENT_TYPE: ElementType = ElementType::Float;

    fn write_to(&self, dst: &mut [u8]) {
        dst.copy_from_slice(&self.to_le_bytes());
    }

    fn read_from(src: &[u8]) -> Self {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(src);
        f32::from_le_bytes(bytes)
    }
}

impl BufferValue for [f32; 3] {
    const ELEMENT_TYPE: ElementType = ElementType::Float3;

    fn write_to(&self, dst: &mut [u8]) {
        for (chunk, component) in dst.chunks_exact_mut(4).zip(self) {
            chunk.copy_from_slice(&component.to_le_bytes());
        }
    }

    fn read_from(src: &[u8]) -> Self {
        let mut out = [0.0f32; 3];
        read_components(src, &mut out);
        out
    }
}

impl BufferValue for [f32; 4] {
    const ELEMENT_TYPE: ElementType = ElementType::Float4;

    fn write_to(&self, dst: &mut [u8]) {
        for (chunk, component) in dst.chunks_exact_mut(4).zip(self) {
            chunk.copy_from_slice(&component.to_le_bytes());
        }
    }

    fn read_from(src: &[u8]) -> Self {
        let mut out = [0.0f32; 4];
        read_components(src, &mut out);
        out
    }
}

impl BufferValue for [[f32; 4]; 4] {
    const ELEMENT_TYPE: ElementType = ElementType::Matrix4x4;

    fn write_to(&self, dst: &mut [u8]) {
        for (chunk, component) in dst.chunks_exact_mut(4).zip(self.iter().flatten()) {
            chunk.copy_from_slice(&component.to_le_bytes());
        }
    }

    fn read_from(src: &[u8]) -> Self {
        let mut out = [[0.0f32; 4]; 4];
        for (chunk, component) in src.chunks_exact(4).zip(out.iter_mut().flatten()) {
            let mut bytes = [0u8; 4];
            bytes.copy_from_slice(chunk);
            *component = f32::from_le_bytes(bytes);
        }
        out
    }
}

fn read_components(src: &[u8], out: &mut [f32]) {
    for (chunk, component) in src.chunks_exact(4).zip(out.iter_mut()) {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(chunk);
        *component = f32::from_le_bytes(bytes);
    }
}
