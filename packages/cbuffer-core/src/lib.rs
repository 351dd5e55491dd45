//! Host-side mirrors of GPU constant-buffer memory layouts.
//!
//! A [`LayoutBuilder`] describes one buffer element as an ordered sequence
//! of typed fields: scalars, vectors, matrices, nested structs, and
//! explicit padding. Finalizing it computes every byte offset and the total
//! stride, yielding a read-only [`Layout`]; a [`ConstantBuffer`] then owns
//! `stride × count` packed bytes addressable by field name at any nesting
//! depth.
//!
//! Offsets are flat sums of field sizes; the layout never infers
//! alignment. A reflection producer that knows the target packing rules
//! supplies explicit padding, either directly or through the [`declare`]
//! declaration-stream consumer.

pub mod buffer;
pub mod declare;
pub mod error;
pub mod layout;
pub mod manifest;
pub mod registry;
pub mod types;

pub use buffer::{ConstantBuffer, ElementMut, ElementRef};
pub use error::LayoutError;
pub use layout::{Field, FieldKind, Layout, LayoutBuilder};
pub use manifest::{FieldManifest, LayoutManifest};
pub use registry::BufferRegistry;
pub use types::{BufferValue, ElementType};
