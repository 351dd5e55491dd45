//! Layout schema: the open builder and the finalized, offset-resolved form.

mod builder;
mod resolved;

pub use builder::LayoutBuilder;
pub use resolved::{Field, FieldKind, Layout};
