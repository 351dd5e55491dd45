//! Serializable layout descriptions.
//!
//! A manifest captures a finalized layout without offsets; offsets and the
//! stride are flat sums of field sizes, so rebuilding through a
//! [`LayoutBuilder`] and finalizing reproduces them byte for byte. This
//! lets reflection output be cached, diffed, or shipped without re-running
//! the producer.

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::layout::{FieldKind, Layout, LayoutBuilder};
use crate::types::ElementType;

/// Serializable description of one layout level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutManifest {
    pub fields: Vec<FieldManifest>,
}

/// Serializable description of one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldManifest {
    Value { name: String, r#type: ElementType },
    Struct { name: String, fields: Vec<FieldManifest> },
    Padding { size: usize },
}

impl LayoutManifest {
    /// Captures a finalized layout.
    pub fn from_layout(layout: &Layout) -> Self {
        let fields = layout
            .fields()
            .iter()
            .map(|field| match field.kind() {
                FieldKind::Value(ty) => FieldManifest::Value {
                    name: field.name().to_string(),
                    r#type: *ty,
                },
                FieldKind::Struct(nested) => FieldManifest::Struct {
                    name: field.name().to_string(),
                    fields: Self::from_layout(nested).fields,
                },
                FieldKind::Padding => FieldManifest::Padding { size: field.size() },
            })
            .collect();
        Self { fields }
    }

    /// Rebuilds an open builder from this description.
    ///
    /// # Errors
    /// [`LayoutError::DuplicateField`] if the manifest repeats a name within
    /// one level, which hand-written manifests can do.
    pub fn into_builder(self) -> Result<LayoutBuilder, LayoutError> {
        let mut builder = LayoutBuilder::new();
        for field in self.fields {
            match field {
                FieldManifest::Value { name, r#type } => builder.append(r#type, name)?,
                FieldManifest::Struct { name, fields } => {
                    let nested = LayoutManifest { fields }.into_builder()?;
                    builder.append_struct(name, nested)?;
                }
                FieldManifest::Padding { size } => builder.append_padding(size),
            }
        }
        Ok(builder)
    }
}
