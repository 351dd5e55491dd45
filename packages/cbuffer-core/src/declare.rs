//! Consumer for reflection-style declaration streams.
//!
//! A shader reflection producer walks a constant buffer depth-first and
//! emits, per scope, declarations in ascending offset order. Offsets are
//! relative to the containing scope. Any gap between a declared offset and
//! the bytes already laid out is a packing decision the producer has made;
//! it becomes an explicit padding field here, so the layout itself never
//! infers alignment.

use crate::error::LayoutError;
use crate::layout::LayoutBuilder;
use crate::types::ElementType;

/// One declaration from a reflection producer.
#[derive(Debug, Clone)]
pub enum Declaration {
    /// A scalar, vector, or matrix variable
    Value {
        name: String,
        ty: ElementType,
        /// Byte offset within the containing scope
        offset: usize,
    },
    /// A struct variable with its member declarations
    Struct {
        name: String,
        /// Byte offset within the containing scope
        offset: usize,
        members: Vec<Declaration>,
    },
}

impl Declaration {
    /// Convenience constructor for a value declaration.
    pub fn value(name: impl Into<String>, ty: ElementType, offset: usize) -> Self {
        Declaration::Value {
            name: name.into(),
            ty,
            offset,
        }
    }

    /// Convenience constructor for a struct declaration.
    pub fn structure(name: impl Into<String>, offset: usize, members: Vec<Declaration>) -> Self {
        Declaration::Struct {
            name: name.into(),
            offset,
            members,
        }
    }

    fn name(&self) -> &str {
        match self {
            Declaration::Value { name, .. } | Declaration::Struct { name, .. } => name,
        }
    }

    fn offset(&self) -> usize {
        match self {
            Declaration::Value { offset, .. } | Declaration::Struct { offset, .. } => *offset,
        }
    }
}

/// Builds an open layout from a declaration stream, inserting explicit
/// padding wherever a declared offset lies past the bytes laid out so far.
///
/// # Errors
/// [`LayoutError::OffsetRegression`] when a declared offset lies behind the
/// current scope size; duplicate names propagate from the builder.
pub fn layout_from_declarations(
    declarations: &[Declaration],
) -> Result<LayoutBuilder, LayoutError> {
    let mut builder = LayoutBuilder::new();
    for declaration in declarations {
        append_declaration(&mut builder, declaration)?;
    }
    Ok(builder)
}

fn append_declaration(
    builder: &mut LayoutBuilder,
    declaration: &Declaration,
) -> Result<(), LayoutError> {
    let current = builder.current_size();
    let offset = declaration.offset();
    if offset < current {
        return Err(LayoutError::OffsetRegression {
            field: declaration.name().to_string(),
            offset,
            current,
        });
    }
    builder.append_padding(offset - current);

    match declaration {
        Declaration::Value { name, ty, .. } => builder.append(*ty, name.clone()),
        Declaration::Struct { name, members, .. } => {
            let mut nested = LayoutBuilder::new();
            for member in members {
                append_declaration(&mut nested, member)?;
            }
            builder.append_struct(name.clone(), nested)
        }
    }
}
