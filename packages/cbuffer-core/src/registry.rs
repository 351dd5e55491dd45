//! Named buffer registry.

use std::collections::HashMap;

use crate::buffer::ConstantBuffer;
use crate::error::LayoutError;

/// Host-side set of mirror buffers keyed by constant-buffer name, one per
/// shader constant buffer.
///
/// Access is `&mut self`-gated; the library's single-threaded access model
/// needs no internal locking.
#[derive(Debug, Default)]
pub struct BufferRegistry {
    buffers: HashMap<String, ConstantBuffer>,
}

impl BufferRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a buffer under `name`.
    ///
    /// # Errors
    /// [`LayoutError::BufferAlreadyRegistered`] if the name is taken.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        buffer: ConstantBuffer,
    ) -> Result<(), LayoutError> {
        let name = name.into();
        if self.buffers.contains_key(&name) {
            return Err(LayoutError::BufferAlreadyRegistered { name });
        }
        self.buffers.insert(name, buffer);
        Ok(())
    }

    /// The buffer registered under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&ConstantBuffer> {
        self.buffers.get(name)
    }

    /// Mutable access to the buffer registered under `name`, if any.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut ConstantBuffer> {
        self.buffers.get_mut(name)
    }

    /// Removes and returns the buffer registered under `name`.
    pub fn remove(&mut self, name: &str) -> Option<ConstantBuffer> {
        self.buffers.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.buffers.contains_key(name)
    }

    /// All registered buffer names.
    pub fn names(&self) -> Vec<String> {
        self.buffers.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }
}
