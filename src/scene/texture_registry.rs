//! Tag-indexed table of loaded textures.
//!
//! Textures are registered once while the scene is prepared and only looked up
//! afterwards. The slot a texture lands in is also the texture unit it gets
//! bound to, so the table has as many slots as a shader stage has units.

use crate::{error::SceneError, resources::texture::DecodedImage};

/// Number of texture units available to the scene shader.
pub const MAX_TEXTURE_SLOTS: usize = 16;

/// Turns decoded images into textures the backend can sample.
pub trait TextureStore {
    type Handle;

    fn create_texture(&mut self, image: &DecodedImage, label: &str) -> anyhow::Result<Self::Handle>;

    /// Makes `slots[i]` available to the shader as texture unit `i`.
    fn bind_textures(&mut self, slots: &[TextureSlot<Self::Handle>]);

    /// Called with every handle when the scene is torn down.
    fn release_textures(&mut self, handles: Vec<Self::Handle>);
}

#[derive(Clone, Debug)]
pub struct TextureSlot<H> {
    pub tag: String,
    pub handle: H,
}

#[derive(Debug)]
pub struct TextureRegistry<H> {
    slots: Vec<TextureSlot<H>>,
}

impl<H> TextureRegistry<H> {
    pub fn new() -> Self {
        Self {
            slots: Vec::with_capacity(MAX_TEXTURE_SLOTS),
        }
    }

    /// Stores `handle` under `tag` in the next free slot and returns that slot.
    pub fn register(&mut self, tag: impl Into<String>, handle: H) -> Result<usize, SceneError> {
        let tag = tag.into();
        if self.find_slot(&tag).is_some() {
            return Err(SceneError::DuplicateTexture(tag));
        }
        if self.slots.len() >= MAX_TEXTURE_SLOTS {
            return Err(SceneError::TextureSlotsExhausted {
                tag,
                capacity: MAX_TEXTURE_SLOTS,
            });
        }
        self.slots.push(TextureSlot { tag, handle });
        Ok(self.slots.len() - 1)
    }

    /// Handle of the texture registered under `tag`.
    pub fn find_handle(&self, tag: &str) -> Option<&H> {
        self.slots
            .iter()
            .find(|slot| slot.tag == tag)
            .map(|slot| &slot.handle)
    }

    /// Slot (texture unit) of the texture registered under `tag`.
    pub fn find_slot(&self, tag: &str) -> Option<usize> {
        self.slots.iter().position(|slot| slot.tag == tag)
    }

    /// Registered textures in slot order.
    pub fn slots(&self) -> &[TextureSlot<H>] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Releases every registered texture, returning the handles in slot order.
    pub fn clear(&mut self) -> Vec<H> {
        self.slots.drain(..).map(|slot| slot.handle).collect()
    }
}

impl<H> Default for TextureRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}
