//! Output wiring
//!
//! The active backend renders into a texture; a visible surface samples it
//! through a property block slot. Audio leaves through one or more sinks.

use std::collections::HashMap;
use std::fmt;

/// Opaque handle to a frame/texture produced by a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(u64);

impl TextureHandle {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for TextureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tex:{}", self.0)
    }
}

/// Per-surface shader property overrides
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyBlock {
    textures: HashMap<String, TextureHandle>,
}

impl PropertyBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `texture` to `property`, or clear the slot with `None`
    pub fn set_texture(&mut self, property: &str, texture: Option<TextureHandle>) {
        match texture {
            Some(texture) => {
                self.textures.insert(property.to_string(), texture);
            }
            None => {
                self.textures.remove(property);
            }
        }
    }

    pub fn texture(&self, property: &str) -> Option<TextureHandle> {
        self.textures.get(property).copied()
    }
}

/// Visible surface the video frame is drawn on
pub trait RenderSurface: Send {
    /// Current overrides of the surface
    fn property_block(&self) -> PropertyBlock;

    /// Replace the overrides of the surface
    fn set_property_block(&mut self, block: PropertyBlock);
}

/// Audio output fed by the active backend
pub trait AudioSink: Send {
    /// Set output volume; the caller has already clamped it to `[0, 1]`
    fn set_volume(&mut self, volume: f32);
}

/// Link between the active backend's texture and the visible surface
pub struct OutputBinding {
    surface: Box<dyn RenderSurface>,
    property: String,
    bound: Option<TextureHandle>,
}

impl OutputBinding {
    pub fn new(surface: Box<dyn RenderSurface>, property: impl Into<String>) -> Self {
        Self {
            surface,
            property: property.into(),
            bound: None,
        }
    }

    /// Re-resolve the frame source and rebind it to the surface
    ///
    /// Always writes the block, even if the handle did not change: a backend
    /// may recreate its texture behind the same handle after a URL change.
    pub fn refresh(&mut self, texture: Option<TextureHandle>) {
        let mut block = self.surface.property_block();
        block.set_texture(&self.property, texture);
        self.surface.set_property_block(block);
        self.bound = texture;
    }

    /// Texture bound by the last refresh
    pub fn bound(&self) -> Option<TextureHandle> {
        self.bound
    }
}

impl fmt::Debug for OutputBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputBinding")
            .field("property", &self.property)
            .field("bound", &self.bound)
            .finish_non_exhaustive()
    }
}
