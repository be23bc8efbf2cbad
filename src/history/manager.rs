//! Mutable builder for per-cycle historians

use crate::core::types::Color;
use crate::history::historian::{Historian, RenderSubmission, TextureBinding};

/// Builds one [`Historian`] by appending submissions tagged with the current
/// paint state.
///
/// Paint state (active color, active texture binding) belongs to the builder
/// and never persists across builder instances; a fresh manager starts with
/// opaque white and no texture.
#[derive(Debug)]
pub struct HistoryManager {
    historian: Historian,
    color: Color,
    texture_slot: Option<u32>,
    texture_resolution: [f32; 2],
    texture_translation: [f32; 2],
}

impl HistoryManager {
    /// Begin from a baked baseline. Pass `Historian::default()` to start
    /// empty.
    pub fn new(base: Historian) -> Self {
        Self {
            historian: base,
            color: Color::WHITE,
            texture_slot: None,
            texture_resolution: [0.0, 0.0],
            texture_translation: [0.0, 0.0],
        }
    }

    /// Set the color applied to subsequent submissions
    pub fn set_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.color = Color::rgba(r, g, b, a);
    }

    /// Bind a texture slot for subsequent submissions
    pub fn set_texture_slot(&mut self, slot: u32) {
        self.texture_slot = Some(slot);
    }

    /// Drop the texture binding for subsequent submissions
    pub fn clear_texture(&mut self) {
        self.texture_slot = None;
    }

    pub fn set_texture_resolution(&mut self, width: f32, height: f32) {
        self.texture_resolution = [width, height];
    }

    pub fn set_texture_translation(&mut self, x: f32, y: f32) {
        self.texture_translation = [x, y];
    }

    /// Append one submission capturing a copy of `positions` and the current
    /// paint state. Empty buffers are skipped.
    pub fn submit(&mut self, positions: &[f32]) {
        if positions.is_empty() {
            return;
        }
        let texture = self.texture_slot.map(|slot| TextureBinding {
            slot,
            resolution: self.texture_resolution,
            translation: self.texture_translation,
        });
        self.historian.push(RenderSubmission {
            positions: positions.to_vec(),
            color: self.color.to_array(),
            texture,
        });
    }

    /// The snapshot built so far
    pub fn historian(&self) -> &Historian {
        &self.historian
    }

    /// Finish building and hand off the snapshot
    pub fn into_historian(self) -> Historian {
        self.historian
    }
}
