//! Replay pipeline configuration with documented constants
//!
//! All tunable values are collected here with explanations of their purpose.
//! Coordinates in the simulation logs are millimeter-scale, so the geometric
//! defaults look large compared to screen units.

use crate::entity::colors::Palette;

/// Configuration for the reconstruction and baking pipeline
///
/// Passed explicitly to the reconstructor and the worker; the pipeline keeps
/// no global state.
#[derive(Debug, Clone)]
pub struct ReplaySettings {
    /// Half-extent of an icon quad in simulation units
    ///
    /// Icon quads span `center - radius` to `center + radius` on both axes.
    /// Humans are drawn as quads of this size as well, so this value also
    /// controls how large moving agents appear on the map.
    pub icon_radius: f32,

    /// Whether border outlines are drawn around roads and buildings
    ///
    /// The outline list is built once at the baseline cycle and reused for
    /// every later cycle, so disabling this mostly saves submission count,
    /// not per-cycle work.
    pub draw_border_lines: bool,

    /// Extrusion width of border outline segments in simulation units
    ///
    /// Each polygon edge becomes a quad of this width. Values well below the
    /// typical road width keep outlines readable without swallowing small
    /// blockades.
    pub border_line_width: f32,

    /// Color mapping for entity categories and their state scalars
    ///
    /// Hosts may override individual palette entries; the pipeline only
    /// requires the mapping to be deterministic.
    pub palette: Palette,
}

impl Default for ReplaySettings {
    fn default() -> Self {
        Self {
            icon_radius: 5000.0,
            draw_border_lines: true,
            border_line_width: 250.0,
            palette: Palette::default(),
        }
    }
}

impl ReplaySettings {
    /// Create settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.icon_radius <= 0.0 {
            return Err(format!(
                "icon_radius ({}) must be positive",
                self.icon_radius
            ));
        }
        if self.border_line_width <= 0.0 {
            return Err(format!(
                "border_line_width ({}) must be positive",
                self.border_line_width
            ));
        }
        Ok(())
    }
}
