//! Frozen render-command snapshots
//!
//! A `Historian` records everything to draw for one cycle. It is built once
//! by a [`crate::history::HistoryManager`], handed to the host, and never
//! mutated afterwards. Cloning yields a structurally independent copy with no
//! shared buffers, which is what makes reusing the baked road baseline across
//! cycles safe.

use serde::{Deserialize, Serialize};

/// Texture state captured with a submission
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextureBinding {
    /// Index into the host's texture list
    pub slot: u32,
    /// Texture resolution in simulation units
    pub resolution: [f32; 2],
    /// Texture-space translation of the mapped rectangle
    pub translation: [f32; 2],
}

/// One draw submission: a flat position buffer plus the paint state that was
/// active when it was submitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSubmission {
    /// Triangle-list positions `[x0, y0, x1, y1, ...]`
    pub positions: Vec<f32>,
    /// RGBA color, each channel in [0, 1]
    pub color: [f32; 4],
    /// Texture binding, absent for untextured geometry
    pub texture: Option<TextureBinding>,
}

impl RenderSubmission {
    /// Number of vertices in the position buffer
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 2
    }

    /// Byte view of the position buffer for direct GPU upload
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }
}

/// Ordered record of render submissions for one cycle.
///
/// Submission order is meaningful: consumers that use it for depth draw later
/// submissions on top of earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Historian {
    submissions: Vec<RenderSubmission>,
}

impl Historian {
    pub fn submissions(&self) -> &[RenderSubmission] {
        &self.submissions
    }

    pub fn len(&self) -> usize {
        self.submissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.submissions.is_empty()
    }

    pub(crate) fn push(&mut self, submission: RenderSubmission) {
        self.submissions.push(submission);
    }

    /// Consume the historian, exposing its submissions for hosts that want
    /// to re-index them
    pub fn into_submissions(self) -> Vec<RenderSubmission> {
        self.submissions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Historian {
        let mut historian = Historian::default();
        historian.push(RenderSubmission {
            positions: vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0],
            color: [0.5, 0.5, 0.5, 1.0],
            texture: None,
        });
        historian.push(RenderSubmission {
            positions: vec![2.0, 2.0, 3.0, 2.0, 3.0, 3.0],
            color: [1.0, 1.0, 1.0, 1.0],
            texture: Some(TextureBinding {
                slot: 3,
                resolution: [64.0, 64.0],
                translation: [1.0, -1.0],
            }),
        });
        historian
    }

    #[test]
    fn test_clone_is_deeply_independent() {
        let original = sample();
        let mut clone = original.clone();
        clone.submissions[0].positions[0] = 99.0;
        clone.submissions[1].color = [0.0; 4];
        assert_eq!(original.submissions[0].positions[0], 0.0);
        assert_eq!(original.submissions[1].color, [1.0; 4]);
    }

    #[test]
    fn test_serde_round_trip_is_lossless() {
        let original = sample();
        let encoded = serde_json::to_string(&original).unwrap();
        let decoded: Historian = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_position_bytes_length() {
        let historian = sample();
        let submission = &historian.submissions()[0];
        assert_eq!(submission.vertex_count(), 3);
        assert_eq!(submission.position_bytes().len(), 6 * std::mem::size_of::<f32>());
    }
}
