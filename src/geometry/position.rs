//! Flat position-buffer assembly for polygons, outlines and quads
//!
//! All functions work on flat vertex lists `[x0, y0, x1, y1, ...]` and
//! produce triangle-list buffers ready for GPU submission.

use glam::Vec2;

/// Mirror a flat vertex list across the X axis (negate every Y).
///
/// The simulation's Y axis points the opposite way from the render target's,
/// so the pipeline applies this exactly once per buffer, at the point the
/// geometry is handed toward a submission. Applying it twice is the identity.
pub fn mirror_y(vertices: &[f32]) -> Vec<f32> {
    vertices
        .iter()
        .enumerate()
        .map(|(i, v)| if i % 2 == 1 { -v } else { *v })
        .collect()
}

/// Two triangles covering `center ± radius`, already Y-mirrored.
///
/// Used for icon quads and human markers. Six vertices, twelve floats.
pub fn quad_around(center: Vec2, radius: f32) -> [f32; 12] {
    let x1 = center.x - radius;
    let y1 = center.y - radius;
    let x2 = center.x + radius;
    let y2 = center.y + radius;
    [
        x1, -y1, //
        x1, -y2, //
        x2, -y1, //
        x2, -y1, //
        x1, -y2, //
        x2, -y2, //
    ]
}

/// Accumulates triangle-list positions across several add calls.
///
/// Reset between uses; one instance is reused for every entity in a bake
/// pass to avoid reallocating the scratch buffer.
#[derive(Debug, Default)]
pub struct PositionMaker {
    positions: Vec<f32>,
}

impl PositionMaker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the accumulated buffer, keeping its capacity
    pub fn reset(&mut self) {
        self.positions.clear();
    }

    /// Triangulate a polygon outline with a fan from its first vertex and
    /// append the triangles. Outlines with fewer than three vertices
    /// contribute nothing.
    pub fn add_polygon(&mut self, vertices: &[f32]) {
        let count = vertices.len() / 2;
        if count < 3 {
            return;
        }
        let (x0, y0) = (vertices[0], vertices[1]);
        for i in 1..count - 1 {
            let (x1, y1) = (vertices[2 * i], vertices[2 * i + 1]);
            let (x2, y2) = (vertices[2 * i + 2], vertices[2 * i + 3]);
            self.positions.extend_from_slice(&[x0, y0, x1, y1, x2, y2]);
        }
    }

    /// Extrude each consecutive vertex pair, wrapping last back to first,
    /// into a width-wide quad. Produces the border outline of a closed
    /// polygon. Lists with fewer than two vertices contribute nothing.
    pub fn add_closed_sequence_line(&mut self, vertices: &[f32], width: f32) {
        let count = vertices.len() / 2;
        if count < 2 {
            return;
        }
        let half = width * 0.5;
        for i in 0..count {
            let j = (i + 1) % count;
            let p = Vec2::new(vertices[2 * i], vertices[2 * i + 1]);
            let q = Vec2::new(vertices[2 * j], vertices[2 * j + 1]);
            let along = q - p;
            if along.length_squared() < f32::EPSILON {
                continue;
            }
            let normal = Vec2::new(-along.y, along.x).normalize() * half;
            let (a, b) = (p - normal, p + normal);
            let (c, d) = (q - normal, q + normal);
            self.positions
                .extend_from_slice(&[a.x, a.y, b.x, b.y, c.x, c.y]);
            self.positions
                .extend_from_slice(&[b.x, b.y, d.x, d.y, c.x, c.y]);
        }
    }

    /// Flat buffer accumulated since the last reset
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SQUARE: [f32; 8] = [0.0, 0.0, 10.0, 0.0, 10.0, 10.0, 0.0, 10.0];

    #[test]
    fn test_mirror_negates_odd_indices_only() {
        let mirrored = mirror_y(&[1.0, 2.0, -3.0, 4.0]);
        assert_eq!(mirrored, vec![1.0, -2.0, -3.0, -4.0]);
    }

    #[test]
    fn test_square_fans_into_two_triangles() {
        let mut maker = PositionMaker::new();
        maker.add_polygon(&SQUARE);
        let positions = maker.positions();
        assert_eq!(positions.len(), 12);
        // Fan: (v0 v1 v2), (v0 v2 v3)
        assert_eq!(&positions[0..6], &[0.0, 0.0, 10.0, 0.0, 10.0, 10.0]);
        assert_eq!(&positions[6..12], &[0.0, 0.0, 10.0, 10.0, 0.0, 10.0]);
    }

    #[test]
    fn test_degenerate_polygon_contributes_nothing() {
        let mut maker = PositionMaker::new();
        maker.add_polygon(&[1.0, 1.0, 2.0, 2.0]);
        assert!(maker.positions().is_empty());
    }

    #[test]
    fn test_reset_clears_buffer() {
        let mut maker = PositionMaker::new();
        maker.add_polygon(&SQUARE);
        maker.reset();
        assert!(maker.positions().is_empty());
    }

    #[test]
    fn test_closed_line_wraps_last_to_first() {
        let mut maker = PositionMaker::new();
        maker.add_closed_sequence_line(&SQUARE, 2.0);
        // Four edges, each extruded into two triangles of three vertices
        assert_eq!(maker.positions().len(), 4 * 12);
    }

    #[test]
    fn test_closed_line_extrusion_width() {
        let mut maker = PositionMaker::new();
        // Single horizontal edge pair: (0,0) -> (4,0) and back
        maker.add_closed_sequence_line(&[0.0, 0.0, 4.0, 0.0], 2.0);
        let positions = maker.positions();
        // First quad corner offsets are +-1 on Y around the first vertex
        assert_eq!(&positions[0..4], &[0.0, -1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_short_line_list_contributes_nothing() {
        let mut maker = PositionMaker::new();
        maker.add_closed_sequence_line(&[3.0, 3.0], 2.0);
        assert!(maker.positions().is_empty());
    }

    #[test]
    fn test_quad_around_covers_center_plus_minus_radius() {
        let quad = quad_around(Vec2::new(5.0, 5.0), 2.0);
        assert_eq!(quad.len(), 12);
        let xs: Vec<f32> = quad.iter().step_by(2).copied().collect();
        let ys: Vec<f32> = quad.iter().skip(1).step_by(2).copied().collect();
        assert!(xs.iter().all(|&x| x == 3.0 || x == 7.0));
        // Y is mirrored: simulation range [3, 7] renders as [-7, -3]
        assert!(ys.iter().all(|&y| y == -3.0 || y == -7.0));
    }

    proptest! {
        #[test]
        fn prop_mirror_is_an_involution(values in proptest::collection::vec(-1e6f32..1e6, 0..64)) {
            let twice = mirror_y(&mirror_y(&values));
            prop_assert_eq!(twice, values);
        }

        #[test]
        fn prop_mirror_keeps_even_indices(values in proptest::collection::vec(-1e6f32..1e6, 0..64)) {
            let mirrored = mirror_y(&values);
            for (i, (orig, new)) in values.iter().zip(&mirrored).enumerate() {
                if i % 2 == 0 {
                    prop_assert_eq!(orig, new);
                }
            }
        }
    }
}
