use crate::foundation::core::{Point, Viewport};

/// One interleaved vertex: clip-space plane position plus texture coordinate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadVertex {
    /// Position in clip space `[-1, 1]²`.
    pub plane: [f32; 2],
    /// Texture coordinate in `[-1, 1]²`, vertically flipped relative to `plane`.
    pub tex: [f32; 2],
}

// Unit-quad corners, two triangles.
const CORNERS: [[f32; 2]; 6] = [
    [-1.0, 1.0],
    [-1.0, -1.0],
    [1.0, -1.0],
    [-1.0, 1.0],
    [1.0, -1.0],
    [1.0, 1.0],
];

/// Build the 6-vertex quad for one glyph.
///
/// `position` is the glyph anchor in pixels with origin at the viewport's top-left
/// corner; the axis is mapped directly into clip space (`c = 2p/extent − 1`) with no
/// vertical flip of the anchor itself. Texture coordinates negate the corner's y so
/// that top-down raster rows land the right way up in bottom-up clip space. The quad
/// spans `size` pixels on each axis.
pub fn glyph_quad(position: Point, size: f64, viewport: Viewport) -> [QuadVertex; 6] {
    let w = f64::from(viewport.width);
    let h = f64::from(viewport.height);
    let cx = 2.0 * position.x / w - 1.0;
    let cy = 2.0 * position.y / h - 1.0;
    let sx = size / w;
    let sy = size / h;

    CORNERS.map(|[x, y]| QuadVertex {
        plane: [
            (cx + f64::from(x) * sx) as f32,
            (cy + f64::from(y) * sy) as f32,
        ],
        tex: [x, -y],
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/geometry.rs"]
mod tests;
