use super::*;

const VIEWPORT: Viewport = Viewport {
    width: 1000,
    height: 500,
};

#[test]
fn quad_is_two_triangles_sharing_a_diagonal() {
    let quad = glyph_quad(Point::new(500.0, 250.0), 100.0, VIEWPORT);
    assert_eq!(quad.len(), 6);
    assert_eq!(quad[0], quad[3]);
    assert_eq!(quad[2], quad[4]);
}

#[test]
fn centered_anchor_is_symmetric_in_clip_space() {
    let quad = glyph_quad(Point::new(500.0, 250.0), 100.0, VIEWPORT);
    // Half-extents: 100/1000 and 100/500 clip units around the origin.
    assert_eq!(quad[0].plane, [-0.1, 0.2]);
    assert_eq!(quad[1].plane, [-0.1, -0.2]);
    assert_eq!(quad[2].plane, [0.1, -0.2]);
    assert_eq!(quad[5].plane, [0.1, 0.2]);
}

#[test]
fn texture_coordinates_flip_vertically() {
    let quad = glyph_quad(Point::new(500.0, 250.0), 100.0, VIEWPORT);
    assert_eq!(quad[0].tex, [-1.0, -1.0]);
    assert_eq!(quad[1].tex, [-1.0, 1.0]);
    assert_eq!(quad[2].tex, [1.0, 1.0]);
    assert_eq!(quad[5].tex, [1.0, -1.0]);
}

#[test]
fn anchor_maps_through_top_left_convention() {
    // The top-left pixel lands at clip (-1, -1); no vertical flip of the anchor.
    let quad = glyph_quad(Point::new(0.0, 0.0), 0.0, VIEWPORT);
    for vertex in quad {
        assert_eq!(vertex.plane, [-1.0, -1.0]);
    }
}

#[test]
fn viewport_dimensions_rescale_the_quad() {
    let wide = glyph_quad(Point::new(500.0, 250.0), 100.0, VIEWPORT);
    let narrow = glyph_quad(
        Point::new(500.0, 250.0),
        100.0,
        Viewport {
            width: 500,
            height: 500,
        },
    );
    assert_ne!(wide[0].plane, narrow[0].plane);
}
