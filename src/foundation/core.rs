pub use kurbo::Point;

/// An RGB color as three bytes, serialized as a `[r, g, b]` array so that sparse
/// configuration overrides replace it wholesale rather than channel-by-channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    /// Convert to unit-range floats, the form shader uniforms expect.
    pub fn to_unit(self) -> [f32; 3] {
        let [r, g, b] = self.0;
        [
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
        ]
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(channels: [u8; 3]) -> Self {
        Self(channels)
    }
}

/// Rendering surface dimensions in pixels.
///
/// Threaded explicitly into every geometry computation; nothing in the engine reads
/// ambient window state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}
