use std::borrow::Cow;

use crate::foundation::error::{DotmorphError, DotmorphResult};
use crate::scene::config::EntityConfig;

/// A square glyph raster, upload-ready as a 2D texture.
///
/// Pixels are premultiplied RGBA8, row-major, with a fully transparent background.
#[derive(Clone, Debug)]
pub struct GlyphRaster {
    /// Side length in pixels.
    pub size: u32,
    /// `size * size * 4` premultiplied RGBA8 bytes.
    pub rgba8_premul: Vec<u8>,
}

impl GlyphRaster {
    /// A fully transparent raster of the given side length.
    pub fn transparent(size: u32) -> Self {
        Self {
            size,
            rgba8_premul: vec![0; (size as usize) * (size as usize) * 4],
        }
    }
}

/// 2D drawing collaborator that turns one character into a texture-ready raster.
///
/// Regeneration is always whole-raster: any character or font/color change produces a
/// fresh raster, never a partial update.
pub trait GlyphSurface {
    /// Rasterize `character` centered in a `config.size`-sided square.
    fn rasterize(
        &mut self,
        character: &str,
        config: &EntityConfig,
    ) -> DotmorphResult<GlyphRaster>;
}

/// RGBA8 brush color used by Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct GlyphBrush {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

/// Built-in [`GlyphSurface`]: Parley shaping over the host's installed fonts,
/// rasterized with `vello_cpu`.
pub struct TextSurface {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<GlyphBrush>,
}

impl Default for TextSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSurface {
    /// Construct a surface with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    fn layout_character(
        &mut self,
        text: &str,
        config: &EntityConfig,
    ) -> parley::Layout<GlyphBrush> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(config.font.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(config.font_size));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(config.font_weight),
        ));
        let [r, g, b] = config.color.0;
        builder.push_default(parley::style::StyleProperty::Brush(GlyphBrush {
            r,
            g,
            b,
            a: 255,
        }));

        let mut layout: parley::Layout<GlyphBrush> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }
}

impl GlyphSurface for TextSurface {
    fn rasterize(
        &mut self,
        character: &str,
        config: &EntityConfig,
    ) -> DotmorphResult<GlyphRaster> {
        // An empty slot has no glyph to shape; skip the font stack entirely.
        if character.is_empty() {
            return Ok(GlyphRaster::transparent(config.size));
        }

        let side: u16 = config
            .size
            .try_into()
            .map_err(|_| DotmorphError::resource("glyph raster size exceeds u16"))?;

        let layout = self.layout_character(character, config);
        let dx = (f64::from(config.size) - f64::from(layout.width())) / 2.0;
        let dy = (f64::from(config.size) - f64::from(layout.height())) / 2.0;

        let mut ctx = vello_cpu::RenderContext::new(side, side);
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((dx, dy)));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                let font = run.run().font().clone();
                ctx.glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(side, side);
        ctx.render_to_pixmap(&mut pixmap);

        Ok(GlyphRaster {
            size: config.size,
            rgba8_premul: pixmap.data_as_u8_slice().to_vec(),
        })
    }
}
