use std::borrow::Cow;

use ab_glyph::GlyphId;
use parley::fontique::Blob;
use parley::layout::PositionedLayoutItem;
use parley::style::{FontStack, StyleProperty};
use parley::{FontContext, Layout, LayoutContext};

/// A shaped glyph in pixels from the line origin, `y` on the baseline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedGlyph {
    pub id: GlyphId,
    pub x: f32,
    pub y: f32,
}

/// Parley contexts bound to one registered font family.
///
/// Bidi resolution, contextual joining forms and ligatures all come from
/// the shaper, and glyphs come back in visual order: a right-to-left run
/// starts at its rightmost glyph in logical order but is returned left to
/// right, ready to draw.
pub struct Shaper {
    font_ctx: FontContext,
    layout_ctx: LayoutContext<()>,
    family: String,
}

impl Shaper {
    /// Register `bytes` and keep its first family, `None` when the data
    /// holds no usable face
    pub fn new(bytes: Vec<u8>) -> Option<Self> {
        let mut font_ctx = FontContext::default();
        let families = font_ctx.collection.register_fonts(Blob::from(bytes), None);
        let family_id = families.first().map(|(id, _)| *id)?;
        let family = font_ctx.collection.family_name(family_id)?.to_string();

        Some(Self {
            font_ctx,
            layout_ctx: LayoutContext::new(),
            family,
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    /// Shape `text` as one unbroken line at `size` pixels per em
    pub fn shape_line(&mut self, text: &str, size: f32) -> Vec<PlacedGlyph> {
        if text.is_empty() || !(size.is_finite() && size > 0.0) {
            return Vec::new();
        }

        let mut builder = self.layout_ctx.ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(StyleProperty::FontStack(FontStack::Source(Cow::Owned(
            self.family.clone(),
        ))));
        builder.push_default(StyleProperty::FontSize(size));

        let mut layout: Layout<()> = builder.build(text);
        layout.break_all_lines(None);

        let mut glyphs = Vec::new();
        for line in layout.lines() {
            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                glyphs.extend(run.positioned_glyphs().map(|g| PlacedGlyph {
                    id: GlyphId(g.id as u16),
                    x: g.x,
                    y: g.y,
                }));
            }
        }
        glyphs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_register_nothing() {
        assert!(Shaper::new(b"not a font".to_vec()).is_none());
        assert!(Shaper::new(Vec::new()).is_none());
    }
}
