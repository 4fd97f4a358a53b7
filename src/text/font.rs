use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use ab_glyph::{point, Font, FontArc, OutlinedGlyph, PxScale, Rect};
use image::Pixel;
use imageproc::definitions::Clamp;
use imageproc::drawing::{draw_hollow_rect_mut, Canvas};
use imageproc::pixelops::weighted_sum;
use imageproc::rect::Rect as PixelRect;
use tracing::warn;

use crate::error::{RenderError, Result};
use crate::text::shaping::{PlacedGlyph, Shaper};

/// Advance of one built-in placeholder glyph, as a fraction of the size
const BUILTIN_ADVANCE: f32 = 0.6;

/// A font face that can measure and draw text
///
/// `Outline` faces are shaped with parley, so joined scripts get their
/// contextual forms and right-to-left runs come out in visual order, then
/// rasterised glyph by glyph with ab_glyph.
///
/// `Builtin` is the last-resort face used when no font file can be loaded:
/// it lays text out with fixed metrics and draws each visible character as
/// a hollow box, so layout and composition keep working without assets.
#[derive(Clone)]
pub enum TextFont {
    Outline(Arc<OutlineFace>),
    Builtin,
}

impl std::fmt::Debug for TextFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Outline(face) => write!(f, "TextFont::Outline({})", face.family),
            Self::Builtin => f.write_str("TextFont::Builtin"),
        }
    }
}

/// A loaded font file: outlines for rasterising, a shaper for layout
pub struct OutlineFace {
    font: FontArc,
    family: String,
    shaper: Mutex<Shaper>,
}

impl OutlineFace {
    fn from_bytes(bytes: Vec<u8>) -> std::result::Result<Self, String> {
        let font = FontArc::try_from_vec(bytes.clone()).map_err(|e| e.to_string())?;
        let shaper = Shaper::new(bytes).ok_or_else(|| "no font family could be registered".to_string())?;

        Ok(Self {
            font,
            family: shaper.family().to_string(),
            shaper: Mutex::new(shaper),
        })
    }

    fn shape(&self, text: &str, size: f32) -> Vec<PlacedGlyph> {
        self.shaper
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .shape_line(text, size)
    }

    /// ab_glyph scales by ascent-to-descent height, parley by the em
    fn scale(&self, size: f32) -> PxScale {
        let units_per_em = self.font.units_per_em().unwrap_or_else(|| self.font.height_unscaled());
        PxScale::from(size * self.font.height_unscaled() / units_per_em)
    }

    fn outlines(&self, text: &str, size: f32) -> Vec<OutlinedGlyph> {
        let scale = self.scale(size);
        self.shape(text, size)
            .into_iter()
            .filter_map(|g| {
                self.font
                    .outline_glyph(g.id.with_scale_and_position(scale, point(g.x, g.y)))
            })
            .collect()
    }
}

impl TextFont {
    /// Load a TrueType/OpenType font from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| RenderError::FontLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        OutlineFace::from_bytes(bytes)
            .map(|face| Self::Outline(Arc::new(face)))
            .map_err(|reason| {
                RenderError::FontLoad {
                    path: path.display().to_string(),
                    reason,
                }
                .into()
            })
    }

    /// Load `path`, or fall back to the built-in face when it is absent or unreadable
    pub fn load_or_builtin(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::load(path).unwrap_or_else(|e| {
                warn!("{}, using built-in fallback font", e);
                Self::Builtin
            }),
            None => {
                warn!("No font configured, using built-in fallback font");
                Self::Builtin
            }
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::Builtin)
    }

    /// Bind this face to a pixel size
    pub fn at_size(&self, size: f32) -> SizedFont {
        SizedFont {
            font: self.clone(),
            size,
        }
    }
}

/// Pixel-space extent of a rendered line relative to its draw origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextExtent {
    pub offset_x: f32,
    pub offset_y: f32,
    pub width: f32,
    pub height: f32,
}

/// A face at a concrete size: the "resolved font" of auto-fit
#[derive(Debug, Clone)]
pub struct SizedFont {
    font: TextFont,
    size: f32,
}

impl SizedFont {
    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn face(&self) -> &TextFont {
        &self.font
    }

    /// Ink bounds of `text` when drawn at the origin, `None` if nothing is visible
    pub fn extent(&self, text: &str) -> Option<TextExtent> {
        match &self.font {
            TextFont::Outline(face) => ink_bounds(&face.outlines(text, self.size)).map(|b| TextExtent {
                offset_x: b.min.x,
                offset_y: b.min.y,
                width: b.width(),
                height: b.height(),
            }),
            TextFont::Builtin => {
                let count = text.chars().count();
                if text.trim().is_empty() {
                    return None;
                }
                Some(TextExtent {
                    offset_x: 0.0,
                    offset_y: 0.0,
                    width: count as f32 * self.size * BUILTIN_ADVANCE,
                    height: self.size,
                })
            }
        }
    }

    /// Rendered width of a line
    pub fn width(&self, text: &str) -> f32 {
        self.extent(text).map(|e| e.width).unwrap_or(0.0)
    }

    /// Rendered height of a line; lines with no visible ink fall back to the font size
    pub fn line_height(&self, text: &str) -> f32 {
        self.extent(text).map(|e| e.height).unwrap_or(self.size)
    }

    /// Draw `text` with its ink box starting at (`x`, `y`)
    pub fn draw<C>(&self, canvas: &mut C, color: C::Pixel, x: i32, y: i32, text: &str)
    where
        C: Canvas,
        <C::Pixel as Pixel>::Subpixel: Into<f32> + Clamp<f32>,
    {
        match &self.font {
            TextFont::Outline(face) => {
                let glyphs = face.outlines(text, self.size);
                let Some(ink) = ink_bounds(&glyphs) else {
                    return;
                };
                let (width, height) = canvas.dimensions();
                let (shift_x, shift_y) = (x as f32 - ink.min.x, y as f32 - ink.min.y);

                for glyph in &glyphs {
                    let bounds = glyph.px_bounds();
                    let left = (bounds.min.x + shift_x).round() as i32;
                    let top = (bounds.min.y + shift_y).round() as i32;

                    glyph.draw(|gx, gy, coverage| {
                        let (px, py) = (left + gx as i32, top + gy as i32);
                        if px < 0 || py < 0 || px as u32 >= width || py as u32 >= height || coverage <= 0.0 {
                            return;
                        }
                        let coverage = coverage.min(1.0);
                        let under = canvas.get_pixel(px as u32, py as u32);
                        canvas.draw_pixel(px as u32, py as u32, weighted_sum(under, color, 1.0 - coverage, coverage));
                    });
                }
            }
            TextFont::Builtin => {
                let advance = self.size * BUILTIN_ADVANCE;
                let box_width = (advance * 0.8).max(1.0) as u32;
                let box_height = (self.size * 0.8).max(1.0) as u32;
                for (i, c) in text.chars().enumerate() {
                    if c.is_whitespace() {
                        continue;
                    }
                    let left = x + (i as f32 * advance) as i32;
                    let top = y + (self.size * 0.1) as i32;
                    draw_hollow_rect_mut(canvas, PixelRect::at(left, top).of_size(box_width, box_height), color);
                }
            }
        }
    }
}

/// Union of the pixel boxes of every outlined glyph
fn ink_bounds(glyphs: &[OutlinedGlyph]) -> Option<Rect> {
    glyphs.iter().map(OutlinedGlyph::px_bounds).reduce(|acc, b| Rect {
        min: point(acc.min.x.min(b.min.x), acc.min.y.min(b.min.y)),
        max: point(acc.max.x.max(b.max.x), acc.max.y.max(b.max.y)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};
    use tempfile::tempdir;

    /// A face with Arabic coverage from the host, when one is installed
    fn arabic_face() -> Option<Arc<OutlineFace>> {
        [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/freefont/FreeSerif.ttf",
            "assets/arabic_font.ttf",
        ]
        .iter()
        .find_map(|path| match TextFont::load(path) {
            Ok(TextFont::Outline(face)) => Some(face),
            _ => None,
        })
    }

    #[test]
    fn test_unloadable_font_falls_back() {
        let dir = tempdir().unwrap();
        let bogus = dir.path().join("bogus.ttf");
        std::fs::write(&bogus, b"not a font").unwrap();

        assert!(TextFont::load(&bogus).is_err());
        assert!(TextFont::load_or_builtin(Some(&bogus)).is_builtin());
        assert!(TextFont::load_or_builtin(Some(&dir.path().join("missing.ttf"))).is_builtin());
        assert!(TextFont::load_or_builtin(None).is_builtin());
    }

    #[test]
    fn test_builtin_metrics_scale_with_size() {
        let small = TextFont::Builtin.at_size(10.0);
        let large = TextFont::Builtin.at_size(20.0);

        assert!((small.width("abcd") - 24.0).abs() < 1e-3);
        assert!((large.width("abcd") - 2.0 * small.width("abcd")).abs() < 1e-3);
        assert_eq!(small.line_height("abcd"), 10.0);
        assert_eq!(small.width("   "), 0.0);
        assert_eq!(small.line_height(""), 10.0);
    }

    #[test]
    fn test_builtin_draw_marks_pixels() {
        let mut mask = GrayImage::new(100, 40);
        TextFont::Builtin.at_size(20.0).draw(&mut mask, Luma([255]), 5, 5, "ab c");

        let lit = mask.pixels().filter(|p| p[0] == 255).count();
        assert!(lit > 0);

        // Off-canvas drawing is clipped rather than panicking
        TextFont::Builtin.at_size(20.0).draw(&mut mask, Luma([255]), 95, 35, "overflow");
    }

    #[test]
    fn test_right_to_left_text_is_shaped_and_reversed() {
        let Some(face) = arabic_face() else {
            eprintln!("no Arabic-capable font installed, skipping");
            return;
        };
        let isolated_beh = face.font.glyph_id('\u{0628}');

        // Beh then alef in logical order
        let mut glyphs = face.shape("\u{0628}\u{0627}", 80.0);
        assert_eq!(glyphs.len(), 2);
        glyphs.sort_by(|a, b| a.x.total_cmp(&b.x));
        let (left, right) = (glyphs[0].id, glyphs[1].id);

        // Alef lands on the left, beh on the right in its joining form
        assert!(
            left == face.font.glyph_id('\u{0627}') || left == face.font.glyph_id('\u{FE8E}'),
            "leftmost glyph {:?} is not alef",
            left
        );
        assert_ne!(right, isolated_beh, "beh kept its isolated form");
        assert_ne!(left, isolated_beh);
    }

    #[test]
    fn test_shaped_metrics_drive_measurement_and_drawing() {
        let Some(face) = arabic_face() else {
            eprintln!("no Arabic-capable font installed, skipping");
            return;
        };
        let font = TextFont::Outline(face).at_size(40.0);
        let word = "\u{0627}\u{0644}\u{0644}\u{0647}";
        let phrase = format!("{} {}", word, word);

        let single = font.width(word);
        assert!(single > 0.0);
        assert!(font.width(&phrase) > single);
        assert!(font.line_height(word) > 0.0);
        assert_eq!(font.width("   "), 0.0);

        let mut mask = GrayImage::new(300, 80);
        font.draw(&mut mask, Luma([255]), 10, 10, &phrase);
        let columns: Vec<u32> = mask
            .enumerate_pixels()
            .filter(|(_, _, p)| p[0] > 0)
            .map(|(x, _, _)| x)
            .collect();
        assert!(!columns.is_empty());
        // The ink box starts at the requested origin
        assert!(columns.iter().min().copied().unwrap_or(0) <= 11);
    }
}
