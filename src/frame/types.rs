use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage, RgbImage, Rgba, RgbaImage};

use crate::config::RenderConfig;
use crate::quran::DisplayFields;
use crate::text::FontSet;

/// A finished frame, ready to hand to the encoder
///
/// Thin wrapper around an RGB image buffer.
#[derive(Clone, Debug)]
pub struct Frame {
    buffer: RgbImage,
}

impl Frame {
    pub fn new(buffer: RgbImage) -> Self {
        Self { buffer }
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.buffer.get_pixel(x, y).0
    }

    /// Save the frame as a PNG file
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), image::ImageError> {
        self.buffer.save(path)
    }
}

/// Working surface of the compositor
///
/// Layers paint into `image`; text layers additionally stamp their glyphs
/// into `text_mask`, which the glow layer later blurs.
#[derive(Clone, Debug)]
pub struct Canvas {
    pub image: RgbaImage,
    pub text_mask: GrayImage,
}

impl Canvas {
    /// Opaque canvas filled with `color` and an empty text mask
    pub fn new(width: u32, height: u32, color: [u8; 3]) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, Rgba([color[0], color[1], color[2], 255])),
            text_mask: GrayImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Drop alpha and the mask
    pub fn flatten(self) -> Frame {
        Frame::new(DynamicImage::ImageRgba8(self.image).to_rgb8())
    }
}

/// One block of text to place on the frame
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub text: String,

    /// Vertical centre of the block
    pub center_y: f32,

    /// Font file; `None` uses the built-in face
    pub font_path: Option<PathBuf>,

    /// Size auto-fit starts shrinking from
    pub initial_size: f32,

    /// Height the wrapped block must fit into
    pub max_height: f32,
}

/// Ordered text blocks for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderSpec {
    pub blocks: Vec<TextBlock>,
}

/// Reference layout at 1080 px height: (centre y, initial size, max height).
/// The footer's centre is measured up from the bottom edge.
const TITLE: (f32, f32, f32) = (120.0, 60.0, 200.0);
const VERSE_LABEL: (f32, f32, f32) = (190.0, 36.0, 50.0);
const SOURCE_TEXT: (f32, f32, f32) = (400.0, 100.0, 200.0);
const TRANSLATION: (f32, f32, f32) = (750.0, 50.0, 200.0);
const FOOTER: (f32, f32, f32) = (80.0, 40.0, 200.0);

impl RenderSpec {
    /// The five-block layout: title, verse number, verse text, translation, footer
    pub fn for_verse(fields: &DisplayFields, fonts: &FontSet, render: &RenderConfig) -> Self {
        let scale = render.scale();
        let height = render.height as f32;

        let block = |text: &str, (y, size, max_height): (f32, f32, f32), font: &Option<PathBuf>| TextBlock {
            text: text.to_string(),
            center_y: y * scale,
            font_path: font.clone(),
            initial_size: size * scale,
            max_height: max_height * scale,
        };

        let mut footer = block(&fields.footer, FOOTER, &fonts.translation);
        footer.center_y = height - FOOTER.0 * scale;

        Self {
            blocks: vec![
                block(&fields.title, TITLE, &fonts.source),
                block(&fields.verse_label, VERSE_LABEL, &fonts.translation),
                block(&fields.source_text, SOURCE_TEXT, &fonts.source),
                block(&fields.translation, TRANSLATION, &fonts.translation),
                footer,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> DisplayFields {
        DisplayFields {
            title: "title".into(),
            verse_label: "Verse 1".into(),
            source_text: "arabic".into(),
            translation: "english".into(),
            footer: "footer".into(),
        }
    }

    #[test]
    fn test_reference_layout() {
        let fonts = FontSet {
            source: Some(PathBuf::from("a.ttf")),
            translation: Some(PathBuf::from("e.ttf")),
        };
        let spec = RenderSpec::for_verse(&fields(), &fonts, &RenderConfig::default());

        assert_eq!(spec.blocks.len(), 5);
        let centers: Vec<f32> = spec.blocks.iter().map(|b| b.center_y).collect();
        assert_eq!(centers, vec![120.0, 190.0, 400.0, 750.0, 1000.0]);

        let sizes: Vec<f32> = spec.blocks.iter().map(|b| b.initial_size).collect();
        assert_eq!(sizes, vec![60.0, 36.0, 100.0, 50.0, 40.0]);

        assert_eq!(spec.blocks[1].max_height, 50.0);
        assert_eq!(spec.blocks[0].font_path, fonts.source);
        assert_eq!(spec.blocks[2].font_path, fonts.source);
        assert_eq!(spec.blocks[3].font_path, fonts.translation);
    }

    #[test]
    fn test_layout_scales_with_height() {
        let render = RenderConfig {
            width: 960,
            height: 540,
            ..Default::default()
        };
        let spec = RenderSpec::for_verse(&fields(), &FontSet::default(), &render);

        assert_eq!(spec.blocks[0].center_y, 60.0);
        assert_eq!(spec.blocks[2].initial_size, 50.0);
        assert_eq!(spec.blocks[4].center_y, 500.0);
    }

    #[test]
    fn test_flatten_drops_alpha() {
        let canvas = Canvas::new(4, 3, [10, 20, 30]);
        let frame = canvas.flatten();
        assert_eq!((frame.width(), frame.height()), (4, 3));
        assert_eq!(frame.get_pixel(1, 1), [10, 20, 30]);
    }
}
