use std::collections::HashMap;
use std::path::PathBuf;

use image::{Luma, Rgba};
use rand::RngCore;
use tracing::debug;

use crate::error::Result;
use crate::frame::traits::Layer;
use crate::frame::types::{Canvas, TextBlock};
use crate::text::{auto_fit, FitPolicy, TextFont};

const FILL: Rgba<u8> = Rgba([255, 255, 255, 255]);
const SHADOW: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Auto-fitted, horizontally centred text blocks with a drop shadow
///
/// Every drawn line is also stamped into the canvas text mask so the glow
/// layer can find it.
pub struct TextBlocks {
    pub blocks: Vec<TextBlock>,
    pub max_width: f32,
    pub policy: FitPolicy,
    pub shadow_offset: i32,
}

impl Layer for TextBlocks {
    fn name(&self) -> &str {
        "text"
    }

    fn apply(&self, canvas: &mut Canvas, _rng: &mut dyn RngCore) -> Result<()> {
        // Faces are shared between blocks, load each file once per frame
        let mut faces: HashMap<Option<PathBuf>, TextFont> = HashMap::new();
        let width = canvas.width() as f32;

        for block in self.blocks.iter().filter(|b| !b.text.trim().is_empty()) {
            let face = faces
                .entry(block.font_path.clone())
                .or_insert_with(|| TextFont::load_or_builtin(block.font_path.as_deref()));

            let fitted = auto_fit(
                &block.text,
                self.max_width,
                block.max_height,
                block.initial_size,
                face,
                &self.policy,
            );
            if fitted.lines.is_empty() {
                continue;
            }

            let total_height = fitted.total_height();
            let line_height = total_height / fitted.lines.len() as f32;
            let mut y = block.center_y - total_height / 2.0;

            debug!(
                "Block at y={} drawn with size {} over {} lines",
                block.center_y,
                fitted.font.size(),
                fitted.lines.len()
            );

            for line in &fitted.lines {
                let x = ((width - fitted.font.width(line)) / 2.0).round() as i32;
                let top = y.round() as i32;

                fitted.font.draw(
                    &mut canvas.image,
                    SHADOW,
                    x + self.shadow_offset,
                    top + self.shadow_offset,
                    line,
                );
                fitted.font.draw(&mut canvas.image, FILL, x, top, line);
                fitted.font.draw(&mut canvas.text_mask, Luma([255]), x, top, line);

                y += line_height;
            }
        }
        Ok(())
    }
}
