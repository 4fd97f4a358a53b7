use image::{GrayImage, Luma};
use imageproc::filter::gaussian_blur_f32;
use rand::RngCore;

use crate::error::{RenderError, Result};
use crate::frame::traits::{channel, Layer};
use crate::frame::types::Canvas;

const GLOW_COLOR: [f32; 3] = [255.0, 255.0, 200.0];
const GLOW_ALPHA: f32 = 100.0;

/// Soft halo around everything stamped into the text mask
///
/// The glow has a single colour, so only its coverage needs blurring: the
/// mask is scaled to the glow opacity, blurred, brightened by `intensity`
/// (colour and opacity alike) and blended over the canvas.
pub struct TextGlow {
    pub sigma: f32,
    pub intensity: f32,
}

impl TextGlow {
    fn coverage(&self, mask: &GrayImage) -> GrayImage {
        let scaled = GrayImage::from_fn(mask.width(), mask.height(), |x, y| {
            Luma([channel(mask.get_pixel(x, y)[0] as f32 * GLOW_ALPHA / 255.0)])
        });
        gaussian_blur_f32(&scaled, self.sigma)
    }
}

impl Layer for TextGlow {
    fn name(&self) -> &str {
        "glow"
    }

    fn apply(&self, canvas: &mut Canvas, _rng: &mut dyn RngCore) -> Result<()> {
        if canvas.text_mask.dimensions() != canvas.image.dimensions() {
            return Err(RenderError::LayerFailed {
                layer: self.name().to_string(),
                reason: format!(
                    "text mask is {:?} but image is {:?}",
                    canvas.text_mask.dimensions(),
                    canvas.image.dimensions()
                ),
            }
            .into());
        }
        if self.sigma.is_nan() || self.sigma <= 0.0 {
            return Err(RenderError::LayerFailed {
                layer: self.name().to_string(),
                reason: format!("glow sigma must be positive, got {}", self.sigma),
            }
            .into());
        }
        if canvas.text_mask.pixels().all(|p| p[0] == 0) {
            return Ok(());
        }

        let coverage = self.coverage(&canvas.text_mask);
        let color = GLOW_COLOR.map(|c| (c * self.intensity).min(255.0));

        for (pixel, cover) in canvas.image.pixels_mut().zip(coverage.pixels()) {
            let alpha = (cover[0] as f32 * self.intensity / 255.0).min(1.0);
            if alpha <= 0.0 {
                continue;
            }
            for c in 0..3 {
                pixel[c] = channel(pixel[c] as f32 * (1.0 - alpha) + color[c] * alpha);
            }
        }
        Ok(())
    }
}
