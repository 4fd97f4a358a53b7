use std::path::Path;

use rand::RngCore;
use tracing::{debug, warn};

use crate::config::RenderConfig;
use crate::error::{RenderError, Result};
use crate::frame::background::{GradientBackdrop, LightRays, ParticleField, Soften};
use crate::frame::border::OrnamentBorder;
use crate::frame::glow::TextGlow;
use crate::frame::text::TextBlocks;
use crate::frame::traits::Layer;
use crate::frame::types::{Canvas, Frame, RenderSpec};
use crate::text::FitPolicy;

/// Base colour under the gradient
const BACKDROP: [u8; 3] = [10, 10, 30];

/// Builds a finished still frame from a [`RenderSpec`]
///
/// Layers run in a fixed order: gradient, particles, rays, soften,
/// border, text, glow. A failing layer is logged and skipped, so a frame
/// always comes out as long as its dimensions are sane.
#[derive(Debug, Clone)]
pub struct FrameCompositor {
    config: RenderConfig,
}

impl FrameCompositor {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    fn layers(&self, spec: &RenderSpec) -> Vec<Box<dyn Layer>> {
        let scale = self.config.scale();
        vec![
            Box::new(GradientBackdrop),
            Box::new(ParticleField {
                count: self.config.particle_count,
            }),
            Box::new(LightRays {
                count: self.config.ray_count,
                scale,
            }),
            Box::new(Soften {
                blur_sigma: self.config.background_blur,
                contrast: self.config.contrast,
            }),
            Box::new(OrnamentBorder { scale }),
            Box::new(TextBlocks {
                blocks: spec.blocks.clone(),
                max_width: self.config.text_width() as f32,
                policy: FitPolicy {
                    min_size: self.config.min_font_size,
                    step: self.config.font_step,
                },
                shadow_offset: ((2.0 * scale).round() as i32).max(1),
            }),
            Box::new(TextGlow {
                sigma: self.config.glow_blur * scale.max(0.1),
                intensity: self.config.glow_intensity,
            }),
        ]
    }

    /// Render one frame
    pub fn compose(&self, spec: &RenderSpec, rng: &mut dyn RngCore) -> Result<Frame> {
        let (width, height) = (self.config.width, self.config.height);
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height }.into());
        }

        let mut canvas = Canvas::new(width, height, BACKDROP);
        for layer in self.layers(spec) {
            match layer.apply(&mut canvas, rng) {
                Ok(()) => debug!("Applied {} layer", layer.name()),
                Err(e) => warn!("Warning: Could not apply {} layer: {}", layer.name(), e),
            }
        }

        Ok(canvas.flatten())
    }

    /// Render one frame and write it to `path` as PNG, overwriting any previous file.
    ///
    /// Fails unless the written file exists and is non-empty.
    pub fn compose_to_file(&self, spec: &RenderSpec, path: &Path, rng: &mut dyn RngCore) -> Result<Frame> {
        let frame = self.compose(spec, rng)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        frame.save_png(path).map_err(|e| RenderError::SaveFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let written = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        if written == 0 {
            return Err(RenderError::EmptyFrame {
                path: path.display().to_string(),
            }
            .into());
        }

        Ok(frame)
    }
}
