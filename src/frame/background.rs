// src/frame/background.rs - celestial backdrop passes

use image::imageops;
use image::Rgba;
use imageproc::drawing::draw_filled_ellipse_mut;
use imageproc::filter::gaussian_blur_f32;
use rand::{Rng, RngCore};

use crate::error::{RenderError, Result};
use crate::frame::traits::{channel, Layer};
use crate::frame::types::Canvas;

/// Dark vertical gradient, brightening towards the bottom
pub struct GradientBackdrop;

impl Layer for GradientBackdrop {
    fn name(&self) -> &str {
        "gradient"
    }

    fn apply(&self, canvas: &mut Canvas, _rng: &mut dyn RngCore) -> Result<()> {
        let height = canvas.height() as f32;
        for (_, y, pixel) in canvas.image.enumerate_pixels_mut() {
            let darkness = channel(10.0 + (y as f32 / height) * 30.0);
            *pixel = Rgba([darkness, darkness, darkness.saturating_add(20), 255]);
        }
        Ok(())
    }
}

/// Scatter of small round light dots
pub struct ParticleField {
    pub count: u32,
}

impl Layer for ParticleField {
    fn name(&self) -> &str {
        "particles"
    }

    fn apply(&self, canvas: &mut Canvas, rng: &mut dyn RngCore) -> Result<()> {
        let (width, height) = (canvas.width() as i32, canvas.height() as i32);

        for _ in 0..self.count {
            let x = rng.gen_range(0..=width);
            let y = rng.gen_range(0..=height);
            let size = rng.gen_range(1..=3i32);
            let brightness = rng.gen_range(150..=255u8);

            // `size` is the dot diameter
            let radius = (size + 1) / 2;
            draw_filled_ellipse_mut(
                &mut canvas.image,
                (x, y),
                radius,
                radius,
                Rgba([brightness, brightness, brightness, 255]),
            );
        }
        Ok(())
    }
}

/// Faint rays fanning downwards from a point near the top centre
pub struct LightRays {
    pub count: u32,
    pub scale: f32,
}

const RAY_COLOR: [u8; 3] = [50, 50, 70];
const RAY_STEPS: u32 = 100;

impl Layer for LightRays {
    fn name(&self) -> &str {
        "rays"
    }

    fn apply(&self, canvas: &mut Canvas, rng: &mut dyn RngCore) -> Result<()> {
        let (width, height) = (canvas.width() as f32, canvas.height() as f32);
        let origin_x = width / 2.0;
        let origin_y = 50.0 * self.scale;

        let min_length = (height / 3.0).max(1.0);
        let max_length = (height / 2.0).max(min_length);

        for _ in 0..self.count {
            let length = rng.gen_range(min_length..=max_length);
            let end_dx = length * 1.5 * (rng.gen::<f32>() - 0.5);
            let end_dy = length * 0.8;

            // Discs grow and fade along the ray
            for i in 0..RAY_STEPS {
                let t = i as f32 / RAY_STEPS as f32;
                let alpha = (RAY_STEPS - i) as f32 / 255.0;
                let radius = (3.0 + (i / 10) as f32) * self.scale.max(0.25);

                blend_disc(canvas, origin_x + end_dx * t, origin_y + end_dy * t, radius, RAY_COLOR, alpha);
            }
        }
        Ok(())
    }
}

fn blend_disc(canvas: &mut Canvas, cx: f32, cy: f32, radius: f32, color: [u8; 3], alpha: f32) {
    let (width, height) = (canvas.width() as i64, canvas.height() as i64);
    let x0 = ((cx - radius).floor() as i64).max(0);
    let x1 = ((cx + radius).ceil() as i64).min(width - 1);
    let y0 = ((cy - radius).floor() as i64).max(0);
    let y1 = ((cy + radius).ceil() as i64).min(height - 1);
    let r2 = radius * radius;

    for y in y0..=y1 {
        for x in x0..=x1 {
            let (dx, dy) = (x as f32 - cx, y as f32 - cy);
            if dx * dx + dy * dy > r2 {
                continue;
            }
            let pixel = canvas.image.get_pixel_mut(x as u32, y as u32);
            for c in 0..3 {
                pixel[c] = channel(pixel[c] as f32 * (1.0 - alpha) + color[c] as f32 * alpha);
            }
        }
    }
}

/// Blur for a soft glow, then a contrast boost
pub struct Soften {
    pub blur_sigma: f32,
    pub contrast: f32,
}

impl Layer for Soften {
    fn name(&self) -> &str {
        "soften"
    }

    fn apply(&self, canvas: &mut Canvas, _rng: &mut dyn RngCore) -> Result<()> {
        if self.blur_sigma.is_nan() || self.blur_sigma <= 0.0 {
            return Err(RenderError::LayerFailed {
                layer: self.name().to_string(),
                reason: format!("blur sigma must be positive, got {}", self.blur_sigma),
            }
            .into());
        }

        canvas.image = gaussian_blur_f32(&canvas.image, self.blur_sigma);
        canvas.image = imageops::contrast(&canvas.image, self.contrast);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_gradient_brightens_downwards() {
        let mut canvas = Canvas::new(8, 100, [0, 0, 0]);
        GradientBackdrop.apply(&mut canvas, &mut StdRng::seed_from_u64(1)).unwrap();

        let top = canvas.image.get_pixel(0, 0);
        let bottom = canvas.image.get_pixel(0, 99);
        assert_eq!(top.0, [10, 10, 30, 255]);
        assert!(bottom[0] > top[0]);
        assert_eq!(bottom[2], bottom[0] + 20);
    }

    #[test]
    fn test_particles_stay_on_canvas() {
        let mut canvas = Canvas::new(20, 10, [0, 0, 0]);
        let layer = ParticleField { count: 200 };
        layer.apply(&mut canvas, &mut StdRng::seed_from_u64(2)).unwrap();

        let lit = canvas.image.pixels().filter(|p| p[0] >= 150).count();
        assert!(lit > 0);
        assert!(canvas.image.pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn test_particles_are_round() {
        let mut checked = 0;

        for seed in 0..64 {
            let mut canvas = Canvas::new(200, 200, [0, 0, 0]);
            ParticleField { count: 1 }
                .apply(&mut canvas, &mut StdRng::seed_from_u64(seed))
                .unwrap();

            let lit: Vec<(u32, u32)> = canvas
                .image
                .enumerate_pixels()
                .filter(|(_, _, p)| p[0] >= 150)
                .map(|(x, y, _)| (x, y))
                .collect();
            if lit.is_empty() {
                continue;
            }
            let (min_x, max_x) = (lit.iter().map(|p| p.0).min().unwrap(), lit.iter().map(|p| p.0).max().unwrap());
            let (min_y, max_y) = (lit.iter().map(|p| p.1).min().unwrap(), lit.iter().map(|p| p.1).max().unwrap());

            // Only whole dots wide enough to tell a disc from a square
            if max_x - min_x < 4 || min_x == 0 || min_y == 0 || max_x == 199 || max_y == 199 {
                continue;
            }
            checked += 1;
            for corner in [(min_x, min_y), (max_x, min_y), (min_x, max_y), (max_x, max_y)] {
                assert!(!lit.contains(&corner), "seed {} lit corner {:?}", seed, corner);
            }
        }
        assert!(checked > 0);
    }

    #[test]
    fn test_rays_tint_near_origin() {
        let mut canvas = Canvas::new(200, 120, [0, 0, 0]);
        let layer = LightRays { count: 5, scale: 120.0 / 1080.0 };
        layer.apply(&mut canvas, &mut StdRng::seed_from_u64(3)).unwrap();

        let origin = canvas.image.get_pixel(100, 5);
        assert!(origin[2] > 0, "ray origin should be tinted");
    }

    #[test]
    fn test_soften_rejects_bad_sigma() {
        let mut canvas = Canvas::new(4, 4, [0, 0, 0]);
        let layer = Soften { blur_sigma: 0.0, contrast: 20.0 };
        assert!(layer.apply(&mut canvas, &mut StdRng::seed_from_u64(4)).is_err());
    }

    #[test]
    fn test_soften_keeps_dimensions() {
        let mut canvas = Canvas::new(16, 9, [40, 40, 60]);
        let layer = Soften { blur_sigma: 2.0, contrast: 20.0 };
        layer.apply(&mut canvas, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (16, 9));
    }
}
