// src/frame/border.rs - ornamental frame overlay

use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::{draw_hollow_circle_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use rand::RngCore;

use crate::error::Result;
use crate::frame::traits::Layer;
use crate::frame::types::Canvas;

const OUTER: Rgba<u8> = Rgba([210, 180, 140, 200]);
const INNER: Rgba<u8> = Rgba([180, 160, 120, 180]);
const CORNER_ARC: Rgba<u8> = Rgba([200, 170, 100, 150]);
const CORNER_LINE: Rgba<u8> = Rgba([220, 190, 120, 150]);
const EDGE_ARC: Rgba<u8> = Rgba([230, 200, 150, 180]);

/// Double rectangular border with ringed corners, corner hatching and a
/// row of small rings along every edge.
///
/// Drawn onto a transparent overlay which is then alpha-blended over the
/// canvas. All measurements are for 1080p and multiplied by `scale`.
pub struct OrnamentBorder {
    pub scale: f32,
}

impl OrnamentBorder {
    fn px(&self, value: f32) -> i32 {
        (value * self.scale).round().max(1.0) as i32
    }

    fn overlay(&self, width: u32, height: u32) -> RgbaImage {
        let mut overlay = RgbaImage::new(width, height);
        let (w, h) = (width as i32, height as i32);

        let border = self.px(40.0);
        let inner_border = self.px(20.0);
        let inset = border + self.px(10.0);

        stroke_rect(&mut overlay, 0, 0, w, h, border, OUTER);
        stroke_rect(&mut overlay, inset, inset, w - 2 * inset, h - 2 * inset, inner_border, INNER);

        let corner = self.px(150.0);
        let corners = [(0, 0), (w - corner, 0), (0, h - corner), (w - corner, h - corner)];
        for (x, y) in corners {
            let (cx, cy) = (x + corner / 2, y + corner / 2);

            let mut radius = self.px(20.0);
            while radius < self.px(80.0) {
                stroke_circle(&mut overlay, cx, cy, radius, self.px(3.0), CORNER_ARC);
                radius += self.px(15.0);
            }

            let mut offset = 0;
            while offset < corner {
                stroke_line(&mut overlay, (x + offset, y), (x, y + offset), self.px(2.0), CORNER_LINE);
                offset += self.px(20.0);
            }
        }

        let spacing = self.px(80.0) as usize;
        let ring = self.px(15.0);
        let ring_width = self.px(2.0);
        let edge = border / 2;

        for x in (corner..w - corner).step_by(spacing) {
            stroke_circle(&mut overlay, x, edge, ring, ring_width, EDGE_ARC);
            stroke_circle(&mut overlay, x, h - edge, ring, ring_width, EDGE_ARC);
        }
        for y in (corner..h - corner).step_by(spacing) {
            stroke_circle(&mut overlay, edge, y, ring, ring_width, EDGE_ARC);
            stroke_circle(&mut overlay, w - edge, y, ring, ring_width, EDGE_ARC);
        }

        overlay
    }
}

impl Layer for OrnamentBorder {
    fn name(&self) -> &str {
        "border"
    }

    fn apply(&self, canvas: &mut Canvas, _rng: &mut dyn RngCore) -> Result<()> {
        let overlay = self.overlay(canvas.width(), canvas.height());
        imageops::overlay(&mut canvas.image, &overlay, 0, 0);
        Ok(())
    }
}

/// Rectangle outline `thickness` pixels wide, growing inwards
fn stroke_rect(image: &mut RgbaImage, x: i32, y: i32, width: i32, height: i32, thickness: i32, color: Rgba<u8>) {
    for k in 0..thickness {
        let (w, h) = (width - 2 * k, height - 2 * k);
        if w <= 0 || h <= 0 {
            break;
        }
        draw_hollow_rect_mut(image, Rect::at(x + k, y + k).of_size(w as u32, h as u32), color);
    }
}

/// Circle outline `thickness` pixels wide, growing inwards
fn stroke_circle(image: &mut RgbaImage, cx: i32, cy: i32, radius: i32, thickness: i32, color: Rgba<u8>) {
    for k in 0..thickness.min(radius) {
        draw_hollow_circle_mut(image, (cx, cy), radius - k, color);
    }
}

fn stroke_line(image: &mut RgbaImage, start: (i32, i32), end: (i32, i32), thickness: i32, color: Rgba<u8>) {
    for k in 0..thickness {
        draw_line_segment_mut(
            image,
            ((start.0 + k) as f32, start.1 as f32),
            ((end.0 + k) as f32, end.1 as f32),
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_border_tints_edges_not_centre() {
        let mut canvas = Canvas::new(480, 270, [0, 0, 0]);
        let layer = OrnamentBorder { scale: 0.25 };
        layer.apply(&mut canvas, &mut StdRng::seed_from_u64(1)).unwrap();

        let edge = canvas.image.get_pixel(2, 135);
        assert!(edge[0] > 100, "outer border should be drawn: {:?}", edge);

        let centre = canvas.image.get_pixel(240, 135);
        assert_eq!(centre.0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_overlay_is_transparent_inside() {
        let layer = OrnamentBorder { scale: 1.0 };
        let overlay = layer.overlay(1920, 1080);
        assert_eq!(overlay.get_pixel(960, 540)[3], 0);
        assert_eq!(overlay.get_pixel(960, 5)[3], OUTER[3]);
    }

    #[test]
    fn test_tiny_canvas_does_not_panic() {
        let mut canvas = Canvas::new(3, 2, [0, 0, 0]);
        OrnamentBorder { scale: 0.001 }
            .apply(&mut canvas, &mut StdRng::seed_from_u64(2))
            .unwrap();
    }
}
