//! Software rasterizer for the dial graphics.
//!
//! Everything is drawn into the RGBA framebuffer supplied by `pixels`, with
//! distance-based anti-aliasing on every primitive.

use rusttype::{point, Font, PositionedGlyph, Scale};

pub struct Canvas<'a> {
    frame: &'a mut [u8],
    pub width: usize,
    pub height: usize,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: (u8, u8, u8)) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.0, color.1, color.2, 0xff]);
        }
    }

    /// Alpha-blend one pixel. Out-of-bounds coordinates are ignored.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: (u8, u8, u8), alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        if idx + 4 > self.frame.len() {
            return;
        }
        let a = alpha.clamp(0.0, 1.0);
        let src = [color.0 as f32, color.1 as f32, color.2 as f32];
        for (offset, channel) in src.iter().enumerate() {
            let dst = self.frame[idx + offset] as f32;
            self.frame[idx + offset] = (channel * a + dst * (1.0 - a)).round() as u8;
        }
        self.frame[idx + 3] = 0xff;
    }

    /// Blend with bilinear distribution across the four nearest pixels, for
    /// sub-pixel positions produced by rotation.
    fn blend_subpixel(&mut self, x: f64, y: f64, color: (u8, u8, u8), alpha: f32) {
        let x_floor = x.floor() as i32;
        let y_floor = y.floor() as i32;
        let x_frac = (x - x_floor as f64) as f32;
        let y_frac = (y - y_floor as f64) as f32;

        let samples = [
            (x_floor, y_floor, (1.0 - x_frac) * (1.0 - y_frac)),
            (x_floor + 1, y_floor, x_frac * (1.0 - y_frac)),
            (x_floor, y_floor + 1, (1.0 - x_frac) * y_frac),
            (x_floor + 1, y_floor + 1, x_frac * y_frac),
        ];
        for (px, py, weight) in samples {
            let a = alpha * weight;
            if a > 0.001 {
                self.blend_pixel(px, py, color, a);
            }
        }
    }

    pub fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: (u8, u8, u8)) {
        let r = radius.ceil() as i32 + 1;
        for dy in -r..=r {
            for dx in -r..=r {
                let dist = ((dx * dx + dy * dy) as f64).sqrt();
                let aa = 1.0 - (dist - radius).clamp(0.0, 1.0);
                if aa > 0.01 {
                    self.blend_pixel(
                        (cx + dx as f64).round() as i32,
                        (cy + dy as f64).round() as i32,
                        color,
                        aa as f32,
                    );
                }
            }
        }
    }

    /// Stroked arc band. Angles are in radians, measured clockwise from the
    /// positive x axis (screen coordinates, y down).
    pub fn stroke_arc(
        &mut self,
        cx: f64,
        cy: f64,
        radius: f64,
        thickness: f64,
        start_angle: f64,
        arc_span: f64,
        color: (u8, u8, u8),
    ) {
        const TAU: f64 = std::f64::consts::TAU;
        let start = start_angle.rem_euclid(TAU);
        let end = (start_angle + arc_span).rem_euclid(TAU);
        let inner = (radius - thickness).max(0.0);

        let reach = radius.ceil() as i32 + 1;
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                let fx = dx as f64;
                let fy = dy as f64;
                let dist = (fx * fx + fy * fy).sqrt();
                if dist < inner - 1.0 || dist > radius + 1.0 {
                    continue;
                }
                let angle = fy.atan2(fx).rem_euclid(TAU);
                let in_arc = if start < end {
                    angle >= start && angle <= end
                } else {
                    angle >= start || angle <= end
                };
                if !in_arc {
                    continue;
                }
                let aa = if dist > radius {
                    1.0 - (dist - radius).min(1.0)
                } else if dist < inner {
                    1.0 - (inner - dist).min(1.0)
                } else {
                    1.0
                };
                if aa > 0.01 {
                    self.blend_pixel(
                        (cx + fx).round() as i32,
                        (cy + fy).round() as i32,
                        color,
                        aa as f32,
                    );
                }
            }
        }
    }

    pub fn thick_line(
        &mut self,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        thickness: f32,
        color: (u8, u8, u8),
    ) {
        self.line_impl(x0, y0, x1, y1, thickness, false, color);
    }

    /// Line that narrows towards its end point; used for the needle.
    pub fn tapered_line(
        &mut self,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        thickness: f32,
        color: (u8, u8, u8),
    ) {
        self.line_impl(x0, y0, x1, y1, thickness, true, color);
    }

    fn line_impl(
        &mut self,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        thickness: f32,
        tapered: bool,
        color: (u8, u8, u8),
    ) {
        let pad = thickness.ceil() as i32 + 1;
        let min_x = x0.min(x1).floor() as i32 - pad;
        let max_x = x0.max(x1).ceil() as i32 + pad;
        let min_y = y0.min(y1).floor() as i32 - pad;
        let max_y = y0.max(y1).ceil() as i32 + pad;
        let dx = x1 - x0;
        let dy = y1 - y0;
        let len_sq = dx * dx + dy * dy;
        if len_sq <= f64::EPSILON {
            return;
        }
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f64 - x0;
                let py = y as f64 - y0;
                let t = ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0);
                let lx = x0 + t * dx;
                let ly = y0 + t * dy;
                let dist = ((lx - x as f64).powi(2) + (ly - y as f64).powi(2)).sqrt();
                let local_thickness = if tapered {
                    // Leave 5% so the tip does not vanish early.
                    thickness as f64 * (1.0 - t * 0.95)
                } else {
                    thickness as f64
                };
                let aa = (1.0 - (dist - local_thickness / 2.0).clamp(0.0, 1.0)).clamp(0.0, 1.0);
                if aa > 0.01 {
                    self.blend_pixel(x, y, color, aa as f32);
                }
            }
        }
    }

    /// Filled rounded rectangle centred on (cx, cy).
    pub fn fill_rounded_rect(
        &mut self,
        cx: f64,
        cy: f64,
        width: f64,
        height: f64,
        corner_radius: f64,
        color: (u8, u8, u8),
    ) {
        let half_w = width / 2.0;
        let half_h = height / 2.0;
        let corner = corner_radius.min(half_w).min(half_h);
        let min_x = (cx - half_w).floor() as i32 - 1;
        let max_x = (cx + half_w).ceil() as i32 + 1;
        let min_y = (cy - half_h).floor() as i32 - 1;
        let max_y = (cy + half_h).ceil() as i32 + 1;
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let dx = ((x as f64 - cx).abs() - (half_w - corner)).max(0.0);
                let dy = ((y as f64 - cy).abs() - (half_h - corner)).max(0.0);
                let dist = (dx * dx + dy * dy).sqrt() - corner;
                let aa = 1.0 - dist.clamp(0.0, 1.0);
                if aa > 0.01 {
                    self.blend_pixel(x, y, color, aa as f32);
                }
            }
        }
    }

    /// Text centred on (x, y).
    pub fn text(
        &mut self,
        x: f64,
        y: f64,
        text: &str,
        font: &Font,
        size: f32,
        color: (u8, u8, u8),
    ) {
        let glyphs = layout_glyphs(text, font, size);
        let Some((min_x, max_x, min_y, max_y)) = glyph_bounds(&glyphs) else {
            return;
        };
        let offset_x = x - (max_x - min_x) as f64 / 2.0;
        let offset_y = y - (max_y - min_y) as f64 / 2.0;
        for glyph in &glyphs {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    if v > 0.001 {
                        let px = offset_x + (gx as i32 + bb.min.x - min_x) as f64;
                        let py = offset_y + (gy as i32 + bb.min.y - min_y) as f64;
                        self.blend_subpixel(px, py, color, v);
                    }
                });
            }
        }
    }

    /// Text centred on (x, y) and rotated around that point, for the label
    /// ring. Rotation is in radians.
    pub fn rotated_text(
        &mut self,
        x: f64,
        y: f64,
        rotation: f64,
        text: &str,
        font: &Font,
        size: f32,
        color: (u8, u8, u8),
    ) {
        let glyphs = layout_glyphs(text, font, size);
        let Some((min_x, max_x, min_y, max_y)) = glyph_bounds(&glyphs) else {
            return;
        };
        let center_x = (min_x + max_x) as f64 / 2.0;
        let center_y = (min_y + max_y) as f64 / 2.0;
        let (sin_r, cos_r) = rotation.sin_cos();
        for glyph in &glyphs {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, v| {
                if v > 0.001 {
                    let local_x = gx as f64 + bb.min.x as f64 - center_x;
                    let local_y = gy as f64 + bb.min.y as f64 - center_y;
                    let rx = local_x * cos_r - local_y * sin_r;
                    let ry = local_x * sin_r + local_y * cos_r;
                    self.blend_subpixel(x + rx, y + ry, color, v);
                }
            });
        }
    }
}

/// Pixel width of a string at the given size, for badge sizing.
pub fn text_width(text: &str, font: &Font, size: f32) -> f64 {
    let glyphs = layout_glyphs(text, font, size);
    match glyph_bounds(&glyphs) {
        Some((min_x, max_x, _, _)) => (max_x - min_x) as f64,
        None => 0.0,
    }
}

fn layout_glyphs<'f>(text: &str, font: &'f Font, size: f32) -> Vec<PositionedGlyph<'f>> {
    let scale = Scale::uniform(size);
    let v_metrics = font.v_metrics(scale);
    font.layout(text, scale, point(0.0, v_metrics.ascent))
        .collect()
}

fn glyph_bounds(glyphs: &[PositionedGlyph]) -> Option<(i32, i32, i32, i32)> {
    let (min_x, max_x, min_y, max_y) = glyphs
        .iter()
        .filter_map(|g| g.pixel_bounding_box())
        .fold(
            (i32::MAX, i32::MIN, i32::MAX, i32::MIN),
            |(min_x, max_x, min_y, max_y), bb| {
                (
                    min_x.min(bb.min.x),
                    max_x.max(bb.max.x),
                    min_y.min(bb.min.y),
                    max_y.max(bb.max.y),
                )
            },
        );
    if min_x < max_x {
        Some((min_x, max_x, min_y, max_y))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::REGULAR_FONT;
    use rusttype::Font;

    fn test_font() -> Font<'static> {
        Font::try_from_bytes(REGULAR_FONT).expect("embedded font parses")
    }

    #[test]
    fn embedded_fonts_parse() {
        assert!(Font::try_from_bytes(REGULAR_FONT).is_some());
        assert!(Font::try_from_bytes(crate::theme::BOLD_FONT).is_some());
    }

    #[test]
    fn text_width_grows_with_content() {
        let font = test_font();
        let narrow = text_width("5", &font, 30.0);
        let wide = text_width("160", &font, 30.0);
        assert!(narrow > 0.0);
        assert!(wide > narrow);
    }

    #[test]
    fn blend_pixel_ignores_out_of_bounds() {
        let mut frame = vec![0u8; 4 * 4 * 4];
        let mut canvas = Canvas::new(&mut frame, 4, 4);
        canvas.blend_pixel(-1, 0, (0xff, 0xff, 0xff), 1.0);
        canvas.blend_pixel(0, 10, (0xff, 0xff, 0xff), 1.0);
        assert!(frame.iter().all(|&b| b == 0));
    }

    #[test]
    fn fill_circle_touches_centre_pixel() {
        let mut frame = vec![0u8; 16 * 16 * 4];
        let mut canvas = Canvas::new(&mut frame, 16, 16);
        canvas.fill_circle(8.0, 8.0, 4.0, (0xff, 0x00, 0x00));
        let idx = (8 * 16 + 8) * 4;
        assert_eq!(frame[idx], 0xff);
        // A corner pixel stays untouched.
        assert_eq!(frame[0], 0);
    }
}
