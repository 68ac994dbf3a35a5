//! Minimal shape rasterizer on top of `image::RgbaImage`
//!
//! Shapes are filled by point-in-shape tests over their bounding box.
//! Source-over blending, straight alpha.

use image::{Rgba, RgbaImage};

pub const fn rgb(hex: u32) -> Rgba<u8> {
    Rgba([(hex >> 16) as u8, (hex >> 8) as u8, hex as u8, 0xFF])
}

pub const fn rgba(hex: u32, alpha: u8) -> Rgba<u8> {
    Rgba([(hex >> 16) as u8, (hex >> 8) as u8, hex as u8, alpha])
}

pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    /// Fully transparent canvas
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0])),
        }
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    fn blend(&mut self, x: i32, y: i32, color: Rgba<u8>) {
        if x < 0 || y < 0 || x >= self.width() as i32 || y >= self.height() as i32 {
            return;
        }
        let dst = self.image.get_pixel_mut(x as u32, y as u32);
        let src_a = color[3] as f32 / 255.0;
        if src_a >= 1.0 {
            *dst = color;
            return;
        }
        let dst_a = dst[3] as f32 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        if out_a <= 0.0 {
            return;
        }
        for c in 0..3 {
            let v = (color[c] as f32 * src_a + dst[c] as f32 * dst_a * (1.0 - src_a)) / out_a;
            dst[c] = v.round().clamp(0.0, 255.0) as u8;
        }
        dst[3] = (out_a * 255.0).round() as u8;
    }

    /// Fills every pixel whose center satisfies `inside`
    fn fill_where<F>(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba<u8>, inside: F)
    where
        F: Fn(f32, f32) -> bool,
    {
        let min_x = x0.floor().max(0.0) as i32;
        let min_y = y0.floor().max(0.0) as i32;
        let max_x = (x1.ceil() as i32).min(self.width() as i32 - 1);
        let max_y = (y1.ceil() as i32).min(self.height() as i32 - 1);
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                if inside(x as f32 + 0.5, y as f32 + 0.5) {
                    self.blend(x, y, color);
                }
            }
        }
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba<u8>) {
        self.fill_where(x, y, x + w, y + h, color, |px, py| {
            px >= x && px < x + w && py >= y && py < y + h
        });
    }

    pub fn fill_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, color: Rgba<u8>) {
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        self.fill_where(cx - rx, cy - ry, cx + rx, cy + ry, color, |px, py| {
            let dx = (px - cx) / rx;
            let dy = (py - cy) / ry;
            dx * dx + dy * dy <= 1.0
        });
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: Rgba<u8>) {
        self.fill_ellipse(cx, cy, r, r, color);
    }

    /// Lower half of an ellipse (mouths, smiles)
    pub fn fill_lower_half_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, color: Rgba<u8>) {
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        self.fill_where(cx - rx, cy, cx + rx, cy + ry, color, |px, py| {
            let dx = (px - cx) / rx;
            let dy = (py - cy) / ry;
            py >= cy && dx * dx + dy * dy <= 1.0
        });
    }

    /// Upper half of an ellipse (happy eyes, hair caps)
    pub fn fill_upper_half_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, color: Rgba<u8>) {
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        self.fill_where(cx - rx, cy - ry, cx + rx, cy, color, |px, py| {
            let dx = (px - cx) / rx;
            let dy = (py - cy) / ry;
            py <= cy && dx * dx + dy * dy <= 1.0
        });
    }

    /// Ring between two radii
    pub fn stroke_circle(&mut self, cx: f32, cy: f32, r: f32, width: f32, color: Rgba<u8>) {
        let inner = (r - width).max(0.0);
        self.fill_where(cx - r, cy - r, cx + r, cy + r, color, |px, py| {
            let d = ((px - cx).powi(2) + (py - cy).powi(2)).sqrt();
            d <= r && d >= inner
        });
    }

    /// Thick segment from `(x0, y0)` to `(x1, y1)`
    pub fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, width: f32, color: Rgba<u8>) {
        let half = width / 2.0;
        let (dx, dy) = (x1 - x0, y1 - y0);
        let len_sq = dx * dx + dy * dy;
        self.fill_where(
            x0.min(x1) - half,
            y0.min(y1) - half,
            x0.max(x1) + half,
            y0.max(y1) + half,
            color,
            |px, py| {
                let t = if len_sq == 0.0 {
                    0.0
                } else {
                    (((px - x0) * dx + (py - y0) * dy) / len_sq).clamp(0.0, 1.0)
                };
                let (qx, qy) = (x0 + t * dx, y0 + t * dy);
                (px - qx).powi(2) + (py - qy).powi(2) <= half * half
            },
        );
    }

    /// Convex polygon, vertices in either winding
    pub fn fill_polygon(&mut self, points: &[(f32, f32)], color: Rgba<u8>) {
        if points.len() < 3 {
            return;
        }
        let min_x = points.iter().map(|p| p.0).fold(f32::INFINITY, f32::min);
        let max_x = points.iter().map(|p| p.0).fold(f32::NEG_INFINITY, f32::max);
        let min_y = points.iter().map(|p| p.1).fold(f32::INFINITY, f32::min);
        let max_y = points.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max);
        self.fill_where(min_x, min_y, max_x, max_y, color, |px, py| {
            let mut sign = 0.0f32;
            for i in 0..points.len() {
                let (ax, ay) = points[i];
                let (bx, by) = points[(i + 1) % points.len()];
                let cross = (bx - ax) * (py - ay) - (by - ay) * (px - ax);
                if cross != 0.0 {
                    if sign == 0.0 {
                        sign = cross.signum();
                    } else if cross.signum() != sign {
                        return false;
                    }
                }
            }
            true
        });
    }
}
