use image::{ImageFormat, Rgba, RgbaImage};
use std::path::Path;

pub type Point = (f32, f32);
pub type Tri = [Point; 3];

/// Set of covered pixels.
///
/// Shapes are rasterized into a mask first and painted once, so overlapping
/// triangles or segments never blend a translucent color twice.
#[derive(Debug, Clone)]
pub struct Mask {
    width: u32,
    height: u32,
    covered: Vec<bool>,
}

impl Mask {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            covered: vec![false; width as usize * height as usize],
        }
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.covered[(y * self.width + x) as usize]
    }

    pub fn count(&self) -> usize {
        self.covered.iter().filter(|&&c| c).count()
    }

    /// Pixel box `[x0, x1) x [y0, y1)` covering the float extent, clamped to the mask.
    fn clamp_box(&self, min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> (u32, u32, u32, u32) {
        let clamp = |v: f32, hi: u32| v.max(0.0).min(hi as f32) as u32;
        (
            clamp(min_x.floor(), self.width),
            clamp(min_y.floor(), self.height),
            clamp(max_x.ceil() + 1.0, self.width),
            clamp(max_y.ceil() + 1.0, self.height),
        )
    }

    fn set(&mut self, x: u32, y: u32) {
        self.covered[(y * self.width + x) as usize] = true;
    }

    /// Cover every pixel whose center lies inside the triangle (either winding).
    pub fn fill_triangle(&mut self, tri: &Tri) {
        let [a, b, c] = *tri;
        let area = edge(a, b, c);
        if area.abs() < 1e-6 || !area.is_finite() {
            return;
        }

        let (x0, y0, x1, y1) = self.clamp_box(
            a.0.min(b.0).min(c.0),
            a.1.min(b.1).min(c.1),
            a.0.max(b.0).max(c.0),
            a.1.max(b.1).max(c.1),
        );

        for y in y0..y1 {
            for x in x0..x1 {
                let p = (x as f32 + 0.5, y as f32 + 0.5);
                let w0 = edge(b, c, p);
                let w1 = edge(c, a, p);
                let w2 = edge(a, b, p);
                let inside = if area > 0.0 {
                    w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0
                } else {
                    w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0
                };
                if inside {
                    self.set(x, y);
                }
            }
        }
    }

    /// Cover every pixel within `width / 2` of the segment.
    pub fn stroke_segment(&mut self, a: Point, b: Point, width: f32) {
        let half = (width / 2.0).max(0.5);
        let (x0, y0, x1, y1) = self.clamp_box(
            a.0.min(b.0) - half,
            a.1.min(b.1) - half,
            a.0.max(b.0) + half,
            a.1.max(b.1) + half,
        );

        for y in y0..y1 {
            for x in x0..x1 {
                let p = (x as f32 + 0.5, y as f32 + 0.5);
                if distance_to_segment(p, a, b) <= half {
                    self.set(x, y);
                }
            }
        }
    }

    pub fn stroke_polyline(&mut self, points: &[Point], width: f32, closed: bool) {
        for pair in points.windows(2) {
            self.stroke_segment(pair[0], pair[1], width);
        }
        if closed
            && points.len() > 2
            && let (Some(&first), Some(&last)) = (points.first(), points.last())
        {
            self.stroke_segment(last, first, width);
        }
    }

    pub fn fill_circle(&mut self, center: Point, radius: f32) {
        self.stroke_segment(center, center, radius * 2.0);
    }
}

/// Twice the signed area of triangle (a, b, p)
fn edge(a: Point, b: Point, p: Point) -> f32 {
    (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0)
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq > 0.0 {
        (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
    ((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt()
}

/// RGBA raster target
#[derive(Debug)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgba<u8>) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, background),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn mask(&self) -> Mask {
        Mask::new(self.width(), self.height())
    }

    /// Source-over blend of `color` onto every covered pixel.
    pub fn paint(&mut self, mask: &Mask, color: Rgba<u8>) {
        let alpha = color.0[3] as f32 / 255.0;
        for (x, y, pixel) in self.image.enumerate_pixels_mut() {
            if !mask.contains(x, y) {
                continue;
            }
            for channel in 0..3 {
                let dst = pixel.0[channel] as f32;
                let src = color.0[channel] as f32;
                pixel.0[channel] = (src * alpha + dst * (1.0 - alpha)).round() as u8;
            }
            pixel.0[3] = 255;
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.image.get_pixel(x, y)
    }

    pub fn save_png(&self, path: &Path) -> image::ImageResult<()> {
        self.image.save_with_format(path, ImageFormat::Png)
    }
}
