use super::canvas::{Mask, Point, Tri};
use std::path::Path;

const CURVE_SUBDIVISIONS: u8 = 8;
const GLYPH_DEPTH: f32 = 1.0;

/// Stroke font cell: glyphs live on a 4 x 6 grid, advanced by 6 units.
const STROKE_GRID_ADVANCE: f32 = 6.0;
const STROKE_UNITS_PER_EM: f32 = 8.0;

const DEFAULT_FONT_PATHS: [&str; 4] = [
    "fonts/DejaVuSans.ttf",
    "./fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Pixel-space geometry of a run of text, ready to rasterize.
#[derive(Debug, Clone, Default)]
pub struct TextShape {
    pub triangles: Vec<Tri>,
    pub strokes: Vec<Vec<Point>>,
    pub stroke_width: f32,
}

impl TextShape {
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty() && self.strokes.is_empty()
    }

    /// Turn the shape a quarter turn counter-clockwise (as seen on screen)
    /// around `anchor`.
    pub fn rotated_ccw(mut self, anchor: Point) -> Self {
        let turn = |(x, y): Point| (anchor.0 + (y - anchor.1), anchor.1 - (x - anchor.0));
        for tri in &mut self.triangles {
            for p in tri.iter_mut() {
                *p = turn(*p);
            }
        }
        for stroke in &mut self.strokes {
            for p in stroke.iter_mut() {
                *p = turn(*p);
            }
        }
        self
    }

    pub fn rasterize(&self, mask: &mut Mask) {
        for tri in &self.triangles {
            mask.fill_triangle(tri);
        }
        for stroke in &self.strokes {
            if stroke.len() == 1 {
                mask.fill_circle(stroke[0], self.stroke_width / 2.0);
            } else {
                mask.stroke_polyline(stroke, self.stroke_width, false);
            }
        }
    }
}

/// Glyph outlines from a TrueType font, flattened into triangles.
pub struct TtfTextRenderer {
    font_data: Vec<u8>,
}

impl TtfTextRenderer {
    pub fn load(font_path: &Path) -> Option<Self> {
        let font_data = std::fs::read(font_path).ok()?;
        let face = fontmesh::Face::parse(&font_data, 0).ok()?;

        if fontmesh::char_to_mesh_3d(&face, 'A', GLYPH_DEPTH, CURVE_SUBDIVISIONS).is_err() {
            return None;
        }

        Some(Self { font_data })
    }

    pub fn load_default() -> Option<Self> {
        DEFAULT_FONT_PATHS
            .iter()
            .map(Path::new)
            .filter(|p| p.exists())
            .find_map(Self::load)
    }

    fn face(&self) -> Option<fontmesh::Face<'_>> {
        fontmesh::Face::parse(&self.font_data, 0).ok()
    }

    /// Width in pixels at an em size of `size` pixels
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        let Some(face) = self.face() else {
            return 0.0;
        };
        text.chars()
            .filter_map(|ch| fontmesh::glyph_advance(&face, ch))
            .map(|advance| advance * size)
            .sum()
    }

    pub fn render_text(&self, text: &str, x: f32, baseline: f32, size: f32) -> TextShape {
        let mut shape = TextShape::default();
        let Some(face) = self.face() else {
            return shape;
        };
        let mut cursor_x = x;

        for ch in text.chars() {
            if !ch.is_whitespace()
                && let Ok(mesh) =
                    fontmesh::char_to_mesh_3d(&face, ch, GLYPH_DEPTH, CURVE_SUBDIVISIONS)
            {
                // Front and back faces coincide once z is dropped; side walls
                // collapse to zero area and rasterize to nothing.
                for tri_indices in mesh.indices.chunks_exact(3) {
                    let idx = [
                        tri_indices[0] as usize,
                        tri_indices[1] as usize,
                        tri_indices[2] as usize,
                    ];
                    if idx.iter().any(|&i| i >= mesh.vertices.len()) {
                        continue;
                    }
                    let to_px = |i: usize| {
                        let v = mesh.vertices[i];
                        (cursor_x + v[0] * size, baseline - v[1] * size)
                    };
                    shape.triangles.push([to_px(idx[0]), to_px(idx[1]), to_px(idx[2])]);
                }
            }

            match fontmesh::glyph_advance(&face, ch) {
                Some(advance) => cursor_x += advance * size,
                None => cursor_x += 0.3 * size,
            }
        }

        shape
    }
}

/// Built-in single-stroke font used when no TrueType font can be loaded.
#[derive(Debug, Clone)]
pub struct StrokeTextRenderer {
    /// Stroke thickness as a fraction of the em size
    pub weight: f32,
}

impl Default for StrokeTextRenderer {
    fn default() -> Self {
        Self { weight: 0.09 }
    }
}

impl StrokeTextRenderer {
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        let count = text.chars().count();
        if count == 0 {
            return 0.0;
        }
        let unit = size / STROKE_UNITS_PER_EM;
        // No trailing gap after the last glyph
        (count as f32 * STROKE_GRID_ADVANCE - 2.0) * unit
    }

    pub fn render_text(&self, text: &str, x: f32, baseline: f32, size: f32) -> TextShape {
        let unit = size / STROKE_UNITS_PER_EM;
        let mut shape = TextShape {
            stroke_width: (size * self.weight).max(1.0),
            ..Default::default()
        };
        let mut cursor_x = x;

        for ch in text.chars() {
            for stroke in glyph_strokes(ch).split_whitespace() {
                let points: Vec<Point> = stroke
                    .as_bytes()
                    .chunks_exact(2)
                    .map(|p| {
                        let gx = (p[0] - b'0') as f32;
                        let gy = (p[1] - b'0') as f32;
                        (cursor_x + gx * unit, baseline - gy * unit)
                    })
                    .collect();
                if !points.is_empty() {
                    shape.strokes.push(points);
                }
            }
            cursor_x += STROKE_GRID_ADVANCE * unit;
        }

        shape
    }
}

/// Strokes on a 4 x 6 grid, y up. Each whitespace-separated word is one
/// polyline written as consecutive `xy` digit pairs.
fn glyph_strokes(ch: char) -> &'static str {
    match ch.to_ascii_uppercase() {
        'A' => "0004264440 0343",
        'B' => "00063645443303 3342413000",
        'C' => "4536160501103041",
        'D' => "00062644422000",
        'E' => "40000646 0333",
        'F' => "000646 0333",
        'G' => "45361605011030414323",
        'H' => "0006 4046 0343",
        'I' => "1030 2026 1636",
        'J' => "0110203136 1646",
        'K' => "0006 460340",
        'L' => "060040",
        'M' => "0006234640",
        'N' => "00064046",
        'O' => "100105163645413010",
        'P' => "00063645443303",
        'Q' => "100105163645413010 2240",
        'R' => "00063645443303 2340",
        'S' => "453616050413334241301001",
        'T' => "0646 2620",
        'U' => "060110304146",
        'V' => "062046",
        'W' => "0610233046",
        'X' => "0046 0640",
        'Y' => "062346 2320",
        'Z' => "06460040",
        '0' => "100105163645413010 1135",
        '1' => "142620 1030",
        '2' => "05163645440040",
        '3' => "05163645443313 334241301001",
        '4' => "30360242",
        '5' => "460604344341301001",
        '6' => "36160501103041423303",
        '7' => "064610",
        '8' => "130405163645443313 1302011030414233",
        '9' => "10304145361605041343",
        '.' => "20",
        ',' => "2110",
        '-' => "1333",
        '+' => "0343 2125",
        '=' => "0242 0444",
        '/' => "0046",
        ':' => "22 25",
        '(' => "36252130",
        ')' => "16252110",
        '_' => "0040",
        ' ' => "",
        _ => "0040464600",
    }
}

/// Text backend: TrueType when a font is available, stroke font otherwise
pub enum TextRenderer {
    Ttf(TtfTextRenderer),
    Stroke(StrokeTextRenderer),
}

impl TextRenderer {
    pub fn new(font_path: Option<&Path>) -> Self {
        if let Some(path) = font_path
            && let Some(ttf) = TtfTextRenderer::load(path)
        {
            return Self::Ttf(ttf);
        }
        if let Some(ttf) = TtfTextRenderer::load_default() {
            return Self::Ttf(ttf);
        }
        Self::Stroke(StrokeTextRenderer::default())
    }

    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        match self {
            Self::Ttf(ttf) => ttf.text_width(text, size),
            Self::Stroke(stroke) => stroke.text_width(text, size),
        }
    }

    pub fn render_text(&self, text: &str, x: f32, baseline: f32, size: f32) -> TextShape {
        match self {
            Self::Ttf(ttf) => ttf.render_text(text, x, baseline, size),
            Self::Stroke(stroke) => stroke.render_text(text, x, baseline, size),
        }
    }

    /// Render with `x` interpreted according to `align`.
    pub fn render_aligned(
        &self,
        text: &str,
        x: f32,
        baseline: f32,
        size: f32,
        align: Align,
    ) -> TextShape {
        let width = self.text_width(text, size);
        let start_x = match align {
            Align::Left => x,
            Align::Center => x - width / 2.0,
            Align::Right => x - width,
        };
        self.render_text(text, start_x, baseline, size)
    }

    pub fn is_ttf(&self) -> bool {
        matches!(self, Self::Ttf(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_text_width() {
        let renderer = StrokeTextRenderer::default();
        // 2 glyphs: 12 grid units minus the trailing gap, at 1 px per unit
        assert!((renderer.text_width("AB", 8.0) - 10.0).abs() < 1e-6);
        assert_eq!(renderer.text_width("", 8.0), 0.0);
    }

    #[test]
    fn test_stroke_render_positions() {
        let renderer = StrokeTextRenderer::default();
        let shape = renderer.render_text("L", 10.0, 50.0, 8.0);
        // 'L': top-left (0,6) down to (0,0) then right to (4,0)
        assert_eq!(shape.strokes, vec![vec![(10.0, 44.0), (10.0, 50.0), (14.0, 50.0)]]);
    }

    #[test]
    fn test_every_glyph_is_well_formed() {
        let chars = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789.,-+=/:()_ ?";
        for ch in chars.chars() {
            for stroke in glyph_strokes(ch).split_whitespace() {
                assert_eq!(stroke.len() % 2, 0, "odd stroke for {ch:?}");
                assert!(stroke.bytes().all(|b| (b'0'..=b'6').contains(&b)));
            }
        }
    }

    #[test]
    fn test_rotation_turns_baseline_upwards() {
        let renderer = StrokeTextRenderer::default();
        let shape = renderer.render_text("L", 10.0, 50.0, 8.0).rotated_ccw((10.0, 50.0));
        // The foot of the 'L' now runs up the screen from the anchor
        assert_eq!(shape.strokes[0][2], (10.0, 46.0));
        // The stem now runs to the left
        assert_eq!(shape.strokes[0][0], (4.0, 50.0));
    }

    #[test]
    fn test_space_renders_nothing() {
        let renderer = StrokeTextRenderer::default();
        assert!(renderer.render_text("  ", 0.0, 0.0, 10.0).is_empty());
    }

    #[test]
    fn test_centered_text_straddles_anchor() {
        let renderer = TextRenderer::new(None);
        let shape = renderer.render_aligned("POINT 1", 100.0, 50.0, 20.0, Align::Center);
        assert!(!shape.is_empty(), "TextRenderer should produce geometry");

        let mut mask = Mask::new(200, 100);
        shape.rasterize(&mut mask);
        let left = (0..100).any(|x| (30..55).any(|y| mask.contains(x, y)));
        let right = (100..200).any(|x| (30..55).any(|y| mask.contains(x, y)));
        assert!(left && right);
    }
}
