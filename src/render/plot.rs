use super::axes::{AxesMetrics, PlotArea, draw_axes};
use super::canvas::{Canvas, Mask};
use super::text::{Align, TextRenderer};
use super::triangulation::fill_triangles;
use crate::domain::Polygon;
use crate::error::{MapError, Result};
use crate::geometry::{
    Aspect, Bounds, Margins, Projector, Scaler, calculate_epsilon, simplify_outline,
};
use image::Rgba;
use std::path::{Path, PathBuf};

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const OUTLINE_COLOR: Rgba<u8> = Rgba([0, 0, 255, 255]);
/// Same blue at 20% opacity
const FILL_COLOR: Rgba<u8> = Rgba([0, 0, 255, 51]);
const MARKER_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);
const TEXT_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Fraction of the data extent left empty around the outline
const DATA_PADDING: f64 = 0.05;

/// Figure settings. Sizes are in pixels.
#[derive(Debug, Clone)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub aspect: Aspect,
    /// Approximate number of labelled vertices; 0 disables labels
    pub labels: usize,
    /// Outline simplification level, 0..=3
    pub simplify: u8,
    pub title: Option<String>,
    pub font: Option<PathBuf>,
    pub north_arrow: bool,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 3600,
            height: 3000,
            aspect: Aspect::Equal,
            labels: 20,
            simplify: 0,
            title: None,
            font: None,
            north_arrow: true,
        }
    }
}

/// What ended up in the image
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSummary {
    pub width: u32,
    pub height: u32,
    pub vertices: usize,
    /// Vertices left in the outline after simplification
    pub outline_vertices: usize,
    pub labels: usize,
    pub grid_lines: (usize, usize),
    pub ttf_text: bool,
}

pub fn default_title(polygon: &Polygon) -> String {
    format!(
        "{} FIR Boundary Polygon ({} points)",
        polygon.name,
        polygon.len()
    )
}

/// Scale factor for strokes and fonts: 1.0 for a 1000 px short side.
fn figure_unit(style: &PlotStyle) -> f32 {
    style.width.min(style.height) as f32 / 1000.0
}

/// Draw `polygon` and write it to `output` as PNG.
pub fn render_polygon(polygon: &Polygon, style: &PlotStyle, output: &Path) -> Result<RenderSummary> {
    let (canvas, summary) = draw_polygon(polygon, style)?;
    canvas.save_png(output)?;
    Ok(summary)
}

/// Draw `polygon` into a new canvas without touching the filesystem.
pub fn draw_polygon(polygon: &Polygon, style: &PlotStyle) -> Result<(Canvas, RenderSummary)> {
    let no_coordinates = || MapError::NoCoordinatesFound {
        origin: polygon.name.clone(),
    };
    if polygon.is_empty() || style.width == 0 || style.height == 0 {
        return Err(no_coordinates());
    }

    let points = polygon.points();
    let outline = simplify_outline(&points, calculate_epsilon(style.simplify, &points));

    let projector = Projector::centered_on(&points, style.aspect);
    let projected = projector.project_points(&points);
    let bounds = Bounds::from_points(&projected)
        .ok_or_else(no_coordinates)?
        .padded(DATA_PADDING);

    let unit = figure_unit(style);
    let margins = Margins {
        left: 120.0 * unit as f64,
        right: 40.0 * unit as f64,
        top: 90.0 * unit as f64,
        bottom: 110.0 * unit as f64,
    };
    let area = PlotArea {
        left: margins.left as f32,
        top: margins.top as f32,
        right: style.width as f32 - margins.right as f32,
        bottom: style.height as f32 - margins.bottom as f32,
    };
    let scaler = Scaler::from_bounds_with_margins(&bounds, style.width, style.height, margins);
    let text = TextRenderer::new(style.font.as_deref());
    let mut canvas = Canvas::new(style.width, style.height, BACKGROUND);

    let grid_lines = draw_axes(
        &mut canvas,
        &text,
        &projector,
        &scaler,
        area,
        AxesMetrics {
            grid_width: 1.0 * unit,
            frame_width: 1.2 * unit,
            tick_font: 14.0 * unit,
            axis_font: 16.0 * unit,
        },
    );

    let px_outline = scaler.scale_points(&projector.project_points(&outline));

    let mut fill = canvas.mask();
    for tri in fill_triangles(&px_outline) {
        fill.fill_triangle(&tri);
    }
    canvas.paint(&fill, FILL_COLOR);

    let mut line = canvas.mask();
    line.stroke_polyline(&px_outline, 2.0 * unit, true);
    canvas.paint(&line, OUTLINE_COLOR);

    let label_indices = polygon.label_indices(style.labels);
    draw_vertex_labels(&mut canvas, &text, &label_indices, &projected, &scaler, unit);

    let title = style
        .title
        .clone()
        .unwrap_or_else(|| default_title(polygon));
    let mut heading = canvas.mask();
    text.render_aligned(&title, area.center_x(), area.top - 30.0 * unit, 20.0 * unit, Align::Center)
        .rasterize(&mut heading);
    canvas.paint(&heading, TEXT_COLOR);

    if style.north_arrow {
        draw_north_arrow(&mut canvas, &text, area, unit);
    }

    let summary = RenderSummary {
        width: style.width,
        height: style.height,
        vertices: polygon.len(),
        outline_vertices: outline.len(),
        labels: label_indices.len(),
        grid_lines,
        ttf_text: text.is_ttf(),
    };

    Ok((canvas, summary))
}

/// Red markers with `Point N` captions on the selected vertices.
fn draw_vertex_labels(
    canvas: &mut Canvas,
    text: &TextRenderer,
    indices: &[usize],
    projected: &[(f64, f64)],
    scaler: &Scaler,
    unit: f32,
) {
    let radius = 3.5 * unit;
    let font = 11.0 * unit;

    let mut markers = canvas.mask();
    let mut captions = canvas.mask();

    for &i in indices {
        let Some(&(x, y)) = projected.get(i) else {
            continue;
        };
        let center = scaler.scale(x, y);
        markers.fill_circle(center, radius);
        text.render_text(
            &format!("Point {}", i + 1),
            center.0 + radius + 4.0 * unit,
            center.1,
            font,
        )
        .rasterize(&mut captions);
    }

    canvas.paint(&markers, MARKER_COLOR);
    canvas.paint(&captions, TEXT_COLOR);
}

/// Circled "N" with an arrow in the top-right corner of the plot area.
fn draw_north_arrow(canvas: &mut Canvas, text: &TextRenderer, area: PlotArea, unit: f32) {
    let radius = 16.0 * unit;
    let center = (area.right - 40.0 * unit, area.top + 40.0 * unit);

    let mut ring = canvas.mask();
    ring.fill_circle(center, radius);
    canvas.paint(&ring, TEXT_COLOR);

    let mut disc = canvas.mask();
    disc.fill_circle(center, radius - 1.5 * unit);
    canvas.paint(&disc, BACKGROUND);

    let mut ink = Mask::new(canvas.width(), canvas.height());
    let font = 18.0 * unit;
    text.render_aligned("N", center.0, center.1 + font * 0.35, font, Align::Center)
        .rasterize(&mut ink);

    let tip = (center.0, center.1 + radius + 6.0 * unit);
    let tail = (center.0, tip.1 + 28.0 * unit);
    ink.fill_triangle(&[
        tip,
        (tip.0 - 7.0 * unit, tip.1 + 12.0 * unit),
        (tip.0 + 7.0 * unit, tip.1 + 12.0 * unit),
    ]);
    ink.stroke_segment((tip.0, tip.1 + 10.0 * unit), tail, 2.5 * unit);
    canvas.paint(&ink, TEXT_COLOR);
}
