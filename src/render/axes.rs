//! Degree grid, tick labels and frame around the plot area

use super::canvas::{Canvas, Mask};
use super::text::{Align, TextRenderer};
use crate::geometry::{Projector, Scaler};
use image::Rgba;

const GRID_COLOR: Rgba<u8> = Rgba([176, 176, 176, 255]);
const FRAME_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);
const TARGET_TICKS: f64 = 8.0;

/// Axes rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl PlotArea {
    pub fn center_x(&self) -> f32 {
        (self.left + self.right) / 2.0
    }

    pub fn corners(&self) -> [(f32, f32); 4] {
        [
            (self.left, self.top),
            (self.right, self.top),
            (self.right, self.bottom),
            (self.left, self.bottom),
        ]
    }
}

/// A 1-2-5 step giving roughly `TARGET_TICKS` intervals over `range`.
pub fn nice_step(range: f64) -> f64 {
    if !range.is_finite() || range <= 0.0 {
        return 1.0;
    }
    let raw = range / TARGET_TICKS;
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized < 1.5 {
        1.0
    } else if normalized < 3.0 {
        2.0
    } else if normalized < 7.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Multiples of `step` inside `[min, max]`
pub fn tick_values(min: f64, max: f64, step: f64) -> Vec<f64> {
    let first = (min / step).ceil() as i64;
    let last = (max / step + 1e-9).floor() as i64;
    (first..=last).map(|k| k as f64 * step).collect()
}

/// Decimal places needed to tell ticks `step` apart
pub fn tick_decimals(step: f64) -> usize {
    if step >= 1.0 {
        0
    } else {
        (-step.log10().floor()) as usize
    }
}

pub fn format_tick(value: f64, decimals: usize) -> String {
    let text = format!("{:.*}", decimals, value);
    // Avoid "-0" / "-0.0"
    if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
        text[1..].to_string()
    } else {
        text
    }
}

/// Sizes derived from the figure dimensions
#[derive(Debug, Clone, Copy)]
pub struct AxesMetrics {
    pub grid_width: f32,
    pub frame_width: f32,
    pub tick_font: f32,
    pub axis_font: f32,
}

/// Draw grid lines, tick labels, axis names and the frame.
///
/// Returns the number of (longitude, latitude) grid lines drawn.
pub fn draw_axes(
    canvas: &mut Canvas,
    text: &TextRenderer,
    projector: &Projector,
    scaler: &Scaler,
    area: PlotArea,
    metrics: AxesMetrics,
) -> (usize, usize) {
    let (x_min, y_max) = scaler.unscale(area.left as f64, area.top as f64);
    let (x_max, y_min) = scaler.unscale(area.right as f64, area.bottom as f64);
    let (lon_min, lat_max) = projector.unproject(x_min, y_max);
    let (lon_max, lat_min) = projector.unproject(x_max, y_min);

    let lon_step = nice_step(lon_max - lon_min);
    let lat_step = nice_step(lat_max - lat_min);
    let lon_ticks = tick_values(lon_min, lon_max, lon_step);
    let lat_ticks = tick_values(lat_min, lat_max, lat_step);

    let mut grid = canvas.mask();
    let mut labels = canvas.mask();

    for &lon in &lon_ticks {
        let (px, _) = scaler.scale(projector.project(lon, 0.0).0, 0.0);
        grid.stroke_segment((px, area.top), (px, area.bottom), metrics.grid_width);

        let baseline = area.bottom + metrics.tick_font * 1.3;
        text.render_aligned(
            &format_tick(lon, tick_decimals(lon_step)),
            px,
            baseline,
            metrics.tick_font,
            Align::Center,
        )
        .rasterize(&mut labels);
    }

    for &lat in &lat_ticks {
        let (_, py) = scaler.scale(0.0, projector.project(0.0, lat).1);
        grid.stroke_segment((area.left, py), (area.right, py), metrics.grid_width);

        let baseline = py + metrics.tick_font * 0.35;
        text.render_aligned(
            &format_tick(lat, tick_decimals(lat_step)),
            area.left - metrics.tick_font * 0.5,
            baseline,
            metrics.tick_font,
            Align::Right,
        )
        .rasterize(&mut labels);
    }

    canvas.paint(&grid, GRID_COLOR);

    text.render_aligned(
        "Longitude",
        area.center_x(),
        area.bottom + metrics.tick_font * 1.3 + metrics.axis_font * 1.6,
        metrics.axis_font,
        Align::Center,
    )
    .rasterize(&mut labels);

    // Vertical axis name, reading bottom to top
    let anchor = (
        metrics.axis_font * 1.2,
        (area.top + area.bottom) / 2.0 + text.text_width("Latitude", metrics.axis_font) / 2.0,
    );
    text.render_text("Latitude", anchor.0, anchor.1, metrics.axis_font)
        .rotated_ccw(anchor)
        .rasterize(&mut labels);

    canvas.paint(&labels, FRAME_COLOR);

    let mut frame = Mask::new(canvas.width(), canvas.height());
    frame.stroke_polyline(&area.corners(), metrics.frame_width, true);
    canvas.paint(&frame, FRAME_COLOR);

    (lon_ticks.len(), lat_ticks.len())
}
