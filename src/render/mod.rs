pub mod axes;
pub mod canvas;
pub mod plot;
pub mod text;
pub mod triangulation;

pub use canvas::{Canvas, Mask};
pub use plot::{PlotStyle, RenderSummary, default_title, draw_polygon, render_polygon};
pub use text::TextRenderer;
