pub mod coordinate;
pub mod polygon;

pub use coordinate::Coordinate;
pub use polygon::Polygon;
