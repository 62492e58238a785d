//! firmap - Render FIR boundary polygons from MAP files to PNG images

pub mod config;
pub mod domain;
pub mod error;
pub mod export;
pub mod geometry;
pub mod parser;
pub mod render;

pub use domain::{Coordinate, Polygon};
pub use error::{MapError, Result};
pub use parser::{parse_coordinate, read_map_file};
