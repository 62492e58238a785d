pub mod coordinate;
pub mod map_file;

pub use coordinate::{format_coordinate, has_coordinate_signature, parse_coordinate};
pub use map_file::{
    BlockState, LineKind, MapScan, MapScanner, ScanStats, read_map_file, scan_map_file,
    scan_map_str,
};
