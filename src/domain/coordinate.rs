use serde::Serialize;

/// A WGS84 position in signed decimal degrees.
///
/// Stored longitude first so that `(x, y)` plotting order falls out naturally.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    lon: f64,
    lat: f64,
}

impl Coordinate {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Returns `(lon, lat)`
    pub fn to_tuple(self) -> (f64, f64) {
        (self.lon, self.lat)
    }

    /// Whether both components fall inside the valid degree ranges.
    pub fn is_in_range(&self) -> bool {
        (-180.0..=180.0).contains(&self.lon) && (-90.0..=90.0).contains(&self.lat)
    }
}

impl From<Coordinate> for (f64, f64) {
    fn from(c: Coordinate) -> Self {
        c.to_tuple()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tuple_is_lon_first() {
        let c = Coordinate::new(-60.0, -40.0);
        assert_eq!(c.to_tuple(), (-60.0, -40.0));
        let t: (f64, f64) = c.into();
        assert_eq!(t.0, c.lon());
    }

    #[test]
    fn test_range_check() {
        assert!(Coordinate::new(180.0, -90.0).is_in_range());
        assert!(!Coordinate::new(181.0, 0.0).is_in_range());
        assert!(!Coordinate::new(0.0, 95.5).is_in_range());
    }
}
