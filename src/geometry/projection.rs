use clap::ValueEnum;
use serde::Deserialize;

/// How degrees of longitude relate to degrees of latitude on the figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aspect {
    /// One degree of longitude is drawn as long as one degree of latitude
    #[default]
    Equal,
    /// Longitude is shrunk by cos(center latitude) to preserve local shape
    Local,
}

/// Plate carrée projection from (lon, lat) degrees to plane units.
///
/// - x = (lon - center_lon) * k
/// - y = lat - center_lat
///
/// where k is 1 for [`Aspect::Equal`] and cos(center_lat) for [`Aspect::Local`].
#[derive(Debug, Clone)]
pub struct Projector {
    center_lon: f64,
    center_lat: f64,
    x_factor: f64,
}

impl Projector {
    /// # Arguments
    /// * `center` - (lon, lat) in degrees
    pub fn new(center: (f64, f64), aspect: Aspect) -> Self {
        let (lon, lat) = center;
        let x_factor = match aspect {
            Aspect::Equal => 1.0,
            Aspect::Local => lat.to_radians().cos().max(1e-6),
        };
        Self {
            center_lon: lon,
            center_lat: lat,
            x_factor,
        }
    }

    /// Center the projection on the mean of the given `(lon, lat)` points.
    pub fn centered_on(points: &[(f64, f64)], aspect: Aspect) -> Self {
        let n = points.len().max(1) as f64;
        let (sum_lon, sum_lat) = points
            .iter()
            .fold((0.0, 0.0), |(a, b), &(lon, lat)| (a + lon, b + lat));
        Self::new((sum_lon / n, sum_lat / n), aspect)
    }

    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        (
            (lon - self.center_lon) * self.x_factor,
            lat - self.center_lat,
        )
    }

    /// Inverse of [`Projector::project`]
    pub fn unproject(&self, x: f64, y: f64) -> (f64, f64) {
        (x / self.x_factor + self.center_lon, y + self.center_lat)
    }

    pub fn project_points(&self, points: &[(f64, f64)]) -> Vec<(f64, f64)> {
        points
            .iter()
            .map(|&(lon, lat)| self.project(lon, lat))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projector_center() {
        let proj = Projector::new((-60.0, -40.0), Aspect::Local);
        let (x, y) = proj.project(-60.0, -40.0);
        assert!(x.abs() < 1e-12);
        assert!(y.abs() < 1e-12);
    }

    #[test]
    fn test_local_aspect_shrinks_longitude() {
        let proj = Projector::new((0.0, 60.0), Aspect::Local);
        let (x, y) = proj.project(1.0, 61.0);
        assert!((x - 0.5).abs() < 1e-9);
        assert!((y - 1.0).abs() < 1e-9);

        let (lon, lat) = proj.unproject(x, y);
        assert!((lon - 1.0).abs() < 1e-9);
        assert!((lat - 61.0).abs() < 1e-9);
    }

    #[test]
    fn test_centered_on_mean() {
        let proj = Projector::centered_on(&[(-62.0, -40.0), (-58.0, -42.0)], Aspect::Equal);
        let (x, y) = proj.project(-60.0, -41.0);
        assert!(x.abs() < 1e-12 && y.abs() < 1e-12);
    }
}
