use super::Bounds;
use geo::{LineString, Simplify};

/// Ramer-Douglas-Peucker over `(lon, lat)` points.
pub fn simplify_outline(points: &[(f64, f64)], epsilon: f64) -> Vec<(f64, f64)> {
    if points.len() < 4 || epsilon <= 0.0 {
        return points.to_vec();
    }

    let line: LineString<f64> = points
        .iter()
        .map(|&(lon, lat)| geo::coord! { x: lon, y: lat })
        .collect();

    let simplified = line.simplify(&epsilon);

    // Keep something that still reads as an area
    if simplified.0.len() < 3 {
        return points.to_vec();
    }

    simplified.0.into_iter().map(|c| (c.x, c.y)).collect()
}

/// Tolerance in degrees for a simplify level, relative to the outline extent.
///
/// Level 0 disables simplification.
pub fn calculate_epsilon(level: u8, points: &[(f64, f64)]) -> f64 {
    let fraction = match level {
        0 => return 0.0,
        1 => 0.0005,
        2 => 0.002,
        _ => 0.005,
    };

    Bounds::from_points(points)
        .map(|b| b.width().max(b.height()) * fraction)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simplify_short_outline_untouched() {
        let points = vec![(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)];
        assert_eq!(simplify_outline(&points, 1.0), points);
    }

    #[test]
    fn test_simplify_reduces_points() {
        let mut points: Vec<(f64, f64)> = (0..100)
            .map(|i| (i as f64, if i % 2 == 0 { 0.0 } else { 0.0001 }))
            .collect();
        points.push((50.0, 30.0));

        let result = simplify_outline(&points, 0.001);
        assert!(result.len() < points.len());
        assert!(result.len() >= 3);
    }

    #[test]
    fn test_calculate_epsilon() {
        let points = [(0.0, 0.0), (10.0, 5.0)];
        assert_eq!(calculate_epsilon(0, &points), 0.0);
        assert!((calculate_epsilon(1, &points) - 0.005).abs() < 1e-12);
        assert!((calculate_epsilon(3, &points) - 0.05).abs() < 1e-12);
        assert_eq!(calculate_epsilon(2, &[]), 0.0);
    }
}
