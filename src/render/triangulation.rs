use super::canvas::{Point, Tri};
use earcutr::earcut;

/// Ear-clip a simple ring into triangle indices into `outer`.
pub fn triangulate_polygon(outer: &[Point]) -> Vec<usize> {
    if outer.len() < 3 {
        return Vec::new();
    }

    let vertices: Vec<f64> = outer
        .iter()
        .flat_map(|&(x, y)| [x as f64, y as f64])
        .collect();

    earcut(&vertices, &[], 2).unwrap_or_default()
}

/// Triangles covering the interior of an outline in pixel space.
///
/// A repeated closing vertex is dropped before ear clipping.
pub fn fill_triangles(outline: &[Point]) -> Vec<Tri> {
    let ring = match (outline.first(), outline.last()) {
        (Some(first), Some(last)) if outline.len() > 3 && first == last => {
            &outline[..outline.len() - 1]
        }
        _ => outline,
    };

    triangulate_polygon(ring)
        .chunks_exact(3)
        .map(|t| [ring[t[0]], ring[t[1]], ring[t[2]]])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangulate_square() {
        let square = vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        let indices = triangulate_polygon(&square);
        assert_eq!(indices.len(), 6);
    }

    #[test]
    fn test_triangulate_empty() {
        assert!(triangulate_polygon(&[]).is_empty());
        assert!(fill_triangles(&[(0.0, 0.0), (1.0, 1.0)]).is_empty());
    }

    #[test]
    fn test_fill_concave_outline() {
        // L shape: 6 vertices -> 4 triangles
        let outline = vec![
            (0.0, 0.0),
            (4.0, 0.0),
            (4.0, 1.0),
            (1.0, 1.0),
            (1.0, 4.0),
            (0.0, 4.0),
        ];
        assert_eq!(fill_triangles(&outline).len(), 4);

        let mut closed = outline.clone();
        closed.push((0.0, 0.0));
        assert_eq!(fill_triangles(&closed).len(), 4);
    }
}
