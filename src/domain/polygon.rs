use super::Coordinate;
use serde::Serialize;

/// An ordered boundary: vertex order is the traversal order of the outline.
///
/// Closure is not enforced; the first vertex need not repeat at the end.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Polygon {
    pub name: String,
    pub vertices: Vec<Coordinate>,
}

impl Polygon {
    pub fn new(name: impl Into<String>, vertices: Vec<Coordinate>) -> Self {
        Self {
            name: name.into(),
            vertices,
        }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Vertices as `(lon, lat)` tuples
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.vertices.iter().map(|c| c.to_tuple()).collect()
    }

    pub fn is_closed(&self) -> bool {
        match (self.vertices.first(), self.vertices.last()) {
            (Some(first), Some(last)) if self.vertices.len() > 1 => {
                (first.lon() - last.lon()).abs() < 1e-9 && (first.lat() - last.lat()).abs() < 1e-9
            }
            _ => false,
        }
    }

    /// Indices of vertices to label, evenly spaced to give roughly `target` labels.
    ///
    /// `target == 0` disables labels.
    pub fn label_indices(&self, target: usize) -> Vec<usize> {
        if target == 0 || self.is_empty() {
            return Vec::new();
        }
        let step = (self.len() / target).max(1);
        (0..self.len()).step_by(step).collect()
    }

    pub fn out_of_range_count(&self) -> usize {
        self.vertices.iter().filter(|c| !c.is_in_range()).count()
    }
}
