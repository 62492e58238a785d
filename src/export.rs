use crate::domain::Polygon;
use crate::error::{MapError, Result};
use crate::parser::format_coordinate;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
struct VertexRecord {
    index: usize,
    lon: f64,
    lat: f64,
    dms: String,
}

#[derive(Debug, Serialize)]
struct PolygonRecord<'a> {
    name: &'a str,
    count: usize,
    closed: bool,
    vertices: Vec<VertexRecord>,
}

impl<'a> From<&'a Polygon> for PolygonRecord<'a> {
    fn from(polygon: &'a Polygon) -> Self {
        Self {
            name: &polygon.name,
            count: polygon.len(),
            closed: polygon.is_closed(),
            vertices: polygon
                .vertices
                .iter()
                .enumerate()
                .map(|(i, c)| VertexRecord {
                    index: i + 1,
                    lon: c.lon(),
                    lat: c.lat(),
                    dms: format_coordinate(*c),
                })
                .collect(),
        }
    }
}

/// Serialize the polygon vertices as pretty-printed JSON.
pub fn to_json(polygon: &Polygon) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&PolygonRecord::from(polygon))
}

/// Write the polygon vertices to `path` as JSON.
pub fn export_json(polygon: &Polygon, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| MapError::from_io(path, e))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, &PolygonRecord::from(polygon)).map_err(|source| {
        MapError::Export {
            path: path.to_path_buf(),
            source,
        }
    })?;
    writer.flush().map_err(|e| MapError::from_io(path, e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinate;
    use std::fs;
    use tempfile::tempdir;

    fn polygon() -> Polygon {
        Polygon::new(
            "CBAS",
            vec![
                Coordinate::new(-60.0, -40.0),
                Coordinate::new(-60.0, -(40.0 + 1.0 / 60.0)),
            ],
        )
    }

    #[test]
    fn test_json_shape() {
        let value: serde_json::Value = serde_json::from_str(&to_json(&polygon()).unwrap()).unwrap();
        assert_eq!(value["name"], "CBAS");
        assert_eq!(value["count"], 2);
        assert_eq!(value["closed"], false);
        assert_eq!(value["vertices"][0]["lon"], -60.0);
        assert_eq!(value["vertices"][1]["index"], 2);
        assert_eq!(value["vertices"][1]["dms"], "400100.00S0600000.00W");
    }

    #[test]
    fn test_export_json_writes_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cbas.json");

        export_json(&polygon(), &path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"vertices\""));
    }

    #[test]
    fn test_export_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no/such/dir/out.json");
        assert!(matches!(
            export_json(&polygon(), &path),
            Err(MapError::FileNotFound { .. })
        ));
    }
}
