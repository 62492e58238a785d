use super::coordinate::{has_coordinate_signature, parse_coordinate};
use crate::domain::{Coordinate, Polygon};
use crate::error::{MapError, Result};
use std::path::Path;

const POLYGON_KEYWORD: &str = "Polygon";

/// Whether the scanner has seen a `Polygon` header yet.
///
/// There is no transition back to `Outside`: everything after the first header
/// belongs to one block, so a file with several `Polygon` headers yields their
/// vertices merged in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockState {
    #[default]
    Outside,
    Inside,
}

/// Classification of a single MAP line
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineKind {
    Blank,
    /// `//` line, or any line of a `/* ... */` block
    Comment,
    PolygonHeader,
    Coordinate(Coordinate),
    /// Coordinate-shaped, but the fields could not be extracted
    Malformed,
    /// Any other line inside a polygon block
    Property,
    /// Any other line before the first polygon block
    Ignored,
}

/// Per-scan line counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub lines: usize,
    pub blank: usize,
    pub comments: usize,
    pub polygon_headers: usize,
    pub coordinates: usize,
    pub malformed: usize,
    pub properties: usize,
    pub ignored: usize,
    /// 1-based line of a `/*` whose block comment never closed
    pub unterminated_comment: Option<usize>,
}

impl ScanStats {
    fn record(&mut self, kind: &LineKind) {
        self.lines += 1;
        match kind {
            LineKind::Blank => self.blank += 1,
            LineKind::Comment => self.comments += 1,
            LineKind::PolygonHeader => self.polygon_headers += 1,
            LineKind::Coordinate(_) => self.coordinates += 1,
            LineKind::Malformed => self.malformed += 1,
            LineKind::Property => self.properties += 1,
            LineKind::Ignored => self.ignored += 1,
        }
    }

    /// True when more than one `Polygon` header was merged into a single outline.
    pub fn merged_blocks(&self) -> bool {
        self.polygon_headers > 1
    }
}

/// Result of one pass over a MAP file
#[derive(Debug, Clone, Default)]
pub struct MapScan {
    pub coordinates: Vec<Coordinate>,
    pub stats: ScanStats,
}

impl MapScan {
    /// Wrap the coordinates as a named polygon, refusing an empty outline.
    pub fn into_polygon(self, name: impl Into<String>, source: &Path) -> Result<Polygon> {
        if self.coordinates.is_empty() {
            return Err(MapError::NoCoordinatesFound {
                origin: source.display().to_string(),
            });
        }
        Ok(Polygon::new(name, self.coordinates))
    }
}

/// Single forward pass line classifier.
#[derive(Debug, Default)]
pub struct MapScanner {
    block: BlockState,
    /// Line number of the `/*` that opened the current block comment
    open_comment: Option<usize>,
    scan: MapScan,
}

impl MapScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block_state(&self) -> BlockState {
        self.block
    }

    /// Classify one line, collecting it if it is a coordinate.
    pub fn push_line(&mut self, raw: &str) -> LineKind {
        let kind = self.classify(raw.trim());
        self.scan.stats.record(&kind);
        if let LineKind::Coordinate(c) = kind {
            self.scan.coordinates.push(c);
        }
        kind
    }

    fn classify(&mut self, line: &str) -> LineKind {
        if self.open_comment.is_some() {
            if line.contains("*/") {
                self.open_comment = None;
            }
            return LineKind::Comment;
        }

        if line.is_empty() {
            return LineKind::Blank;
        }

        if line.starts_with("//") {
            return LineKind::Comment;
        }

        if let Some(rest) = line.strip_prefix("/*") {
            if !rest.contains("*/") {
                self.open_comment = Some(self.scan.stats.lines + 1);
            }
            return LineKind::Comment;
        }

        // Stray terminator without a matching opener
        if line.ends_with("*/") {
            return LineKind::Comment;
        }

        if line.starts_with(POLYGON_KEYWORD) {
            self.block = BlockState::Inside;
            return LineKind::PolygonHeader;
        }

        match self.block {
            BlockState::Outside => LineKind::Ignored,
            BlockState::Inside if has_coordinate_signature(line) => match parse_coordinate(line) {
                Some(c) => LineKind::Coordinate(c),
                None => LineKind::Malformed,
            },
            BlockState::Inside => LineKind::Property,
        }
    }

    pub fn finish(mut self) -> MapScan {
        self.scan.stats.unterminated_comment = self.open_comment;
        self.scan
    }
}

/// Scan MAP text that is already in memory.
pub fn scan_map_str(text: &str) -> MapScan {
    let mut scanner = MapScanner::new();
    for line in text.lines() {
        scanner.push_line(line);
    }
    scanner.finish()
}

/// Read and scan a MAP file. The whole file is loaded; the handle is released
/// before scanning starts.
///
/// Bytes that are not UTF-8 (Latin-1 accents in comments, say) are replaced
/// rather than rejected; coordinate tokens are plain ASCII.
pub fn scan_map_file(path: &Path) -> Result<MapScan> {
    let bytes = std::fs::read(path).map_err(|e| MapError::from_io(path, e))?;
    Ok(scan_map_str(&String::from_utf8_lossy(&bytes)))
}

/// Read the polygon vertices of a MAP file in file order.
///
/// An empty result is not an error here; use [`MapScan::into_polygon`] to
/// reject it.
pub fn read_map_file(path: &Path) -> Result<Vec<Coordinate>> {
    Ok(scan_map_file(path)?.coordinates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const SAMPLE: &str = "\
// CBAS FIR boundary
/* generated
   by hand */

Polygon CBAS
    400000.00S0600000.00W [A]
    SomePropertyKey=Value
    400100.00S0600000.00W [B]
";

    #[test]
    fn test_property_line_is_excluded() {
        let scan = scan_map_str(SAMPLE);
        let points: Vec<_> = scan.coordinates.iter().map(|c| c.to_tuple()).collect();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0], (-60.0, -40.0));
        assert_eq!(points[1].0, -60.0);
        assert!((points[1].1 - (-(40.0 + 1.0 / 60.0))).abs() < 1e-9);

        assert_eq!(scan.stats.properties, 1);
        assert_eq!(scan.stats.comments, 3);
        assert_eq!(scan.stats.blank, 1);
        assert_eq!(scan.stats.polygon_headers, 1);
        assert_eq!(scan.stats.lines, 8);
    }

    #[test]
    fn test_coordinates_before_polygon_are_ignored() {
        let scan = scan_map_str("400000.00S0600000.00W\nPolygon\n410000.00S0600000.00W\n");
        assert_eq!(scan.coordinates, vec![Coordinate::new(-60.0, -41.0)]);
        assert_eq!(scan.stats.ignored, 1);
    }

    #[test]
    fn test_only_comments_yield_nothing() {
        let scan = scan_map_str("// a\n/* b */\nPolygon\n// c\n");
        assert!(scan.coordinates.is_empty());

        let err = scan.into_polygon("X", Path::new("x.map")).unwrap_err();
        assert!(matches!(err, MapError::NoCoordinatesFound { .. }));
    }

    #[test]
    fn test_comments_are_never_coordinates_inside_block() {
        let text = "\
Polygon
400000.00S0600000.00W
/* 410000.00S0600000.00W */
/*
420000.00S0600000.00W
*/
// 430000.00S0600000.00W
440000.00S0600000.00W
";
        let scan = scan_map_str(text);
        let lats: Vec<f64> = scan.coordinates.iter().map(|c| c.lat()).collect();
        assert_eq!(lats, vec![-40.0, -44.0]);
        assert_eq!(scan.stats.comments, 5);
    }

    #[test]
    fn test_unclosed_block_comment_is_reported() {
        let text = "\
Polygon
400000.00S0600000.00W
/* note about next leg
410000.00S0600000.00W
420000.00S0600000.00W
";
        let scan = scan_map_str(text);
        assert_eq!(scan.coordinates, vec![Coordinate::new(-60.0, -40.0)]);
        assert_eq!(scan.stats.unterminated_comment, Some(3));
        assert_eq!(scan.stats.comments, 3);
    }

    #[test]
    fn test_closed_block_comment_is_not_reported() {
        let scan = scan_map_str("/*\nheader\n*/\nPolygon\n/* one line */\n");
        assert_eq!(scan.stats.unterminated_comment, None);
    }

    #[test]
    fn test_block_state_never_resets() {
        let mut scanner = MapScanner::new();
        assert_eq!(scanner.block_state(), BlockState::Outside);
        scanner.push_line("Polygon A");
        scanner.push_line("End");
        scanner.push_line("Polygon B");
        assert_eq!(scanner.block_state(), BlockState::Inside);

        let scan = scanner.finish();
        assert!(scan.stats.merged_blocks());
    }

    #[test]
    fn test_malformed_line_is_dropped_and_counted() {
        let scan = scan_map_str("Polygon\n[note] 400000.00S0600000.00W\n400000.00N0600000.00E\n");
        assert_eq!(scan.coordinates, vec![Coordinate::new(60.0, 40.0)]);
        assert_eq!(scan.stats.malformed, 1);
    }

    #[test]
    fn test_push_line_classifies() {
        let mut scanner = MapScanner::new();
        assert_eq!(scanner.push_line("   "), LineKind::Blank);
        assert_eq!(scanner.push_line("Name=CBAS"), LineKind::Ignored);
        assert_eq!(scanner.push_line("Polygon"), LineKind::PolygonHeader);
        assert_eq!(scanner.push_line("Color=Red"), LineKind::Property);
        assert_eq!(
            scanner.push_line("000000.00N0000000.00E"),
            LineKind::Coordinate(Coordinate::new(0.0, 0.0))
        );
    }

    #[test]
    fn test_crlf_lines() {
        let scan = scan_map_str("Polygon\r\n400000.00S0600000.00W [A]\r\n");
        assert_eq!(scan.coordinates.len(), 1);
    }

    #[test]
    fn test_read_map_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("CBAS.map");
        fs::write(&path, SAMPLE).unwrap();

        let coordinates = read_map_file(&path).unwrap();
        assert_eq!(coordinates.len(), 2);
    }

    #[test]
    fn test_latin1_comment_does_not_abort_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("SAVE.map");
        // "Región" encoded as Latin-1
        let bytes = b"// Regi\xf3n Sur\nPolygon\n400000.00S0600000.00W\n410000.00S0600000.00W\n";
        fs::write(&path, bytes).unwrap();

        let scan = scan_map_file(&path).unwrap();
        assert_eq!(scan.coordinates.len(), 2);
        assert_eq!(scan.stats.comments, 1);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = read_map_file(&dir.path().join("nope.map")).unwrap_err();
        assert!(matches!(err, MapError::FileNotFound { .. }));
    }
}
