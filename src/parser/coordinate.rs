//! Sexagesimal coordinate tokens: `DDMMSS.SS[NS]DDDMMSS.SS[EW]`
//!
//! Both halves are located by scanning fixed-width windows over the raw bytes and
//! validating each position's character class, so surrounding noise is tolerated
//! as long as one latitude field and one longitude field can be found.

use crate::domain::Coordinate;

const LAT_DEGREE_DIGITS: usize = 2;
const LON_DEGREE_DIGITS: usize = 3;
const LAT_HEMISPHERES: [u8; 2] = [b'N', b'S'];
const LON_HEMISPHERES: [u8; 2] = [b'E', b'W'];

/// Width of a field: degrees + MM + SS.SS + hemisphere letter
const fn field_width(degree_digits: usize) -> usize {
    degree_digits + 2 + 5 + 1
}

const LAT_WIDTH: usize = field_width(LAT_DEGREE_DIGITS);
const LON_WIDTH: usize = field_width(LON_DEGREE_DIGITS);

/// One degrees/minutes/seconds field with its hemisphere letter
#[derive(Debug, Clone, Copy, PartialEq)]
struct DmsField {
    degrees: f64,
    minutes: f64,
    seconds: f64,
    negative: bool,
}

impl DmsField {
    fn decimal(&self) -> f64 {
        let value = self.degrees + self.minutes / 60.0 + self.seconds / 3600.0;
        if self.negative { -value } else { value }
    }
}

fn all_digits(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_digit)
}

fn ascii_number(bytes: &[u8]) -> Option<f64> {
    std::str::from_utf8(bytes).ok()?.parse().ok()
}

/// Validate a window of exactly `field_width(degree_digits)` bytes.
fn parse_field(window: &[u8], degree_digits: usize, hemispheres: [u8; 2]) -> Option<DmsField> {
    if window.len() != field_width(degree_digits) {
        return None;
    }

    let dot = degree_digits + 4;
    let hemisphere = window[dot + 3];

    if !all_digits(&window[..dot])
        || window[dot] != b'.'
        || !all_digits(&window[dot + 1..dot + 3])
        || !hemispheres.contains(&hemisphere)
    {
        return None;
    }

    Some(DmsField {
        degrees: ascii_number(&window[..degree_digits])?,
        minutes: ascii_number(&window[degree_digits..degree_digits + 2])?,
        seconds: ascii_number(&window[degree_digits + 2..dot + 3])?,
        negative: hemisphere == hemispheres[1],
    })
}

/// Leftmost field of the given shape anywhere in `bytes`.
fn find_field(bytes: &[u8], degree_digits: usize, hemispheres: [u8; 2]) -> Option<DmsField> {
    bytes
        .windows(field_width(degree_digits))
        .find_map(|w| parse_field(w, degree_digits, hemispheres))
}

/// Parse one coordinate token into `(lon, lat)` decimal degrees.
///
/// Anything from the first `[` onward is an annotation and is ignored. Returns
/// `None` when either the latitude or the longitude field cannot be found.
pub fn parse_coordinate(text: &str) -> Option<Coordinate> {
    let token = text.split('[').next().unwrap_or_default().trim();
    let bytes = token.as_bytes();

    let lat = find_field(bytes, LAT_DEGREE_DIGITS, LAT_HEMISPHERES)?;
    let lon = find_field(bytes, LON_DEGREE_DIGITS, LON_HEMISPHERES)?;

    Some(Coordinate::new(lon.decimal(), lat.decimal()))
}

/// Coarse line filter: a latitude field immediately followed by a longitude field.
///
/// Property lines inside a polygon block never carry this shape.
pub fn has_coordinate_signature(line: &str) -> bool {
    line.as_bytes().windows(LAT_WIDTH + LON_WIDTH).any(|w| {
        let (lat, lon) = w.split_at(LAT_WIDTH);
        parse_field(lat, LAT_DEGREE_DIGITS, LAT_HEMISPHERES).is_some()
            && parse_field(lon, LON_DEGREE_DIGITS, LON_HEMISPHERES).is_some()
    })
}

/// Split an absolute angle into (degrees, minutes, hundredths of a second),
/// rounding to the nearest hundredth with carry.
fn split_dms(value: f64) -> (u64, u64, u64) {
    let hundredths = (value.abs() * 360_000.0).round() as u64;
    let degrees = hundredths / 360_000;
    let rem = hundredths % 360_000;
    (degrees, rem / 6000, rem % 6000)
}

/// Render a coordinate back into the `DDMMSS.SS[NS]DDDMMSS.SS[EW]` encoding.
pub fn format_coordinate(coordinate: Coordinate) -> String {
    let (lat_d, lat_m, lat_s) = split_dms(coordinate.lat());
    let (lon_d, lon_m, lon_s) = split_dms(coordinate.lon());
    let lat_dir = if coordinate.lat() < 0.0 { 'S' } else { 'N' };
    let lon_dir = if coordinate.lon() < 0.0 { 'W' } else { 'E' };

    format!(
        "{:02}{:02}{:02}.{:02}{}{:03}{:02}{:02}.{:02}{}",
        lat_d,
        lat_m,
        lat_s / 100,
        lat_s % 100,
        lat_dir,
        lon_d,
        lon_m,
        lon_s / 100,
        lon_s % 100,
        lon_dir
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> (f64, f64) {
        parse_coordinate(text).unwrap().to_tuple()
    }

    #[test]
    fn test_whole_degrees() {
        assert_eq!(parse("400000.00S0600000.00W"), (-60.0, -40.0));
        assert_eq!(parse("000000.00N0000000.00E"), (0.0, 0.0));
    }

    #[test]
    fn test_minutes_and_seconds() {
        let (lon, lat) = parse("401530.00S0645000.00W");
        let expected_lat = -(40.0 + 15.0 / 60.0 + 30.0 / 3600.0);
        let expected_lon = -(64.0 + 50.0 / 60.0);
        assert!((lat - expected_lat).abs() < 1e-9);
        assert!((lon - expected_lon).abs() < 1e-9);

        let (lon, lat) = parse("123456.78N1234512.34E");
        assert!((lat - (12.0 + 34.0 / 60.0 + 56.78 / 3600.0)).abs() < 1e-9);
        assert!((lon - (123.0 + 45.0 / 60.0 + 12.34 / 3600.0)).abs() < 1e-9);
    }

    #[test]
    fn test_hemisphere_flips_sign_only() {
        let (lon_ne, lat_ne) = parse("351020.50N0581540.25E");
        let (lon_sw, lat_sw) = parse("351020.50S0581540.25W");
        let (lon_nw, lat_se) = (parse("351020.50N0581540.25W").0, parse("351020.50S0581540.25E").1);
        assert_eq!(lat_sw, -lat_ne);
        assert_eq!(lon_sw, -lon_ne);
        assert_eq!(lon_nw, -lon_ne);
        assert_eq!(lat_se, -lat_ne);
    }

    #[test]
    fn test_annotation_is_ignored() {
        assert_eq!(
            parse_coordinate("401530.00S0645000.00W [start]"),
            parse_coordinate("401530.00S0645000.00W")
        );
        // Coordinates inside the annotation do not count
        assert_eq!(parse_coordinate("junk [400000.00S0600000.00W]"), None);
    }

    #[test]
    fn test_surrounding_noise_is_tolerated() {
        assert_eq!(parse("  \tP1 400000.00S0600000.00W;"), (-60.0, -40.0));
    }

    #[test]
    fn test_partial_tokens_are_rejected() {
        assert_eq!(parse_coordinate("400000.00S"), None);
        assert_eq!(parse_coordinate("0600000.00W"), None);
        assert_eq!(parse_coordinate("400000.00s0600000.00w"), None);
        assert_eq!(parse_coordinate("4000.00S0600000.00W"), None);
        assert_eq!(parse_coordinate(""), None);
    }

    #[test]
    fn test_non_ascii_input_does_not_panic() {
        assert_eq!(parse_coordinate("Point º 400000.00S"), None);
        assert_eq!(parse("ü400000.00S0600000.00W"), (-60.0, -40.0));
    }

    #[test]
    fn test_signature() {
        assert!(has_coordinate_signature("400000.00S0600000.00W [A]"));
        assert!(has_coordinate_signature("x 400000.00N0600000.00E"));
        assert!(!has_coordinate_signature("SomePropertyKey=Value"));
        assert!(!has_coordinate_signature("400000.00S 0600000.00W"));
        assert!(!has_coordinate_signature("400000.00E0600000.00N"));
    }

    #[test]
    fn test_format_round_trips_to_text() {
        for token in [
            "400000.00S0600000.00W",
            "000000.00N0000000.00E",
            "401530.00S0645000.00W",
            "123456.78N1234512.34E",
        ] {
            assert_eq!(format_coordinate(parse_coordinate(token).unwrap()), token);
        }
    }

    #[test]
    fn test_format_carries_rounding() {
        let c = Coordinate::new(0.0, 10.0 - 1e-9);
        assert_eq!(format_coordinate(c), "100000.00N0000000.00E");
    }
}
