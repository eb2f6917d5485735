//! Well-known-text input for obstacle outlines
//!
//! Building and foliage outlines arrive as one WKT polygon per line,
//! `POLYGON((x1 y1, x2 y2, ..., x1 y1))`, coordinates in meters. Only the
//! outer ring is supported. Empty lines are skipped; anything else that does
//! not parse is reported with its line number.

use std::io::BufRead;

use thiserror::Error;

use crate::geometry::{Point2, Polygon2};

pub type WktResult<T> = Result<T, WktError>;

#[derive(Error, Debug)]
pub enum WktError {
    #[error("line {line}: expected POLYGON, found '{found}'")]
    UnexpectedTag { line: usize, found: String },

    #[error("line {line}: unbalanced or missing ring parentheses")]
    MalformedRing { line: usize },

    #[error("line {line}: interior rings are not supported")]
    InteriorRing { line: usize },

    #[error("line {line}: malformed coordinate pair '{token}'")]
    BadCoordinate { line: usize, token: String },

    #[error("line {line}: a polygon needs at least three points")]
    TooFewPoints { line: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Parse a single WKT polygon.
pub fn parse_polygon(input: &str) -> WktResult<Polygon2> {
    parse_polygon_line(input, 1)
}

/// Read one polygon per line, skipping empty lines.
pub fn read_polygons(reader: impl BufRead) -> WktResult<Vec<Polygon2>> {
    let mut polygons = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        polygons.push(parse_polygon_line(trimmed, index + 1)?);
    }
    Ok(polygons)
}

fn parse_polygon_line(input: &str, line: usize) -> WktResult<Polygon2> {
    let trimmed = input.trim();
    let rest = match trimmed.strip_prefix("POLYGON") {
        Some(rest) => rest.trim_start(),
        None => {
            return Err(WktError::UnexpectedTag {
                line,
                found: trimmed.split('(').next().unwrap_or("").trim().to_string(),
            })
        }
    };

    let ring = rest
        .strip_prefix("((")
        .and_then(|r| r.trim_end().strip_suffix("))"))
        .ok_or(WktError::MalformedRing { line })?;

    if ring.contains('(') || ring.contains(')') {
        return Err(WktError::InteriorRing { line });
    }

    let mut points = Vec::new();
    for token in ring.split(',') {
        let mut coords = token.split_whitespace();
        let (x, y) = match (coords.next(), coords.next(), coords.next()) {
            (Some(x), Some(y), None) => (x, y),
            _ => {
                return Err(WktError::BadCoordinate {
                    line,
                    token: token.trim().to_string(),
                })
            }
        };
        let parse = |s: &str| {
            s.parse::<f64>().map_err(|_| WktError::BadCoordinate {
                line,
                token: token.trim().to_string(),
            })
        };
        points.push(Point2::new(parse(x)?, parse(y)?));
    }

    // The closing duplicate does not count as a distinct vertex
    let distinct = if points.len() > 1 && points.first() == points.last() {
        points.len() - 1
    } else {
        points.len()
    };
    if distinct < 3 {
        return Err(WktError::TooFewPoints { line });
    }

    Ok(Polygon2::new(points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_a_closed_square() {
        let polygon = parse_polygon("POLYGON((10 10, 20 10, 20 20, 10 20, 10 10))").unwrap();
        assert!((polygon.area() - 100.0).abs() < 1e-12);
    }

    #[test]
    fn clockwise_input_is_canonicalized() {
        let polygon = parse_polygon("POLYGON((10 10, 10 20, 20 20, 20 10, 10 10))").unwrap();
        assert!(polygon.area() > 0.0);
    }

    #[test]
    fn reader_skips_empty_lines() {
        let input = "POLYGON((0 0, 1 0, 1 1, 0 0))\n\n  \nPOLYGON((5 5, 6 5, 6 6, 5 5))\n";
        let polygons = read_polygons(Cursor::new(input)).unwrap();
        assert_eq!(polygons.len(), 2);
    }

    #[test]
    fn reports_line_numbers_on_errors() {
        let input = "POLYGON((0 0, 1 0, 1 1, 0 0))\nPOLYGON((0 0, banana 0, 1 1, 0 0))\n";
        match read_polygons(Cursor::new(input)) {
            Err(WktError::BadCoordinate { line, token }) => {
                assert_eq!(line, 2);
                assert!(token.contains("banana"));
            }
            other => panic!("expected BadCoordinate, got {other:?}"),
        }
    }

    #[test]
    fn rejects_foreign_tags_and_short_rings() {
        assert!(matches!(
            parse_polygon("LINESTRING(0 0, 1 1)"),
            Err(WktError::UnexpectedTag { .. })
        ));
        assert!(matches!(
            parse_polygon("POLYGON((0 0, 1 1, 0 0))"),
            Err(WktError::TooFewPoints { .. })
        ));
        assert!(matches!(
            parse_polygon("POLYGON((0 0, 1 0, 1 1"),
            Err(WktError::MalformedRing { .. })
        ));
        assert!(matches!(
            parse_polygon("POLYGON((0 0, 4 0, 4 4, 0 0), (1 1, 2 1, 2 2, 1 1))"),
            Err(WktError::InteriorRing { .. })
        ));
    }
}
