//! Point loading from semicolon-delimited asset inventories.
//!
//! The inventory export has a header row and at least 23 columns per row.
//! Only six are used:
//!
//! | column | field     | when empty / unparsable |
//! |--------|-----------|-------------------------|
//! | 1      | id        | row skipped             |
//! | 2      | type      | `LED`                   |
//! | 3      | power (W) | `80`                    |
//! | 19     | area      | `Urbano`                |
//! | 21     | latitude  | row skipped             |
//! | 22     | longitude | row skipped             |
//!
//! Coordinates may use a decimal comma. Bytes that are not valid UTF-8 are
//! replaced with U+FFFD. Malformed rows are skipped with a
//! warning and reported back in [`LoadedPoints::skipped`]; they never reach
//! the clustering core.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::topology::Point;

const DELIMITER: char = ';';
const MIN_COLUMNS: usize = 23;

const COL_ID: usize = 1;
const COL_TYPE: usize = 2;
const COL_POWER: usize = 3;
const COL_AREA: usize = 19;
const COL_LATITUDE: usize = 21;
const COL_LONGITUDE: usize = 22;

const DEFAULT_TYPE: &str = "LED";
const DEFAULT_POWER: i64 = 80;
const DEFAULT_AREA: &str = "Urbano";

/// Errors that abort loading altogether
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Failed to read point file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a single row was skipped
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RowError {
    #[error("expected at least 23 columns, found {0}")]
    TooFewColumns(usize),
    #[error("invalid id '{0}'")]
    InvalidId(String),
    #[error("invalid {field} '{value}'")]
    InvalidCoordinate { field: &'static str, value: String },
    #[error("coordinates ({0}, {1}) out of range")]
    OutOfRange(f64, f64),
    #[error("duplicate id {0}")]
    DuplicateId(i64),
}

/// A skipped row and the reason
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// 1-based line number in the file
    pub line: usize,
    pub reason: RowError,
}

/// Points read from an inventory, in file order
#[derive(Debug, Clone, Default)]
pub struct LoadedPoints {
    pub points: Vec<Point>,
    pub skipped: Vec<SkippedRow>,
}

/// Load points from a semicolon-delimited inventory file
pub fn load_points(path: &Path) -> Result<LoadedPoints, SourceError> {
    info!("Loading points from {}", path.display());

    let file = File::open(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let loaded = parse_points(BufReader::new(file)).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        "Loaded {} points ({} rows skipped)",
        loaded.points.len(),
        loaded.skipped.len()
    );
    Ok(loaded)
}

/// Parse points from any buffered reader. The first line is a header.
pub fn parse_points<R: BufRead>(reader: R) -> std::io::Result<LoadedPoints> {
    let mut loaded = LoadedPoints::default();
    let mut seen_ids = HashSet::new();

    // Latin-1 exports are common; invalid UTF-8 is replaced rather than fatal
    for (idx, line) in reader.split(b'\n').enumerate().skip(1) {
        let line = line?;
        let line = String::from_utf8_lossy(&line);
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let row = parse_row(line).and_then(|point| {
            if seen_ids.insert(point.id) {
                Ok(point)
            } else {
                Err(RowError::DuplicateId(point.id))
            }
        });

        match row {
            Ok(point) => loaded.points.push(point),
            Err(reason) => {
                warn!("Skipping line {}: {}", idx + 1, reason);
                loaded.skipped.push(SkippedRow { line: idx + 1, reason });
            }
        }
    }

    Ok(loaded)
}

/// Parse a single data row into a point
pub fn parse_row(line: &str) -> Result<Point, RowError> {
    let columns: Vec<&str> = line.split(DELIMITER).map(str::trim).collect();
    if columns.len() < MIN_COLUMNS {
        return Err(RowError::TooFewColumns(columns.len()));
    }

    let id = columns[COL_ID]
        .parse::<i64>()
        .map_err(|_| RowError::InvalidId(columns[COL_ID].to_string()))?;
    let latitude = parse_coordinate(columns[COL_LATITUDE], "latitude")?;
    let longitude = parse_coordinate(columns[COL_LONGITUDE], "longitude")?;

    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(RowError::OutOfRange(latitude, longitude));
    }

    Ok(Point {
        id,
        latitude,
        longitude,
        kind: non_empty_or(columns[COL_TYPE], DEFAULT_TYPE),
        power: parse_power(columns[COL_POWER]),
        area: non_empty_or(columns[COL_AREA], DEFAULT_AREA),
    })
}

fn parse_coordinate(value: &str, field: &'static str) -> Result<f64, RowError> {
    value
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| RowError::InvalidCoordinate {
            field,
            value: value.to_string(),
        })
}

/// Power in watts; fractional values are truncated, zero or garbage
/// falls back to the default.
fn parse_power(value: &str) -> i64 {
    value
        .parse::<i64>()
        .ok()
        .or_else(|| {
            value
                .replace(',', ".")
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(|v| v.trunc() as i64)
        })
        .filter(|&p| p != 0)
        .unwrap_or(DEFAULT_POWER)
}

fn non_empty_or(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}
