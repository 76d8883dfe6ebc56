use std::{
    io::Read,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    error::{CoverageError, Result},
    traits::ControlPointSource,
    types::ControlPoint,
};

/// A control point row that could not be used
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRow {
    /// 1-based line in the source file
    pub line: u64,
    pub reason: String,
}

impl From<RejectedRow> for CoverageError {
    fn from(row: RejectedRow) -> Self {
        CoverageError::MalformedControlPointRow {
            line: row.line,
            reason: row.reason,
        }
    }
}

/// Result of loading control points: usable points plus skipped rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlPointLoad {
    pub points: Vec<ControlPoint>,
    pub rejected: Vec<RejectedRow>,
}

#[derive(Debug, Deserialize)]
struct RawRow {
    name: Option<String>,
    lat: Option<String>,
    lng: Option<String>,
}

/// Control points read from a CSV file with `name`, `lat` and `lng` columns
#[derive(Debug, Clone)]
pub struct CsvControlPointSource {
    path: PathBuf,
}

impl CsvControlPointSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_dir(dir: impl AsRef<Path>, file: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(file))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ControlPointSource for CsvControlPointSource {
    fn load(&self) -> Result<ControlPointLoad> {
        let file = std::fs::File::open(&self.path)?;
        let load = read_control_points(file)?;
        info!(
            "Loaded {} control points from {:?} ({} rejected)",
            load.points.len(),
            self.path,
            load.rejected.len()
        );
        Ok(load)
    }
}

/// Parse control points from CSV data with a header row.
///
/// Column order is free and extra columns are ignored. Rows with a missing
/// name or a missing/non-numeric coordinate are skipped and reported.
pub fn read_control_points<R: Read>(input: R) -> Result<ControlPointLoad> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input);
    let headers = reader.headers()?.clone();

    let mut load = ControlPointLoad::default();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        let parsed = record
            .deserialize::<RawRow>(Some(&headers))
            .map_err(|err| err.to_string())
            .and_then(parse_row);

        match parsed {
            Ok(point) => load.points.push(point),
            Err(reason) => {
                let rejected = RejectedRow { line, reason };
                warn!("{}", CoverageError::from(rejected.clone()));
                load.rejected.push(rejected);
            }
        }
    }

    Ok(load)
}

fn parse_row(row: RawRow) -> std::result::Result<ControlPoint, String> {
    let name = row.name.ok_or("missing name")?;
    let lat = parse_coordinate("lat", row.lat)?;
    let lng = parse_coordinate("lng", row.lng)?;
    Ok(ControlPoint::new(name, lat, lng))
}

fn parse_coordinate(field: &str, value: Option<String>) -> std::result::Result<f64, String> {
    let value = value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| format!("missing {field}"))?;
    match value.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(number),
        _ => Err(format!("{field} '{value}' is not a number")),
    }
}
