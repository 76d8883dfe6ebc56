use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoverageError {
    #[error("Image directory unavailable: {}: {source}", .path.display())]
    DirectoryUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read GPS metadata for '{image}': {source}")]
    MetadataReadFailure {
        image: String,
        #[source]
        source: Box<CoverageError>,
    },

    #[error("No GPS block in {}", .0.display())]
    MissingGps(PathBuf),

    #[error("Metadata read timed out after {timeout_ms} ms")]
    MetadataTimeout { timeout_ms: u64 },

    #[error("EXIF error: {0}")]
    Exif(String),

    #[error("Malformed control point row at line {line}: {reason}")]
    MalformedControlPointRow { line: u64, reason: String },

    #[error("Degenerate coverage: need at least 3 distinct image coordinates, found {distinct}")]
    DegenerateCoverage { distinct: usize },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("Extraction task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl CoverageError {
    /// Wrap a per-image error with the image it belongs to
    pub fn for_image(image: impl Into<String>, source: CoverageError) -> Self {
        Self::MetadataReadFailure {
            image: image.into(),
            source: Box::new(source),
        }
    }
}

impl From<exif::Error> for CoverageError {
    fn from(err: exif::Error) -> Self {
        Self::Exif(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CoverageError>;
