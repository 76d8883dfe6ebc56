use coverage::{ControlPoint, CoverageReport, FailurePolicy, Pipeline};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use strum::{Display, EnumString, IntoStaticStr, VariantNames};
use thiserror::Error;


#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    TomlSerError(#[from] toml::ser::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}


/// How the outside control points are written
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default,
    Display, EnumString, VariantNames, IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum OutputFormat {
    /// Human-readable log lines
    #[default]
    Text,
    /// One JSON object per outside control point on stdout
    JsonLines,
}


/// Survey run configuration, loadable from TOML or JSON
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct SurveyConfig {
    /// Directory holding the geotagged images
    pub image_dir: String,
    /// Directory holding the control point CSV
    pub control_point_dir: String,
    /// Control point CSV file name, relative to `control_point_dir`
    pub control_point_file: String,
    /// Accepted image extensions, matched case-insensitively
    pub image_extensions: Vec<String>,
    pub failure_policy: FailurePolicy,
    /// Per-image metadata read timeout in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_timeout_ms: Option<u64>,
    /// Negate coordinates for `S`/`W` EXIF hemisphere references
    pub apply_hemisphere_ref: bool,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            image_dir: coverage::pipeline::builder::DEFAULT_IMAGE_DIR.to_string(),
            control_point_dir: coverage::pipeline::builder::DEFAULT_CONTROL_POINT_DIR.to_string(),
            control_point_file: coverage::pipeline::builder::DEFAULT_CONTROL_POINT_FILE.to_string(),
            image_extensions: vec!["jpg".to_string()],
            failure_policy: FailurePolicy::default(),
            read_timeout_ms: None,
            apply_hemisphere_ref: false,
        }
    }
}

impl SurveyConfig {
    /// Load SurveyConfig from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load SurveyConfig from TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load SurveyConfig from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load SurveyConfig from JSON string
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Auto-detect file format and load configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(ConfigError::UnsupportedFileFormat),
        }
    }

    /// Save SurveyConfig to a TOML file
    pub fn to_toml_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = self.to_toml()?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Convert SurveyConfig to TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(&self)?)
    }

    /// Convert SurveyConfig to JSON string
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(&self)?)
    }

    /// JSON schema of the configuration file
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(SurveyConfig)
    }

    pub fn control_point_path(&self) -> PathBuf {
        Path::new(&self.control_point_dir).join(&self.control_point_file)
    }

    /// Point at a control point file given as a single path
    pub fn set_control_point_path(&mut self, path: &Path) {
        self.control_point_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_string_lossy().to_string(),
            _ => ".".to_string(),
        };
        self.control_point_file = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
    }

    /// Build the pipeline this configuration describes
    pub fn pipeline(&self) -> Pipeline {
        Pipeline::builder()
            .image_dir(&self.image_dir)
            .image_extensions(&self.image_extensions)
            .control_point_file(self.control_point_path())
            .failure_policy(self.failure_policy)
            .read_timeout(self.read_timeout_ms.map(Duration::from_millis))
            .apply_hemisphere_ref(self.apply_hemisphere_ref)
            .build()
    }
}


/// Text line reported for a control point outside coverage
pub fn describe_outside(point: &ControlPoint) -> String {
    format!(
        "{} at ({:.6}, {:.6}) is outside image coverage",
        point.name, point.lat, point.lng
    )
}

/// Write the `json-lines` output: one record per outside control point
pub fn write_json_lines<W: Write>(report: &CoverageReport, out: &mut W) -> coverage::Result<()> {
    out.write_all(report.outside_json_lines()?.as_bytes())?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use coverage::{CoverageClassifier, DiscoveryStatus, ImagePoint};

    #[test]
    fn test_default_locations() {
        let config = SurveyConfig::default();
        assert_eq!(config.image_dir, "./images");
        assert_eq!(
            config.control_point_path(),
            PathBuf::from("./controlpoints/controlPoints.csv")
        );
        assert_eq!(config.image_extensions, vec!["jpg"]);
        assert_eq!(config.failure_policy, FailurePolicy::AllOrNothing);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = SurveyConfig::from_toml(
            "image_dir = \"/survey/images\"\nfailure_policy = \"skip_and_log\"\nread_timeout_ms = 2500\n",
        )
        .expect("Should parse TOML");

        assert_eq!(config.image_dir, "/survey/images");
        assert_eq!(config.failure_policy, FailurePolicy::SkipAndLog);
        assert_eq!(config.read_timeout_ms, Some(2500));
        assert_eq!(config.control_point_file, "controlPoints.csv");
    }

    #[test]
    fn test_toml_file_round_trip() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let path = dir.path().join("coverage.toml");

        let mut config = SurveyConfig::default();
        config.image_extensions = vec!["jpg".to_string(), "tif".to_string()];
        config.to_toml_file(&path).expect("Should write TOML");

        let loaded = SurveyConfig::from_file(&path).expect("Should load TOML");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_json_and_unsupported_formats() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let json = dir.path().join("coverage.json");
        fs::write(&json, "{\"apply_hemisphere_ref\": true}").expect("Should write JSON");

        let config = SurveyConfig::from_file(&json).expect("Should load JSON");
        assert!(config.apply_hemisphere_ref);

        let yaml = dir.path().join("coverage.yaml");
        assert!(matches!(
            SurveyConfig::from_file(&yaml),
            Err(ConfigError::UnsupportedFileFormat)
        ));
    }

    #[test]
    fn test_set_control_point_path() {
        let mut config = SurveyConfig::default();
        config.set_control_point_path(Path::new("/data/gcp/points.csv"));
        assert_eq!(config.control_point_dir, "/data/gcp");
        assert_eq!(config.control_point_file, "points.csv");

        config.set_control_point_path(Path::new("points.csv"));
        assert_eq!(config.control_point_path(), PathBuf::from("./points.csv"));
    }

    #[test]
    fn test_output_format_names() {
        assert_eq!(OutputFormat::JsonLines.to_string(), "json-lines");
        assert_eq!("text".parse::<OutputFormat>().ok(), Some(OutputFormat::Text));
    }

    #[test]
    fn test_describe_outside() {
        let point = ControlPoint::new("GCP-7", 40.5, -3.25);
        assert_eq!(
            describe_outside(&point),
            "GCP-7 at (40.500000, -3.250000) is outside image coverage"
        );
    }

    #[test]
    fn test_write_json_lines() {
        let images = vec![
            ImagePoint::new("a.jpg", 0.0, 0.0),
            ImagePoint::new("b.jpg", 0.0, 10.0),
            ImagePoint::new("c.jpg", 10.0, 10.0),
            ImagePoint::new("d.jpg", 10.0, 0.0),
        ];
        let points = vec![
            ControlPoint::new("GCP-1", 5.0, 5.0),
            ControlPoint::new("GCP-2", 12.0, 5.0),
            ControlPoint::new("GCP-3", -1.0, -1.0),
        ];
        let classification = CoverageClassifier
            .classify(&images, points)
            .expect("Should classify");
        let report = CoverageReport {
            image_dir: "images".into(),
            discovery_status: DiscoveryStatus::Listed,
            images,
            skipped_images: vec![],
            rejected_rows: vec![],
            classification,
        };

        let mut out = Vec::new();
        write_json_lines(&report, &mut out).expect("Should write lines");
        let text = String::from_utf8(out).expect("Should be UTF-8");

        let names: Vec<String> = text
            .lines()
            .map(|line| {
                let value: serde_json::Value = serde_json::from_str(line).expect("Should parse line");
                assert_eq!(value["inside"], serde_json::Value::Bool(false));
                value["name"].as_str().unwrap_or_default().to_string()
            })
            .collect();
        assert_eq!(names, vec!["GCP-2", "GCP-3"]);
    }

    #[test]
    fn test_schema_lists_fields() {
        let schema = serde_json::to_value(SurveyConfig::schema()).expect("Should serialize schema");
        let properties = &schema["properties"];
        assert!(properties.get("image_dir").is_some());
        assert!(properties.get("failure_policy").is_some());
    }
}
