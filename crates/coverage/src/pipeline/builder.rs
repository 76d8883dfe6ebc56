use std::{path::PathBuf, sync::Arc, time::Duration};

use crate::{
    algorithms::GpsNormalizer,
    pipeline::Pipeline,
    sources::{CsvControlPointSource, ExifMetadataReader, FailurePolicy, ImageFilter, MetadataExtractor},
    traits::{ControlPointSource, MetadataReader},
};

pub const DEFAULT_IMAGE_DIR: &str = "./images";
pub const DEFAULT_CONTROL_POINT_DIR: &str = "./controlpoints";
pub const DEFAULT_CONTROL_POINT_FILE: &str = "controlPoints.csv";

/// Builder for creating pipelines with a fluent API
pub struct PipelineBuilder {
    image_dir: PathBuf,
    filter: ImageFilter,
    reader: Option<Arc<dyn MetadataReader>>,
    control_points: Option<Box<dyn ControlPointSource>>,
    control_point_file: PathBuf,
    policy: FailurePolicy,
    read_timeout: Option<Duration>,
    apply_hemisphere_ref: bool,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            image_dir: PathBuf::from(DEFAULT_IMAGE_DIR),
            filter: ImageFilter::default(),
            reader: None,
            control_points: None,
            control_point_file: PathBuf::from(DEFAULT_CONTROL_POINT_DIR).join(DEFAULT_CONTROL_POINT_FILE),
            policy: FailurePolicy::default(),
            read_timeout: None,
            apply_hemisphere_ref: false,
        }
    }

    pub fn image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.image_dir = dir.into();
        self
    }

    /// Replace the accepted image extensions (default `jpg`)
    pub fn image_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.filter = ImageFilter::new(extensions);
        self
    }

    /// Read control points from this CSV file
    pub fn control_point_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.control_point_file = path.into();
        self
    }

    /// Use a custom control point source (replaces the CSV file)
    pub fn control_point_source<S>(mut self, source: S) -> Self
    where
        S: ControlPointSource + 'static,
    {
        self.control_points = Some(Box::new(source));
        self
    }

    /// Set the metadata reader (replaces the EXIF reader)
    pub fn metadata_reader<R>(mut self, reader: R) -> Self
    where
        R: MetadataReader + 'static,
    {
        self.reader = Some(Arc::new(reader));
        self
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Sign coordinates from the EXIF `S`/`W` hemisphere references
    pub fn apply_hemisphere_ref(mut self, apply: bool) -> Self {
        self.apply_hemisphere_ref = apply;
        self
    }

    /// Build the pipeline with default components if not specified
    pub fn build(self) -> Pipeline {
        let reader = self
            .reader
            .unwrap_or_else(|| Arc::new(ExifMetadataReader));

        let extractor = MetadataExtractor::new(reader)
            .with_policy(self.policy)
            .with_read_timeout(self.read_timeout)
            .with_normalizer(GpsNormalizer::new(self.apply_hemisphere_ref));

        let control_points = self
            .control_points
            .unwrap_or_else(|| Box::new(CsvControlPointSource::new(self.control_point_file)));

        Pipeline::new(self.image_dir, self.filter, extractor, control_points)
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
