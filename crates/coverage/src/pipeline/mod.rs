pub mod builder;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::{
    algorithms::{Classification, CoverageClassifier},
    error::Result,
    sources::{
        discover_images, Discovery, DiscoveryStatus, ExtractionOutcome, ImageFilter,
        MetadataExtractor, RejectedRow, SkippedImage,
    },
    traits::ControlPointSource,
    types::{ControlPoint, ImagePoint},
};

/// Everything a successful run produced
#[derive(Debug, Clone)]
pub struct CoverageReport {
    pub image_dir: PathBuf,
    pub discovery_status: DiscoveryStatus,
    /// Image positions in the order they formed the coverage ring
    pub images: Vec<ImagePoint>,
    pub skipped_images: Vec<SkippedImage>,
    pub rejected_rows: Vec<RejectedRow>,
    pub classification: Classification,
}

impl CoverageReport {
    /// Control points not covered by the image set
    pub fn outside(&self) -> impl Iterator<Item = &ControlPoint> {
        self.classification.outside()
    }

    pub fn control_points(&self) -> &[ControlPoint] {
        &self.classification.points
    }
}

/// Discovery → extraction → control points → classification, in that order
pub struct Pipeline {
    image_dir: PathBuf,
    filter: ImageFilter,
    extractor: MetadataExtractor,
    control_points: Box<dyn ControlPointSource>,
    classifier: CoverageClassifier,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> builder::PipelineBuilder {
        builder::PipelineBuilder::new()
    }

    pub fn new(
        image_dir: PathBuf,
        filter: ImageFilter,
        extractor: MetadataExtractor,
        control_points: Box<dyn ControlPointSource>,
    ) -> Self {
        Self {
            image_dir,
            filter,
            extractor,
            control_points,
            classifier: CoverageClassifier,
        }
    }

    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    /// Run the discovery and extraction stages only.
    ///
    /// An unreadable image directory is not an error here: it yields an
    /// empty image list with [`DiscoveryStatus::Unavailable`].
    pub async fn collect_images(&self) -> Result<(Discovery, ExtractionOutcome)> {
        info!("Discovering images in {:?}", self.image_dir);
        let discovery = discover_images(&self.image_dir, &self.filter).await;
        info!(
            "Found {} images ({} entries listed)",
            discovery.images.len(),
            discovery.total_entries
        );

        let extraction = self.extractor.extract(&self.image_dir, &discovery.images).await?;
        Ok((discovery, extraction))
    }

    /// Run every stage; the first fatal error stops the run
    pub async fn run(&self) -> Result<CoverageReport> {
        let (discovery, extraction) = self.collect_images().await?;

        let load = self.control_points.load()?;

        let classification = self.classifier.classify(&extraction.images, load.points)?;
        info!(
            "Classified {} control points: {} inside, {} outside",
            classification.points.len(),
            classification.inside_count(),
            classification.points.len() - classification.inside_count()
        );

        Ok(CoverageReport {
            image_dir: self.image_dir.clone(),
            discovery_status: discovery.status,
            images: extraction.images,
            skipped_images: extraction.skipped,
            rejected_rows: load.rejected,
            classification,
        })
    }

    /// Get information about the pipeline configuration
    pub fn info(&self) -> String {
        format!(
            "Pipeline: images from {:?} ({}), failure policy {}",
            self.image_dir,
            self.filter.extensions().join(", "),
            self.extractor.policy()
        )
    }
}
