use std::{path::Path, sync::Arc, time::Duration};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr, VariantNames};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::{
    algorithms::GpsNormalizer,
    error::{CoverageError, Result},
    traits::MetadataReader,
    types::{ImagePoint, RawGps},
};

/// What to do when one image's metadata cannot be read
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, VariantNames, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FailurePolicy {
    /// Any failed read fails the whole batch and no points are returned
    #[default]
    AllOrNothing,
    /// Failed reads are logged and left out; the rest are returned
    SkipAndLog,
}

/// An image left out under [`FailurePolicy::SkipAndLog`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedImage {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionOutcome {
    /// One point per successfully read image, in input order
    pub images: Vec<ImagePoint>,
    pub skipped: Vec<SkippedImage>,
}

/// Reads and normalizes GPS positions for a batch of images concurrently
#[derive(Clone)]
pub struct MetadataExtractor {
    reader: Arc<dyn MetadataReader>,
    normalizer: GpsNormalizer,
    policy: FailurePolicy,
    read_timeout: Option<Duration>,
}

impl MetadataExtractor {
    pub fn new(reader: Arc<dyn MetadataReader>) -> Self {
        Self {
            reader,
            normalizer: GpsNormalizer::default(),
            policy: FailurePolicy::default(),
            read_timeout: None,
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_normalizer(mut self, normalizer: GpsNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Give up on any single read that takes longer than `timeout`.
    ///
    /// The read runs on the blocking pool and cannot be cancelled: a timed-out
    /// read keeps running in the background and its result is discarded.
    pub fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Read every image in `names` (relative to `dir`) and normalize it.
    ///
    /// All reads are in flight at once. Results are placed by input index,
    /// so the output order matches `names` regardless of completion order.
    pub async fn extract(&self, dir: &Path, names: &[String]) -> Result<ExtractionOutcome> {
        let mut tasks = JoinSet::new();

        for (index, name) in names.iter().enumerate() {
            let reader = Arc::clone(&self.reader);
            let path = dir.join(name);
            let timeout = self.read_timeout;

            tasks.spawn(async move {
                let read = tokio::task::spawn_blocking(move || reader.read_gps(&path));
                let joined = match timeout {
                    Some(limit) => match tokio::time::timeout(limit, read).await {
                        Ok(joined) => joined,
                        Err(_) => Ok(Err(CoverageError::MetadataTimeout {
                            timeout_ms: limit.as_millis() as u64,
                        })),
                    },
                    None => read.await,
                };
                let result: Result<RawGps> = joined.unwrap_or_else(|err| Err(err.into()));
                (index, result)
            });
        }

        let mut slots: Vec<Option<Result<RawGps>>> = names.iter().map(|_| None).collect();

        while let Some(joined) = tasks.join_next().await {
            let (index, result) = joined?;
            match result {
                Ok(gps) => {
                    debug!(image = %names[index], "read GPS metadata");
                    slots[index] = Some(Ok(gps));
                }
                Err(err) => match self.policy {
                    FailurePolicy::AllOrNothing => {
                        tasks.abort_all();
                        return Err(CoverageError::for_image(names[index].clone(), err));
                    }
                    FailurePolicy::SkipAndLog => slots[index] = Some(Err(err)),
                },
            }
        }

        let mut outcome = ExtractionOutcome::default();
        for (name, slot) in names.iter().zip(slots) {
            match slot {
                Some(Ok(gps)) => outcome.images.push(self.normalizer.normalize(name, &gps)),
                Some(Err(err)) => {
                    warn!("Skipping image '{}': {}", name, err);
                    outcome.skipped.push(SkippedImage {
                        name: name.clone(),
                        reason: err.to_string(),
                    });
                }
                None => continue,
            }
        }

        info!(
            "Extracted {} image positions ({} skipped)",
            outcome.images.len(),
            outcome.skipped.len()
        );
        Ok(outcome)
    }
}
