//! # Ground Control Coverage Library
//!
//! Checks surveyed ground-control points against the area covered by a set
//! of geotagged images. Image GPS positions (read from EXIF) are joined, in
//! listing order, into a closed ring; each control point is then tested for
//! containment in that ring.
//!
//! ## Core Features
//!
//! - **DMS Normalization**: degree/minute/second EXIF triplets to decimal degrees
//! - **Concurrent Extraction**: one metadata read per image, joined in input order
//! - **Failure Policies**: all-or-nothing (default) or skip-and-log per image
//! - **Coverage Classification**: inclusive point-in-polygon test via `geo`
//! - **GeoJSON Support**: export the coverage ring and classified points
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use coverage::Pipeline;
//!
//! # async fn run() -> coverage::Result<()> {
//! let pipeline = Pipeline::builder()
//!     .image_dir("./images")
//!     .control_point_file("./controlpoints/controlPoints.csv")
//!     .build();
//!
//! let report = pipeline.run().await?;
//! for point in report.outside() {
//!     println!("{} is outside coverage", point.name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Vertex order
//!
//! The ring's vertices are the images in file-name order. This assumes the
//! files were named in flight order; nothing reorders them. If the listing
//! order does not follow the flight path the ring can self-intersect, and
//! the containment result then reflects that shape, not the surveyed area.

// Core modules
pub mod error;
pub mod types;
pub mod traits;
pub mod algorithms;
pub mod sources;
pub mod pipeline;
pub mod io;

// Re-exports for convenience
pub use error::{CoverageError, Result};
pub use types::{ControlPoint, Dms, ImagePoint, RawGps};
pub use traits::*;
pub use algorithms::*;
pub use sources::*;
pub use pipeline::{CoverageReport, Pipeline, builder::PipelineBuilder};
