use std::path::Path;

use crate::{
    error::Result,
    sources::ControlPointLoad,
    types::RawGps,
};

/// Reads the raw GPS triplets embedded in an image file
pub trait MetadataReader: Send + Sync {
    /// Return the image's latitude/longitude triplets, or an error when
    /// the file is unreadable or has no GPS block
    fn read_gps(&self, path: &Path) -> Result<RawGps>;
}

/// Produces the surveyed control points for a run
pub trait ControlPointSource: Send + Sync {
    /// Load every usable control point, reporting rows that were skipped
    fn load(&self) -> Result<ControlPointLoad>;
}
