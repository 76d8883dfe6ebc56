use std::collections::HashSet;

use geo::coordinate_position::{CoordPos, CoordinatePosition};
use geo_types::{Coord, LineString, Polygon};
use tracing::debug;

use crate::{
    error::{CoverageError, Result},
    types::{ControlPoint, ImagePoint},
};

/// Closed polygon whose vertices are the image locations in extraction order.
///
/// Vertex order is whatever order the images were listed in; nothing here
/// reorders them into a flight path or a hull. A listing order that zig-zags
/// produces a self-intersecting ring, and containment on such a ring follows
/// the even-odd behavior of the underlying test rather than the surveyed area.
/// Three or more distinct but collinear locations also pass the vertex check
/// and give a zero-area ring; with inclusive edges every point on that line
/// then counts as inside.
#[derive(Debug, Clone)]
pub struct CoverageRing {
    polygon: Polygon<f64>,
}

impl CoverageRing {
    /// Build the ring from image points, closing it back to the first one
    pub fn from_images(images: &[ImagePoint]) -> Result<Self> {
        let mut coords: Vec<Coord<f64>> = images.iter().map(ImagePoint::coord).collect();

        // `+ 0.0` folds -0.0 into 0.0 so signed zeros are one location
        let distinct = coords
            .iter()
            .map(|c| ((c.x + 0.0).to_bits(), (c.y + 0.0).to_bits()))
            .collect::<HashSet<_>>()
            .len();
        if distinct < 3 {
            return Err(CoverageError::DegenerateCoverage { distinct });
        }

        let first = coords[0];
        coords.push(first);

        Ok(Self {
            polygon: Polygon::new(LineString::new(coords), vec![]),
        })
    }

    /// Ring vertices as `(lng, lat)` pairs, first vertex repeated at the end
    pub fn vertices(&self) -> Vec<[f64; 2]> {
        self.polygon
            .exterior()
            .coords()
            .map(|c| [c.x, c.y])
            .collect()
    }

    pub fn polygon(&self) -> &Polygon<f64> {
        &self.polygon
    }

    pub fn position(&self, coord: &Coord<f64>) -> CoordPos {
        self.polygon.coordinate_position(coord)
    }

    /// Containment with inclusive edges: points on the ring count as inside
    pub fn contains(&self, coord: &Coord<f64>) -> bool {
        matches!(self.position(coord), CoordPos::Inside | CoordPos::OnBoundary)
    }
}

/// Control points after classification, together with the ring used
#[derive(Debug, Clone)]
pub struct Classification {
    pub ring: CoverageRing,
    /// Every input point, in input order, with `inside` assigned
    pub points: Vec<ControlPoint>,
}

impl Classification {
    pub fn outside(&self) -> impl Iterator<Item = &ControlPoint> {
        self.points.iter().filter(|p| !p.inside)
    }

    pub fn inside_count(&self) -> usize {
        self.points.iter().filter(|p| p.inside).count()
    }

    pub fn into_outside(self) -> Vec<ControlPoint> {
        self.points.into_iter().filter(|p| !p.inside).collect()
    }
}

/// Classifies control points against the coverage ring of an image set
#[derive(Debug, Clone, Default)]
pub struct CoverageClassifier;

impl CoverageClassifier {
    pub fn classify(
        &self,
        images: &[ImagePoint],
        mut points: Vec<ControlPoint>,
    ) -> Result<Classification> {
        let ring = CoverageRing::from_images(images)?;

        // Each point gets its own result; flags are reassigned on every call.
        for point in points.iter_mut() {
            point.inside = ring.contains(&point.coord());
            debug!(name = %point.name, inside = point.inside, "classified control point");
        }

        Ok(Classification { ring, points })
    }
}

/// Return the control points that fall outside the images' coverage ring
pub fn classify(images: &[ImagePoint], points: &[ControlPoint]) -> Result<Vec<ControlPoint>> {
    CoverageClassifier
        .classify(images, points.to_vec())
        .map(Classification::into_outside)
}
