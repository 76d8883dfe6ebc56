use serde::{Deserialize, Serialize};
use geo_types::Coord;

/// A degree/minute/second angle as stored in EXIF GPS tags
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dms {
    pub degrees: f64,
    pub minutes: f64,
    pub seconds: f64,
}

impl Dms {
    pub fn new(degrees: f64, minutes: f64, seconds: f64) -> Self {
        Self { degrees, minutes, seconds }
    }

    pub fn triplet(&self) -> [f64; 3] {
        [self.degrees, self.minutes, self.seconds]
    }
}

impl From<[f64; 3]> for Dms {
    fn from([degrees, minutes, seconds]: [f64; 3]) -> Self {
        Self { degrees, minutes, seconds }
    }
}

/// GPS position of one image before normalization
#[derive(Debug, Clone, PartialEq)]
pub struct RawGps {
    pub latitude: Dms,
    pub longitude: Dms,
    /// Hemisphere letter from `GPSLatitudeRef` (`N` or `S`), if present
    pub latitude_ref: Option<char>,
    /// Hemisphere letter from `GPSLongitudeRef` (`E` or `W`), if present
    pub longitude_ref: Option<char>,
}

impl RawGps {
    pub fn new(latitude: Dms, longitude: Dms) -> Self {
        Self {
            latitude,
            longitude,
            latitude_ref: None,
            longitude_ref: None,
        }
    }

    pub fn with_refs(mut self, latitude_ref: Option<char>, longitude_ref: Option<char>) -> Self {
        self.latitude_ref = latitude_ref;
        self.longitude_ref = longitude_ref;
        self
    }
}

/// Decimal-degree location of one image, named after its file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagePoint {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl ImagePoint {
    pub fn new(name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self { name: name.into(), lat, lng }
    }

    /// Position as an `x = lng, y = lat` coordinate
    pub fn coord(&self) -> Coord<f64> {
        Coord { x: self.lng, y: self.lat }
    }
}

/// A surveyed ground-control point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    /// Set by the classifier; `false` until then
    #[serde(default)]
    pub inside: bool,
}

impl ControlPoint {
    pub fn new(name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lng,
            inside: false,
        }
    }

    /// Position as an `x = lng, y = lat` coordinate
    pub fn coord(&self) -> Coord<f64> {
        Coord { x: self.lng, y: self.lat }
    }
}
