use crate::types::{Dms, ImagePoint, RawGps};

/// Convert a `[degrees, minutes, seconds]` triplet to decimal degrees.
///
/// Malformed components (NaN, infinities) propagate into the result.
pub fn to_decimal(triplet: [f64; 3]) -> f64 {
    let [degrees, minutes, seconds] = triplet;
    degrees + minutes / 60.0 + seconds / 3600.0
}

impl Dms {
    /// Decimal-degree value of this angle
    pub fn to_decimal(&self) -> f64 {
        to_decimal(self.triplet())
    }
}

/// Negative magnitude of `value`; zero stays `0.0` rather than `-0.0`
fn negated(value: f64) -> f64 {
    -value.abs() + 0.0
}

/// Turns raw EXIF triplets into named decimal-degree points
#[derive(Debug, Clone, Copy, Default)]
pub struct GpsNormalizer {
    /// Negate latitude for `S` and longitude for `W` references.
    /// Off by default: the triplet is converted as read.
    pub apply_hemisphere_ref: bool,
}

impl GpsNormalizer {
    pub fn new(apply_hemisphere_ref: bool) -> Self {
        Self { apply_hemisphere_ref }
    }

    pub fn normalize(&self, name: &str, gps: &RawGps) -> ImagePoint {
        let mut lat = gps.latitude.to_decimal();
        let mut lng = gps.longitude.to_decimal();

        if self.apply_hemisphere_ref {
            if matches!(gps.latitude_ref, Some('S') | Some('s')) {
                lat = negated(lat);
            }
            if matches!(gps.longitude_ref, Some('W') | Some('w')) {
                lng = negated(lng);
            }
        }

        ImagePoint::new(name, lat, lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_degree() {
        assert_eq!(to_decimal([40.0, 30.0, 0.0]), 40.5);
    }

    #[test]
    fn test_minutes_and_seconds() {
        let value = to_decimal([12.0, 15.0, 36.0]);
        assert!((value - (12.0 + 15.0 / 60.0 + 36.0 / 3600.0)).abs() < 1e-12);
        assert!((value - 12.26).abs() < 1e-12);
    }

    #[test]
    fn test_nan_propagates() {
        assert!(to_decimal([f64::NAN, 0.0, 0.0]).is_nan());
        assert!(to_decimal([1.0, f64::NAN, 0.0]).is_nan());
    }

    #[test]
    fn test_normalize_ignores_refs_by_default() {
        let gps = RawGps::new(Dms::new(33.0, 52.0, 4.0), Dms::new(151.0, 12.0, 36.0))
            .with_refs(Some('S'), Some('E'));

        let point = GpsNormalizer::default().normalize("IMG_0001.JPG", &gps);
        assert_eq!(point.name, "IMG_0001.JPG");
        assert!(point.lat > 0.0, "sign must come from the triplet only");
        assert!((point.lng - 151.21).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_applies_refs_when_enabled() {
        let gps = RawGps::new(Dms::new(40.0, 30.0, 0.0), Dms::new(74.0, 0.0, 0.0))
            .with_refs(Some('N'), Some('W'));

        let point = GpsNormalizer::new(true).normalize("a.jpg", &gps);
        assert_eq!(point.lat, 40.5);
        assert_eq!(point.lng, -74.0);
    }

    #[test]
    fn test_zero_with_hemisphere_ref_stays_positive_zero() {
        let gps = RawGps::new(Dms::new(0.0, 0.0, 0.0), Dms::new(0.0, 0.0, 0.0))
            .with_refs(Some('S'), Some('W'));

        let point = GpsNormalizer::new(true).normalize("equator.jpg", &gps);
        assert!(point.lat == 0.0 && point.lat.is_sign_positive());
        assert!(point.lng == 0.0 && point.lng.is_sign_positive());
    }
}
