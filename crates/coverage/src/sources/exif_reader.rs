use std::{fs::File, io::BufReader, path::Path};

use exif::{Exif, In, Tag, Value};

use crate::{
    error::{CoverageError, Result},
    traits::MetadataReader,
    types::{Dms, RawGps},
};

/// Reads GPS tags from the primary IFD with kamadak-exif.
///
/// Works for any container the EXIF reader understands (JPEG, TIFF, HEIF,
/// PNG, WebP).
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifMetadataReader;

impl MetadataReader for ExifMetadataReader {
    fn read_gps(&self, path: &Path) -> Result<RawGps> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        let exif = match exif::Reader::new().read_from_container(&mut reader) {
            Ok(exif) => exif,
            Err(exif::Error::NotFound(_)) => return Err(CoverageError::MissingGps(path.to_path_buf())),
            Err(err) => return Err(err.into()),
        };

        let missing = || CoverageError::MissingGps(path.to_path_buf());
        let latitude = dms_field(&exif, Tag::GPSLatitude).ok_or_else(missing)?;
        let longitude = dms_field(&exif, Tag::GPSLongitude).ok_or_else(missing)?;

        Ok(RawGps::new(latitude, longitude).with_refs(
            ref_field(&exif, Tag::GPSLatitudeRef),
            ref_field(&exif, Tag::GPSLongitudeRef),
        ))
    }
}

/// Parse a three-rational GPS coordinate tag
fn dms_field(exif: &Exif, tag: Tag) -> Option<Dms> {
    match &exif.get_field(tag, In::PRIMARY)?.value {
        Value::Rational(rationals) if rationals.len() >= 3 => Some(Dms::new(
            rationals[0].to_f64(),
            rationals[1].to_f64(),
            rationals[2].to_f64(),
        )),
        _ => None,
    }
}

/// First character of a hemisphere reference tag (`N`, `S`, `E`, `W`)
fn ref_field(exif: &Exif, tag: Tag) -> Option<char> {
    match &exif.get_field(tag, In::PRIMARY)?.value {
        Value::Ascii(parts) => parts
            .first()
            .and_then(|bytes| bytes.first())
            .map(|&b| b as char),
        _ => None,
    }
}
