use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::{Map, Value as JsonValue};

use crate::{
    error::Result,
    pipeline::CoverageReport,
    types::ControlPoint,
};

fn control_point_feature(point: &ControlPoint) -> Feature {
    let geometry = Geometry::new(Value::Point(vec![point.lng, point.lat]));

    let mut properties = Map::new();
    properties.insert("kind".to_string(), JsonValue::from("control_point"));
    properties.insert("name".to_string(), JsonValue::from(point.name.clone()));
    properties.insert("inside".to_string(), JsonValue::Bool(point.inside));

    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: Some(geojson::feature::Id::String(point.name.clone())),
        properties: Some(properties),
        foreign_members: None,
    }
}

impl CoverageReport {
    /// Coverage polygon plus every classified control point
    pub fn to_geojson(&self) -> FeatureCollection {
        let ring = self.classification.ring.vertices();
        let coordinates = vec![ring.iter().map(|&[x, y]| vec![x, y]).collect()];

        let mut coverage_properties = Map::new();
        coverage_properties.insert("kind".to_string(), JsonValue::from("coverage"));
        coverage_properties.insert("image_count".to_string(), JsonValue::from(self.images.len()));

        let mut features = vec![Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::Polygon(coordinates))),
            id: None,
            properties: Some(coverage_properties),
            foreign_members: None,
        }];
        features.extend(self.control_points().iter().map(control_point_feature));

        let mut foreign_members = Map::new();
        foreign_members.insert(
            "image_dir".to_string(),
            JsonValue::from(self.image_dir.to_string_lossy().to_string()),
        );
        foreign_members.insert(
            "outside_count".to_string(),
            JsonValue::from(self.outside().count()),
        );

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: Some(foreign_members),
        }
    }

    pub fn to_geojson_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_geojson())?)
    }

    /// Save GeoJSON to file
    pub fn save_geojson(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        std::fs::write(path, self.to_geojson_string()?)?;
        Ok(())
    }

    /// One JSON object per outside control point, newline separated
    pub fn outside_json_lines(&self) -> Result<String> {
        let mut out = String::new();
        for point in self.outside() {
            out.push_str(&serde_json::to_string(point)?);
            out.push('\n');
        }
        Ok(out)
    }

    /// Image positions as a JSON array, in ring order
    pub fn images_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.images)?)
    }
}
