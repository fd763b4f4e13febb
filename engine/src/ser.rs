use std::io::Write;

use geodesy::Geodetic;
use geojson::{Feature, Geometry, JsonObject, JsonValue, Value};

use crate::{
    error::ExportError,
    scene::{LabelPlacement, Overlay, OverlayKind, OverlayScene, Style},
};

fn position(g: &Geodetic) -> Vec<f64> {
    vec![g.lon, g.lat, g.height]
}

impl From<&Overlay> for Feature {
    fn from(overlay: &Overlay) -> Feature {
        let (kind, geometry) = match &overlay.kind {
            OverlayKind::Marker { position: p } => ("marker", Value::Point(position(p))),
            OverlayKind::Line { from, to } => (
                "line",
                Value::LineString(vec![position(from), position(to)]),
            ),
            OverlayKind::Polygon { ring } => {
                let mut exterior: Vec<Vec<f64>> = ring.iter().map(position).collect();
                if let Some(first) = exterior.first().cloned() {
                    exterior.push(first);
                }
                ("polygon", Value::Polygon(vec![exterior]))
            }
            OverlayKind::Label { anchor, .. } => ("label", Value::Point(position(anchor))),
        };

        let mut properties = JsonObject::new();
        properties.insert("kind".into(), JsonValue::from(kind));
        properties.insert(
            "style".into(),
            JsonValue::from(match overlay.style {
                Style::Final => "final",
                Style::Preview => "preview",
            }),
        );
        if let OverlayKind::Label {
            text,
            rotation_deg,
            placement,
            ..
        } = &overlay.kind
        {
            properties.insert("text".into(), JsonValue::from(text.clone()));
            properties.insert("rotation".into(), JsonValue::from(*rotation_deg));
            properties.insert(
                "placement".into(),
                JsonValue::from(match placement {
                    LabelPlacement::Above => "above",
                    LabelPlacement::Below => "below",
                    LabelPlacement::Center => "center",
                }),
            );
        }

        Feature {
            bbox: None,
            geometry: Some(Geometry::new(geometry)),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }
}

/// Writes the scene as a GeoJSON FeatureCollection.
pub fn write_scene(scene: &OverlayScene, writer: impl Write) -> Result<(), ExportError> {
    let features: Vec<Feature> = scene.iter().map(Feature::from).collect();
    info!("writing {} overlay features to geojson", features.len());
    geojson::ser::to_feature_collection_writer(writer, &features)?;
    Ok(())
}
