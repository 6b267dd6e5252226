//! Map layer descriptions
//!
//! Builds GeoJSON feature collections for the display layer. Circles are
//! `Point` features carrying a `radiusM` property; connection lines are
//! `LineString` features. Coordinates are in `[lon, lat]` order.

use geojson::{feature::Id, Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde_json::json;

use crate::core::roster::Roster;
use crate::models::{Coordinate, Disaster, NgoMatch, SafeZone, Severity};

pub const DISASTER_RADIUS_M: f64 = 50_000.0;
pub const SAFE_ZONE_RADIUS_M: f64 = 30_000.0;
pub const NGO_RADIUS_M: f64 = 2_000.0;

pub const SAFE_ZONE_COLOR: &str = "green";
pub const NGO_COLOR: &str = "blue";
pub const CONNECTION_COLOR: &str = "purple";

/// Zone color for a disaster severity
pub fn zone_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Low => "#2ecc71",
        Severity::Moderate => "#f1c40f",
        Severity::High | Severity::Severe => "#e74c3c",
        Severity::Unknown => "#e74c3c",
    }
}

fn point(coords: Coordinate) -> Geometry {
    Geometry::new(Value::Point(vec![coords.longitude, coords.latitude]))
}

fn feature(id: String, geometry: Geometry, properties: serde_json::Value) -> Feature {
    let properties: Option<JsonObject> = match properties {
        serde_json::Value::Object(map) => Some(map),
        _ => None,
    };

    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: Some(Id::String(id)),
        properties,
        foreign_members: None,
    }
}

fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Disaster zone circle colored by severity
pub fn disaster_feature(disaster: &Disaster) -> Feature {
    let color = zone_color(disaster.severity());

    feature(
        format!("disaster-{}-{}", disaster.id, disaster.severity()),
        point(disaster.coords()),
        json!({
            "layer": "disaster",
            "radiusM": DISASTER_RADIUS_M,
            "color": color,
            "fillColor": color,
            "fillOpacity": 0.35,
            "weight": 2,
            "title": format!("{} (Disaster Zone)", disaster.location),
            "detail": format!("Severity: {}", disaster.severity_label),
        }),
    )
}

pub fn safe_zone_feature(zone: &SafeZone) -> Feature {
    feature(
        format!("safe-{}", zone.id),
        point(zone.coords()),
        json!({
            "layer": "safeZone",
            "radiusM": SAFE_ZONE_RADIUS_M,
            "color": SAFE_ZONE_COLOR,
            "title": format!("{} (Safe Zone)", zone.location),
        }),
    )
}

/// All map layers: disaster zones, safe zones and NGOs
pub fn map_layers(disasters: &[Disaster], safe_zones: &[SafeZone], roster: &Roster) -> FeatureCollection {
    let ngos = roster.iter().map(|ngo| {
        feature(
            format!("ngo-{}", ngo.id),
            point(ngo.coords()),
            json!({
                "layer": "ngo",
                "radiusM": NGO_RADIUS_M,
                "color": NGO_COLOR,
                "title": ngo.name,
                "detail": format!("Resources: {}", ngo.resources),
            }),
        )
    });

    let features = disasters
        .iter()
        .map(disaster_feature)
        .chain(safe_zones.iter().map(safe_zone_feature))
        .chain(ngos)
        .collect();

    collection(features)
}

/// Lines from the hovered disaster to each matched NGO
pub fn connection_lines(disaster: &Disaster, matches: &[NgoMatch]) -> FeatureCollection {
    let origin = disaster.coords();

    let features = matches
        .iter()
        .enumerate()
        .map(|(pos, m)| {
            let target = m.ngo.coords();
            let line = Geometry::new(Value::LineString(vec![
                vec![origin.longitude, origin.latitude],
                vec![target.longitude, target.latitude],
            ]));

            feature(
                format!("line-{}-{}-{}", disaster.id, m.ngo.id, pos),
                line,
                json!({
                    "layer": "connection",
                    "color": CONNECTION_COLOR,
                    "role": m.role,
                    "title": m.ngo.name,
                    "detail": format!("Resources: {}", m.ngo.resources),
                    "distance": format!("Distance: {:.2} km", m.distance_km),
                }),
            )
        })
        .collect();

    collection(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchRole, Ngo};

    fn disaster(severity: &str) -> Disaster {
        Disaster {
            id: "d1".to_string(),
            location: "Puri".to_string(),
            severity_label: severity.to_string(),
            latitude: 19.8135,
            longitude: 85.8312,
        }
    }

    #[test]
    fn test_zone_colors() {
        assert_eq!(zone_color(Severity::Low), "#2ecc71");
        assert_eq!(zone_color(Severity::Moderate), "#f1c40f");
        assert_eq!(zone_color(Severity::High), "#e74c3c");
        assert_eq!(zone_color(Severity::Severe), "#e74c3c");
        assert_eq!(zone_color(Severity::Unknown), "#e74c3c");
    }

    #[test]
    fn test_disaster_feature_properties() {
        let f = disaster_feature(&disaster(" Moderate "));
        let props = f.properties.unwrap();

        assert_eq!(props["color"], "#f1c40f");
        assert_eq!(props["radiusM"], 50_000.0);
        assert_eq!(props["title"], "Puri (Disaster Zone)");
        assert_eq!(props["detail"], "Severity:  Moderate ");
        assert!(matches!(f.id, Some(Id::String(ref id)) if id == "disaster-d1-moderate"));
    }

    #[test]
    fn test_connection_lines() {
        let ngo = Ngo {
            id: "41".to_string(),
            name: "Orissa Voluntary Health Association".to_string(),
            latitude: 20.2672,
            longitude: 85.8484,
            resources: 70,
        };
        let matches = vec![NgoMatch {
            ngo,
            distance_km: 50.4,
            role: MatchRole::Closest,
        }];

        let lines = connection_lines(&disaster("high"), &matches);

        assert_eq!(lines.features.len(), 1);
        let props = lines.features[0].properties.as_ref().unwrap();
        assert_eq!(props["distance"], "Distance: 50.40 km");
        assert_eq!(props["role"], "closest");
        match &lines.features[0].geometry.as_ref().unwrap().value {
            Value::LineString(points) => assert_eq!(points[0], vec![85.8312, 19.8135]),
            other => panic!("expected line, got {:?}", other),
        }
    }
}
