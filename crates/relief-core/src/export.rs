//! GeoJSON export of ranked resources and alerts

use crate::ranker::RankedResource;
use crate::{DisasterAlert, GeoPoint};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde_json::json;

fn point_feature(point: GeoPoint, properties: serde_json::Value) -> Feature {
    let properties = match properties {
        serde_json::Value::Object(map) => map,
        _ => JsonObject::new(),
    };

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![point.longitude, point.latitude]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Items without coordinates are left out
pub fn resources_geojson(ranked: &[RankedResource]) -> FeatureCollection {
    let features = ranked
        .iter()
        .filter_map(|r| {
            let point = r.resource.location?;
            Some(point_feature(
                point,
                json!({
                    "id": r.resource.id,
                    "name": r.resource.name,
                    "address": r.resource.address_label(),
                    "display_type": r.classification.display_type,
                    "badges": r.classification.badges,
                    "status": r.resource.status_label(),
                    "hours": r.resource.hours_label(),
                    "available_spaces": r.resource.available_spaces,
                    "distance_km": r.distance.km(),
                    "distance": r.distance.to_string(),
                }),
            ))
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

pub fn alerts_geojson(alerts: &[DisasterAlert]) -> FeatureCollection {
    let features = crate::alerts::mappable(alerts)
        .map(|(alert, point)| {
            point_feature(
                point,
                json!({
                    "title": alert.title,
                    "description": alert.description_label(),
                    "severity": alert.severity,
                    "area": alert.area_label(),
                    "affected": alert.affected_label(),
                }),
            )
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{rank, CapabilityFilter, ReliefResource};

    #[test]
    fn test_resources_geojson_skips_unlocated() {
        let mut located = ReliefResource::new("1", "Water Point");
        located.location = GeoPoint::new(10.0, 20.0).ok();
        located.has_water = true;
        let unlocated = ReliefResource::new("2", "Somewhere");

        let ranked = rank(&[located, unlocated], GeoPoint::new(10.0, 20.0).ok(), CapabilityFilter::All);
        let fc = resources_geojson(&ranked);
        assert_eq!(fc.features.len(), 1);

        let json = serde_json::to_value(&fc).unwrap();
        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(json["features"][0]["geometry"]["coordinates"], json!([20.0, 10.0]));
        assert_eq!(json["features"][0]["properties"]["display_type"], "water");
        assert_eq!(json["features"][0]["properties"]["distance"], "0.0 km");
    }

    #[test]
    fn test_alerts_geojson() {
        let mut a = DisasterAlert::new("Cyclone");
        a.location = GeoPoint::new(21.0, 89.0).ok();
        let fc = alerts_geojson(&[a, DisasterAlert::new("Unplaced")]);
        assert_eq!(fc.features.len(), 1);
        let props = fc.features[0].properties.as_ref().unwrap();
        assert_eq!(props["severity"], "medium");
    }
}
