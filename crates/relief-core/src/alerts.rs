//! Dashboard map view
//!
//! Markers come from alerts with a valid geolocation plus the user's own
//! position. Alerts without coordinates stay in the card list but never
//! reach the map.

use crate::{DisasterAlert, GeoPoint, Severity};
use serde::{Deserialize, Serialize};

/// Fallback map center when the user location is unknown
pub const DEFAULT_CENTER: GeoPoint = GeoPoint {
    latitude: 30.1575,
    longitude: 71.5249,
};

pub const DEFAULT_ZOOM: u8 = 4;
pub const USER_ZOOM: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Alert,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    pub kind: MarkerKind,
    pub position: GeoPoint,
    pub title: String,
    pub popup: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: GeoPoint,
    pub zoom: u8,
    pub markers: Vec<MapMarker>,
}

impl MapView {
    pub fn alert_markers(&self) -> impl Iterator<Item = &MapMarker> {
        self.markers.iter().filter(|m| m.kind == MarkerKind::Alert)
    }
}

/// Alerts that can be placed on the map, in input order
pub fn mappable(alerts: &[DisasterAlert]) -> impl Iterator<Item = (&DisasterAlert, GeoPoint)> {
    alerts
        .iter()
        .filter_map(|a| a.location.map(|point| (a, point)))
}

pub fn map_view(alerts: &[DisasterAlert], user: Option<GeoPoint>) -> MapView {
    let mut markers: Vec<MapMarker> = mappable(alerts)
        .map(|(alert, position)| MapMarker {
            kind: MarkerKind::Alert,
            position,
            title: alert.title.clone(),
            popup: alert.description_label().to_string(),
            severity: Some(alert.severity),
        })
        .collect();

    if let Some(position) = user {
        markers.push(MapMarker {
            kind: MarkerKind::User,
            position,
            title: "Your location".to_string(),
            popup: "You are here".to_string(),
            severity: None,
        });
    }

    MapView {
        center: user.unwrap_or(DEFAULT_CENTER),
        zoom: if user.is_some() { USER_ZOOM } else { DEFAULT_ZOOM },
        markers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(title: &str, location: Option<GeoPoint>) -> DisasterAlert {
        let mut a = DisasterAlert::new(title);
        a.location = location;
        a
    }

    #[test]
    fn test_alerts_without_location_are_excluded() {
        let alerts = vec![
            alert("Flood", GeoPoint::new(25.0, 68.0).ok()),
            alert("Rumour", None),
            alert("Quake", GeoPoint::new(-33.4, -70.6).ok()),
        ];

        let view = map_view(&alerts, None);
        let titles: Vec<&str> = view.alert_markers().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Flood", "Quake"]);
        assert_eq!(view.center, DEFAULT_CENTER);
        assert_eq!(view.zoom, DEFAULT_ZOOM);
        assert_eq!(view.markers[0].popup, "No description");
    }

    #[test]
    fn test_user_location_centers_map() {
        let user = GeoPoint::new(24.86, 67.0).unwrap();
        let view = map_view(&[], Some(user));
        assert_eq!(view.center, user);
        assert_eq!(view.zoom, USER_ZOOM);
        assert_eq!(view.markers.len(), 1);
        assert_eq!(view.markers[0].kind, MarkerKind::User);
        assert_eq!(view.markers[0].popup, "You are here");
    }
}
