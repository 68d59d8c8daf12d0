//! Relief Core
//!
//! Client-side logic for the disaster relief map. Search ranking, tiles,
//! weather and the chat assistant are hosted elsewhere; this crate owns the
//! few computations made on already-fetched data:
//!
//! ```text
//! distance  = haversine(origin, resource)          (R = 6371 km)
//! display   = food > water > medical > unknown     (first flag wins)
//! grade     = ≥90 good · ≥70 fair · ≥50 poor · <50 critical
//! ranked    = filter(resources) ▸ classify ▸ annotate distance
//! ```
//!
//! | Module     | Role |
//! |------------|------|
//! | `classify` | Display type and capability badges |
//! | `grade`    | Safety score / risk level buckets |
//! | `ranker`   | Capability filter and distance annotation |
//! | `resource` | Tolerant parsing of search hits |
//! | `alerts`   | Dashboard map view |
//! | `safety`   | Safety snapshot for a location or shelter |
//! | `route`    | Route options to ranked destinations |
//! | `chat`     | Assistant transcript |
//! | `view`     | Active view and per-view state |
//! | `loader`   | Saved search pages from disk |
//! | `export`   | GeoJSON feature collections |

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use thiserror::Error;

pub mod alerts;
pub mod chat;
pub mod classify;
pub mod export;
pub mod grade;
pub mod loader;
pub mod ranker;
pub mod resource;
pub mod route;
pub mod safety;
pub mod view;

pub use classify::{classify, Capability, Classification, DisplayType};
pub use grade::{grade_risk, grade_score, RiskGrade, RiskLevel, ScoreGrade};
pub use ranker::{rank, rank_with_order, CapabilityFilter, Distance, RankOrder, RankedResource};
pub use resource::{DisasterAlert, ReliefResource, Severity};

/// Mean Earth radius in km
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Disaster team hotline used when a location has no phone of its own
pub const DISASTER_TEAM_PHONE: &str = "334-9241133";

#[derive(Error, Debug)]
pub enum ReliefError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid coordinates: ({0}, {1})")]
    InvalidCoordinates(f64, f64),
    #[error("Resource {0} has no location")]
    MissingLocation(String),
    #[error("Unknown capability filter: {0}")]
    UnknownFilter(String),
    #[error("Unknown risk level: {0}")]
    UnknownRisk(String),
    #[error("Unknown rank order: {0}")]
    UnknownOrder(String),
    #[error("Expected a JSON array or an object with a `hits` array")]
    UnsupportedLayout,
    #[error("Message is empty")]
    EmptyMessage,
}

pub type Result<T> = std::result::Result<T, ReliefError>;

/// Validate latitude is in valid range
pub fn is_valid_latitude(lat: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && lat.is_finite()
}

/// Validate longitude is in valid range
pub fn is_valid_longitude(lon: f64) -> bool {
    (-180.0..=180.0).contains(&lon) && lon.is_finite()
}

/// A validated latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if is_valid_latitude(latitude) && is_valid_longitude(longitude) {
            Ok(Self {
                latitude,
                longitude,
            })
        } else {
            Err(ReliefError::InvalidCoordinates(latitude, longitude))
        }
    }

    /// Build a point only when both parts are present and valid
    pub fn try_from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) => Self::new(lat, lon).ok(),
            _ => None,
        }
    }

    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        haversine_km(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

/// Haversine distance between two points in km
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1 * PI / 180.0;
    let lat2_rad = lat2 * PI / 180.0;
    let dlat = (lat2 - lat1) * PI / 180.0;
    let dlon = (lon2 - lon1) * PI / 180.0;

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Turn-by-turn directions link on the hosted map provider
pub fn directions_url(destination: GeoPoint) -> String {
    format!(
        "https://www.google.com/maps/dir/?api=1&destination={},{}",
        destination.latitude, destination.longitude
    )
}
