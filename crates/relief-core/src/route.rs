//! Route options from the user to ranked destinations
//!
//! Travel times are straight-line estimates. A destination near an active
//! alert is marked caution or blocked and the alert is listed as a warning.

use crate::grade::{RouteStatus, SafetyLevel};
use crate::ranker::RankedResource;
use crate::{directions_url, DisasterAlert, GeoPoint};
use serde::{Deserialize, Serialize};

pub const WALK_SPEED_KMH: f64 = 4.8;
pub const DRIVE_SPEED_KMH: f64 = 25.0;

/// Alert within this radius of a destination blocks the route
pub const BLOCKED_RADIUS_KM: f64 = 5.0;
/// Alert within this radius of a destination calls for caution
pub const CAUTION_RADIUS_KM: f64 = 25.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteOption {
    pub destination_id: String,
    pub name: String,
    pub address: String,
    pub destination: GeoPoint,
    pub distance_km: f64,
    pub drive_minutes: u32,
    pub walk_minutes: u32,
    pub route_status: RouteStatus,
    pub safety_level: SafetyLevel,
    pub warnings: Vec<String>,
    pub directions_url: String,
}

fn travel_minutes(distance_km: f64, speed_kmh: f64) -> u32 {
    (distance_km / speed_kmh * 60.0).ceil() as u32
}

/// Status and warnings from alerts around a destination
pub fn assess(destination: GeoPoint, alerts: &[DisasterAlert]) -> (RouteStatus, Vec<String>) {
    let mut status = RouteStatus::Clear;
    let mut warnings = Vec::new();

    for alert in alerts {
        let Some(point) = alert.location else {
            continue;
        };
        let km = destination.distance_km(&point);
        let level = if km <= BLOCKED_RADIUS_KM {
            RouteStatus::Blocked
        } else if km <= CAUTION_RADIUS_KM {
            RouteStatus::Caution
        } else {
            continue;
        };
        status = status.max(level);
        warnings.push(format!("{} ({:.1} km from destination)", alert.title, km));
    }

    (status, warnings)
}

/// One option per destination with known coordinates, in input order
pub fn plan_routes(
    origin: GeoPoint,
    destinations: &[RankedResource],
    alerts: &[DisasterAlert],
) -> Vec<RouteOption> {
    destinations
        .iter()
        .filter_map(|ranked| {
            let resource = &ranked.resource;
            let destination = resource.location?;
            let distance_km = origin.distance_km(&destination);
            let (route_status, warnings) = assess(destination, alerts);

            Some(RouteOption {
                destination_id: resource.id.clone(),
                name: resource.name.clone(),
                address: resource.address_label().to_string(),
                destination,
                distance_km,
                drive_minutes: travel_minutes(distance_km, DRIVE_SPEED_KMH),
                walk_minutes: travel_minutes(distance_km, WALK_SPEED_KMH),
                route_status,
                safety_level: route_status.safety_level(),
                warnings,
                directions_url: directions_url(destination),
            })
        })
        .collect()
}
