//! Relief ranker
//!
//! Filters a result page by capability and annotates each retained item
//! with its classification and distance from the user. Ranking is a display
//! annotation: the search index already ordered the page by relevance, so
//! the default keeps that order. Nearest-first is available as an opt-in.

use crate::classify::{classify, Classification};
use crate::{GeoPoint, ReliefError, ReliefResource, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Capability filter offered on the finder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityFilter {
    #[default]
    All,
    Shelter,
    Food,
    Medical,
    Water,
}

impl CapabilityFilter {
    pub const ALL: [CapabilityFilter; 5] = [
        CapabilityFilter::All,
        CapabilityFilter::Shelter,
        CapabilityFilter::Food,
        CapabilityFilter::Medical,
        CapabilityFilter::Water,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            CapabilityFilter::All => "all",
            CapabilityFilter::Shelter => "shelter",
            CapabilityFilter::Food => "food",
            CapabilityFilter::Medical => "medical",
            CapabilityFilter::Water => "water",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CapabilityFilter::All => "All",
            CapabilityFilter::Shelter => "Shelter",
            CapabilityFilter::Food => "Food",
            CapabilityFilter::Medical => "Medical",
            CapabilityFilter::Water => "Water",
        }
    }

    /// Filter expression understood by the search index
    pub fn search_expression(&self) -> &'static str {
        match self {
            CapabilityFilter::All => "",
            CapabilityFilter::Shelter => "type:shelter",
            CapabilityFilter::Food => "has_food:true",
            CapabilityFilter::Medical => "has_medical:true",
            CapabilityFilter::Water => "has_water:true",
        }
    }

    pub fn matches(&self, resource: &ReliefResource) -> bool {
        match self {
            CapabilityFilter::All => true,
            CapabilityFilter::Shelter => resource.is_shelter(),
            CapabilityFilter::Food => resource.has_food,
            CapabilityFilter::Medical => resource.has_medical,
            CapabilityFilter::Water => resource.has_water,
        }
    }
}

impl FromStr for CapabilityFilter {
    type Err = ReliefError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        CapabilityFilter::ALL
            .into_iter()
            .find(|f| f.id() == wanted)
            .ok_or_else(|| ReliefError::UnknownFilter(s.to_string()))
    }
}

impl fmt::Display for CapabilityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Distance from the user, or explicitly unknown
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "km", rename_all = "lowercase")]
pub enum Distance {
    Known(f64),
    Unknown,
}

impl Distance {
    pub fn between(origin: Option<GeoPoint>, target: Option<GeoPoint>) -> Self {
        match (origin, target) {
            (Some(a), Some(b)) => Distance::Known(a.distance_km(&b)),
            _ => Distance::Unknown,
        }
    }

    pub fn km(&self) -> Option<f64> {
        match self {
            Distance::Known(km) => Some(*km),
            Distance::Unknown => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Distance::Known(_))
    }

    /// Known distances first, ascending
    fn nearest_first(&self, other: &Distance) -> Ordering {
        match (self, other) {
            (Distance::Known(a), Distance::Known(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Distance::Known(_), Distance::Unknown) => Ordering::Less,
            (Distance::Unknown, Distance::Known(_)) => Ordering::Greater,
            (Distance::Unknown, Distance::Unknown) => Ordering::Equal,
        }
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Known(km) => write!(f, "{:.1} km", km),
            Distance::Unknown => f.write_str("N/A"),
        }
    }
}

/// Output ordering of the ranker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankOrder {
    /// Order returned by the search index
    #[default]
    Upstream,
    /// Stable sort by distance, unknown distances last
    NearestFirst,
}

impl FromStr for RankOrder {
    type Err = ReliefError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "upstream" => Ok(RankOrder::Upstream),
            "nearest_first" | "nearest" => Ok(RankOrder::NearestFirst),
            _ => Err(ReliefError::UnknownOrder(s.to_string())),
        }
    }
}

/// A resource annotated for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResource {
    pub resource: ReliefResource,
    pub classification: Classification,
    pub distance: Distance,
}

/// Filter and annotate resources, preserving input order
pub fn rank(
    resources: &[ReliefResource],
    origin: Option<GeoPoint>,
    filter: CapabilityFilter,
) -> Vec<RankedResource> {
    let ranked: Vec<RankedResource> = resources
        .iter()
        .filter(|r| filter.matches(r))
        .map(|r| RankedResource {
            classification: classify(r),
            distance: Distance::between(origin, r.location),
            resource: r.clone(),
        })
        .collect();

    debug!(
        "Ranked {} of {} resources (filter={}, origin known={})",
        ranked.len(),
        resources.len(),
        filter,
        origin.is_some()
    );

    ranked
}

pub fn rank_with_order(
    resources: &[ReliefResource],
    origin: Option<GeoPoint>,
    filter: CapabilityFilter,
    order: RankOrder,
) -> Vec<RankedResource> {
    let mut ranked = rank(resources, origin, filter);
    if order == RankOrder::NearestFirst {
        ranked.sort_by(|a, b| a.distance.nearest_first(&b.distance));
    }
    ranked
}

/// Closest resource with known coordinates; ties keep the earlier one
pub fn nearest(resources: &[ReliefResource], origin: GeoPoint) -> Option<(&ReliefResource, f64)> {
    resources
        .iter()
        .filter_map(|r| r.location.map(|loc| (r, origin.distance_km(&loc))))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
}
