//! Relief resources and disaster alerts as returned by the search index
//!
//! Hits are loosely typed: identifiers arrive as strings or numbers,
//! coordinates sometimes as numeric strings or embedded in the address text,
//! and any optional field may be missing or null. Parsing default-fills at
//! this boundary so nothing downstream has to.

use crate::GeoPoint;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use tracing::debug;

/// A point of aid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReliefResource {
    pub id: String,
    pub name: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    /// Free-text `type` tag (e.g. "shelter")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub has_food: bool,
    pub has_water: bool,
    pub has_medical: bool,
    pub has_bed: bool,
    pub is_open: bool,
    pub is_24_7: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_spaces: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Score published by the shelter itself, 0-100
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety_score: Option<u8>,
    /// Free-text operating status, e.g. "Open" or "At capacity"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl ReliefResource {
    /// Minimal record with every optional field default-filled
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: String::new(),
            location: None,
            kind: None,
            has_food: false,
            has_water: false,
            has_medical: false,
            has_bed: false,
            is_open: false,
            is_24_7: false,
            available_spaces: None,
            phone_number: None,
            safety_score: None,
            status: None,
        }
    }

    /// Parse one search hit. Returns `None` only when the hit is not an
    /// object or has no identifier; a field of the wrong type is treated as
    /// missing.
    pub fn from_hit(hit: serde_json::Value) -> Option<Self> {
        match serde_json::from_value::<RawReliefHit>(hit) {
            Ok(raw) => raw.into_resource(),
            Err(e) => {
                debug!("Skipping malformed relief hit: {}", e);
                None
            }
        }
    }

    pub fn status_label(&self) -> &'static str {
        if self.is_open {
            "OPEN"
        } else {
            "CLOSED"
        }
    }

    pub fn hours_label(&self) -> &'static str {
        if self.is_24_7 {
            "24/7"
        } else {
            "Limited Hours"
        }
    }

    pub fn spaces_label(&self) -> String {
        self.available_spaces
            .map(|n| n.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }

    pub fn address_label(&self) -> &str {
        if self.address.trim().is_empty() {
            "N/A"
        } else {
            &self.address
        }
    }

    pub fn is_shelter(&self) -> bool {
        self.kind
            .as_deref()
            .is_some_and(|k| k.eq_ignore_ascii_case("shelter"))
    }
}

/// Alert severity, defaulting to medium when the index omits it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
}

impl Severity {
    /// Lenient parse: anything unrecognised is medium
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "low" => Severity::Low,
            "high" => Severity::High,
            _ => Severity::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Severity::Low => "green",
            Severity::Medium => "yellow",
            Severity::High => "red",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A hazard report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisasterAlert {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Human readable place, e.g. "Sindh, Pakistan"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disaster_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub population_affected: Option<u64>,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
}

impl DisasterAlert {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: None,
            location_label: None,
            disaster_type: None,
            population_affected: None,
            severity: Severity::default(),
            location: None,
        }
    }

    pub fn from_hit(hit: serde_json::Value) -> Option<Self> {
        match serde_json::from_value::<RawAlertHit>(hit) {
            Ok(raw) => Some(raw.into_alert()),
            Err(e) => {
                debug!("Skipping malformed alert hit: {}", e);
                None
            }
        }
    }

    pub fn time_label(&self) -> &str {
        non_empty(self.disaster_type.as_deref()).unwrap_or("Unknown time")
    }

    pub fn area_label(&self) -> &str {
        non_empty(self.location_label.as_deref()).unwrap_or("Unknown area")
    }

    pub fn affected_label(&self) -> String {
        match self.population_affected {
            Some(n) if n > 0 => n.to_string(),
            _ => "Unknown".to_string(),
        }
    }

    pub fn description_label(&self) -> &str {
        non_empty(self.description.as_deref()).unwrap_or("No description")
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// A field of the wrong JSON type reads as missing
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Number that may arrive as JSON number or numeric string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Number(f64),
    Text(String),
}

impl LooseNumber {
    fn as_f64(&self) -> Option<f64> {
        let value = match self {
            LooseNumber::Number(n) => Some(*n),
            LooseNumber::Text(s) => s.trim().parse::<f64>().ok(),
        };
        value.filter(|n| n.is_finite())
    }
}

/// Identifier that may arrive as JSON number or string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LooseId {
    Integer(i64),
    Number(f64),
    Text(String),
}

impl LooseId {
    fn into_string(self) -> Option<String> {
        let id = match self {
            LooseId::Integer(n) => n.to_string(),
            LooseId::Number(n) => n.to_string(),
            LooseId::Text(s) => s.trim().to_string(),
        };
        (!id.is_empty()).then_some(id)
    }
}

/// Raw relief hit from the search index
#[derive(Debug, Deserialize)]
struct RawReliefHit {
    #[serde(rename = "objectID", default, deserialize_with = "lenient")]
    object_id: Option<LooseId>,
    #[serde(default, deserialize_with = "lenient")]
    id: Option<LooseId>,
    #[serde(default, deserialize_with = "lenient")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    address: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    latitude: Option<LooseNumber>,
    #[serde(default, deserialize_with = "lenient")]
    longitude: Option<LooseNumber>,
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    kind: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    has_food: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    has_water: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    has_medical: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    has_bed: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    is_open: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    is_24_7: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    available_spaces: Option<LooseNumber>,
    #[serde(default, deserialize_with = "lenient")]
    phone_number: Option<String>,
    #[serde(rename = "safetyScore", alias = "safety_score", default, deserialize_with = "lenient")]
    safety_score: Option<LooseNumber>,
    #[serde(default, deserialize_with = "lenient")]
    status: Option<String>,
}

impl RawReliefHit {
    fn into_resource(self) -> Option<ReliefResource> {
        let id = self
            .object_id
            .and_then(LooseId::into_string)
            .or_else(|| self.id.and_then(LooseId::into_string))?;

        let address = self.address.unwrap_or_default();
        let location = GeoPoint::try_from_parts(
            self.latitude.as_ref().and_then(LooseNumber::as_f64),
            self.longitude.as_ref().and_then(LooseNumber::as_f64),
        )
        .or_else(|| extract_coordinates(&address));

        let available_spaces = self
            .available_spaces
            .as_ref()
            .and_then(LooseNumber::as_f64)
            .filter(|n| *n >= 0.0 && *n <= u32::MAX as f64)
            .map(|n| n as u32);

        Some(ReliefResource {
            id,
            name: self.name.unwrap_or_else(|| "Unknown".to_string()),
            address,
            location,
            kind: self.kind.filter(|k| !k.trim().is_empty()),
            has_food: self.has_food.unwrap_or(false),
            has_water: self.has_water.unwrap_or(false),
            has_medical: self.has_medical.unwrap_or(false),
            has_bed: self.has_bed.unwrap_or(false),
            is_open: self.is_open.unwrap_or(false),
            is_24_7: self.is_24_7.unwrap_or(false),
            available_spaces,
            phone_number: self.phone_number.filter(|p| !p.trim().is_empty()),
            safety_score: self
                .safety_score
                .as_ref()
                .and_then(LooseNumber::as_f64)
                .filter(|n| (0.0..=100.0).contains(n))
                .map(|n| n.round() as u8),
            status: self.status.filter(|st| !st.trim().is_empty()),
        })
    }
}

/// Raw disaster alert hit from the search index
#[derive(Debug, Deserialize)]
struct RawAlertHit {
    #[serde(rename = "objectID", default, deserialize_with = "lenient")]
    object_id: Option<LooseId>,
    #[serde(default, deserialize_with = "lenient")]
    id: Option<LooseId>,
    #[serde(default, deserialize_with = "lenient")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    location: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    disaster_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    population_affected: Option<LooseNumber>,
    #[serde(default, deserialize_with = "lenient")]
    severity: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    latitude: Option<LooseNumber>,
    #[serde(default, deserialize_with = "lenient")]
    longitude: Option<LooseNumber>,
}

impl RawAlertHit {
    fn into_alert(self) -> DisasterAlert {
        let id = self
            .object_id
            .and_then(LooseId::into_string)
            .or_else(|| self.id.and_then(LooseId::into_string));

        let location = GeoPoint::try_from_parts(
            self.latitude.as_ref().and_then(LooseNumber::as_f64),
            self.longitude.as_ref().and_then(LooseNumber::as_f64),
        )
        .or_else(|| self.location.as_deref().and_then(extract_coordinates));

        DisasterAlert {
            id,
            title: self.title.unwrap_or_else(|| "Unknown".to_string()),
            description: self.description.filter(|d| !d.trim().is_empty()),
            location_label: self.location,
            disaster_type: self.disaster_type,
            population_affected: self
                .population_affected
                .as_ref()
                .and_then(LooseNumber::as_f64)
                .filter(|n| *n >= 0.0)
                .map(|n| n as u64),
            severity: self
                .severity
                .as_deref()
                .map(Severity::from_label)
                .unwrap_or_default(),
            location,
        }
    }
}

/// Find a `(lat, lon)` pair embedded in free text, e.g.
/// `"Relief camp, Multan (30.1575, 71.5249)"`.
pub fn extract_coordinates(text: &str) -> Option<GeoPoint> {
    let mut rest = text;
    while let Some(open) = rest.find('(') {
        let after = &rest[open + 1..];
        let Some(close) = after.find(')') else {
            return None;
        };
        if let Some(point) = parse_pair(&after[..close]) {
            return Some(point);
        }
        rest = after;
    }
    None
}

fn parse_pair(inner: &str) -> Option<GeoPoint> {
    let (lat, lon) = inner.split_once(',')?;
    let lat = parse_plain_decimal(lat.trim())?;
    let lon = parse_plain_decimal(lon.trim())?;
    GeoPoint::new(lat, lon).ok()
}

/// Optional sign, digits, optional fraction. Rejects exponents and words.
fn parse_plain_decimal(s: &str) -> Option<f64> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    let starts_with_digit = digits.chars().next().is_some_and(|c| c.is_ascii_digit());
    let dots = digits.chars().filter(|c| *c == '.').count();
    if !starts_with_digit || dots > 1 || !digits.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    s.parse().ok()
}
