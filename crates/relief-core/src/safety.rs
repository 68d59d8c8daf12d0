//! Safety snapshot for the user's position or the nearest shelter
//!
//! A snapshot is recomputed on every activation or location switch and is
//! never stored. Missing weather degrades individual conditions to
//! `Unknown` / `?` placeholders.

use crate::grade::{grade_risk, grade_score, RiskGrade, RiskLevel, ScoreGrade};
use crate::{GeoPoint, ReliefError, ReliefResource, Result, DISASTER_TEAM_PHONE};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Score shown for the user's own location until a real source exists
pub const CURRENT_LOCATION_SCORE: u8 = 75;
/// Score shown for a shelter
pub const SHELTER_SCORE: u8 = 90;

/// Current conditions as supplied by the weather service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    /// Short condition, e.g. "Rain"
    pub description: Option<String>,
    pub temperature_c: Option<f64>,
    pub wind_speed_ms: Option<f64>,
    /// Nearest named place reported by the service
    pub place_name: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotKind {
    CurrentLocation,
    Shelter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub key: String,
    pub status: String,
    pub risk: RiskLevel,
    pub grade: RiskGrade,
}

impl Condition {
    fn new(key: &str, status: String, risk: RiskLevel) -> Self {
        Self {
            key: key.to_string(),
            status,
            risk,
            grade: grade_risk(risk),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetySnapshot {
    pub kind: SnapshotKind,
    pub name: String,
    pub address: String,
    pub location: GeoPoint,
    pub safety_score: u8,
    pub grade: ScoreGrade,
    pub status: String,
    pub conditions: Vec<Condition>,
    pub recommendations: Vec<String>,
    /// Number to call from this snapshot
    pub phone: String,
    pub generated_at: DateTime<Utc>,
}

impl SafetySnapshot {
    pub fn for_current_location(origin: GeoPoint, weather: Option<&WeatherReading>) -> Self {
        let conditions = vec![
            Condition::new("weather", weather_status(weather), RiskLevel::Low),
            Condition::new("temperature", temperature_status(weather), RiskLevel::None),
            Condition::new("wind", wind_status(weather), RiskLevel::Low),
            Condition::new("evacuation", "Not Required".to_string(), RiskLevel::None),
        ];

        Self {
            kind: SnapshotKind::CurrentLocation,
            name: "Your Location".to_string(),
            address: address(origin, weather),
            location: origin,
            safety_score: CURRENT_LOCATION_SCORE,
            grade: grade_score(CURRENT_LOCATION_SCORE),
            status: "Moderate".to_string(),
            conditions,
            recommendations: strings(&[
                "Keep updated with weather alerts",
                "Ensure mobile is charged",
                "Inform neighbors of any risks",
            ]),
            phone: DISASTER_TEAM_PHONE.to_string(),
            generated_at: Utc::now(),
        }
    }

    /// Fails when the shelter has no coordinates to report on
    pub fn for_shelter(shelter: &ReliefResource, weather: Option<&WeatherReading>) -> Result<Self> {
        let location = shelter
            .location
            .ok_or_else(|| ReliefError::MissingLocation(shelter.id.clone()))?;

        let conditions = vec![
            Condition::new("weather", weather_status(weather), RiskLevel::None),
            Condition::new("temperature", temperature_status(weather), RiskLevel::None),
            Condition::new("wind", wind_status(weather), RiskLevel::None),
            Condition::new("evacuation", "Safe Zone".to_string(), RiskLevel::None),
        ];

        let safety_score = shelter.safety_score.unwrap_or(SHELTER_SCORE);
        let status = match &shelter.status {
            Some(status) => status.clone(),
            None if shelter.is_open => "Open".to_string(),
            None => "Closed".to_string(),
        };

        Ok(Self {
            kind: SnapshotKind::Shelter,
            name: shelter.name.clone(),
            address: address(location, weather),
            location,
            safety_score,
            grade: grade_score(safety_score),
            status,
            conditions,
            recommendations: strings(&[
                "Rest and hydrate",
                "Wait for further instructions",
                "Cooperate with staff",
            ]),
            phone: shelter
                .phone_number
                .clone()
                .unwrap_or_else(|| DISASTER_TEAM_PHONE.to_string()),
            generated_at: Utc::now(),
        })
    }

    pub fn score_grade(&self) -> ScoreGrade {
        grade_score(self.safety_score)
    }

    /// Highest risk among the listed conditions
    pub fn worst_risk(&self) -> RiskLevel {
        self.conditions
            .iter()
            .map(|c| c.risk)
            .max()
            .unwrap_or(RiskLevel::None)
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn address(point: GeoPoint, weather: Option<&WeatherReading>) -> String {
    match weather.and_then(|w| w.place_name.as_deref()) {
        Some(place) if !place.is_empty() => format!(
            "{}, {}",
            place,
            weather.and_then(|w| w.country.as_deref()).unwrap_or("")
        ),
        _ => format!("{:.4}, {:.4}", point.latitude, point.longitude),
    }
}

fn weather_status(weather: Option<&WeatherReading>) -> String {
    weather
        .and_then(|w| w.description.clone())
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| "Unknown".to_string())
}

fn temperature_status(weather: Option<&WeatherReading>) -> String {
    match weather.and_then(|w| w.temperature_c) {
        Some(t) => format!("{}°C", t),
        None => "?°C".to_string(),
    }
}

fn wind_status(weather: Option<&WeatherReading>) -> String {
    match weather.and_then(|w| w.wind_speed_ms) {
        Some(s) => format!("{} m/s", s),
        None => "? m/s".to_string(),
    }
}
