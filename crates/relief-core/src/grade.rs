//! Severity buckets for safety scores, risk levels and routes
//!
//! ```text
//! score:  [90, ∞) good · [70, 90) fair · [50, 70) poor · [0, 50) critical
//! risk:   none → safe · low · medium · high
//! ```

use crate::{ReliefError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const SCORE_GOOD: u8 = 90;
pub const SCORE_FAIR: u8 = 70;
pub const SCORE_POOR: u8 = 50;

/// Grade of a 0-100 safety score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreGrade {
    Good,
    Fair,
    Poor,
    Critical,
}

impl ScoreGrade {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreGrade::Good => "good",
            ScoreGrade::Fair => "fair",
            ScoreGrade::Poor => "poor",
            ScoreGrade::Critical => "critical",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            ScoreGrade::Good => "green",
            ScoreGrade::Fair => "yellow",
            ScoreGrade::Poor => "orange",
            ScoreGrade::Critical => "red",
        }
    }
}

impl fmt::Display for ScoreGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grade a safety score. Scores above 100 are a caller error; they grade
/// as good.
pub fn grade_score(score: u8) -> ScoreGrade {
    if score >= SCORE_GOOD {
        ScoreGrade::Good
    } else if score >= SCORE_FAIR {
        ScoreGrade::Fair
    } else if score >= SCORE_POOR {
        ScoreGrade::Poor
    } else {
        ScoreGrade::Critical
    }
}

/// Qualitative risk attached to a condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    None,
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::None => "none",
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl FromStr for RiskLevel {
    type Err = ReliefError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(RiskLevel::None),
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            _ => Err(ReliefError::UnknownRisk(s.to_string())),
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presentation bucket for a risk level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskGrade {
    Safe,
    Low,
    Medium,
    High,
}

impl RiskGrade {
    pub fn color(&self) -> &'static str {
        match self {
            RiskGrade::Safe => "green",
            RiskGrade::Low => "yellow",
            RiskGrade::Medium => "orange",
            RiskGrade::High => "red",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskGrade::Safe => "Safe",
            RiskGrade::Low => "low risk",
            RiskGrade::Medium => "medium risk",
            RiskGrade::High => "high risk",
        }
    }
}

pub fn grade_risk(risk: RiskLevel) -> RiskGrade {
    match risk {
        RiskLevel::None => RiskGrade::Safe,
        RiskLevel::Low => RiskGrade::Low,
        RiskLevel::Medium => RiskGrade::Medium,
        RiskLevel::High => RiskGrade::High,
    }
}

/// Safety of a destination on the route planner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SafetyLevel {
    High,
    Medium,
    Low,
}

impl SafetyLevel {
    pub fn color(&self) -> &'static str {
        match self {
            SafetyLevel::High => "green",
            SafetyLevel::Medium => "yellow",
            SafetyLevel::Low => "red",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SafetyLevel::High => "HIGH SAFETY",
            SafetyLevel::Medium => "MEDIUM SAFETY",
            SafetyLevel::Low => "LOW SAFETY",
        }
    }
}

/// Passability of the route to a destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteStatus {
    Clear,
    Caution,
    Blocked,
}

impl RouteStatus {
    pub fn color(&self) -> &'static str {
        match self {
            RouteStatus::Clear => "green",
            RouteStatus::Caution => "yellow",
            RouteStatus::Blocked => "red",
        }
    }

    pub fn safety_level(&self) -> SafetyLevel {
        match self {
            RouteStatus::Clear => SafetyLevel::High,
            RouteStatus::Caution => SafetyLevel::Medium,
            RouteStatus::Blocked => SafetyLevel::Low,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_boundaries() {
        assert_eq!(grade_score(100), ScoreGrade::Good);
        assert_eq!(grade_score(90), ScoreGrade::Good);
        assert_eq!(grade_score(89), ScoreGrade::Fair);
        assert_eq!(grade_score(70), ScoreGrade::Fair);
        assert_eq!(grade_score(69), ScoreGrade::Poor);
        assert_eq!(grade_score(50), ScoreGrade::Poor);
        assert_eq!(grade_score(49), ScoreGrade::Critical);
        assert_eq!(grade_score(0), ScoreGrade::Critical);
    }

    #[test]
    fn test_score_colors() {
        assert_eq!(grade_score(75).color(), "yellow");
        assert_eq!(grade_score(10).color(), "red");
    }

    #[test]
    fn test_risk_pass_through() {
        assert_eq!(grade_risk(RiskLevel::None), RiskGrade::Safe);
        assert_eq!(grade_risk(RiskLevel::Low), RiskGrade::Low);
        assert_eq!(grade_risk(RiskLevel::Medium), RiskGrade::Medium);
        assert_eq!(grade_risk(RiskLevel::High), RiskGrade::High);
        assert_eq!(grade_risk(RiskLevel::None).label(), "Safe");
        assert_eq!(grade_risk(RiskLevel::Medium).color(), "orange");
    }

    #[test]
    fn test_risk_parse() {
        assert_eq!("HIGH".parse::<RiskLevel>().unwrap(), RiskLevel::High);
        assert!(matches!(
            "severe".parse::<RiskLevel>(),
            Err(ReliefError::UnknownRisk(_))
        ));
    }

    #[test]
    fn test_route_status_safety() {
        assert_eq!(RouteStatus::Clear.safety_level(), SafetyLevel::High);
        assert_eq!(RouteStatus::Blocked.safety_level().color(), "red");
        assert!(RouteStatus::Blocked > RouteStatus::Caution);
    }
}
