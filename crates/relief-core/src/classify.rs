//! Resource classification
//!
//! A resource gets exactly one display type (first matching flag in the
//! order food, water, medical) and a badge for every capability it has.

use crate::ReliefResource;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Single category shown on a result card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayType {
    Food,
    Water,
    Medical,
    Unknown,
}

impl DisplayType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayType::Food => "food",
            DisplayType::Water => "water",
            DisplayType::Medical => "medical",
            DisplayType::Unknown => "unknown",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            DisplayType::Food => "green",
            DisplayType::Water => "blue",
            DisplayType::Medical => "red",
            DisplayType::Unknown => "gray",
        }
    }
}

impl fmt::Display for DisplayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability flag rendered as an independent badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Food,
    Water,
    Bed,
    Medical,
}

impl Capability {
    /// Badge order on a card
    pub const ALL: [Capability; 4] = [
        Capability::Food,
        Capability::Water,
        Capability::Bed,
        Capability::Medical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Food => "food",
            Capability::Water => "water",
            Capability::Bed => "bed",
            Capability::Medical => "medical",
        }
    }

    pub fn is_present(&self, resource: &ReliefResource) -> bool {
        match self {
            Capability::Food => resource.has_food,
            Capability::Water => resource.has_water,
            Capability::Bed => resource.has_bed,
            Capability::Medical => resource.has_medical,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub display_type: DisplayType,
    pub badges: Vec<Capability>,
}

pub fn classify(resource: &ReliefResource) -> Classification {
    let display_type = if resource.has_food {
        DisplayType::Food
    } else if resource.has_water {
        DisplayType::Water
    } else if resource.has_medical {
        DisplayType::Medical
    } else {
        DisplayType::Unknown
    };

    let badges = Capability::ALL
        .into_iter()
        .filter(|c| c.is_present(resource))
        .collect();

    Classification {
        display_type,
        badges,
    }
}
