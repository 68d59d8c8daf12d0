//! View coordination and per-view state
//!
//! The coordinator owns the only long-lived shared state: which view is
//! active and the most recent known user location. Each view keeps its own
//! state (search text, filter, selected location) and nothing is global.

use crate::ranker::CapabilityFilter;
use crate::GeoPoint;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Home,
    Dashboard,
    Relief,
    Route,
    Safety,
    Chat,
}

impl View {
    /// Entries on the bottom navigation bar; the route planner is reached
    /// from the finder, not from the bar
    pub const NAV_ITEMS: [View; 5] = [View::Home, View::Dashboard, View::Relief, View::Safety, View::Chat];

    /// Unknown ids land on the home view
    pub fn from_id(id: &str) -> Self {
        match id.trim().to_ascii_lowercase().as_str() {
            "dashboard" => View::Dashboard,
            "relief" => View::Relief,
            "route" => View::Route,
            "safety" => View::Safety,
            "chat" => View::Chat,
            _ => View::Home,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            View::Home => "home",
            View::Dashboard => "dashboard",
            View::Relief => "relief",
            View::Route => "route",
            View::Safety => "safety",
            View::Chat => "chat",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            View::Home => "Home",
            View::Dashboard => "Alerts",
            View::Relief => "Relief",
            View::Route => "Route",
            View::Safety => "Safety",
            View::Chat => "Ask AI",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewCoordinator {
    active: View,
    last_location: Option<GeoPoint>,
}

impl ViewCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> View {
        self.active
    }

    pub fn navigate(&mut self, view: View) {
        debug!("View {} -> {}", self.active.id(), view.id());
        self.active = view;
    }

    pub fn last_location(&self) -> Option<GeoPoint> {
        self.last_location
    }

    pub fn record_location(&mut self, point: GeoPoint) {
        self.last_location = Some(point);
    }
}

/// Which location the safety view reports on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SafetyTarget {
    #[default]
    Current,
    Shelter,
}

impl SafetyTarget {
    pub fn from_id(id: &str) -> Self {
        if id.trim().eq_ignore_ascii_case("shelter") {
            SafetyTarget::Shelter
        } else {
            SafetyTarget::Current
        }
    }
}

/// Relief finder state: query, filter and fetch sequencing
///
/// Every change issues a new sequence number. A response whose sequence is
/// no longer the newest is stale; callers that render it anyway reproduce
/// "most recently completed wins".
#[derive(Debug, Clone, Default)]
pub struct FinderState {
    search_text: String,
    filter: CapabilityFilter,
    issued: u64,
}

impl FinderState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn filter(&self) -> CapabilityFilter {
        self.filter
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) -> u64 {
        self.search_text = text.into();
        self.begin_fetch()
    }

    pub fn set_filter(&mut self, filter: CapabilityFilter) -> u64 {
        self.filter = filter;
        self.begin_fetch()
    }

    pub fn begin_fetch(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    pub fn accept(&self, seq: u64) -> bool {
        seq == self.issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_ids_round_trip() {
        for view in [View::Home, View::Dashboard, View::Relief, View::Route, View::Safety, View::Chat] {
            assert_eq!(View::from_id(view.id()), view);
        }
        assert_eq!(View::from_id("settings"), View::Home);
        assert!(!View::NAV_ITEMS.contains(&View::Route));
    }

    #[test]
    fn test_coordinator() {
        let mut c = ViewCoordinator::new();
        assert_eq!(c.active(), View::Home);
        assert!(c.last_location().is_none());

        c.navigate(View::Relief);
        c.record_location(GeoPoint::new(1.0, 2.0).unwrap());
        assert_eq!(c.active(), View::Relief);
        assert_eq!(c.last_location(), GeoPoint::new(1.0, 2.0).ok());
    }

    #[test]
    fn test_superseded_fetch_is_stale() {
        let mut finder = FinderState::new();
        let first = finder.set_search_text("water");
        let second = finder.set_filter(CapabilityFilter::Water);

        assert!(!finder.accept(first));
        assert!(finder.accept(second));
        assert_eq!(finder.search_text(), "water");
        assert_eq!(finder.filter(), CapabilityFilter::Water);
    }

    #[test]
    fn test_safety_target() {
        assert_eq!(SafetyTarget::from_id("Shelter"), SafetyTarget::Shelter);
        assert_eq!(SafetyTarget::from_id(""), SafetyTarget::Current);
    }
}
