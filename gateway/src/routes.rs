//! Relief API routes
//!
//! Upstream failures never surface as a 5xx: search failures yield empty
//! results flagged `degraded`, weather failures yield placeholder
//! conditions, and chat failures yield the fallback reply text.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use relief_core::alerts::{map_view, MapView};
use relief_core::chat::{reply_text, GREETING, QUICK_QUESTIONS};
use relief_core::loader::Loaded;
use relief_core::ranker::nearest;
use relief_core::route::{plan_routes, RouteOption};
use relief_core::safety::{SafetySnapshot, WeatherReading};
use relief_core::view::{SafetyTarget, View};
use relief_core::{
    rank, rank_with_order, CapabilityFilter, DisasterAlert, GeoPoint, RankOrder, RankedResource,
    ReliefError, DISASTER_TEAM_PHONE,
};

use crate::AppState;

/// Build the `/api/v1` routes with state
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/relief", get(search_relief))
        .route("/alerts", get(list_alerts))
        .route("/safety", get(safety_snapshot))
        .route("/routes", get(list_routes))
        .route("/weather", get(current_weather))
        .route("/chat", post(chat))
        .route("/meta", get(meta))
        .with_state(state)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);
type ApiResult<T> = Result<Json<T>, ApiError>;

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Optional caller position; both halves or neither
fn parse_origin(lat: Option<f64>, lon: Option<f64>) -> Result<Option<GeoPoint>, ApiError> {
    match (lat, lon) {
        (None, None) => Ok(None),
        (Some(lat), Some(lon)) => GeoPoint::new(lat, lon)
            .map(Some)
            .map_err(|e| bad_request(e.to_string())),
        _ => Err(bad_request("lat and lon must be given together")),
    }
}

fn parse_filter(raw: Option<&str>) -> Result<CapabilityFilter, ApiError> {
    match raw {
        Some(id) if !id.trim().is_empty() => id.parse().map_err(|e: ReliefError| bad_request(e.to_string())),
        _ => Ok(CapabilityFilter::All),
    }
}

/// Empty records plus a `degraded` flag when the upstream call failed
fn degrade<T, E: std::fmt::Display>(what: &str, result: Result<Loaded<T>, E>) -> (Loaded<T>, bool) {
    match result {
        Ok(loaded) => (loaded, false),
        Err(e) => {
            warn!("{} unavailable: {}", what, e);
            (
                Loaded {
                    records: Vec::new(),
                    skipped: 0,
                },
                true,
            )
        }
    }
}

// ============================================================================
// Relief finder
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ReliefParams {
    pub q: Option<String>,
    pub filter: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub order: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReliefResponse {
    pub query: String,
    pub filter: CapabilityFilter,
    pub order: RankOrder,
    pub count: usize,
    pub skipped: usize,
    pub degraded: bool,
    pub results: Vec<RankedResource>,
}

pub async fn search_relief(
    State(state): State<AppState>,
    Query(params): Query<ReliefParams>,
) -> ApiResult<ReliefResponse> {
    let filter = parse_filter(params.filter.as_deref())?;
    let order = match params.order.as_deref() {
        Some(raw) if !raw.trim().is_empty() => raw
            .parse()
            .map_err(|e: ReliefError| bad_request(e.to_string()))?,
        _ => RankOrder::default(),
    };
    let origin = parse_origin(params.lat, params.lon)?;
    let query = params.q.unwrap_or_default();

    let (loaded, degraded) = degrade(
        "Relief search",
        state.search.search_relief(&query, filter).await,
    );
    let results = rank_with_order(&loaded.records, origin, filter, order);

    Ok(Json(ReliefResponse {
        query,
        filter,
        order,
        count: results.len(),
        skipped: loaded.skipped,
        degraded,
        results,
    }))
}

// ============================================================================
// Alert dashboard
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AlertParams {
    pub q: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// Alert with its display labels
#[derive(Debug, Serialize)]
pub struct AlertCard {
    #[serde(flatten)]
    pub alert: DisasterAlert,
    pub time: String,
    pub area: String,
    pub affected: String,
    pub severity_color: &'static str,
}

impl From<DisasterAlert> for AlertCard {
    fn from(alert: DisasterAlert) -> Self {
        Self {
            time: alert.time_label().to_string(),
            area: alert.area_label().to_string(),
            affected: alert.affected_label(),
            severity_color: alert.severity.color(),
            alert,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AlertsResponse {
    pub count: usize,
    pub skipped: usize,
    pub degraded: bool,
    pub map: MapView,
    pub alerts: Vec<AlertCard>,
}

pub async fn list_alerts(
    State(state): State<AppState>,
    Query(params): Query<AlertParams>,
) -> ApiResult<AlertsResponse> {
    let user = parse_origin(params.lat, params.lon)?;
    let query = params.q.unwrap_or_default();

    let (loaded, degraded) = degrade("Alert search", state.search.search_alerts(&query, None).await);
    let map = map_view(&loaded.records, user);

    Ok(Json(AlertsResponse {
        count: loaded.records.len(),
        skipped: loaded.skipped,
        degraded,
        map,
        alerts: loaded.records.into_iter().map(AlertCard::from).collect(),
    }))
}

// ============================================================================
// Safety dashboard
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SafetyParams {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub target: Option<String>,
}

/// `snapshot` is absent while the user location is unknown or no shelter
/// with coordinates exists
#[derive(Debug, Serialize)]
pub struct SafetyResponse {
    pub target: SafetyTarget,
    pub degraded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shelter_distance_km: Option<f64>,
    pub snapshot: Option<SafetySnapshot>,
}

pub async fn safety_snapshot(
    State(state): State<AppState>,
    Query(params): Query<SafetyParams>,
) -> ApiResult<SafetyResponse> {
    let target = params
        .target
        .as_deref()
        .map(SafetyTarget::from_id)
        .unwrap_or_default();

    let mut response = SafetyResponse {
        target,
        degraded: false,
        shelter_distance_km: None,
        snapshot: None,
    };

    let Some(origin) = parse_origin(params.lat, params.lon)? else {
        return Ok(Json(response));
    };

    match target {
        SafetyTarget::Current => {
            let weather = state.weather.current_or_none(origin).await;
            response.degraded = weather.is_none();
            response.snapshot = Some(SafetySnapshot::for_current_location(origin, weather.as_ref()));
        }
        SafetyTarget::Shelter => {
            let (loaded, degraded) = degrade("Shelter scan", state.search.all_relief().await);
            response.degraded = degraded;

            if let Some((shelter, km)) = nearest(&loaded.records, origin) {
                info!("Nearest shelter {} at {:.1} km", shelter.id, km);
                let weather = match shelter.location {
                    Some(point) => state.weather.current_or_none(point).await,
                    None => None,
                };
                response.degraded |= weather.is_none();
                response.shelter_distance_km = Some(km);
                response.snapshot = match SafetySnapshot::for_shelter(shelter, weather.as_ref()) {
                    Ok(snapshot) => Some(snapshot),
                    Err(e) => {
                        warn!("Shelter snapshot failed: {}", e);
                        None
                    }
                };
            }
        }
    }

    Ok(Json(response))
}

// ============================================================================
// Route planner
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RouteParams {
    pub q: Option<String>,
    pub filter: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct RoutesResponse {
    pub origin: GeoPoint,
    pub filter: CapabilityFilter,
    pub degraded: bool,
    pub routes: Vec<RouteOption>,
}

pub async fn list_routes(
    State(state): State<AppState>,
    Query(params): Query<RouteParams>,
) -> ApiResult<RoutesResponse> {
    let filter = parse_filter(params.filter.as_deref())?;
    let origin = parse_origin(params.lat, params.lon)?
        .ok_or_else(|| bad_request("lat and lon are required to plan routes"))?;
    let query = params.q.unwrap_or_default();

    let (resources, relief_degraded) = degrade(
        "Relief search",
        state.search.search_relief(&query, filter).await,
    );
    let (alerts, alerts_degraded) = degrade("Alert search", state.search.search_alerts("", None).await);

    let ranked = rank(&resources.records, Some(origin), filter);
    let routes = plan_routes(origin, &ranked, &alerts.records);

    Ok(Json(RoutesResponse {
        origin,
        filter,
        degraded: relief_degraded || alerts_degraded,
        routes,
    }))
}

// ============================================================================
// Weather
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct WeatherParams {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Serialize)]
pub struct WeatherResponse {
    pub location: GeoPoint,
    pub reading: Option<WeatherReading>,
}

pub async fn current_weather(
    State(state): State<AppState>,
    Query(params): Query<WeatherParams>,
) -> ApiResult<WeatherResponse> {
    let location = GeoPoint::new(params.lat, params.lon).map_err(|e| bad_request(e.to_string()))?;
    let reading = state.weather.current_or_none(location).await;
    Ok(Json(WeatherResponse { location, reading }))
}

// ============================================================================
// Assistant
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> ApiResult<ChatResponse> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err(bad_request("No message provided."));
    }

    let response = reply_text(state.chat.ask(message).await);
    Ok(Json(ChatResponse { response }))
}

// ============================================================================
// Client metadata
// ============================================================================

#[derive(Debug, Serialize)]
pub struct NavItem {
    pub id: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MetaResponse {
    pub nav: Vec<NavItem>,
    pub filters: Vec<NavItem>,
    pub greeting: &'static str,
    pub quick_questions: Vec<&'static str>,
    pub emergency_phone: &'static str,
}

/// Navigation entries, finder filters and chat prompts for the client shell
pub async fn meta() -> Json<MetaResponse> {
    Json(MetaResponse {
        nav: View::NAV_ITEMS
            .iter()
            .map(|v| NavItem {
                id: v.id(),
                label: v.label(),
            })
            .collect(),
        filters: CapabilityFilter::ALL
            .iter()
            .map(|f| NavItem {
                id: f.id(),
                label: f.label(),
            })
            .collect(),
        greeting: GREETING,
        quick_questions: QUICK_QUESTIONS.to_vec(),
        emergency_phone: DISASTER_TEAM_PHONE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewayConfig;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    /// Router with no upstream configured, so nothing leaves the process
    fn offline_app() -> Router {
        let config = GatewayConfig::from_lookup(|_| None);
        let state = AppState::from_config(&config).unwrap();
        crate::app(state)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }

    async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(offline_app(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "relief-gateway");
    }

    #[tokio::test]
    async fn test_relief_degrades_to_empty_results() {
        let (status, body) = get_json(offline_app(), "/api/v1/relief?q=water&filter=water&lat=30.2&lon=71.5").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["degraded"], true);
        assert_eq!(body["count"], 0);
        assert_eq!(body["filter"], "water");
        assert_eq!(body["results"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_relief_rejects_unknown_filter() {
        let (status, body) = get_json(offline_app(), "/api/v1/relief?filter=beds").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("beds"));
    }

    #[tokio::test]
    async fn test_half_a_location_is_rejected() {
        let (status, _) = get_json(offline_app(), "/api/v1/relief?lat=30.2").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get_json(offline_app(), "/api/v1/alerts?lat=95&lon=10").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_alerts_map_centers_on_default_without_user() {
        let (status, body) = get_json(offline_app(), "/api/v1/alerts").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["degraded"], true);
        assert_eq!(body["map"]["zoom"], 4);
        assert_eq!(body["map"]["center"]["latitude"], 30.1575);
        assert_eq!(body["map"]["markers"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_alerts_map_marks_user() {
        let (_, body) = get_json(offline_app(), "/api/v1/alerts?lat=24.86&lon=67.01").await;
        assert_eq!(body["map"]["zoom"], 6);
        assert_eq!(body["map"]["markers"][0]["kind"], "user");
    }

    #[tokio::test]
    async fn test_safety_current_location_with_placeholders() {
        let (status, body) = get_json(offline_app(), "/api/v1/safety?lat=30.1575&lon=71.5249").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["target"], "current");
        assert_eq!(body["degraded"], true);

        let snapshot = &body["snapshot"];
        assert_eq!(snapshot["safety_score"], 75);
        assert_eq!(snapshot["status"], "Moderate");
        assert_eq!(snapshot["address"], "30.1575, 71.5249");
        assert_eq!(snapshot["conditions"][0]["status"], "Unknown");
    }

    #[tokio::test]
    async fn test_safety_without_location_has_no_snapshot() {
        let (status, body) = get_json(offline_app(), "/api/v1/safety?target=shelter").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["target"], "shelter");
        assert!(body["snapshot"].is_null());
    }

    #[tokio::test]
    async fn test_safety_shelter_degrades_when_search_is_down() {
        let (status, body) = get_json(offline_app(), "/api/v1/safety?lat=1&lon=1&target=shelter").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["degraded"], true);
        assert!(body["snapshot"].is_null());
    }

    #[tokio::test]
    async fn test_routes_require_origin() {
        let (status, _) = get_json(offline_app(), "/api/v1/routes?filter=shelter").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = get_json(offline_app(), "/api/v1/routes?lat=1&lon=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["routes"], serde_json::json!([]));
        assert_eq!(body["degraded"], true);
    }

    #[tokio::test]
    async fn test_weather_without_key_is_empty_reading() {
        let (status, body) = get_json(offline_app(), "/api/v1/weather?lat=51.5&lon=-0.12").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["reading"].is_null());
    }

    #[tokio::test]
    async fn test_chat_rejects_blank_message() {
        let (status, body) = post_json(offline_app(), "/api/v1/chat", serde_json::json!({"message": "   "})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No message provided.");
    }

    #[tokio::test]
    async fn test_meta_lists_navigation() {
        let (status, body) = get_json(offline_app(), "/api/v1/meta").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["nav"].as_array().unwrap().len(), 5);
        assert_eq!(body["filters"][0]["id"], "all");
        assert_eq!(body["emergency_phone"], "334-9241133");
    }

    #[test]
    fn test_alert_card_labels() {
        let card = AlertCard::from(DisasterAlert::new("Flood"));
        assert_eq!(card.area, "Unknown area");
        assert_eq!(card.affected, "Unknown");

        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["title"], "Flood");
        assert_eq!(json["severity"], "medium");
    }
}
