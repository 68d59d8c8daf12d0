//! Gateway configuration from environment variables
//!
//! | Variable | Default |
//! |----------|---------|
//! | `RELIEF_GATEWAY_PORT` / `PORT` | 18700 |
//! | `ALGOLIA_APP_ID`, `ALGOLIA_SEARCH_KEY` | unset (search disabled) |
//! | `RELIEF_INDEX_NAME` | `Relief_Shelter` |
//! | `DISASTER_INDEX_NAME` | `disaster_alerts` |
//! | `OPENWEATHERMAP_KEY` | unset (weather shows placeholders) |
//! | `WEATHER_CACHE_TTL_SEC` | 300 |
//! | `CHAT_ENDPOINT` | `http://127.0.0.1:8000/api/chat/` |
//!
//! Each variable is also read with a `VITE_` prefix so the frontend's
//! `.env` can be reused as is.

use relief_services::{ChatConfig, SearchConfig, WeatherConfig};
use tracing::warn;

pub const DEFAULT_PORT: u16 = 18700;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub port: u16,
    pub search: SearchConfig,
    pub weather: WeatherConfig,
    pub chat: ChatConfig,
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .or_else(|| lookup(&format!("VITE_{}", key)))
                .filter(|v| !v.trim().is_empty())
        };

        let port = match get("RELIEF_GATEWAY_PORT").or_else(|| get("PORT")) {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("Invalid port {:?}, using {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let search = SearchConfig {
            app_id: get("ALGOLIA_APP_ID").unwrap_or_default(),
            api_key: get("ALGOLIA_SEARCH_KEY").unwrap_or_default(),
            relief_index: get("RELIEF_INDEX_NAME").unwrap_or_else(|| "Relief_Shelter".to_string()),
            disaster_index: get("DISASTER_INDEX_NAME").unwrap_or_else(|| "disaster_alerts".to_string()),
            host: get("SEARCH_HOST"),
            timeout_sec: 10,
        };

        let mut weather = WeatherConfig::default();
        weather.api_key = get("OPENWEATHERMAP_KEY");
        if let Some(raw) = get("WEATHER_CACHE_TTL_SEC") {
            match raw.parse() {
                Ok(ttl) => weather.cache_ttl_sec = ttl,
                Err(_) => warn!("Invalid WEATHER_CACHE_TTL_SEC {:?}, keeping {}", raw, weather.cache_ttl_sec),
            }
        }

        let mut chat = ChatConfig::default();
        if let Some(endpoint) = get("CHAT_ENDPOINT") {
            chat.endpoint = endpoint;
        }

        Self {
            port,
            search,
            weather,
            chat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> GatewayConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        GatewayConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let c = config(&[]);
        assert_eq!(c.port, DEFAULT_PORT);
        assert!(!c.search.is_configured());
        assert_eq!(c.search.relief_index, "Relief_Shelter");
        assert!(c.weather.api_key.is_none());
        assert_eq!(c.chat.endpoint, relief_services::chat::DEFAULT_CHAT_ENDPOINT);
    }

    #[test]
    fn test_vite_prefix_and_overrides() {
        let c = config(&[
            ("PORT", "9000"),
            ("VITE_ALGOLIA_APP_ID", "APP"),
            ("ALGOLIA_SEARCH_KEY", "key"),
            ("VITE_RELIEF_INDEX_NAME", "relief_dev"),
            ("OPENWEATHERMAP_KEY", "owm"),
            ("WEATHER_CACHE_TTL_SEC", "60"),
        ]);
        assert_eq!(c.port, 9000);
        assert!(c.search.is_configured());
        assert_eq!(c.search.relief_index, "relief_dev");
        assert_eq!(c.weather.api_key.as_deref(), Some("owm"));
        assert_eq!(c.weather.cache_ttl_sec, 60);
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let c = config(&[("RELIEF_GATEWAY_PORT", "eighty")]);
        assert_eq!(c.port, DEFAULT_PORT);
    }
}
