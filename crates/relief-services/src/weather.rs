//! Current weather by coordinates (OpenWeatherMap, metric units)
//!
//! Readings are cached per location rounded to two decimals. A failed or
//! unconfigured lookup is never fatal: `current_or_none` logs it and the
//! safety view falls back to placeholders.
//!
//! ```rust,ignore
//! let client = WeatherClient::new(WeatherConfig::from_key("..."))?;
//! let reading = client.current_or_none(point).await;
//! ```

use crate::{http_client, Result, ServiceError};
use relief_core::safety::WeatherReading;
use relief_core::GeoPoint;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, warn};

pub const OPENWEATHERMAP_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    /// Cache TTL in seconds (default: 300 = 5 minutes)
    pub cache_ttl_sec: u64,
    /// Request timeout in seconds
    pub timeout_sec: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: OPENWEATHERMAP_URL.to_string(),
            cache_ttl_sec: 300,
            timeout_sec: 10,
        }
    }
}

impl WeatherConfig {
    pub fn from_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwmResponse {
    name: Option<String>,
    sys: Option<OwmSys>,
    #[serde(default)]
    weather: Vec<OwmWeather>,
    main: Option<OwmMain>,
    wind: Option<OwmWind>,
}

#[derive(Debug, Deserialize)]
struct OwmSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwmWeather {
    main: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: Option<f64>,
}

impl OwmResponse {
    fn into_reading(self) -> WeatherReading {
        WeatherReading {
            description: self.weather.into_iter().next().and_then(|w| w.main),
            temperature_c: self.main.and_then(|m| m.temp),
            wind_speed_ms: self.wind.and_then(|w| w.speed),
            place_name: self.name.filter(|n| !n.is_empty()),
            country: self.sys.and_then(|s| s.country),
        }
    }
}

/// Cache entry with expiry
struct CacheEntry {
    reading: WeatherReading,
    expires_at: Instant,
}

pub struct WeatherClient {
    config: WeatherConfig,
    client: reqwest::Client,
    cache: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl WeatherClient {
    pub fn new(config: WeatherConfig) -> Result<Self> {
        let client = http_client(config.timeout_sec)?;
        Ok(Self {
            config,
            client,
            cache: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// Cache key from coordinates (rounded to 2 decimal places)
    fn cache_key(point: GeoPoint) -> String {
        format!("{:.2},{:.2}", point.latitude, point.longitude)
    }

    pub async fn fetch_current(&self, point: GeoPoint) -> Result<WeatherReading> {
        let key = Self::cache_key(point);

        {
            let cache = self.cache.read().await;
            if let Some(entry) = cache.get(&key) {
                if entry.expires_at > Instant::now() {
                    debug!("Weather cache hit for {}", key);
                    return Ok(entry.reading.clone());
                }
            }
        }

        let reading = self.fetch_remote(point).await?;
        self.store(key, reading.clone()).await;
        Ok(reading)
    }

    /// Like `fetch_current`, but a failure degrades to `None`
    pub async fn current_or_none(&self, point: GeoPoint) -> Option<WeatherReading> {
        match self.fetch_current(point).await {
            Ok(reading) => Some(reading),
            Err(e) => {
                warn!("Weather fetch failed for {:?}: {}", point, e);
                None
            }
        }
    }

    async fn fetch_remote(&self, point: GeoPoint) -> Result<WeatherReading> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ServiceError::NotConfigured("weather service"))?;

        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("lat", point.latitude.to_string()),
                ("lon", point.longitude.to_string()),
                ("units", "metric".to_string()),
                ("appid", api_key.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ServiceError::Status {
                service: "weather service",
                status: response.status().as_u16(),
            });
        }

        let data: OwmResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))?;

        Ok(data.into_reading())
    }

    /// Insert a reading, dropping expired entries first
    async fn store(&self, key: String, reading: WeatherReading) {
        let mut cache = self.cache.write().await;
        let now = Instant::now();
        cache.retain(|_, entry| entry.expires_at > now);
        cache.insert(
            key,
            CacheEntry {
                reading,
                expires_at: now + Duration::from_secs(self.config.cache_ttl_sec),
            },
        );
    }

    pub async fn clear_cache(&self) {
        let mut cache = self.cache.write().await;
        cache.clear();
    }

    /// (total entries, unexpired entries)
    pub async fn cache_stats(&self) -> (usize, usize) {
        let cache = self.cache.read().await;
        let now = Instant::now();
        let valid = cache.values().filter(|e| e.expires_at > now).count();
        (cache.len(), valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_response() {
        let body = serde_json::json!({
            "name": "Multan",
            "sys": {"country": "PK"},
            "weather": [{"main": "Rain", "description": "light rain"}],
            "main": {"temp": 31.2, "humidity": 70},
            "wind": {"speed": 5.1}
        });

        let reading = serde_json::from_value::<OwmResponse>(body).unwrap().into_reading();
        assert_eq!(reading.description.as_deref(), Some("Rain"));
        assert_eq!(reading.temperature_c, Some(31.2));
        assert_eq!(reading.wind_speed_ms, Some(5.1));
        assert_eq!(reading.place_name.as_deref(), Some("Multan"));
        assert_eq!(reading.country.as_deref(), Some("PK"));
    }

    #[test]
    fn test_parse_sparse_response() {
        let body = serde_json::json!({"name": "", "weather": []});
        let reading = serde_json::from_value::<OwmResponse>(body).unwrap().into_reading();
        assert_eq!(reading, WeatherReading::default());
    }

    #[test]
    fn test_cache_key_rounding() {
        let a = GeoPoint::new(40.71281, -74.00601).unwrap();
        let b = GeoPoint::new(40.7149, -74.0051).unwrap();
        assert_eq!(WeatherClient::cache_key(a), "40.71,-74.01");
        assert_eq!(WeatherClient::cache_key(a), WeatherClient::cache_key(b));
    }

    #[tokio::test]
    async fn test_unconfigured_degrades_to_none() {
        let client = WeatherClient::new(WeatherConfig::default()).unwrap();
        let point = GeoPoint::new(1.0, 1.0).unwrap();

        assert!(matches!(
            client.fetch_current(point).await,
            Err(ServiceError::NotConfigured(_))
        ));
        assert!(client.current_or_none(point).await.is_none());
        assert_eq!(client.cache_stats().await, (0, 0));
    }

    #[tokio::test]
    async fn test_cache_hit_skips_remote() {
        let client = WeatherClient::new(WeatherConfig::default()).unwrap();
        let point = GeoPoint::new(51.5074, -0.1278).unwrap();
        let reading = WeatherReading {
            description: Some("Clouds".to_string()),
            ..WeatherReading::default()
        };
        client.store(WeatherClient::cache_key(point), reading.clone()).await;

        // No API key, so only the cache can answer
        assert_eq!(client.fetch_current(point).await.unwrap(), reading);
        assert_eq!(client.cache_stats().await, (1, 1));

        client.clear_cache().await;
        assert_eq!(client.cache_stats().await, (0, 0));
    }

    #[tokio::test]
    async fn test_expired_entries_are_dropped_on_store() {
        let client = WeatherClient::new(WeatherConfig {
            cache_ttl_sec: 0,
            ..WeatherConfig::default()
        })
        .unwrap();

        for (lat, lon) in [(10.0, 10.0), (20.0, 20.0), (30.0, 30.0)] {
            let point = GeoPoint::new(lat, lon).unwrap();
            client.store(WeatherClient::cache_key(point), WeatherReading::default()).await;
            assert_eq!(client.cache_stats().await.0, 1);
        }
    }

    #[tokio::test]
    async fn test_live_entries_survive_store() {
        let client = WeatherClient::new(WeatherConfig::default()).unwrap();
        for (lat, lon) in [(10.0, 10.0), (20.0, 20.0)] {
            let point = GeoPoint::new(lat, lon).unwrap();
            client.store(WeatherClient::cache_key(point), WeatherReading::default()).await;
        }
        assert_eq!(client.cache_stats().await, (2, 2));
    }
}
