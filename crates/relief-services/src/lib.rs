//! Relief Services
//!
//! Async clients for the hosted collaborators of the relief map:
//!
//! | Client          | Service |
//! |-----------------|---------|
//! | `SearchClient`  | Search-as-a-service index (relief resources, disaster alerts) |
//! | `WeatherClient` | Current conditions by coordinates, cached |
//! | `ChatClient`    | Backend assistant, `{message}` in / `{response}` out |
//!
//! None of them retry. Callers decide how a failure degrades the view.

use thiserror::Error;

pub mod chat;
pub mod search;
pub mod weather;

pub use chat::{ChatClient, ChatConfig};
pub use search::{GeoBounds, SearchClient, SearchConfig, SearchQuery};
pub use weather::{WeatherClient, WeatherConfig};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{service} returned status {status}")]
    Status { service: &'static str, status: u16 },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
}

pub type Result<T> = std::result::Result<T, ServiceError>;

fn http_client(timeout_sec: u64) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_sec))
        .build()?)
}
