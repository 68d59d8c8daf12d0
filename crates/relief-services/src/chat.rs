//! Chat assistant client

use crate::{http_client, Result, ServiceError};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const DEFAULT_CHAT_ENDPOINT: &str = "http://127.0.0.1:8000/api/chat/";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    pub endpoint: String,
    pub timeout_sec: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_CHAT_ENDPOINT.to_string(),
            timeout_sec: 60,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    response: Option<String>,
}

pub struct ChatClient {
    config: ChatConfig,
    client: reqwest::Client,
}

impl ChatClient {
    pub fn new(config: ChatConfig) -> Result<Self> {
        let client = http_client(config.timeout_sec)?;
        Ok(Self { config, client })
    }

    /// Send one message. `Ok(None)` means the service answered without a
    /// response text, including a JSON error body.
    pub async fn ask(&self, message: &str) -> Result<Option<String>> {
        debug!("Sending chat message ({} chars)", message.len());

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&ChatRequest { message })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // The backend reports rejections as JSON without a `response` field
            return match response.json::<ChatResponse>().await {
                Ok(data) => {
                    warn!("Chat service returned status {}", status.as_u16());
                    Ok(data.response)
                }
                Err(_) => Err(ServiceError::Status {
                    service: "chat service",
                    status: status.as_u16(),
                }),
            };
        }

        let data: ChatResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))?;

        Ok(data.response)
    }
}
