//! # Mood Assistant Module
//!
//! Thin client for an OpenAI-compatible chat completions endpoint. Every
//! prompt asks for a JSON object (`response_format: json_object`) and the
//! reply's message content is parsed straight into a typed struct.

pub mod insights;
pub mod mood;

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, error};

use crate::{
    config::Config,
    error::{Error, Res},
};

pub use insights::CityInsight;
pub use mood::{ChatTrack, ModelMoodReply, MoodAnalysis, MoodRequest, select_genres};

const TEMPERATURE: f64 = 0.7;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct LlmClient {
    http: Client,
    api_key: Option<String>,
    api_url: String,
    model: String,
}

impl LlmClient {
    pub fn new(http: Client, config: &Config) -> Self {
        LlmClient {
            http,
            api_key: config.openai_api_key.clone(),
            api_url: config.openai_api_url.trim_end_matches('/').to_string(),
            model: config.openai_model.clone(),
        }
    }

    /// Sends a single user message and parses the reply as `T`.
    pub async fn complete_json<T: DeserializeOwned>(&self, prompt: &str) -> Res<T> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Config("OPENAI_API_KEY is not set".to_string()))?;

        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": TEMPERATURE,
            "response_format": { "type": "json_object" },
        });

        let response = self
            .http
            .post(format!("{}/chat/completions", self.api_url))
            .bearer_auth(key)
            .json(&body)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), "completion request failed");
            return Err(Error::upstream("OpenAI", status.as_u16(), text));
        }

        let reply: Value = response.json().await?;
        let content = reply["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| Error::Assistant("invalid response from model".to_string()))?;
        debug!(content, "model reply");

        serde_json::from_str(content)
            .map_err(|e| Error::Assistant(format!("failed to parse model reply: {e}")))
    }
}
