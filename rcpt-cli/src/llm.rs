use std::future::Future;
use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::OllamaSection;
use crate::llm_stream::{collect_generate_stream, StreamEvent};

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("could not reach Ollama at {base_url}: {source}. Make sure Ollama is running (`ollama serve`)")]
    Unavailable {
        base_url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("model '{0}' not found. Pull it first: ollama pull {0}")]
    ModelNotFound(String),
    #[error("ollama returned {status}: {body}")]
    Http { status: StatusCode, body: String },
    #[error("ollama error: {0}")]
    Server(String),
    #[error("reading response stream: {0}")]
    Stream(#[source] reqwest::Error),
    #[error("model returned an empty completion")]
    EmptyCompletion,
}

/// Anything that turns a prompt into completion text.
pub trait CompletionSource: Send + Sync {
    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String, LlmError>> + Send;
}

#[derive(Serialize)]
struct GenerateReq<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct TagsResp {
    #[serde(default)]
    models: Vec<TagModel>,
}

#[derive(Debug, Deserialize)]
struct TagModel {
    name: String,
}

/// Client for a local Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f32,
    timeout: Duration,
}

const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

impl OllamaClient {
    pub fn new(cfg: &OllamaSection) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            model: cfg.model.clone(),
            temperature: cfg.temperature,
            timeout: Duration::from_secs(cfg.timeout_secs),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// True when `GET /api/tags` answers 200 within the health-check timeout.
    pub async fn is_running(&self) -> bool {
        match self
            .http
            .get(format!("{}/api/tags", self.base_url))
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
        {
            Ok(resp) => resp.status() == StatusCode::OK,
            Err(e) => {
                tracing::debug!(error = %e, base_url = %self.base_url, "ollama health check failed");
                false
            }
        }
    }

    /// True when the configured model shows up in the server's tag list.
    pub async fn has_model(&self) -> bool {
        let resp = match self
            .http
            .get(format!("{}/api/tags", self.base_url))
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
        {
            Ok(r) if r.status().is_success() => r,
            _ => return false,
        };
        match resp.json::<TagsResp>().await {
            Ok(tags) => {
                let names: Vec<&str> = tags.models.iter().map(|m| m.name.as_str()).collect();
                model_listed(&self.model, &names)
            }
            Err(e) => {
                tracing::debug!(error = %e, "could not decode /api/tags");
                false
            }
        }
    }

    /// Stream a completion for `prompt` from `/api/generate`.
    pub async fn generate(
        &self,
        prompt: &str,
        on_event: impl FnMut(StreamEvent) + Send,
    ) -> Result<String, LlmError> {
        let body = GenerateReq {
            model: &self.model,
            prompt,
            stream: true,
            options: GenerateOptions {
                temperature: self.temperature,
            },
        };

        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "sending generate request");
        let resp = self
            .http
            .post(format!("{}/api/generate", self.base_url))
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|source| LlmError::Unavailable {
                base_url: self.base_url.clone(),
                source,
            })?;

        let status = resp.status();
        tracing::debug!(%status, "ollama responded");
        if status == StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotFound(self.model.clone()));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Http { status, body });
        }

        let text = collect_generate_stream(resp, on_event).await?;
        if text.trim().is_empty() {
            return Err(LlmError::EmptyCompletion);
        }
        Ok(text)
    }
}

impl CompletionSource for OllamaClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.generate(prompt, |ev| match ev {
            StreamEvent::Delta(d) => tracing::trace!(delta = %d, "completion chunk"),
            other => tracing::trace!(event = ?other, "completion stream"),
        })
        .await
    }
}

/// Match a requested model against server tags by base name:
/// `llama3.2` and `llama3.2:latest` both match a listed `llama3.2:latest`.
pub fn model_listed(requested: &str, listed: &[&str]) -> bool {
    let base = requested.split(':').next().unwrap_or(requested);
    listed.iter().any(|name| name.starts_with(base))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_listed() {
        let listed = ["llama3.2:latest", "mistral:7b"];
        assert!(model_listed("llama3.2", &listed));
        assert!(model_listed("llama3.2:latest", &listed));
        assert!(model_listed("mistral", &listed));
        assert!(!model_listed("phi3", &listed));
        assert!(!model_listed("phi3", &[]));
    }

    #[test]
    fn test_trims_base_url() {
        let cfg = OllamaSection {
            base_url: "http://127.0.0.1:11434/".to_string(),
            ..OllamaSection::default()
        };
        let client = OllamaClient::new(&cfg);
        assert_eq!(client.base_url(), "http://127.0.0.1:11434");
        assert_eq!(client.model(), "llama3.2");
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateReq {
            model: "llama3.2",
            prompt: "hi",
            stream: true,
            options: GenerateOptions { temperature: 0.5 },
        };
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["model"], "llama3.2");
        assert_eq!(v["stream"], true);
        assert_eq!(v["options"]["temperature"], 0.5);
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let cfg = OllamaSection {
            // Port 9 (discard) is closed on test machines
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..OllamaSection::default()
        };
        let client = OllamaClient::new(&cfg);
        assert!(!client.is_running().await);
        assert!(!client.has_model().await);
        let err = client.complete("prompt").await.unwrap_err();
        assert!(matches!(err, LlmError::Unavailable { .. }));
    }
}
