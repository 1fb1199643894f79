//! Generated titles and summaries for captured text.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::CompletionConfig;
use crate::utils::sanitize_completion;

const RULES: &str = "response should not contain newlines, quotes, trailing spaces etc";

pub fn title_prompt(content: &str) -> String {
    format!("Create a short, concise title for the following content, {}: {}", RULES, content)
}

pub fn summary_prompt(content: &str) -> String {
    format!("Summarize the following content, {}: {}", RULES, content)
}

pub trait Completer: Send + Sync {
    fn ask(&self, prompt: &str) -> Result<String>;
}

/// Title and description filled in for `content`, both sanitized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AutoFill {
    pub title: String,
    pub description: String,
}

/// Asks for a summary, then a title. Two calls per particle.
pub fn auto_fill(completer: &dyn Completer, content: &str) -> Result<AutoFill> {
    let description = completer
        .ask(&summary_prompt(content))
        .context("generate description")?;
    let title = completer.ask(&title_prompt(content)).context("generate title")?;
    Ok(AutoFill {
        title: sanitize_completion(&title),
        description: sanitize_completion(&description),
    })
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI-compatible `/chat/completions` endpoint.
pub struct HttpCompleter {
    config: CompletionConfig,
    api_key: Option<String>,
    client: reqwest::blocking::Client,
}

impl HttpCompleter {
    pub fn new(config: CompletionConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            tracing::debug!(var = %config.api_key_env, "completion key not set; sending without auth");
        }
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("particle/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build reqwest client")?;
        Ok(Self {
            config,
            api_key,
            client,
        })
    }
}

impl Completer for HttpCompleter {
    fn ask(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let mut req = self.client.post(&url).json(&ChatRequest {
            model: &self.config.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        });
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        let resp = req.send().context("completion request")?;
        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("completion failed with {}", status);
        }
        let body: ChatResponse = resp.json().context("parse completion response")?;
        let text = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .context("completion returned no choices")?;
        tracing::debug!(chars = text.len(), "completion received");
        Ok(text)
    }
}

#[cfg(test)]
#[path = "tests/completion_tests.rs"]
mod tests;
