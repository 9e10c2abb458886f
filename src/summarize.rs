use std::future::Future;

use log::debug;

use crate::{SummarizeError, Transcript};

pub const DEFAULT_PROMPT: &str = "Welcome, Video Summarizer! Your task is to distill the essence of a given \
YouTube video transcript into a concise summary. Your summary should capture the key points and essential \
information, presented in bullet points, within a 250-word limit. Let's dive into the provided transcript \
and extract the vital details for our audience.";

const GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent";
const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";
const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Turns a transcript into summary text
pub trait Summarize {
    fn summarize(&self, transcript: &Transcript) -> impl Future<Output = Result<String, SummarizeError>> + Send;
}

/// Hosted LLM API, picked from the model name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Gemini,
    Anthropic,
    OpenAi,
}

impl Provider {
    pub fn for_model(model: &str) -> Self {
        if model.starts_with("gemini") {
            Provider::Gemini
        } else if model.starts_with("claude") {
            Provider::Anthropic
        } else {
            Provider::OpenAi
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::Gemini => "Gemini",
            Provider::Anthropic => "Anthropic",
            Provider::OpenAi => "OpenAI",
        }
    }

    /// Environment variable holding this provider's API key
    pub fn api_key_var(&self) -> &'static str {
        match self {
            Provider::Gemini => "GOOGLE_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
            Provider::OpenAi => "OPENAI_API_KEY",
        }
    }
}

/// Prompt and transcript go out as one text, with nothing between them.
pub fn build_input(prompt: &str, transcript: &Transcript) -> String {
    format!("{prompt}{}", transcript.text)
}

#[derive(Debug, Clone)]
pub struct LlmSummarizer {
    client: reqwest::Client,
    provider: Provider,
    model: String,
    api_key: String,
    prompt: String,
}

impl LlmSummarizer {
    pub fn new(client: reqwest::Client, model: &str, api_key: &str, prompt: &str) -> Self {
        Self {
            client,
            provider: Provider::for_model(model),
            model: model.to_string(),
            api_key: api_key.to_string(),
            prompt: prompt.to_string(),
        }
    }

    async fn summarize_gemini(&self, input: &str) -> Result<String, SummarizeError> {
        let body = serde_json::json!({
            "contents": [
                {
                    "parts": [{"text": input}]
                }
            ]
        });

        let resp = self
            .client
            .post(GEMINI_URL.replace("{model}", &self.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let json = self.read_json(resp).await?;
        extract_gemini_text(&json)
    }

    async fn summarize_anthropic(&self, input: &str) -> Result<String, SummarizeError> {
        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": 4096,
            "messages": [
                {
                    "role": "user",
                    "content": input
                }
            ]
        });

        let resp = self
            .client
            .post(ANTHROPIC_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .send()
            .await?;

        let json = self.read_json(resp).await?;
        extract_anthropic_text(&json)
    }

    async fn summarize_openai(&self, input: &str) -> Result<String, SummarizeError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {
                    "role": "user",
                    "content": input
                }
            ]
        });

        let resp = self
            .client
            .post(OPENAI_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let json = self.read_json(resp).await?;
        extract_openai_text(&json)
    }

    async fn read_json(&self, resp: reqwest::Response) -> Result<serde_json::Value, SummarizeError> {
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(SummarizeError::Api {
                provider: self.provider.name(),
                status,
                body,
            });
        }
        Ok(resp.json().await?)
    }
}

impl Summarize for LlmSummarizer {
    async fn summarize(&self, transcript: &Transcript) -> Result<String, SummarizeError> {
        let input = build_input(&self.prompt, transcript);
        debug!(
            "Summarizing {} via {} with model {} ({} chars)",
            transcript.video_id,
            self.provider.name(),
            self.model,
            input.len()
        );

        match self.provider {
            Provider::Gemini => self.summarize_gemini(&input).await,
            Provider::Anthropic => self.summarize_anthropic(&input).await,
            Provider::OpenAi => self.summarize_openai(&input).await,
        }
    }
}

fn extract_gemini_text(json: &serde_json::Value) -> Result<String, SummarizeError> {
    if let Some(parts) = json
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
    {
        let text: String = parts
            .iter()
            .filter_map(|part| part.get("text")?.as_str())
            .collect::<Vec<_>>()
            .join("");
        if !text.is_empty() {
            return Ok(text);
        }
    }

    if let Some(reason) = json
        .get("promptFeedback")
        .and_then(|f| f.get("blockReason"))
        .and_then(|r| r.as_str())
    {
        return Err(SummarizeError::Other(format!("Gemini blocked the prompt: {reason}")));
    }

    Err(SummarizeError::UnexpectedResponse("Gemini"))
}

fn extract_anthropic_text(json: &serde_json::Value) -> Result<String, SummarizeError> {
    if let Some(content) = json.get("content").and_then(|c| c.as_array()) {
        let text: String = content
            .iter()
            .filter_map(|block| {
                if block.get("type")?.as_str()? == "text" {
                    block.get("text")?.as_str()
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");
        if !text.is_empty() {
            return Ok(text);
        }
    }
    Err(SummarizeError::UnexpectedResponse("Anthropic"))
}

fn extract_openai_text(json: &serde_json::Value) -> Result<String, SummarizeError> {
    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|t| t.as_str())
        .map(|t| t.to_string())
        .ok_or(SummarizeError::UnexpectedResponse("OpenAI"))
}
