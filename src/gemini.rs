use crate::draft::TextGenerator;
use crate::error::GenerationError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Blocking client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    api_key: String,
    model: String,
    agent: ureq::Agent,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            agent: http_agent(timeout_secs),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", API_BASE, self.model)
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };
        let body = serde_json::to_string(&request)?;

        debug!(model = %self.model, prompt_chars = prompt.len(), "sending generateContent request");

        let url = self.endpoint();
        let response = self
            .agent
            .post(url.as_str())
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .send(&body)
            .map_err(handle_ureq_error)?;

        let status = response.status().as_u16();
        let text = response
            .into_body()
            .read_to_string()
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(api_error(status, &text));
        }

        parse_response(&text)
    }
}

fn http_agent(timeout_secs: u64) -> ureq::Agent {
    ureq::Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(timeout_secs)))
        .http_status_as_error(false)
        .build()
        .new_agent()
}

fn handle_ureq_error(e: ureq::Error) -> GenerationError {
    match e {
        ureq::Error::StatusCode(status) => api_error(status, ""),
        other => GenerationError::Network(other.to_string()),
    }
}

fn api_error(status: u16, body: &str) -> GenerationError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string());

    match status {
        401 | 403 => GenerationError::InvalidApiKey(message),
        429 => GenerationError::Api {
            status,
            message: if message.is_empty() {
                "Rate limited. Please wait and try again.".to_string()
            } else {
                message
            },
        },
        _ => GenerationError::Api { status, message },
    }
}

/// Concatenates the text parts of the first candidate.
fn parse_response(body: &str) -> Result<String, GenerationError> {
    let response: GenerateResponse = serde_json::from_str(body)?;
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(GenerationError::NoCandidates)?;

    let parts = candidate.content.map(|c| c.parts).unwrap_or_default();
    if parts.is_empty() {
        return Err(GenerationError::MalformedResponse(
            "candidate has no content".to_string(),
        ));
    }

    Ok(parts.into_iter().filter_map(|p| p.text).collect())
}
