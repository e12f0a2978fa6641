//! Hosted vectorization client.
//!
//! Thin HTTP wrapper over a `generateContent`-style vision endpoint. The
//! request carries the rasterized board as inline base64 PNG plus an
//! instruction prompt; the first candidate's text comes back verbatim for
//! the engine's parser, fences and all. Pure parsing in `extract_text` for
//! testability.

use base64::{Engine, engine::general_purpose::STANDARD};
use log::debug;
use serde::{Deserialize, Serialize};
use slateboard_core::storage::BoxFuture;
use slateboard_core::{EngineError, EngineResult, VectorizeClient};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const REQUEST_TIMEOUT_SECS: u64 = 60;
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Instruction prompt sent alongside the board raster.
const VECTORIZE_PROMPT: &str = "You are a diagram vectorizer. Analyze the attached whiteboard image \
and return every shape you can identify as JSON with this exact structure: \
{\"elements\":[...]}. Each element has a \"type\" field, one of RECT, CIRCLE, ELLIPSE, TRIANGLE, \
DIAMOND, LINE, ARROW, TEXT, POLYGON. Box-like types carry x, y, w, h. LINE and ARROW carry \
x1, y1, x2, y2. TEXT carries x, y and a text field. POLYGON carries a points array of {x, y}. \
Every element may carry a hex color. Use the image's own coordinates. \
Return only the JSON, no commentary.";

/// Client for the hosted vectorization model.
pub struct HttpVectorizeClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl HttpVectorizeClient {
    pub fn new(api_key: String, model: String, base_url: String) -> EngineResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| EngineError::Network(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            base_url,
            model,
            api_key,
        })
    }

    /// Build a client from environment variables.
    ///
    /// `SLATEBOARD_VECTORIZE_API_KEY` is required; `SLATEBOARD_VECTORIZE_MODEL`
    /// and `SLATEBOARD_VECTORIZE_BASE_URL` override the defaults.
    pub fn from_env() -> EngineResult<Self> {
        let api_key = std::env::var("SLATEBOARD_VECTORIZE_API_KEY")
            .map_err(|_| EngineError::Network("SLATEBOARD_VECTORIZE_API_KEY is not set".to_string()))?;
        let model = std::env::var("SLATEBOARD_VECTORIZE_MODEL")
            .unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let base_url = std::env::var("SLATEBOARD_VECTORIZE_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(api_key, model, base_url)
    }

    async fn request(&self, png: &[u8]) -> EngineResult<String> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part {
                        inline_data: Some(InlineData {
                            mime_type: "image/png",
                            data: STANDARD.encode(png),
                        }),
                        text: None,
                    },
                    Part {
                        inline_data: None,
                        text: Some(VECTORIZE_PROMPT),
                    },
                ],
            }],
        };

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        debug!("vectorize: submitting {} byte raster to {}", png.len(), self.model);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| EngineError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| EngineError::Network(e.to_string()))?;

        if status != 200 {
            return Err(EngineError::Network(format!(
                "vectorization endpoint returned {}: {}",
                status,
                truncate(&text, 200)
            )));
        }

        extract_text(&text)
    }
}

impl VectorizeClient for HttpVectorizeClient {
    fn vectorize(&self, png: &[u8]) -> BoxFuture<'_, EngineResult<String>> {
        let png = png.to_vec();
        Box::pin(async move { self.request(&png).await })
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

#[derive(Serialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: &'static str,
    data: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<TextPart>,
}

#[derive(Deserialize)]
struct TextPart {
    #[serde(default)]
    text: Option<String>,
}

/// Pull the first candidate's text out of a `generateContent` reply.
fn extract_text(json: &str) -> EngineResult<String> {
    let api: GenerateResponse = serde_json::from_str(json)
        .map_err(|e| EngineError::Parse(format!("malformed vectorization reply: {}", e)))?;

    let text: String = api
        .candidates
        .into_iter()
        .next()
        .map(|c| {
            c.content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(EngineError::Parse(
            "vectorization reply contained no text".to_string(),
        ));
    }
    Ok(text)
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
