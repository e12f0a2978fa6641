//! Unsigned image-host uploads.
//!
//! Multipart POST of a PNG to a Cloudinary-style unsigned upload endpoint.
//! The host replies with JSON carrying a `secure_url`, which becomes the
//! board's preview URL in the catalog.

use log::debug;
use serde::Deserialize;
use slateboard_core::storage::BoxFuture;
use slateboard_core::{EngineError, EngineResult, ImageHost};
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 60;
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Client for an unsigned image-hosting endpoint.
pub struct HttpImageHost {
    http: reqwest::Client,
    endpoint: String,
    preset: String,
    namespace: String,
}

impl HttpImageHost {
    pub fn new(endpoint: String, preset: String, namespace: String) -> EngineResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| EngineError::Network(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            endpoint,
            preset,
            namespace,
        })
    }

    /// Build a client from environment variables.
    ///
    /// `SLATEBOARD_UPLOAD_URL` is required; `SLATEBOARD_UPLOAD_PRESET` and
    /// `SLATEBOARD_UPLOAD_NAMESPACE` default to empty.
    pub fn from_env() -> EngineResult<Self> {
        let endpoint = std::env::var("SLATEBOARD_UPLOAD_URL")
            .map_err(|_| EngineError::Network("SLATEBOARD_UPLOAD_URL is not set".to_string()))?;
        let preset = std::env::var("SLATEBOARD_UPLOAD_PRESET").unwrap_or_default();
        let namespace = std::env::var("SLATEBOARD_UPLOAD_NAMESPACE").unwrap_or_default();
        Self::new(endpoint, preset, namespace)
    }

    async fn request(&self, png: &[u8], name: &str) -> EngineResult<String> {
        let part = reqwest::multipart::Part::bytes(png.to_vec())
            .file_name(format!("{}.png", name))
            .mime_str("image/png")
            .map_err(|e| EngineError::Network(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("upload_preset", self.preset.clone())
            .text("cloud_name", self.namespace.clone());

        debug!("upload: posting {} byte preview to {}", png.len(), self.endpoint);

        let response = self
            .http
            .post(&self.endpoint)
            .multipart(form)
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
                "upload endpoint returned {}",
                status
            )));
        }

        extract_url(&text)
    }
}

impl ImageHost for HttpImageHost {
    fn upload(&self, png: &[u8], name: &str) -> BoxFuture<'_, EngineResult<String>> {
        let png = png.to_vec();
        let name = name.to_string();
        Box::pin(async move { self.request(&png, &name).await })
    }
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
}

/// Pull the hosted URL out of an upload reply.
fn extract_url(json: &str) -> EngineResult<String> {
    let api: UploadResponse = serde_json::from_str(json)
        .map_err(|e| EngineError::Parse(format!("malformed upload reply: {}", e)))?;
    api.secure_url
        .filter(|url| !url.is_empty())
        .ok_or_else(|| EngineError::Parse("upload reply carried no secure_url".to_string()))
}
