use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::{
    backend::ImageBackend,
    config::BackendConfig,
    error::{GalleryError, Result},
    models::{GenerateImageRequest, GenerateImageResponse},
};

/// Reqwest-backed client for `POST {base_url}/generate-image`.
///
/// Failure handling is deliberately uniform: transport errors, non-2xx
/// statuses, and malformed bodies all surface as errors with no subtype
/// the caller is expected to distinguish.
#[derive(Debug)]
pub struct HttpImageBackend {
    client: Client,
    base_url: String,
}

impl HttpImageBackend {
    pub fn new(config: BackendConfig) -> Result<Self> {
        let base_url = config
            .base_url
            .ok_or_else(|| GalleryError::Config("Backend base URL is required".into()))?;
        let base_url = base_url.trim_end_matches('/').to_string();

        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| GalleryError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ImageBackend for HttpImageBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let payload = GenerateImageRequest {
            prompt: prompt.to_string(),
        };

        log::info!("Requesting image generation from {}", self.base_url);

        let response = self
            .client
            .post(format!("{}/generate-image", self.base_url))
            .json(&payload)
            .send()
            .await
            .map_err(|e| GalleryError::Request(format!("Generation request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GalleryError::Request(format!(
                "Backend returned {}",
                status
            )));
        }

        let body: GenerateImageResponse = response
            .json()
            .await
            .map_err(|e| GalleryError::Response(format!("Malformed generation response: {}", e)))?;

        Ok(body.image)
    }
}
