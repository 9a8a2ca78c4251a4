use serde::{Deserialize, Serialize};

/// Wire request for `POST {base_url}/generate-image`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateImageRequest {
    pub prompt: String,
}

/// Wire response: base64-encoded image bytes, no data-URI prefix.
#[derive(Debug, Deserialize)]
pub struct GenerateImageResponse {
    pub image: String,
}
