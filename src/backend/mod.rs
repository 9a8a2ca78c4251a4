pub mod http;

use crate::error::Result;
use async_trait::async_trait;

pub use http::HttpImageBackend;

/// The external image-generation collaborator. One operation: turn a
/// prompt into base64-encoded PNG bytes. Everything behind it
/// (authentication, storage, the synthesis itself) is out of scope.
#[async_trait]
pub trait ImageBackend: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}
