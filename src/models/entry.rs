use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Session-local identifier for a generation attempt. Monotonically
/// increasing, so a response can be checked against the latest
/// outstanding submission and stale responses dropped.
pub type GenerationId = u64;

/// A submission that has been sent to the backend but not answered yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingGeneration {
    pub id: GenerationId,
    pub prompt: String,
    pub created_at: DateTime<Utc>,
}

/// A finished generation. Immutable once created; lives for the page
/// session only, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedGeneration {
    pub id: GenerationId,
    pub prompt: String,
    /// Base64-encoded PNG bytes as returned by the backend.
    pub image_data: String,
    pub timestamp: DateTime<Utc>,
}

impl CompletedGeneration {
    /// Renderable source for the image, the way a browser would embed it.
    pub fn data_uri(&self) -> String {
        format!("data:image/png;base64,{}", self.image_data)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GalleryEntry {
    Pending(PendingGeneration),
    Complete(CompletedGeneration),
}

impl GalleryEntry {
    pub fn id(&self) -> GenerationId {
        match self {
            GalleryEntry::Pending(p) => p.id,
            GalleryEntry::Complete(c) => c.id,
        }
    }

    pub fn prompt(&self) -> &str {
        match self {
            GalleryEntry::Pending(p) => &p.prompt,
            GalleryEntry::Complete(c) => &c.prompt,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, GalleryEntry::Pending(_))
    }

    pub fn as_complete(&self) -> Option<&CompletedGeneration> {
        match self {
            GalleryEntry::Complete(c) => Some(c),
            GalleryEntry::Pending(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri_prefixes_base64() {
        let entry = CompletedGeneration {
            id: 1,
            prompt: "a red fox".to_string(),
            image_data: "aGVsbG8=".to_string(),
            timestamp: Utc::now(),
        };
        assert_eq!(entry.data_uri(), "data:image/png;base64,aGVsbG8=");
    }
}
