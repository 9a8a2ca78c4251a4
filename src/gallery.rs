use chrono::Utc;

use crate::{
    error::{GalleryError, Result},
    models::{CompletedGeneration, GalleryEntry, GenerationId, PendingGeneration},
};

/// Ordered, session-local list of generation attempts, newest first,
/// plus the single error slot shown next to the submit control.
///
/// Submissions are single-flight: `begin` rejects while one is
/// outstanding, and `complete` ignores responses whose id is not the
/// latest outstanding one, so a stale response can never overwrite a
/// newer submission.
#[derive(Debug)]
pub struct GalleryState {
    entries: Vec<GalleryEntry>,
    error: Option<String>,
    next_id: GenerationId,
    outstanding: Option<GenerationId>,
}

impl Default for GalleryState {
    fn default() -> Self {
        Self::new()
    }
}

impl GalleryState {
    pub fn new() -> Self {
        GalleryState {
            entries: Vec::new(),
            error: None,
            next_id: 1,
            outstanding: None,
        }
    }

    /// Create the pending placeholder for a submission and hand back its
    /// id. Fails with `Busy` while another submission is outstanding.
    pub fn begin(&mut self, prompt: impl Into<String>) -> Result<GenerationId> {
        if self.outstanding.is_some() {
            return Err(GalleryError::Busy);
        }

        let id = self.next_id;
        self.next_id += 1;
        self.outstanding = Some(id);

        self.entries.insert(
            0,
            GalleryEntry::Pending(PendingGeneration {
                id,
                prompt: prompt.into(),
                created_at: Utc::now(),
            }),
        );

        Ok(id)
    }

    /// Splice the pending placeholder in place with the returned image.
    /// Returns false (and leaves the gallery untouched) for stale ids.
    pub fn complete(&mut self, id: GenerationId, image_data: String) -> bool {
        if self.outstanding != Some(id) {
            log::warn!("Dropping stale generation response (id {})", id);
            return false;
        }
        self.outstanding = None;

        let Some(slot) = self.entries.iter_mut().find(|e| e.id() == id) else {
            return false;
        };

        let prompt = slot.prompt().to_string();
        *slot = GalleryEntry::Complete(CompletedGeneration {
            id,
            prompt,
            image_data,
            timestamp: Utc::now(),
        });
        true
    }

    /// Remove the pending placeholder for a failed submission and set
    /// the error slot. The entry is discarded, not kept in a failed
    /// state.
    pub fn abandon(&mut self, id: GenerationId, message: impl Into<String>) {
        if self.outstanding == Some(id) {
            self.outstanding = None;
        }
        self.entries.retain(|e| e.id() != id);
        self.error = Some(message.into());
    }

    /// Empty the gallery and reset the error slot. Nothing is deleted
    /// server-side; the backend is never called.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.error = None;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn entries(&self) -> &[GalleryEntry] {
        &self.entries
    }

    pub fn get(&self, id: GenerationId) -> Option<&GalleryEntry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    pub fn is_generating(&self) -> bool {
        self.outstanding.is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_inserts_pending_newest_first() {
        let mut gallery = GalleryState::new();
        let a = gallery.begin("first").unwrap();
        assert!(gallery.complete(a, "QQ==".into()));
        let b = gallery.begin("second").unwrap();

        assert_ne!(a, b);
        assert_eq!(gallery.len(), 2);
        assert_eq!(gallery.entries()[0].prompt(), "second");
        assert!(gallery.entries()[0].is_pending());
        assert_eq!(gallery.entries()[1].prompt(), "first");
    }

    #[test]
    fn test_begin_rejects_while_outstanding() {
        let mut gallery = GalleryState::new();
        gallery.begin("one").unwrap();
        assert!(matches!(gallery.begin("two"), Err(GalleryError::Busy)));
        assert_eq!(gallery.len(), 1);
    }

    #[test]
    fn test_complete_splices_in_place() {
        let mut gallery = GalleryState::new();
        let a = gallery.begin("first").unwrap();
        gallery.complete(a, "QQ==".into());
        let b = gallery.begin("second").unwrap();
        assert!(gallery.complete(b, "Qg==".into()));

        // Order unchanged, placeholder replaced where it stood.
        assert_eq!(gallery.entries()[0].id(), b);
        let done = gallery.entries()[0].as_complete().unwrap();
        assert_eq!(done.image_data, "Qg==");
        assert_eq!(done.prompt, "second");
        assert!(!gallery.is_generating());
    }

    #[test]
    fn test_complete_ignores_stale_id() {
        let mut gallery = GalleryState::new();
        let a = gallery.begin("kept").unwrap();
        gallery.complete(a, "QQ==".into());

        assert!(!gallery.complete(a, "c3RhbGU=".into()));
        assert!(!gallery.complete(999, "Ym9ndXM=".into()));
        assert_eq!(
            gallery.entries()[0].as_complete().unwrap().image_data,
            "QQ=="
        );
    }

    #[test]
    fn test_abandon_removes_placeholder_and_sets_error() {
        let mut gallery = GalleryState::new();
        let id = gallery.begin("doomed").unwrap();
        gallery.abandon(id, "Failed to generate image. Please try again.");

        assert!(gallery.is_empty());
        assert!(!gallery.is_generating());
        assert_eq!(
            gallery.error(),
            Some("Failed to generate image. Please try again.")
        );
    }

    #[test]
    fn test_clear_empties_entries_and_error() {
        let mut gallery = GalleryState::new();
        let id = gallery.begin("one").unwrap();
        gallery.complete(id, "QQ==".into());
        gallery.set_error("leftover");

        gallery.clear();
        assert!(gallery.is_empty());
        assert!(gallery.error().is_none());
    }

    #[test]
    fn test_error_slot_holds_one_message() {
        let mut gallery = GalleryState::new();
        gallery.set_error("first");
        gallery.set_error("second");
        assert_eq!(gallery.error(), Some("second"));
        gallery.clear_error();
        assert!(gallery.error().is_none());
    }
}
