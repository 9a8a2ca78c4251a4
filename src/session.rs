use std::path::{Path, PathBuf};
use std::time::Duration;

use base64::Engine;

use crate::{
    backend::{HttpImageBackend, ImageBackend},
    config::Config,
    error::{GalleryError, Result},
    gallery::GalleryState,
    models::{CompletedGeneration, GenerationId},
    view::{self, EntryView, ViewState},
};

const DEFAULT_COPY_FEEDBACK_MS: u64 = 2000;

const VALIDATION_MESSAGE: &str = "Please enter a prompt";
const FAILURE_MESSAGE: &str = "Failed to generate image. Please try again.";

/// Somewhere to put a copied prompt. Trait seam so tests do not need a
/// windowing system; the real target is the OS clipboard.
pub trait ClipboardTarget: Send {
    fn set_text(&mut self, text: &str) -> std::result::Result<(), String>;
}

/// arboard-backed clipboard. A fresh handle per copy keeps the session
/// free of platform clipboard state between actions.
pub struct SystemClipboard;

impl ClipboardTarget for SystemClipboard {
    fn set_text(&mut self, text: &str) -> std::result::Result<(), String> {
        let mut clipboard = arboard::Clipboard::new().map_err(|e| e.to_string())?;
        clipboard.set_text(text).map_err(|e| e.to_string())
    }
}

/// The whole client in one place: gallery state, view state, the
/// backend boundary, and the clipboard. Everything the original page
/// did goes through here.
pub struct GallerySession {
    backend: Box<dyn ImageBackend>,
    gallery: GalleryState,
    view: ViewState,
    clipboard: Box<dyn ClipboardTarget>,
}

impl GallerySession {
    pub fn new(backend: Box<dyn ImageBackend>) -> Self {
        Self::with_copy_feedback(backend, Duration::from_millis(DEFAULT_COPY_FEEDBACK_MS))
    }

    pub fn with_copy_feedback(backend: Box<dyn ImageBackend>, feedback: Duration) -> Self {
        GallerySession {
            backend,
            gallery: GalleryState::new(),
            view: ViewState::new(feedback),
            clipboard: Box::new(SystemClipboard),
        }
    }

    /// Build a session over HTTP from configuration.
    pub fn from_config(config: Config) -> Result<Self> {
        let backend_config = config
            .backend
            .ok_or_else(|| GalleryError::Config("No backend configured".into()))?;
        let backend = HttpImageBackend::new(backend_config)?;
        let feedback =
            Duration::from_millis(config.copy_feedback_ms.unwrap_or(DEFAULT_COPY_FEEDBACK_MS));
        Ok(Self::with_copy_feedback(Box::new(backend), feedback))
    }

    pub fn with_clipboard(mut self, clipboard: Box<dyn ClipboardTarget>) -> Self {
        self.clipboard = clipboard;
        self
    }

    /// Submit a prompt: validate locally, place the pending card, issue
    /// exactly one backend request, then splice the result in or remove
    /// the card on failure. All failures are terminal; the user
    /// resubmits by hand.
    pub async fn submit(&mut self, prompt: &str) -> Result<GenerationId> {
        let trimmed = prompt.trim();
        if trimmed.is_empty() {
            self.gallery.set_error(VALIDATION_MESSAGE);
            return Err(GalleryError::Validation(VALIDATION_MESSAGE.into()));
        }

        self.gallery.clear_error();
        let id = self.gallery.begin(trimmed)?;

        log::info!("Generating image for prompt: {:?}", trimmed);

        match self.backend.generate(trimmed).await {
            Ok(image_data) => {
                self.gallery.complete(id, image_data);
                log::info!("Generation {} complete", id);
                Ok(id)
            }
            Err(e) => {
                log::error!("Generation {} failed: {}", id, e);
                self.gallery.abandon(id, FAILURE_MESSAGE);
                Err(e)
            }
        }
    }

    /// Copy an entry's prompt to the clipboard. Best-effort: failure is
    /// logged and the indicator stays dark, nothing else happens.
    pub fn copy_prompt(&mut self, id: GenerationId) -> bool {
        let Some(prompt) = self.gallery.get(id).map(|e| e.prompt().to_string()) else {
            return false;
        };

        match self.clipboard.set_text(&prompt) {
            Ok(()) => {
                self.view.mark_copied(id);
                true
            }
            Err(e) => {
                log::warn!("Clipboard copy failed: {}", e);
                false
            }
        }
    }

    pub fn copied(&self, id: GenerationId) -> bool {
        self.view.copied(id)
    }

    /// Open the full-image modal. Only completed entries have an image
    /// to show.
    pub fn open_modal(&mut self, id: GenerationId) -> bool {
        let showable = self
            .gallery
            .get(id)
            .and_then(|e| e.as_complete())
            .is_some();
        if showable {
            self.view.open_modal(id);
        }
        showable
    }

    pub fn close_modal(&mut self) {
        self.view.close_modal();
    }

    pub fn modal(&self) -> Option<&CompletedGeneration> {
        self.view
            .modal()
            .and_then(|id| self.gallery.get(id))
            .and_then(|e| e.as_complete())
    }

    /// Decode an entry's image and write it to disk as a PNG. Returns
    /// the path written.
    pub fn save_image(&self, id: GenerationId, path: Option<PathBuf>) -> Result<PathBuf> {
        let entry = self
            .gallery
            .get(id)
            .and_then(|e| e.as_complete())
            .ok_or_else(|| GalleryError::Validation(format!("No completed entry {}", id)))?;

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&entry.image_data)
            .map_err(|e| GalleryError::Decode(format!("Invalid base64 image data: {}", e)))?;

        let path =
            path.unwrap_or_else(|| Path::new(&Self::default_filename(entry)).to_path_buf());
        std::fs::write(&path, bytes)
            .map_err(|e| GalleryError::Io(format!("Failed to save image: {}", e)))?;

        log::info!("Image saved to {}", path.display());
        Ok(path)
    }

    fn default_filename(entry: &CompletedGeneration) -> String {
        format!("generated_image_{}.png", entry.timestamp.timestamp())
    }

    /// Empty the gallery and reset the error slot. No backend call.
    pub fn clear(&mut self) {
        self.gallery.clear();
        self.view.close_modal();
        log::info!("Gallery cleared");
    }

    pub fn render(&self) -> Vec<EntryView> {
        view::render(&self.gallery, &self.view)
    }

    pub fn gallery(&self) -> &GalleryState {
        &self.gallery
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingBackend {
        calls: Arc<AtomicUsize>,
        response: std::result::Result<String, String>,
    }

    #[async_trait]
    impl ImageBackend for CountingBackend {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response
                .clone()
                .map_err(GalleryError::Request)
        }
    }

    struct RecordingClipboard {
        seen: Arc<std::sync::Mutex<Vec<String>>>,
        fail: bool,
    }

    impl ClipboardTarget for RecordingClipboard {
        fn set_text(&mut self, text: &str) -> std::result::Result<(), String> {
            if self.fail {
                return Err("no clipboard available".into());
            }
            self.seen.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn session_with(
        response: std::result::Result<String, String>,
    ) -> (GallerySession, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let backend = CountingBackend {
            calls: calls.clone(),
            response,
        };
        (GallerySession::new(Box::new(backend)), calls)
    }

    #[tokio::test]
    async fn test_blank_prompt_never_reaches_backend() {
        let (mut session, calls) = session_with(Ok("aGVsbG8=".into()));

        for prompt in ["", "   ", "\t\n"] {
            let err = session.submit(prompt).await.unwrap_err();
            assert!(matches!(err, GalleryError::Validation(_)));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(session.gallery().is_empty());
        assert_eq!(session.gallery().error(), Some("Please enter a prompt"));
    }

    #[tokio::test]
    async fn test_successful_submit_produces_one_rendered_entry() {
        let (mut session, calls) = session_with(Ok("aGVsbG8=".into()));

        let id = session.submit("a red fox").await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.gallery().len(), 1);
        assert!(session.gallery().error().is_none());

        let model = session.render();
        match &model[0] {
            EntryView::Image { src, prompt, .. } => {
                assert_eq!(src, "data:image/png;base64,aGVsbG8=");
                assert_eq!(prompt, "a red fox");
            }
            other => panic!("expected image card, got {:?}", other),
        }
        assert_eq!(model[0].id(), id);
    }

    #[tokio::test]
    async fn test_failed_submit_removes_placeholder_and_sets_error() {
        let (mut session, calls) = session_with(Err("HTTP 500".into()));

        let err = session.submit("a red fox").await.unwrap_err();
        assert!(matches!(err, GalleryError::Request(_)));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(session.gallery().is_empty());
        assert_eq!(
            session.gallery().error(),
            Some("Failed to generate image. Please try again.")
        );
    }

    #[tokio::test]
    async fn test_clear_resets_gallery_without_backend_calls() {
        let (mut session, calls) = session_with(Ok("aGVsbG8=".into()));
        session.submit("one").await.unwrap();
        session.submit("two").await.unwrap();
        let before = calls.load(Ordering::SeqCst);

        session.clear();

        assert!(session.gallery().is_empty());
        assert!(session.gallery().error().is_none());
        assert_eq!(calls.load(Ordering::SeqCst), before);
    }

    #[tokio::test]
    async fn test_copy_prompt_sets_transient_indicator() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut session = GallerySession::with_copy_feedback(
            Box::new(CountingBackend {
                calls: calls.clone(),
                response: Ok("aGVsbG8=".into()),
            }),
            Duration::from_millis(25),
        )
        .with_clipboard(Box::new(RecordingClipboard {
            seen: seen.clone(),
            fail: false,
        }));

        let id = session.submit("P").await.unwrap();
        assert!(session.copy_prompt(id));
        assert!(session.copied(id));
        assert_eq!(seen.lock().unwrap().as_slice(), ["P"]);

        // Prompt untouched, no extra network traffic.
        assert_eq!(session.gallery().entries()[0].prompt(), "P");
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Indicator reverts on its own after the feedback window.
        std::thread::sleep(Duration::from_millis(40));
        assert!(!session.copied(id));
    }

    #[tokio::test]
    async fn test_copy_failure_is_silent() {
        let (session, _calls) = session_with(Ok("aGVsbG8=".into()));
        let mut session = session.with_clipboard(Box::new(RecordingClipboard {
            seen: Arc::new(std::sync::Mutex::new(Vec::new())),
            fail: true,
        }));

        let id = session.submit("P").await.unwrap();
        assert!(!session.copy_prompt(id));
        assert!(!session.copied(id));
        // No user-visible error either.
        assert!(session.gallery().error().is_none());
    }

    #[tokio::test]
    async fn test_modal_roundtrip_restores_state() {
        let (mut session, _calls) = session_with(Ok("aGVsbG8=".into()));
        let id = session.submit("a red fox").await.unwrap();
        let before = session.render();

        assert!(session.open_modal(id));
        assert_eq!(session.modal().unwrap().prompt, "a red fox");
        session.close_modal();

        assert!(session.modal().is_none());
        assert_eq!(session.render(), before);
        assert_eq!(session.gallery().len(), 1);
    }

    #[tokio::test]
    async fn test_modal_rejects_unknown_entries() {
        let (mut session, _calls) = session_with(Ok("aGVsbG8=".into()));
        assert!(!session.open_modal(42));
        assert!(session.modal().is_none());
    }

    #[tokio::test]
    async fn test_save_image_writes_decoded_bytes() {
        let (mut session, _calls) = session_with(Ok("aGVsbG8=".into()));
        let id = session.submit("a red fox").await.unwrap();

        let path = std::env::temp_dir().join("igen_save_image_test.png");
        let written = session.save_image(id, Some(path.clone())).unwrap();
        assert_eq!(written, path);
        assert_eq!(std::fs::read(&path).unwrap(), b"hello");
        let _ = std::fs::remove_file(&path);
    }
}
