use std::time::{Duration, Instant};

use colored::*;

use crate::{
    gallery::GalleryState,
    models::{GalleryEntry, GenerationId},
};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Presentation-only state that sits beside the gallery: which entry the
/// modal is showing, and which entry last confirmed a copy action.
#[derive(Debug)]
pub struct ViewState {
    modal: Option<GenerationId>,
    copied: Option<(GenerationId, Instant)>,
    copy_feedback: Duration,
}

impl ViewState {
    pub fn new(copy_feedback: Duration) -> Self {
        ViewState {
            modal: None,
            copied: None,
            copy_feedback,
        }
    }

    /// Light the transient "copied" indicator on one entry. It reverts
    /// by itself once the feedback window elapses.
    pub fn mark_copied(&mut self, id: GenerationId) {
        self.copied = Some((id, Instant::now()));
    }

    pub fn copied(&self, id: GenerationId) -> bool {
        match self.copied {
            Some((copied_id, at)) => copied_id == id && at.elapsed() < self.copy_feedback,
            None => false,
        }
    }

    pub fn open_modal(&mut self, id: GenerationId) {
        self.modal = Some(id);
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    pub fn modal(&self) -> Option<GenerationId> {
        self.modal
    }
}

/// One gallery card, ready to draw. Rebuilt from scratch on every
/// render; nothing here outlives a state change.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryView {
    Pending {
        id: GenerationId,
        prompt: String,
        submitted_at: String,
    },
    Image {
        id: GenerationId,
        prompt: String,
        /// `data:image/png;base64,...`
        src: String,
        timestamp: String,
        copied: bool,
    },
}

impl EntryView {
    pub fn id(&self) -> GenerationId {
        match self {
            EntryView::Pending { id, .. } => *id,
            EntryView::Image { id, .. } => *id,
        }
    }
}

/// Build the render model for the whole gallery, newest first.
pub fn render(gallery: &GalleryState, view: &ViewState) -> Vec<EntryView> {
    gallery
        .entries()
        .iter()
        .map(|entry| match entry {
            GalleryEntry::Pending(p) => EntryView::Pending {
                id: p.id,
                prompt: p.prompt.clone(),
                submitted_at: p.created_at.format(TIMESTAMP_FORMAT).to_string(),
            },
            GalleryEntry::Complete(c) => EntryView::Image {
                id: c.id,
                prompt: c.prompt.clone(),
                src: c.data_uri(),
                timestamp: c.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                copied: view.copied(c.id),
            },
        })
        .collect()
}

/// Cosmetic header band. Stateless: owns nothing but the last width it
/// was told about, and recomputes its pattern from that alone, so a
/// resize notification is the only lifecycle event it has.
#[derive(Debug)]
pub struct Backdrop {
    width: usize,
}

impl Backdrop {
    pub fn new(width: usize) -> Self {
        Backdrop { width: width.max(20) }
    }

    pub fn resize(&mut self, width: usize) {
        self.width = width.max(20);
    }

    pub fn render(&self) -> String {
        let wave: String = (0..self.width)
            .map(|i| match i % 4 {
                0 => '░',
                1 => '▒',
                2 => '▓',
                _ => '▒',
            })
            .collect();

        let title = " igen — prompt-to-gallery ";
        let pad = self.width.saturating_sub(title.len()) / 2;
        format!(
            "{}\n{}{}\n{}",
            wave.bright_magenta(),
            " ".repeat(pad),
            title.bright_white().bold(),
            wave.bright_magenta()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_maps_pending_and_complete() {
        let mut gallery = GalleryState::new();
        let a = gallery.begin("done one").unwrap();
        gallery.complete(a, "aGVsbG8=".into());
        let b = gallery.begin("still waiting").unwrap();

        let view = ViewState::new(Duration::from_secs(2));
        let model = render(&gallery, &view);

        assert_eq!(model.len(), 2);
        match &model[0] {
            EntryView::Pending { id, prompt, .. } => {
                assert_eq!(*id, b);
                assert_eq!(prompt, "still waiting");
            }
            other => panic!("expected pending card, got {:?}", other),
        }
        match &model[1] {
            EntryView::Image {
                src,
                prompt,
                copied,
                ..
            } => {
                assert_eq!(src, "data:image/png;base64,aGVsbG8=");
                assert_eq!(prompt, "done one");
                assert!(!copied);
            }
            other => panic!("expected image card, got {:?}", other),
        }
    }

    #[test]
    fn test_copied_indicator_reverts_after_feedback_window() {
        let mut view = ViewState::new(Duration::from_millis(30));
        view.mark_copied(7);
        assert!(view.copied(7));
        assert!(!view.copied(8));

        std::thread::sleep(Duration::from_millis(45));
        assert!(!view.copied(7));
    }

    #[test]
    fn test_modal_open_close_roundtrip() {
        let mut view = ViewState::new(Duration::from_secs(2));
        assert!(view.modal().is_none());
        view.open_modal(3);
        assert_eq!(view.modal(), Some(3));
        view.close_modal();
        assert!(view.modal().is_none());
    }

    #[test]
    fn test_backdrop_resize_recomputes_width() {
        let mut backdrop = Backdrop::new(40);
        let before = backdrop.render();
        backdrop.resize(60);
        let after = backdrop.render();
        assert_ne!(before, after);
    }
}
