//! igen is a prompt-to-gallery client for HTTP image-generation
//! backends. Submit a text prompt, get back a base64 PNG from
//! `POST {backend}/generate-image`, and keep an ordered in-memory
//! gallery of the session's results with copy, save, and modal-view
//! actions on each entry.
//!
//! The crate is deliberately thin: the backend does the hard work, this
//! side is state management around a form, one HTTP call, and list
//! rendering.

pub mod backend;
pub mod config;
pub mod error;
pub mod gallery;
pub mod logger;
pub mod models;
pub mod session;
pub mod view;

pub use backend::{HttpImageBackend, ImageBackend};
pub use config::{BackendConfig, Config};
pub use error::{GalleryError, Result};
pub use gallery::GalleryState;
pub use models::{
    CompletedGeneration, GalleryEntry, GenerateImageRequest, GenerateImageResponse, GenerationId,
    PendingGeneration,
};
pub use session::{ClipboardTarget, GallerySession, SystemClipboard};
pub use view::{Backdrop, EntryView, ViewState};
