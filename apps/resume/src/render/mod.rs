// Rendering: document -> layout regions -> positioned marks -> PDF bytes -> file.
// PDF serialisation is CPU-bound and runs inside tokio::task::spawn_blocking.

pub mod composer;
pub mod layout;
pub mod pdf;
pub mod pipeline;
pub mod text_metrics;

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use layout::{format_timestamp, ResumeLayout};
pub use pdf::LopdfBackend;
pub use pipeline::{render_to_file, RenderedFile};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Cannot lay out document: {0}")]
    Layout(String),

    #[error("PDF backend '{backend}' failed: {message}")]
    Backend {
        backend: &'static str,
        message: String,
    },

    #[error("PDF generation timed out after {}s", .0.as_secs_f32())]
    Timeout(Duration),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("PDF serialisation failed: {0}")]
    Pdf(#[from] lopdf::Error),
}

/// A document renderer. Implement this to swap the PDF engine without touching
/// the pipeline or the CLI.
#[async_trait]
pub trait PdfBackend: Send + Sync {
    fn name(&self) -> &'static str;

    async fn render(&self, layout: &ResumeLayout) -> Result<Vec<u8>, RenderError>;
}
