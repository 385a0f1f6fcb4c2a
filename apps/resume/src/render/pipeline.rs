//! Drives one render: backend call under a deadline, then an atomic write.
//!
//! Bytes land in a temporary file next to the destination and are only
//! persisted once complete, so a failed or timed-out render never leaves a
//! partial PDF behind and never clobbers a previous good one.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::output::OutputSink;
use crate::render::layout::ResumeLayout;
use crate::render::{PdfBackend, RenderError};

#[derive(Debug, Clone, Serialize)]
pub struct RenderedFile {
    pub path: PathBuf,
    pub bytes: u64,
    pub backend: &'static str,
}

impl RenderedFile {
    pub fn size_kb(&self) -> f64 {
        self.bytes as f64 / 1024.0
    }
}

pub async fn render_to_file(
    layout: &ResumeLayout,
    backend: &dyn PdfBackend,
    output: &Path,
    deadline: Duration,
    sink: &dyn OutputSink,
) -> Result<RenderedFile, RenderError> {
    sink.info(&format!("Rendering PDF with {} backend...", backend.name()));
    debug!(backend = backend.name(), deadline_secs = deadline.as_secs(), "Starting render");

    let bytes = tokio::time::timeout(deadline, backend.render(layout))
        .await
        .map_err(|_| RenderError::Timeout(deadline))??;

    let written = write_atomically(output, &bytes)?;
    let rendered = RenderedFile {
        path: output.to_path_buf(),
        bytes: written,
        backend: backend.name(),
    };

    info!(path = %output.display(), bytes = written, "PDF written");
    sink.success(&format!("PDF generated successfully: {}", output.display()));
    sink.info(&format!("File size: {:.2} KB", rendered.size_kb()));
    Ok(rendered)
}

fn write_atomically(output: &Path, bytes: &[u8]) -> Result<u64, RenderError> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let write_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| RenderError::Write { path, source }
    };

    std::fs::create_dir_all(&dir).map_err(write_err(dir.as_path()))?;

    let mut tmp = NamedTempFile::new_in(&dir).map_err(write_err(dir.as_path()))?;
    tmp.write_all(bytes).map_err(write_err(output))?;
    tmp.as_file().sync_all().map_err(write_err(output))?;
    tmp.persist(output).map_err(|e| RenderError::Write {
        path: output.to_path_buf(),
        source: e.error,
    })?;

    Ok(bytes.len() as u64)
}
