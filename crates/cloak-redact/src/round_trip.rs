//! One PDF through rasterize → redact per page → assemble.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use cloak_core::{Error, Result};

use crate::assemble::write_image_pdf;
use crate::client::ImageRedactor;
use crate::rasterize::PageRasterizer;

/// Where a job is. A conversion error leaves the job in `Converting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Converting,
    Redacting { page: usize },
    Assembling,
    Done,
}

/// A page the redaction service did not return. The page is left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFailure {
    pub page: usize,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedactionOutcome {
    /// At least one page was redacted and the output file was written.
    Written {
        path: PathBuf,
        pages: Vec<usize>,
        dropped: Vec<PageFailure>,
    },
    /// Every page failed; nothing was written.
    NoOutput { dropped: Vec<PageFailure> },
}

pub struct RedactionJob {
    rasterizer: Arc<dyn PageRasterizer>,
    redactor: Arc<dyn ImageRedactor>,
    state: JobState,
}

impl RedactionJob {
    pub fn new(rasterizer: Arc<dyn PageRasterizer>, redactor: Arc<dyn ImageRedactor>) -> Self {
        Self {
            rasterizer,
            redactor,
            state: JobState::Pending,
        }
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    fn enter(&mut self, state: JobState) {
        debug!("Redaction job {:?} -> {:?}", self.state, state);
        self.state = state;
    }

    /// Redact `input` into `output`.
    ///
    /// Pages are sent one at a time in page order. A page the service rejects
    /// is logged and dropped; it is neither retried nor replaced. Rasterizing
    /// and assembly run on the blocking pool.
    pub async fn run(&mut self, input: &Path, output: &Path) -> Result<RedactionOutcome> {
        self.enter(JobState::Converting);
        let rasterizer = self.rasterizer.clone();
        let pdf = input.to_path_buf();
        let pages = tokio::task::spawn_blocking(move || rasterizer.rasterize(&pdf))
            .await
            .map_err(|e| Error::Conversion(format!("rasterize task join error: {e}")))??;
        info!("Converted {} into {} page image(s)", input.display(), pages.len());

        let mut redacted = Vec::with_capacity(pages.len());
        let mut kept = Vec::with_capacity(pages.len());
        let mut dropped = Vec::new();

        for page in &pages {
            self.enter(JobState::Redacting { page: page.number });
            match self.redactor.redact(page).await {
                Ok(bytes) => {
                    info!("Redacted page {}", page.number);
                    redacted.push(bytes);
                    kept.push(page.number);
                }
                Err(e) => {
                    warn!("Redactor error on page {}: {}", page.number, e);
                    dropped.push(PageFailure {
                        page: page.number,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if redacted.is_empty() {
            warn!("No pages were redacted; {} not written", output.display());
            self.enter(JobState::Done);
            return Ok(RedactionOutcome::NoOutput { dropped });
        }

        self.enter(JobState::Assembling);
        let target = output.to_path_buf();
        tokio::task::spawn_blocking(move || write_image_pdf(&redacted, &target))
            .await
            .map_err(|e| Error::Conversion(format!("assemble task join error: {e}")))??;
        self.enter(JobState::Done);

        Ok(RedactionOutcome::Written {
            path: output.to_path_buf(),
            pages: kept,
            dropped,
        })
    }
}
