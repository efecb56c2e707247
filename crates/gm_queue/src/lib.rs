mod error;

use std::{
    collections::VecDeque,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use gm_client::{ModelClient, StorageClient};
use gm_transcript::{Origin, Transcript};
use tracing::{debug, info, trace, warn};

pub use crate::error::Error;
use crate::error::Result;

/// Files larger than this are rejected before they ever enter the queue.
pub const MAX_FILE_BYTES: u64 = 5 * 1024 * 1024;

/// Delay between finishing one file and starting the next. Decouples
/// iterations so one completion never re-enters the next synchronously.
const STEP_DELAY: Duration = Duration::from_millis(250);

/// A validated local file waiting to be processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedFile {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
}

impl QueuedFile {
    fn new(name: String, path: PathBuf) -> Result<Self> {
        if !path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        {
            return Err(Error::NotCsv(name));
        }

        let size = fs::metadata(&path).map_err(Error::Read)?.len();
        if size > MAX_FILE_BYTES {
            return Err(Error::TooLarge {
                name,
                size,
                limit: MAX_FILE_BYTES,
            });
        }

        Ok(Self { name, path, size })
    }
}

/// The sequential upload queue.
///
/// Files are processed strictly in FIFO order, one at a time, each consumed
/// exactly once. Every per-file failure is terminal for that file and
/// unblocks the next entry; there are no retries.
#[derive(Debug)]
pub struct UploadQueue {
    pending: VecDeque<QueuedFile>,
    processing: bool,
    step_delay: Duration,
}

impl Default for UploadQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadQueue {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            processing: false,
            step_delay: STEP_DELAY,
        }
    }

    /// Overrides the fixed delay between queue iterations.
    #[must_use]
    pub fn with_step_delay(mut self, step_delay: Duration) -> Self {
        self.step_delay = step_delay;
        self
    }

    /// Validates `path` and appends it to the tail of the queue.
    ///
    /// Rejected files (wrong extension, over [`MAX_FILE_BYTES`]) are never
    /// enqueued; the rejection is appended to the transcript as a visible
    /// error block instead. Returns whether the file was enqueued.
    pub fn enqueue(&mut self, path: impl Into<PathBuf>, transcript: &mut Transcript) -> bool {
        let path = path.into();
        let name = file_name(&path);

        match QueuedFile::new(name.clone(), path) {
            Ok(file) => {
                debug!(name = file.name, size = file.size, "Enqueued file.");
                self.pending.push_back(file);
                true
            }
            Err(error) => {
                warn!(name, %error, "Rejected file. Not enqueued.");
                transcript.push_error(Origin::File(name), error.to_string());
                false
            }
        }
    }

    /// Drains the queue, processing the head element until none remain.
    ///
    /// A single-flight guard makes re-entrant calls no-ops while a drain is
    /// in progress; draining an empty, idle queue is equivalent to starting
    /// a fresh pipeline.
    pub async fn run(
        &mut self,
        storage: &StorageClient,
        model: &ModelClient,
        transcript: &mut Transcript,
    ) {
        if self.processing {
            trace!("Queue drain already in progress.");
            return;
        }
        self.processing = true;

        while let Some(file) = self.pending.pop_front() {
            info!(name = file.name, "Processing queued file.");

            match process_file(&file, storage, model).await {
                Ok(response) => {
                    transcript.push_response(Origin::File(file.name), response);
                }
                Err(error) => {
                    warn!(%error, "File processing failed. Advancing queue.");
                    transcript.push_error(Origin::File(file.name), error.to_string());
                }
            }

            if !self.pending.is_empty() {
                tokio::time::sleep(self.step_delay).await;
            }
        }

        self.processing = false;
        debug!("Queue drained.");
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.processing
    }
}

/// The upload/forward pipeline for a single file: read, encode, upload to
/// storage, then forward the encoded content to the model annotated with the
/// stored path.
async fn process_file(
    file: &QueuedFile,
    storage: &StorageClient,
    model: &ModelClient,
) -> Result<String> {
    let contents = tokio::fs::read_to_string(&file.path)
        .await
        .map_err(Error::Read)?;
    let encoded = BASE64.encode(contents.as_bytes());

    let upload = storage
        .upload(&file.name, contents.into_bytes())
        .await
        .map_err(Error::Upload)?;
    trace!(path = upload.current_path, "File stored.");

    model
        .analyze_file(encoded, upload.current_path)
        .await
        .map_err(Error::Model)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| {
            name.to_string_lossy().into_owned()
        })
}

#[cfg(test)]
mod tests;
