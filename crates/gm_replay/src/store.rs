use std::{
    fs,
    io::{BufWriter, Write as _},
    path::PathBuf,
};

use gm_telemetry::Row;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::{ReplayState, error::Result};

/// The on-disk shape of a persisted replay session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedState {
    pub saved_index: usize,
    pub saved_data: Vec<Row>,
}

/// Persists the replay cursor as a single JSON file, overwritten after every
/// reveal step and removed on reset.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads the persisted state, if any.
    ///
    /// A missing file means no saved session. A file that cannot be decoded
    /// is treated the same way; the replay then starts fresh.
    #[must_use]
    pub fn load(&self) -> Option<SavedState> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                trace!(path = %self.path.display(), "No persisted replay state.");
                return None;
            }
            Err(error) => {
                warn!(path = %self.path.display(), %error, "Failed to read replay state.");
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(saved) => Some(saved),
            Err(error) => {
                warn!(path = %self.path.display(), %error, "Discarding undecodable replay state.");
                None
            }
        }
    }

    /// Overwrites the persisted state with the given snapshot.
    pub fn save(&self, state: &ReplayState) -> Result<()> {
        let saved = SavedState {
            saved_index: state.cursor(),
            saved_data: state.revealed().to_vec(),
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = fs::File::create(&self.path)?;
        let mut buf = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut buf, &saved)?;
        buf.write_all(b"\n")?;
        buf.flush()?;

        trace!(path = %self.path.display(), cursor = saved.saved_index, "Persisted replay state.");
        Ok(())
    }

    /// Removes the persisted state. Removing an absent file is fine.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                trace!(path = %self.path.display(), "Cleared replay state.");
                Ok(())
            }
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}
