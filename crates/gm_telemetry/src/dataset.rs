use std::{fs, path::Path};

use tracing::{debug, trace};

use crate::{Row, error::Result};

/// A recorded telemetry dataset, parsed once from CSV.
///
/// The first line is the header row and is required; blank lines are
/// skipped. Malformed cells are recovered per-row (see [`Row::parse`]), so
/// parsing never fails on data lines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    rows: Vec<Row>,
}

impl Dataset {
    /// Parses CSV contents, skipping the header row.
    pub fn parse(contents: &str) -> Result<Self> {
        let mut lines = contents.lines().filter(|line| !line.trim().is_empty());
        let header = lines.next().ok_or(crate::Error::MissingHeader)?;
        trace!(header, "Skipped dataset header row.");

        let rows = lines.map(Row::parse).collect::<Vec<_>>();
        debug!(rows = rows.len(), "Parsed telemetry dataset.");

        Ok(Self { rows })
    }

    /// Reads and parses the dataset at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        trace!(path = %path.display(), "Loading telemetry dataset.");

        Self::parse(&fs::read_to_string(path)?)
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
