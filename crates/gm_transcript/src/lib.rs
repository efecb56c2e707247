use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Where a transcript segment came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Origin {
    /// Produced while processing an uploaded file.
    File(String),

    /// Produced by a direct text query.
    Query,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::File(name) => write!(f, "file {name}"),
            Origin::Query => f.write_str("query"),
        }
    }
}

/// One block of transcript text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub origin: Origin,
    pub text: String,
    pub is_error: bool,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_error { "error" } else { "response" };
        write!(f, "--- {kind} ({}) ---\n{}", self.origin, self.text)
    }
}

/// The response log: an append-only, ordered sequence of text segments.
///
/// Segments are never removed or truncated within a session; rendering
/// concatenates them with a separator marking each new block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    segments: Vec<Segment>,
}

impl Transcript {
    /// Appends a successful response block.
    pub fn push_response(&mut self, origin: Origin, text: impl Into<String>) {
        self.push(Segment {
            origin,
            text: text.into(),
            is_error: false,
        });
    }

    /// Appends a visible error block.
    pub fn push_error(&mut self, origin: Origin, text: impl Into<String>) {
        self.push(Segment {
            origin,
            text: text.into(),
            is_error: true,
        });
    }

    fn push(&mut self, segment: Segment) {
        trace!(
            origin = %segment.origin,
            is_error = segment.is_error,
            "Appended transcript segment."
        );
        self.segments.push(segment);
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[must_use]
    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, segment) in self.segments.iter().enumerate() {
            if index > 0 {
                f.write_str("\n\n")?;
            }
            write!(f, "{segment}")?;
        }

        Ok(())
    }
}
