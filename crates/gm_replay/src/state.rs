use gm_telemetry::{Dataset, Row};
use tracing::trace;

/// How many rows are visible immediately, before any timed reveal.
pub const INITIAL_DISPLAY_COUNT: usize = 5;

/// The replay cursor and the prefix of the dataset revealed so far.
///
/// Invariants: `revealed.len() == cursor` and `cursor <= dataset.len()`.
/// The cursor only moves forward; a reset constructs a fresh initial state
/// instead of mutating this one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplayState {
    cursor: usize,
    revealed: Vec<Row>,
}

impl ReplayState {
    /// The state a fresh session starts from: the first
    /// [`INITIAL_DISPLAY_COUNT`] rows (or fewer, for short datasets) are
    /// visible at once.
    #[must_use]
    pub fn initial(dataset: &Dataset) -> Self {
        let cursor = INITIAL_DISPLAY_COUNT.min(dataset.len());

        Self {
            cursor,
            revealed: dataset.rows()[..cursor].to_vec(),
        }
    }

    /// Rebuilds a state from persisted parts, if they are structurally
    /// consistent with `dataset`. Inconsistent parts are discarded.
    #[must_use]
    pub fn validated(cursor: usize, revealed: Vec<Row>, dataset: &Dataset) -> Option<Self> {
        if revealed.len() != cursor || cursor > dataset.len() {
            trace!(
                cursor,
                revealed = revealed.len(),
                dataset = dataset.len(),
                "Discarding structurally invalid replay state."
            );
            return None;
        }

        Some(Self { cursor, revealed })
    }

    /// One reveal step: the next unrevealed row is appended and the cursor
    /// moves past it. A settled state advances to itself.
    #[must_use]
    pub fn advance(&self, dataset: &Dataset) -> Self {
        let Some(row) = dataset.get(self.cursor) else {
            return self.clone();
        };

        let mut revealed = self.revealed.clone();
        revealed.push(row.clone());

        Self {
            cursor: self.cursor + 1,
            revealed,
        }
    }

    /// Whether every dataset row has been revealed. Terminal until a reset.
    #[must_use]
    pub fn is_settled(&self, dataset: &Dataset) -> bool {
        self.cursor >= dataset.len()
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn revealed(&self) -> &[Row] {
        &self.revealed
    }
}
