use std::time::Duration;

use gm_telemetry::{Dataset, Row};
use tracing::{debug, info};

use crate::{ReplayState, StateStore, error::Result};

/// How often a settled-in replay reveals the next row.
pub const DEFAULT_REPLAY_INTERVAL: Duration = Duration::from_secs(15);

/// Drives a [`ReplayState`] over a dataset, persisting after every step.
///
/// The engine owns no timer. Callers decide the cadence and call [`tick`]
/// once per interval; each tick reveals at most one row.
///
/// [`tick`]: ReplayEngine::tick
#[derive(Debug)]
pub struct ReplayEngine {
    dataset: Dataset,
    state: ReplayState,
    store: StateStore,
}

impl ReplayEngine {
    /// Starts a replay session, resuming a persisted one when possible.
    ///
    /// Persisted state is adopted only when it is structurally consistent
    /// with `dataset`; anything else is discarded and the session starts
    /// from the initial display.
    #[must_use]
    pub fn resume(dataset: Dataset, store: StateStore) -> Self {
        let state = store
            .load()
            .and_then(|saved| ReplayState::validated(saved.saved_index, saved.saved_data, &dataset));

        let state = match state {
            Some(state) => {
                info!(cursor = state.cursor(), "Resuming persisted replay session.");
                state
            }
            None => {
                debug!(rows = dataset.len(), "Starting fresh replay session.");
                ReplayState::initial(&dataset)
            }
        };

        Self {
            dataset,
            state,
            store,
        }
    }

    /// Reveals the next row, persists the new cursor, and returns the row.
    ///
    /// Returns `None` once the replay is settled; a settled engine ticks
    /// without side effects until [`reset`](ReplayEngine::reset).
    pub fn tick(&mut self) -> Result<Option<&Row>> {
        if self.state.is_settled(&self.dataset) {
            return Ok(None);
        }

        self.state = self.state.advance(&self.dataset);
        self.store.save(&self.state)?;

        Ok(self.state.revealed().last())
    }

    /// Drops the persisted session and restores the initial display.
    pub fn reset(&mut self) -> Result<()> {
        info!("Resetting replay session.");
        self.store.clear()?;
        self.state = ReplayState::initial(&self.dataset);

        Ok(())
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.state.is_settled(&self.dataset)
    }

    #[must_use]
    pub fn state(&self) -> &ReplayState {
        &self.state
    }

    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::*;

    fn dataset(rows: usize) -> Dataset {
        let mut contents = "Timestamp,Solar_Generation_kW,Home_Load_kW,Tesla_Charger_kW,\
                            Battery_Charge_kWh,Battery_Discharge_kW,Grid_Import_kW,Grid_Export_kW\n"
            .to_owned();
        for i in 0..rows {
            contents.push_str(&format!("2024-03-01 00:{i:02},1,2,3,4,5,6,7\n"));
        }

        Dataset::parse(&contents).unwrap()
    }

    fn store(dir: &tempfile::TempDir) -> StateStore {
        StateStore::new(dir.path().join("replay.json"))
    }

    #[test]
    fn test_three_ticks_reveal_three_more_rows() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = ReplayEngine::resume(dataset(20), store(&dir));
        assert_eq!(engine.state().cursor(), 5);

        for _ in 0..3 {
            assert!(engine.tick().unwrap().is_some());
        }

        assert_eq!(engine.state().revealed().len(), 8);
        assert_eq!(engine.state().cursor(), 8);
    }

    #[test]
    fn test_resume_reproduces_revealed_prefix() {
        let dir = tempfile::tempdir().unwrap();

        let mut engine = ReplayEngine::resume(dataset(20), store(&dir));
        engine.tick().unwrap();
        engine.tick().unwrap();
        let revealed = engine.state().revealed().to_vec();

        // A second session over the same dataset picks up where the first
        // one stopped.
        let resumed = ReplayEngine::resume(dataset(20), store(&dir));
        assert_eq!(resumed.state().cursor(), 7);
        assert_eq!(resumed.state().revealed(), revealed);
    }

    #[test]
    fn test_inconsistent_persisted_state_is_discarded() {
        let dir = tempfile::tempdir().unwrap();

        // Persist against a long dataset, then resume against a short one.
        let mut engine = ReplayEngine::resume(dataset(20), store(&dir));
        engine.tick().unwrap();

        let resumed = ReplayEngine::resume(dataset(3), store(&dir));
        assert_eq!(resumed.state().cursor(), 3);
    }

    #[test]
    fn test_settled_engine_ticks_without_effect() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = ReplayEngine::resume(dataset(6), store(&dir));

        assert!(engine.tick().unwrap().is_some());
        assert!(engine.is_settled());
        assert_eq!(engine.tick().unwrap(), None);
        assert_eq!(engine.state().cursor(), 6);
    }

    #[test]
    fn test_reset_clears_persisted_state_and_restores_initial_display() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        let mut engine = ReplayEngine::resume(dataset(20), store.clone());

        engine.tick().unwrap();
        engine.tick().unwrap();
        assert!(store.exists());

        engine.reset().unwrap();

        assert!(!store.exists());
        assert_eq!(engine.state().cursor(), 5);
        assert!(!engine.is_settled());

        // Replay resumes from the initial display.
        assert!(engine.tick().unwrap().is_some());
        assert_eq!(engine.state().cursor(), 6);
    }
}
