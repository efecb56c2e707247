mod engine;
mod error;
mod state;
mod store;

pub use engine::{DEFAULT_REPLAY_INTERVAL, ReplayEngine};
pub use error::Error;
pub use state::{INITIAL_DISPLAY_COUNT, ReplayState};
pub use store::{SavedState, StateStore};
