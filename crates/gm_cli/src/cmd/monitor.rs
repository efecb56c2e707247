use std::path::PathBuf;

use gm_replay::{ReplayEngine, StateStore};
use gm_telemetry::Dataset;
use tracing::{debug, info};

use crate::{Ctx, cmd::Output};

#[derive(Debug, clap::Args)]
pub(crate) struct Monitor {
    /// Telemetry dataset to replay.
    #[arg(long, value_name = "CSV")]
    dataset: PathBuf,

    /// Discard the persisted session and start over.
    #[arg(long)]
    reset: bool,
}

impl Monitor {
    pub(crate) async fn run(self, ctx: &Ctx) -> Output {
        let dataset = Dataset::from_path(&self.dataset)?;
        info!(
            path = %self.dataset.display(),
            rows = dataset.len(),
            "Loaded telemetry dataset."
        );

        let store = StateStore::new(ctx.config.state_file());
        let mut engine = ReplayEngine::resume(dataset, store);
        if self.reset {
            engine.reset()?;
        }

        for row in engine.state().revealed() {
            println!("{row}");
        }

        let mut interval = tokio::time::interval(ctx.config.replay_interval());
        interval.tick().await;

        while !engine.is_settled() {
            interval.tick().await;
            if let Some(row) = engine.tick()? {
                println!("{row}");
            }
        }

        debug!(cursor = engine.state().cursor(), "Replay settled.");
        Ok("Replay complete.".into())
    }
}
