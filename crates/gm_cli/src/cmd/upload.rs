use std::path::PathBuf;

use gm_queue::UploadQueue;
use gm_transcript::Transcript;
use tracing::debug;

use crate::{Ctx, cmd::Output};

#[derive(Debug, clap::Args)]
pub(crate) struct Upload {
    /// CSV files to process, in order.
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,
}

impl Upload {
    pub(crate) async fn run(self, ctx: &Ctx) -> Output {
        let mut transcript = Transcript::default();
        let mut queue = UploadQueue::new().with_step_delay(ctx.config.step_delay());

        for file in self.files {
            queue.enqueue(file, &mut transcript);
        }

        debug!(files = queue.len(), "Draining upload queue.");
        queue.run(&ctx.storage, &ctx.model, &mut transcript).await;

        Ok(transcript.to_string().into())
    }
}
