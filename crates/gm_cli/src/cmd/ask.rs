use std::io::{BufRead as _, Write as _};

use gm_transcript::{Origin, Transcript};
use tracing::{debug, warn};

use crate::{
    Ctx,
    cmd::{Output, Success},
};

#[derive(Debug, clap::Args)]
pub(crate) struct Ask {
    /// Question for the model. Without it, questions are read from stdin
    /// until end of input.
    query: Option<String>,
}

impl Ask {
    pub(crate) async fn run(self, ctx: &Ctx) -> Output {
        match self.query {
            Some(query) => Self::one_shot(ctx, &query).await,
            None => Self::prompt_loop(ctx).await,
        }
    }

    async fn one_shot(ctx: &Ctx, query: &str) -> Output {
        let query = query.trim();
        if query.is_empty() {
            debug!("Ignoring blank query.");
            return Ok(Success::Ok);
        }

        let mut transcript = Transcript::default();
        ask(ctx, query, &mut transcript).await;

        Ok(transcript.to_string().into())
    }

    async fn prompt_loop(ctx: &Ctx) -> Output {
        let mut transcript = Transcript::default();

        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let Some(line) = read_line() else {
                break;
            };
            let line = line?;

            // The input line is consumed at this point; a failed request
            // only appends an error block.
            let query = line.trim();
            if query.is_empty() {
                continue;
            }

            ask(ctx, query, &mut transcript).await;
            if let Some(segment) = transcript.last() {
                println!("{segment}\n");
            }
        }

        debug!(segments = transcript.len(), "Prompt loop finished.");
        Ok(Success::Ok)
    }
}

async fn ask(ctx: &Ctx, query: &str, transcript: &mut Transcript) {
    match ctx.model.query(query).await {
        Ok(response) => transcript.push_response(Origin::Query, response),
        Err(error) => {
            warn!(%error, "Model query failed.");
            transcript.push_error(Origin::Query, error.to_string());
        }
    }
}

// Locks stdin only for the duration of a single read, so no lock is held
// across an await point.
fn read_line() -> Option<std::io::Result<String>> {
    std::io::stdin().lock().lines().next()
}
