use crate::{Ctx, cmd::Output};

#[derive(Debug, clap::Args)]
pub(crate) struct Status {}

impl Status {
    pub(crate) async fn run(self, ctx: &Ctx) -> Output {
        match ctx.storage.current_filename().await {
            Ok(filename) => Ok(format!("Currently stored file: {filename}").into()),
            Err(gm_client::Error::Api { code: 404, .. }) => {
                Ok("No file currently stored.".into())
            }
            Err(error) => Err(error.into()),
        }
    }
}
