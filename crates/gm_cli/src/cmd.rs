mod ask;
mod monitor;
mod status;
mod upload;

use crate::{Ctx, error::Error};

#[derive(Debug, clap::Subcommand)]
pub(crate) enum Commands {
    /// Upload CSV files and collect the model's analysis of each.
    #[command(visible_alias = "u")]
    Upload(upload::Upload),

    /// Ask the model a question, directly or interactively.
    #[command(visible_alias = "a")]
    Ask(ask::Ask),

    /// Replay a recorded telemetry dataset row by row.
    #[command(visible_alias = "m")]
    Monitor(monitor::Monitor),

    /// Show which file the storage collaborator currently holds.
    Status(status::Status),
}

impl Commands {
    pub(crate) async fn run(self, ctx: &Ctx) -> Output {
        match self {
            Commands::Upload(args) => args.run(ctx).await,
            Commands::Ask(args) => args.run(ctx).await,
            Commands::Monitor(args) => args.run(ctx).await,
            Commands::Status(args) => args.run(ctx).await,
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            Commands::Upload(_) => "upload",
            Commands::Ask(_) => "ask",
            Commands::Monitor(_) => "monitor",
            Commands::Status(_) => "status",
        }
    }
}

pub(crate) type Output = std::result::Result<Success, Error>;

/// The type of output that should be printed to the screen.
#[derive(Debug)]
pub(crate) enum Success {
    /// The command was successful.
    Ok,

    /// Single message to be printed to the screen.
    Message(String),
}

impl From<()> for Success {
    fn from(_value: ()) -> Self {
        Self::Ok
    }
}

impl From<String> for Success {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}

impl From<&str> for Success {
    fn from(value: &str) -> Self {
        value.to_string().into()
    }
}
