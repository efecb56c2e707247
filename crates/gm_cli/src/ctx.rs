use gm_client::{ModelClient, StorageClient};

use crate::config::Config;

/// Shared command context: the resolved configuration and one client per
/// collaborator.
#[derive(Debug)]
pub(crate) struct Ctx {
    pub config: Config,
    pub storage: StorageClient,
    pub model: ModelClient,
}

impl Ctx {
    pub(crate) fn new(config: Config) -> Self {
        let storage = StorageClient::new(config.storage_url.clone());
        let model = ModelClient::new(config.model_url.clone());

        Self {
            config,
            storage,
            model,
        }
    }
}
