mod client;
mod error;
pub mod types;

pub use client::{MAX_MODEL_PAYLOAD_BYTES, ModelClient, StorageClient};
pub use error::Error;
