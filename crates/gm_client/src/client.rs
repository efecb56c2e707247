use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::{error, trace};

use crate::{
    error::{Error, Result},
    types::{CurrentFilename, ModelRequest, ModelResponse, UploadResponse},
};

/// Ceiling on the encoded content of a model request payload. Oversized
/// payloads fail fast without a network call.
pub const MAX_MODEL_PAYLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Client for the storage collaborator.
#[derive(Debug, Clone)]
pub struct StorageClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl StorageClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Uploads a file as multipart form data (field `file`).
    ///
    /// A non-success HTTP status is an [`Error::Api`]; a malformed response
    /// body is an [`Error::Json`].
    pub async fn upload(&self, filename: &str, contents: Vec<u8>) -> Result<UploadResponse> {
        let url = format!("{}/upload", self.base_url);
        let form = Form::new().part("file", Part::bytes(contents).file_name(filename.to_owned()));

        trace!(%url, filename, "Uploading file to storage.");
        let response = self.http_client.post(&url).multipart(form).send().await?;

        parse_body(response).await
    }

    /// Returns the name of the currently stored file.
    ///
    /// The collaborator answers 404 when nothing is stored, which surfaces
    /// as an [`Error::Api`] with code 404.
    pub async fn current_filename(&self) -> Result<String> {
        let url = format!("{}/current-filename", self.base_url);

        trace!(%url, "Fetching current filename.");
        let response = self.http_client.get(&url).send().await?;

        parse_body::<CurrentFilename>(response)
            .await
            .map(|body| body.filename)
    }
}

/// Client for the model collaborator.
#[derive(Debug, Clone)]
pub struct ModelClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl ModelClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Sends a direct text query.
    pub async fn query(&self, query: &str) -> Result<String> {
        self.ask(&ModelRequest::query(query)).await
    }

    /// Forwards encoded file content, annotated with its stored path.
    ///
    /// Fails fast with [`Error::PayloadTooLarge`] before any network call
    /// when the encoded content exceeds [`MAX_MODEL_PAYLOAD_BYTES`].
    pub async fn analyze_file(
        &self,
        encoded: impl Into<String>,
        file_path: impl Into<String>,
    ) -> Result<String> {
        let encoded = encoded.into();
        if encoded.len() > MAX_MODEL_PAYLOAD_BYTES {
            return Err(Error::PayloadTooLarge {
                size: encoded.len(),
                limit: MAX_MODEL_PAYLOAD_BYTES,
            });
        }

        self.ask(&ModelRequest::file(encoded, file_path)).await
    }

    async fn ask(&self, request: &ModelRequest) -> Result<String> {
        let url = format!("{}/ask_llm", self.base_url);

        trace!(%url, "Triggering model request.");
        let response = self.http_client.post(&url).json(request).send().await?;

        parse_body::<ModelResponse>(response)
            .await
            .map(|body| body.response)
    }
}

/// Turns a non-success status into [`Error::Api`], otherwise deserializes
/// the body.
async fn parse_body<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();

    trace!(
        status = status.as_u16(),
        content_length = response.content_length().unwrap_or_default(),
        "Received response."
    );

    if status.is_client_error() || status.is_server_error() {
        let code = status.as_u16();
        let body = response.text().await.unwrap_or_default();
        error!(code, body, "Unexpected response.");

        return Err(Error::Api {
            code,
            message: body,
        });
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(Into::into)
}
