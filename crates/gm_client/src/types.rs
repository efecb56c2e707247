use serde::{Deserialize, Serialize};

/// Storage collaborator response to `POST /upload`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,

    /// Public path of the stored file, e.g. `/uploads/current/current.csv`.
    /// Annotates the subsequent model query.
    pub current_path: String,

    pub filename: String,
}

/// Storage collaborator response to `GET /current-filename`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CurrentFilename {
    pub filename: String,
}

/// Request body for `POST /ask_llm`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ModelRequest {
    /// A direct text query.
    Query { query: String },

    /// An encoded file, annotated with its stored path.
    File {
        file: String,

        #[serde(rename = "isBase64")]
        is_base64: bool,

        #[serde(rename = "filePath")]
        file_path: String,
    },
}

impl ModelRequest {
    #[must_use]
    pub fn query(query: impl Into<String>) -> Self {
        Self::Query {
            query: query.into(),
        }
    }

    #[must_use]
    pub fn file(encoded: impl Into<String>, file_path: impl Into<String>) -> Self {
        Self::File {
            file: encoded.into(),
            is_base64: true,
            file_path: file_path.into(),
        }
    }
}

/// Model collaborator response to `POST /ask_llm`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModelResponse {
    pub response: String,
}
