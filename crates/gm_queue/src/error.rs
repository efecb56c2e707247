pub(crate) type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Not a CSV file: {0}")]
    NotCsv(String),

    #[error("File too large: {name} is {size} bytes, the limit is {limit} bytes")]
    TooLarge { name: String, size: u64, limit: u64 },

    #[error("Failed to read file: {0}")]
    Read(#[source] std::io::Error),

    #[error("Upload failed: {0}")]
    Upload(#[source] gm_client::Error),

    #[error("Model request failed: {0}")]
    Model(#[source] gm_client::Error),
}

#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        if std::mem::discriminant(self) != std::mem::discriminant(other) {
            return false;
        }

        // Good enough for testing purposes
        format!("{self:?}") == format!("{other:?}")
    }
}
