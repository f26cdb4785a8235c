use thiserror::Error;

/// Internal failure detail for one store operation.
///
/// Never crosses the [`EntryStore`](crate::EntryStore) boundary: public
/// operations log the error and degrade to an absent result.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("store returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("store response contained no rows")]
    NoRows,
}
