use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures of the subscriber store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the persisted subscriber file failed.
    #[error("subscriber storage error: {0}")]
    Storage(#[from] io::Error),

    /// The persisted file exists but is not a valid subscriber list.
    /// Raised at load instead of starting with an empty set.
    #[error("corrupt subscriber file {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures while fetching a quote.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// The upstream request failed: unreachable, non-2xx, or an
    /// unparseable body.
    #[error("quote request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The upstream answered but carried no usable price.
    #[error("no quote data available for {symbol}")]
    NoData { symbol: String },
}
