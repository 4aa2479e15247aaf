use std::io;

use thiserror::Error;

/// Any failure surfaced by the persistence backend. The display text is the
/// underlying message so the UI can append it to "Error adding book: ..." and
/// friends without repeating itself.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("could not create data directory: {0}")]
    DataDir(#[source] io::Error),
}
