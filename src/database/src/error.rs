use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DatabaseError>;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("dataset io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("dataset json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Neither `<name>.json` nor `<name>.json.gz` exists
    #[error("dataset file not found: {0}")]
    MissingFile(PathBuf),
}
