use thiserror::Error;

pub type Result<T> = std::result::Result<T, OptimizerError>;

#[derive(Error, Debug)]
pub enum OptimizerError {
    #[error("squad is incomplete: {0} of 15 players")]
    IncompleteSquad(usize),

    /// A directive outside {0, n, W, F, T0, T1, B0, B1}; always a caller bug
    #[error("unrecognized transfer directive: {0}")]
    UnrecognizedDirective(String),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Persisted leaf count disagrees with the closed-form count
    #[error("strategy search incomplete: expected {expected} leaves, found {found}")]
    IncompleteSearch { expected: u64, found: u64 },

    #[error("no strategies found for tag {0}")]
    NoStrategies(String),

    #[error("strategy worker failed: {0}")]
    WorkerPanicked(String),

    #[error("leaf storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("leaf serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
