use thiserror::Error;

#[derive(Error, Debug)]
pub enum StudioError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid time period '{0}': expected \"week\" or \"month\"")]
    InvalidPeriod(String),

    #[error("No save found for run '{run_id}' in slot '{slot}'")]
    SaveNotFound { run_id: String, slot: String },

    #[error("Unknown {kind} '{id}'")]
    NotFound { kind: &'static str, id: String },

    #[error("Game has ended; command '{0}' rejected")]
    GameEnded(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type StudioResult<T> = Result<T, StudioError>;

/// Result type returned by collaborator hooks. Failures are logged at the
/// dispatch site and never abort a time step.
pub type HookResult<T = ()> = anyhow::Result<T>;
