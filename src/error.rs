use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure taxonomy for the whole crate.
///
/// Remote failures carry the backend's own message and are propagated
/// unchanged; business-rule violations carry a fixed user-facing message.
/// Absence conditions (no session, no holiday on a date) are ordinary
/// `Ok(None)` / `false` results and never show up here.
#[derive(Debug, Error)]
pub enum Error {
    /// Error reported by the hosted backend (validation, RLS, conflict...).
    #[error("{0}")]
    Gateway(String),

    /// Transport-level failure talking to the hosted backend.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// A single-row lookup matched nothing.
    #[error("Record not found")]
    NotFound,

    /// Business rule raised locally by a service, e.g. "Already checked in today".
    #[error("{0}")]
    Rule(&'static str),

    /// Session-store operation attempted without a signed-in user.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// A row coming back from the backend did not match the expected shape.
    #[error("malformed row: {0}")]
    Decode(#[from] serde_json::Error),
}
