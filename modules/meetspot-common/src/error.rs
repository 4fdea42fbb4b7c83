use thiserror::Error;

#[derive(Error, Debug)]
pub enum MeetSpotError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upstream source error: {0}")]
    Upstream(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
