use std::io;

use thiserror::Error;

use crate::infra::http::TransportError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("repository host error: {0}")]
    RepositoryHost(String),
    #[error("issue tracker error: {0}")]
    IssueTracker(String),
    #[error("no commits for the changelog to process")]
    NoCommits,
    #[error("{0} isn't a valid format")]
    UnsupportedFormat(String),
    #[error("render error: {0}")]
    Render(String),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
