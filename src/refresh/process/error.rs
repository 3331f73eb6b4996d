use std::result;

use thiserror::Error;
use tokio::{
    sync::broadcast::error::{RecvError, SendError},
    task::JoinError,
};

use crate::snapshot::PublishError;

#[derive(Error, Debug)]
pub enum RefreshProcessRecoverableError {
    #[error("[Publish] {0}")]
    Publish(#[from] PublishError),
}

#[derive(Error, Debug)]
pub enum RefreshProcessFatalError {
    #[error("TaskJoin error {0}")]
    RefreshProcessTaskJoin(JoinError),

    #[error("Shutdown `RecvError` error: {0}")]
    ShutdownSignalRecv(RecvError),

    #[error("Failed to send refresh process shutdown request error: {0}")]
    SendShutdownSignalFailed(SendError<()>),

    #[error("Refresh shutdown timeout error")]
    ShutdownTimeout,
}

#[derive(Error, Debug)]
pub enum RefreshProcessError {
    #[error(transparent)]
    Recoverable(#[from] RefreshProcessRecoverableError),

    #[error(transparent)]
    Fatal(#[from] RefreshProcessFatalError),
}

pub(crate) type ProcessResult<T> = result::Result<T, RefreshProcessError>;
