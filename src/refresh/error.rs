use std::{result, sync::Arc};

use thiserror::Error;

use super::{process::error::RefreshProcessFatalError, state::RefreshStatus};

#[derive(Error, Debug)]
pub enum RefreshError {
    #[error("Refresh process already shutdown error")]
    RefreshAlreadyShutdown,

    #[error("Refresh process already terminated error, status: {0}")]
    RefreshAlreadyTerminated(RefreshStatus),

    #[error("Refresh shutdown procedure failed: {0}")]
    RefreshShutdownFailed(Arc<RefreshProcessFatalError>),
}

pub(super) type Result<T> = result::Result<T, RefreshError>;
