use std::result;

use thiserror::Error;

use crate::rollup::error::RollupError;

/// Failure of one materialization cycle. The prior Current snapshots are
/// untouched; the cycle is retryable.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("[Aggregation] {0}")]
    Aggregation(#[from] RollupError),
}

pub type Result<T> = result::Result<T, PublishError>;
