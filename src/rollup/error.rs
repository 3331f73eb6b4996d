use std::result;

use thiserror::Error;

use crate::db::error::DbError;

#[derive(Error, Debug)]
pub enum RollupError {
    #[error("[Db] {0}")]
    Db(#[from] DbError),
}

pub type Result<T> = result::Result<T, RollupError>;
