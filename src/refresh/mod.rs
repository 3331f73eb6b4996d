//! Scheduled snapshot refresh.
//!
//! The [`RefreshEngine`] spawns a background task that periodically drives
//! the [`RollupMaterializer`](crate::snapshot::RollupMaterializer) and
//! broadcasts cycle reports. The returned [`RefreshController`] monitors the
//! task and shuts it down gracefully.

mod config;
mod engine;
pub(crate) mod error;
pub(crate) mod process;
mod state;

pub use config::RefreshConfig;
pub use engine::{RefreshController, RefreshEngine};
pub use error::RefreshError;
pub use process::error::{
    RefreshProcessError, RefreshProcessFatalError, RefreshProcessRecoverableError,
};
pub use state::{
    RefreshReader, RefreshReceiver, RefreshStatus, RefreshStatusNotRunning, RefreshUpdate,
};
