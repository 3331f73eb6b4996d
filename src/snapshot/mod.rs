//! Published rollup snapshots.
//!
//! The [`RollupMaterializer`] recomputes the four rollups from the
//! observation log and swaps them into the [`SnapshotStore`], where readers
//! address them by item (and date for daily rows) without ever observing a
//! half-written refresh.

pub(crate) mod error;
mod materializer;
mod state;
mod store;

pub use error::PublishError;
pub use materializer::{RefreshReport, RollupMaterializer};
pub use state::{RollupKind, SnapshotReceiver, SnapshotState, SnapshotUpdate};
pub use store::{
    AllTimeSnapshot, DailySnapshot, LatestSnapshot, Snapshot, SnapshotStore, WeeklySnapshot,
};

#[cfg(test)]
mod tests;
