use strum::Display;
use tokio::sync::broadcast;

/// Lifecycle of one published rollup snapshot.
///
/// `Stale` marks a snapshot due for recomputation, `Refreshing` a cycle in
/// flight, `Current` a successfully published result. A failed cycle falls
/// back to `Stale`; readers only ever observe the last `Current` contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SnapshotState {
    Stale,
    Refreshing,
    Current,
}

/// The four rollup kinds the materializer publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display)]
pub enum RollupKind {
    Latest,
    Daily,
    Weekly,
    AllTime,
}

impl RollupKind {
    pub const ALL: [Self; 4] = [Self::Latest, Self::Daily, Self::Weekly, Self::AllTime];
}

/// State-change notification fanned out to snapshot consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotUpdate {
    pub kind: RollupKind,
    pub state: SnapshotState,
}

pub type SnapshotTransmitter = broadcast::Sender<SnapshotUpdate>;
pub type SnapshotReceiver = broadcast::Receiver<SnapshotUpdate>;
