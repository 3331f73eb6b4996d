use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard},
};

use tokio::sync::broadcast;

use crate::snapshot::RefreshReport;

use super::process::error::{RefreshProcessFatalError, RefreshProcessRecoverableError};

/// Detailed status when the refresh process is not actively cycling.
#[derive(Debug, Clone)]
pub enum RefreshStatusNotRunning {
    /// Refresh process has not been started yet.
    NotInitiated,
    /// Refresh process is initializing.
    Starting,
    /// Refresh process encountered a recoverable error.
    Failed(Arc<RefreshProcessRecoverableError>),
    /// Refresh process is restarting after an error.
    Restarting,
}

impl fmt::Display for RefreshStatusNotRunning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInitiated => write!(f, "Not initiated"),
            Self::Starting => write!(f, "Starting"),
            Self::Failed(error) => write!(f, "Failed: {error}"),
            Self::Restarting => write!(f, "Restarting"),
        }
    }
}

/// Overall status of the scheduled refresh process.
#[derive(Debug, Clone)]
pub enum RefreshStatus {
    /// Refresh cycles are not actively running.
    NotRunning(RefreshStatusNotRunning),
    /// Refresh cycles are running on schedule.
    Running,
    /// Shutdown has been requested and is in progress.
    ShutdownInitiated,
    /// Refresh process has been gracefully shut down.
    Shutdown,
    /// Refresh process terminated due to a fatal error.
    Terminated(Arc<RefreshProcessFatalError>),
}

impl RefreshStatus {
    /// Returns `true` if the refresh process has stopped (either shut down or
    /// terminated).
    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Shutdown | Self::Terminated(_))
    }
}

impl fmt::Display for RefreshStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotRunning(status) => write!(f, "Not running ({status})"),
            Self::Running => write!(f, "Running"),
            Self::ShutdownInitiated => write!(f, "Shutdown initiated"),
            Self::Shutdown => write!(f, "Shutdown"),
            Self::Terminated(error) => write!(f, "Terminated: {error}"),
        }
    }
}

impl From<RefreshStatusNotRunning> for RefreshStatus {
    fn from(value: RefreshStatusNotRunning) -> Self {
        Self::NotRunning(value)
    }
}

impl From<RefreshProcessRecoverableError> for RefreshStatus {
    fn from(value: RefreshProcessRecoverableError) -> Self {
        RefreshStatusNotRunning::Failed(Arc::new(value)).into()
    }
}

impl From<Arc<RefreshProcessFatalError>> for RefreshStatus {
    fn from(value: Arc<RefreshProcessFatalError>) -> Self {
        Self::Terminated(value)
    }
}

impl From<RefreshProcessFatalError> for RefreshStatus {
    fn from(value: RefreshProcessFatalError) -> Self {
        Arc::new(value).into()
    }
}

/// Update events emitted by the scheduled refresh process.
#[derive(Debug, Clone)]
pub enum RefreshUpdate {
    /// Refresh process status has changed.
    Status(RefreshStatus),
    /// A refresh cycle completed and published new snapshots.
    Report(RefreshReport),
}

impl From<RefreshStatus> for RefreshUpdate {
    fn from(value: RefreshStatus) -> Self {
        Self::Status(value)
    }
}

pub(crate) type RefreshTransmitter = broadcast::Sender<RefreshUpdate>;

/// Receiver for subscribing to [`RefreshUpdate`]s.
pub type RefreshReceiver = broadcast::Receiver<RefreshUpdate>;

/// Trait for reading refresh status and subscribing to updates.
pub trait RefreshReader: Send + Sync + 'static {
    /// Creates a new [`RefreshReceiver`] for subscribing to refresh updates.
    fn update_receiver(&self) -> RefreshReceiver;

    /// Returns the current [`RefreshStatus`] as a snapshot.
    fn status_snapshot(&self) -> RefreshStatus;
}

#[derive(Debug)]
pub(crate) struct RefreshStatusManager {
    status: Mutex<RefreshStatus>,
    update_tx: RefreshTransmitter,
}

impl RefreshStatusManager {
    pub fn new(update_tx: RefreshTransmitter) -> Arc<Self> {
        let status = Mutex::new(RefreshStatusNotRunning::NotInitiated.into());

        Arc::new(Self { status, update_tx })
    }

    fn lock_status(&self) -> MutexGuard<'_, RefreshStatus> {
        self.status
            .lock()
            .expect("`RefreshStatusManager` mutex can't be poisoned")
    }

    pub fn update(&self, new_status: RefreshStatus) {
        let mut status_guard = self.lock_status();
        *status_guard = new_status.clone();
        drop(status_guard);

        // Ignore no-receivers errors
        let _ = self.update_tx.send(new_status.into());
    }
}

impl RefreshReader for RefreshStatusManager {
    fn update_receiver(&self) -> RefreshReceiver {
        self.update_tx.subscribe()
    }

    fn status_snapshot(&self) -> RefreshStatus {
        self.lock_status().clone()
    }
}
