use std::sync::{Arc, Mutex};

use tokio::{
    sync::broadcast::{self, error::RecvError},
    time,
};

use crate::{snapshot::RollupMaterializer, util::AbortOnDropHandle};

use super::{
    config::{RefreshConfig, RefreshControllerConfig},
    error::{RefreshError, Result},
    process::{RefreshProcess, error::RefreshProcessFatalError},
    state::{
        RefreshReader, RefreshReceiver, RefreshStatus, RefreshStatusManager, RefreshTransmitter,
        RefreshUpdate,
    },
};

/// Controller for managing and monitoring a running refresh process.
///
/// `RefreshController` provides an interface to monitor refresh status and
/// perform graceful shutdown operations. It holds a handle to the running
/// refresh task and coordinates shutdown signals.
#[derive(Debug)]
pub struct RefreshController {
    config: RefreshControllerConfig,
    handle: Mutex<Option<AbortOnDropHandle<()>>>,
    shutdown_tx: broadcast::Sender<()>,
    status_manager: Arc<RefreshStatusManager>,
}

impl RefreshController {
    fn new(
        config: &RefreshConfig,
        handle: AbortOnDropHandle<()>,
        shutdown_tx: broadcast::Sender<()>,
        status_manager: Arc<RefreshStatusManager>,
    ) -> Arc<Self> {
        Arc::new(Self {
            config: config.into(),
            handle: Mutex::new(Some(handle)),
            shutdown_tx,
            status_manager,
        })
    }

    /// Returns a [`RefreshReader`] interface for accessing refresh status and
    /// updates.
    pub fn reader(&self) -> Arc<dyn RefreshReader> {
        self.status_manager.clone()
    }

    /// Creates a new [`RefreshReceiver`] for subscribing to status updates
    /// and cycle reports.
    pub fn update_receiver(&self) -> RefreshReceiver {
        self.status_manager.update_receiver()
    }

    /// Returns the current [`RefreshStatus`] as a snapshot.
    pub fn status_snapshot(&self) -> RefreshStatus {
        self.status_manager.status_snapshot()
    }

    fn try_consume_handle(&self) -> Option<AbortOnDropHandle<()>> {
        self.handle
            .lock()
            .expect("`RefreshController` mutex can't be poisoned")
            .take()
    }

    /// Tries to perform a clean shutdown of the refresh process and consumes
    /// the task handle.
    ///
    /// If a clean shutdown fails, the process is aborted. This method can
    /// only be called once per controller instance.
    ///
    /// Returns an error if the process had to be aborted, or if the handle
    /// was already consumed.
    pub async fn shutdown(&self) -> Result<()> {
        let Some(mut handle) = self.try_consume_handle() else {
            return Err(RefreshError::RefreshAlreadyShutdown);
        };

        if handle.is_finished() {
            let status = self.status_manager.status_snapshot();
            return Err(RefreshError::RefreshAlreadyTerminated(status));
        }

        self.status_manager.update(RefreshStatus::ShutdownInitiated);

        let shutdown_send_res = self.shutdown_tx.send(()).map_err(|e| {
            handle.abort();
            RefreshProcessFatalError::SendShutdownSignalFailed(e)
        });

        let shutdown_res = match shutdown_send_res {
            Ok(_) => {
                tokio::select! {
                    join_res = &mut handle => {
                        join_res.map_err(RefreshProcessFatalError::RefreshProcessTaskJoin)
                    }
                    _ = time::sleep(self.config.shutdown_timeout()) => {
                        handle.abort();
                        Err(RefreshProcessFatalError::ShutdownTimeout)
                    }
                }
            }
            Err(e) => Err(e),
        };

        if let Err(e) = shutdown_res {
            let e_ref = Arc::new(e);
            self.status_manager.update(e_ref.clone().into());

            return Err(RefreshError::RefreshShutdownFailed(e_ref));
        }

        self.status_manager.update(RefreshStatus::Shutdown);
        Ok(())
    }

    /// Waits until the refresh process has stopped and returns the final
    /// status.
    pub async fn until_stopped(&self) -> RefreshStatus {
        let mut refresh_rx = self.update_receiver();

        let status = self.status_snapshot();
        if status.is_stopped() {
            return status;
        }

        loop {
            match refresh_rx.recv().await {
                Ok(refresh_update) => {
                    if let RefreshUpdate::Status(status) = refresh_update
                        && status.is_stopped()
                    {
                        return status;
                    }
                }
                Err(RecvError::Lagged(_)) => {
                    let status = self.status_snapshot();
                    if status.is_stopped() {
                        return status;
                    }
                }
                Err(RecvError::Closed) => return self.status_snapshot(),
            }
        }
    }
}

/// Builder for configuring and starting the scheduled refresh engine.
///
/// `RefreshEngine` encapsulates the configuration and the materializer whose
/// cycles it drives. The refresh process is spawned when
/// [`start`](Self::start) is called, and a [`RefreshController`] is returned
/// for monitoring and management.
pub struct RefreshEngine {
    config: RefreshConfig,
    materializer: Arc<RollupMaterializer>,
    status_manager: Arc<RefreshStatusManager>,
    update_tx: RefreshTransmitter,
}

impl RefreshEngine {
    /// Creates a new refresh engine driving the given materializer.
    pub fn new(config: impl Into<RefreshConfig>, materializer: Arc<RollupMaterializer>) -> Self {
        let (update_tx, _) = broadcast::channel::<RefreshUpdate>(1_000);

        let status_manager = RefreshStatusManager::new(update_tx.clone());

        Self {
            config: config.into(),
            materializer,
            status_manager,
            update_tx,
        }
    }

    /// Returns a reader interface for accessing refresh status and updates.
    pub fn reader(&self) -> Arc<dyn RefreshReader> {
        self.status_manager.clone()
    }

    /// Creates a new receiver for subscribing to status updates and cycle
    /// reports.
    pub fn update_receiver(&self) -> RefreshReceiver {
        self.status_manager.update_receiver()
    }

    /// Returns the current refresh status as a snapshot.
    pub fn status_snapshot(&self) -> RefreshStatus {
        self.status_manager.status_snapshot()
    }

    /// Starts the refresh process and returns a [`RefreshController`] for
    /// managing it.
    ///
    /// This consumes the engine and spawns the refresh task in the
    /// background.
    pub fn start(self) -> Arc<RefreshController> {
        let (shutdown_tx, _) = broadcast::channel::<()>(1);

        let handle = RefreshProcess::spawn(
            &self.config,
            self.materializer,
            shutdown_tx.clone(),
            self.status_manager.clone(),
            self.update_tx,
        );

        RefreshController::new(&self.config, handle, shutdown_tx, self.status_manager)
    }
}
