use std::sync::Arc;

use tokio::{sync::broadcast, time};
use tracing::debug;

use crate::{
    snapshot::RollupMaterializer,
    util::{AbortOnDropHandle, Never},
};

use super::{
    config::{RefreshConfig, RefreshProcessConfig},
    state::{
        RefreshStatus, RefreshStatusManager, RefreshStatusNotRunning, RefreshTransmitter,
        RefreshUpdate,
    },
};

pub(crate) mod error;

use error::{
    ProcessResult, RefreshProcessError, RefreshProcessFatalError, RefreshProcessRecoverableError,
};

pub(super) struct RefreshProcess {
    config: RefreshProcessConfig,
    materializer: Arc<RollupMaterializer>,
    shutdown_tx: broadcast::Sender<()>,
    status_manager: Arc<RefreshStatusManager>,
    update_tx: RefreshTransmitter,
}

impl RefreshProcess {
    pub fn spawn(
        config: &RefreshConfig,
        materializer: Arc<RollupMaterializer>,
        shutdown_tx: broadcast::Sender<()>,
        status_manager: Arc<RefreshStatusManager>,
        update_tx: RefreshTransmitter,
    ) -> AbortOnDropHandle<()> {
        let config = config.into();

        tokio::spawn(async move {
            let process = Self {
                config,
                materializer,
                shutdown_tx,
                status_manager,
                update_tx,
            };

            process.recovery_loop().await
        })
        .into()
    }

    async fn run(&self) -> ProcessResult<Never> {
        self.status_manager.update(RefreshStatus::Running);

        loop {
            let report = self
                .materializer
                .refresh()
                .await
                .map_err(RefreshProcessRecoverableError::Publish)?;

            debug!(
                "Refresh cycle completed as of {}, next in {:?}",
                report.as_of,
                self.config.cycle_interval()
            );

            let _ = self.update_tx.send(RefreshUpdate::Report(report));

            time::sleep(self.config.cycle_interval()).await;
        }
    }

    async fn recovery_loop(self) {
        self.status_manager
            .update(RefreshStatusNotRunning::Starting.into());

        let mut shutdown_rx = self.shutdown_tx.subscribe();

        loop {
            let refresh_process_error = tokio::select! {
                Err(refresh_error) = self.run() => refresh_error,
                shutdown_res = shutdown_rx.recv() => {
                    let Err(e) = shutdown_res else {
                        // Shutdown signal received
                        return;
                    };

                    RefreshProcessFatalError::ShutdownSignalRecv(e).into()
                }
            };

            match refresh_process_error {
                RefreshProcessError::Fatal(err) => {
                    self.status_manager.update(err.into());
                    return;
                }
                RefreshProcessError::Recoverable(err) => {
                    self.status_manager.update(err.into());
                }
            }

            // Handle shutdown signals while waiting for `restart_interval`

            tokio::select! {
                _ = time::sleep(self.config.restart_interval()) => {} // Loop restarts
                shutdown_res = shutdown_rx.recv() => {
                    if let Err(e) = shutdown_res {
                        let status = RefreshProcessFatalError::ShutdownSignalRecv(e).into();
                        self.status_manager.update(status);
                    }
                    return;
                }
            }

            self.status_manager
                .update(RefreshStatusNotRunning::Restarting.into());
        }
    }
}
