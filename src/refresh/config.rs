use tokio::time;

/// Configuration for the scheduled refresh engine.
#[derive(Clone, Debug)]
pub struct RefreshConfig {
    cycle_interval: time::Duration,
    restart_interval: time::Duration,
    shutdown_timeout: time::Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            cycle_interval: time::Duration::from_secs(2 * 60 * 60),
            restart_interval: time::Duration::from_secs(10),
            shutdown_timeout: time::Duration::from_secs(6),
        }
    }
}

impl RefreshConfig {
    /// Returns the interval between successful refresh cycles.
    pub fn cycle_interval(&self) -> time::Duration {
        self.cycle_interval
    }

    /// Returns how long the process waits before restarting after a
    /// recoverable error.
    pub fn restart_interval(&self) -> time::Duration {
        self.restart_interval
    }

    /// Returns the maximum time to wait for a clean shutdown before aborting
    /// the refresh task.
    pub fn shutdown_timeout(&self) -> time::Duration {
        self.shutdown_timeout
    }

    pub fn set_cycle_interval(mut self, cycle_interval: time::Duration) -> Self {
        self.cycle_interval = cycle_interval;
        self
    }

    pub fn set_restart_interval(mut self, restart_interval: time::Duration) -> Self {
        self.restart_interval = restart_interval;
        self
    }

    pub fn set_shutdown_timeout(mut self, shutdown_timeout: time::Duration) -> Self {
        self.shutdown_timeout = shutdown_timeout;
        self
    }
}

#[derive(Clone, Debug)]
pub(crate) struct RefreshControllerConfig {
    shutdown_timeout: time::Duration,
}

impl RefreshControllerConfig {
    pub fn shutdown_timeout(&self) -> time::Duration {
        self.shutdown_timeout
    }
}

impl From<&RefreshConfig> for RefreshControllerConfig {
    fn from(config: &RefreshConfig) -> Self {
        Self {
            shutdown_timeout: config.shutdown_timeout(),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct RefreshProcessConfig {
    cycle_interval: time::Duration,
    restart_interval: time::Duration,
}

impl RefreshProcessConfig {
    pub fn cycle_interval(&self) -> time::Duration {
        self.cycle_interval
    }

    pub fn restart_interval(&self) -> time::Duration {
        self.restart_interval
    }
}

impl From<&RefreshConfig> for RefreshProcessConfig {
    fn from(config: &RefreshConfig) -> Self {
        Self {
            cycle_interval: config.cycle_interval(),
            restart_interval: config.restart_interval(),
        }
    }
}
