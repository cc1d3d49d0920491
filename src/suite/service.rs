//! Local automation endpoint process

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::driver::endpoint_ready;
use crate::wait::Waiter;
use crate::{Error, Result};

/// Log file written by the endpoint inside the report directory
pub const SERVICE_LOG: &str = "appium_server.log";

/// HTTP timeout of a single readiness probe
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Handle for a spawned endpoint process
pub struct EndpointService {
    child: Child,
    url: String,
    log_path: PathBuf,
}

impl EndpointService {
    /// Spawn the endpoint and wait until `/status` answers
    pub fn start(config: &Config, waiter: &Waiter) -> Result<Self> {
        let endpoint = &config.endpoint;
        fs::create_dir_all(&config.report.dir)?;
        let log_path = config.report.dir.join(SERVICE_LOG);

        info!(
            "Starting endpoint service on {}:{}",
            endpoint.host, endpoint.port
        );
        let child = Command::new(&endpoint.node_path)
            .arg(&endpoint.appium_js_path)
            .arg("--address")
            .arg(&endpoint.host)
            .arg("--port")
            .arg(endpoint.port.to_string())
            .arg("--log-no-color")
            .arg("--log")
            .arg(&log_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        debug!("Endpoint service pid {}", child.id());

        let mut service = Self {
            child,
            url: config.endpoint_url(),
            log_path,
        };

        let spec = waiter
            .within(Duration::from_secs(config.timing.service_startup_secs))
            .with_message(format!(
                "Endpoint service at {} did not become ready",
                service.url
            ));
        if let Err(e) = waiter.verify(&spec, || service.probe()) {
            service.stop();
            return Err(e);
        }

        info!("Endpoint service ready at {}", service.url);
        Ok(service)
    }

    fn probe(&mut self) -> Result<bool> {
        if let Some(status) = self.child.try_wait()? {
            return Err(Error::internal(format!(
                "Endpoint service exited during startup with {}",
                status
            )));
        }
        Ok(endpoint_ready(&self.url, PROBE_TIMEOUT))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn is_running(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    /// Kill the process if it is still running
    pub fn stop(&mut self) {
        if let Ok(None) = self.child.try_wait() {
            info!("Stopping endpoint service (pid {})", self.child.id());
            if let Err(e) = self.child.kill() {
                warn!("Failed to stop endpoint service: {}", e);
                return;
            }
            if let Err(e) = self.child.wait() {
                warn!("Failed to reap endpoint service: {}", e);
            }
        }
    }
}

impl Drop for EndpointService {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for EndpointService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointService")
            .field("pid", &self.child.id())
            .field("url", &self.url)
            .finish()
    }
}
