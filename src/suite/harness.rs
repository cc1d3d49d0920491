//! Suite harness
//!
//! Wraps every test case in the per-test setup and teardown and keeps case
//! failures isolated: a failing case is recorded and the next case runs.

use std::any::Any;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread;
use tracing::{error, info, warn};

use super::device::DeviceLauncher;
use super::service::EndpointService;
use crate::app::AppManager;
use crate::clock::{Clock, SystemClock};
use crate::config::{Config, DeviceProfile};
use crate::pages::PageContext;
use crate::report::{ReportSink, Reporter, Status};
use crate::scenarios::Scenario;
use crate::session::{Platform, Session, SessionConfig, SessionRegistry};
use crate::wait::Waiter;
use crate::{Error, Result};

/// Result of one test case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseOutcome {
    pub name: String,
    pub status: Status,
    pub error: Option<String>,
}

impl CaseOutcome {
    pub fn passed(&self) -> bool {
        self.status == Status::Pass
    }
}

/// Suite-wide orchestration
pub struct Suite {
    config: Config,
    registry: Arc<SessionRegistry>,
    reporter: Arc<Reporter>,
    clock: Arc<dyn Clock>,
    devices: DeviceLauncher,
    service: Mutex<Option<EndpointService>>,
}

impl Suite {
    pub fn new(config: Config, registry: Arc<SessionRegistry>, reporter: Arc<Reporter>) -> Self {
        let devices = DeviceLauncher::new(&config.device, config.remote_lab.enabled);
        Self {
            config,
            registry,
            reporter,
            clock: Arc::new(SystemClock),
            devices,
            service: Mutex::new(None),
        }
    }

    /// Use `clock` for every wait and delay
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    pub fn reporter(&self) -> &Arc<Reporter> {
        &self.reporter
    }

    fn waiter(&self) -> Waiter {
        Waiter::from_timing(self.clock.clone(), &self.config.timing)
    }

    /// Clear previous report files and start the endpoint service
    pub fn before_suite(&self) -> Result<()> {
        clear_dir(&self.config.report.dir)?;

        if self.config.remote_lab.enabled {
            info!("Remote-lab mode, endpoint service not started");
            return Ok(());
        }
        if !self.config.endpoint.manage_service {
            info!("Using externally managed endpoint at {}", self.config.endpoint_url());
            return Ok(());
        }

        let service = EndpointService::start(&self.config, &self.waiter())?;
        *self.service.lock().unwrap_or_else(|e| e.into_inner()) = Some(service);
        Ok(())
    }

    /// Run one test case on the calling thread
    ///
    /// A panicking case is recorded as a failure and still torn down.
    pub fn run_case<F>(&self, name: &str, body: F) -> CaseOutcome
    where
        F: FnOnce(&PageContext) -> Result<()>,
    {
        if let Err(e) = self.reporter.start_test(name) {
            warn!("Failed to open report for '{}': {}", name, e);
        }

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            self.set_up().and_then(|session| {
                let sink: Arc<dyn ReportSink> = self.reporter.clone();
                let ctx = PageContext::new(
                    session,
                    self.waiter(),
                    self.config.timing.clone(),
                    sink,
                );
                body(&ctx)
            })
        }))
        .unwrap_or_else(|payload| {
            error!("Test case '{}' panicked", name);
            Err(Error::internal(format!(
                "Test case panicked: {}",
                panic_message(payload.as_ref())
            )))
        });

        let outcome = match result {
            Ok(()) => {
                self.reporter.pass_test("Test passed");
                CaseOutcome {
                    name: name.to_string(),
                    status: Status::Pass,
                    error: None,
                }
            }
            Err(e) => {
                self.reporter.fail_test(&format!("Test failed: {}", e));
                CaseOutcome {
                    name: name.to_string(),
                    status: Status::Fail,
                    error: Some(e.to_string()),
                }
            }
        };

        self.tear_down();
        self.reporter.finish_test();
        outcome
    }

    fn set_up(&self) -> Result<Arc<Session>> {
        let profile = DeviceProfile::load(self.config.device_profile_path())?;
        if self.config.device.launch {
            self.devices.launch(&profile)?;
        }

        let session_config = SessionConfig::from_settings(&self.config, &profile)?;
        self.registry.configure(session_config)?;
        let session = self.registry.acquire()?;

        if self.config.app.preinstalled {
            self.app(&session).launch()?;
        }
        Ok(session)
    }

    fn tear_down(&self) {
        if let Ok(session) = self.registry.current() {
            if let Err(e) = self.app(&session).close() {
                warn!("Failed to close app: {}", e);
            }
        }
        self.registry.release();
    }

    fn app(&self, session: &Arc<Session>) -> AppManager {
        AppManager::new(
            session.clone(),
            self.config.app.clone(),
            self.config.remote_lab.enabled,
        )
    }

    /// Run `scenarios`, on worker threads when `parallel` is set
    pub fn run_all(&self, scenarios: &[Scenario]) -> Vec<CaseOutcome> {
        if !self.config.parallel {
            return scenarios
                .iter()
                .map(|s| self.run_case(s.name, s.run))
                .collect();
        }

        thread::scope(|scope| {
            let workers: Vec<_> = scenarios
                .iter()
                .map(|s| scope.spawn(move || self.run_case(s.name, s.run)))
                .collect();

            workers
                .into_iter()
                .zip(scenarios)
                .map(|(worker, s)| {
                    worker.join().unwrap_or_else(|_| {
                        error!("Test case '{}' panicked", s.name);
                        CaseOutcome {
                            name: s.name.to_string(),
                            status: Status::Fail,
                            error: Some("test case panicked".to_string()),
                        }
                    })
                })
                .collect()
        })
    }

    /// Write the report, stop the endpoint service and shut down devices
    pub fn after_suite(&self) -> Result<PathBuf> {
        let path = self.reporter.build_report()?;
        self.registry.shutdown();

        if let Some(mut service) = self
            .service
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            service.stop();
        }

        if self.config.device.launch {
            match DeviceProfile::load(self.config.device_profile_path()) {
                Ok(profile) => {
                    let platform = Platform::parse(&profile.platform_name);
                    if let Err(e) = self.devices.shutdown(&platform) {
                        warn!("Failed to shut down devices: {}", e);
                    }
                }
                Err(e) => warn!("Skipping device shutdown: {}", e),
            }
        }

        Ok(path)
    }
}

impl std::fmt::Debug for Suite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Suite")
            .field("endpoint", &self.config.endpoint_url())
            .field("parallel", &self.config.parallel)
            .finish()
    }
}

/// Remove the files directly inside `dir`, creating it when missing
fn clear_dir(dir: &std::path::Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
        return Ok(());
    }

    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            fs::remove_file(&path)?;
            removed += 1;
        }
    }
    info!("Cleared {} files from {}", removed, dir.display());
    Ok(())
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
