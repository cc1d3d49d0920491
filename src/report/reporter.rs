//! Reporter implementation
//!
//! Suite-wide owner of the thread to [`ReportHandle`] map. Step events are
//! mirrored to the log; pass and fail steps attach a device screenshot.

use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{error, info, warn};

use super::handle::ReportHandle;
use super::types::{Status, SuiteReport};
use crate::config::ReportConfig;
use crate::session::{SessionRegistry, ThreadScoped};
use crate::Result;

/// File name of the generated report
pub const REPORT_FILE: &str = "report.json";

/// Receives step outcomes
pub trait ReportSink: Send + Sync {
    fn pass(&self, message: &str);
    fn fail(&self, message: &str);
    fn info(&self, message: &str);
}

/// Provides PNG screenshots of the calling thread's device
pub trait ScreenshotSource: Send + Sync {
    fn capture(&self) -> Result<Vec<u8>>;
}

impl ScreenshotSource for SessionRegistry {
    fn capture(&self) -> Result<Vec<u8>> {
        self.current()?.screenshot()
    }
}

/// Suite-wide reporter
pub struct Reporter {
    title: String,
    name: String,
    dir: PathBuf,
    screenshots: Option<Arc<dyn ScreenshotSource>>,
    active: ThreadScoped<ReportHandle>,
    finished: Mutex<Vec<Arc<ReportHandle>>>,
}

impl Reporter {
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            title: config.title.clone(),
            name: config.name.clone(),
            dir: config.dir.clone(),
            screenshots: None,
            active: ThreadScoped::new(),
            finished: Mutex::new(Vec::new()),
        }
    }

    /// Attach screenshots from `source` to pass and fail events
    pub fn with_screenshots(mut self, source: Arc<dyn ScreenshotSource>) -> Self {
        self.screenshots = Some(source);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the generated report
    pub fn report_path(&self) -> PathBuf {
        self.dir.join(REPORT_FILE)
    }

    /// Open a handle for a test starting on the calling thread
    pub fn start_test(&self, name: &str) -> Result<Arc<ReportHandle>> {
        if let Some(previous) = self.active.set(ReportHandle::new(name))? {
            warn!("Test '{}' was not finished before '{}' started", previous.name(), name);
            self.retire(previous);
        }

        info!("Test started: {}", name);
        let handle = self
            .active
            .get()?
            .ok_or_else(|| crate::Error::internal("Report handle missing after start"))?;
        handle.record(Status::Info, format!("Test started: {}", name), None);
        Ok(handle)
    }

    /// Handle of the calling thread's running test
    pub fn current(&self) -> Option<Arc<ReportHandle>> {
        self.active.get().ok().flatten()
    }

    /// Record a passed step with a screenshot
    pub fn pass_step(&self, message: &str) {
        info!("{}", message);
        self.record(Status::Pass, message, true);
    }

    /// Record a failed step with a screenshot
    pub fn fail_step(&self, message: &str) {
        error!("{}", message);
        self.record(Status::Fail, message, true);
    }

    /// Record an informational message
    pub fn log_info(&self, message: &str) {
        info!("{}", message);
        self.record(Status::Info, message, false);
    }

    /// Mark the running test as passed
    pub fn pass_test(&self, message: &str) {
        info!("Test passed: {}", message);
        self.record(Status::Pass, message, true);
        if let Some(handle) = self.current() {
            handle.mark(Status::Pass);
        }
    }

    /// Mark the running test as failed
    pub fn fail_test(&self, message: &str) {
        error!("Test failed: {}", message);
        self.record(Status::Fail, message, true);
        if let Some(handle) = self.current() {
            handle.mark(Status::Fail);
        }
    }

    /// Seal and detach the calling thread's handle
    pub fn finish_test(&self) -> Option<Arc<ReportHandle>> {
        match self.active.remove() {
            Ok(Some(handle)) => {
                self.retire(handle.clone());
                Some(handle)
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to finish test report: {}", e);
                None
            }
        }
    }

    /// Seal every handle and write the report document
    pub fn build_report(&self) -> Result<PathBuf> {
        for handle in self.active.drain()? {
            warn!("Sealing unfinished test '{}'", handle.name());
            self.retire(handle);
        }

        let tests: Vec<_> = self
            .finished
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|h| h.record_snapshot())
            .collect();

        let report = SuiteReport {
            title: self.title.clone(),
            name: self.name.clone(),
            generated_at: Utc::now(),
            passed: tests.iter().filter(|t| t.status == Some(Status::Pass)).count(),
            failed: tests.iter().filter(|t| t.status == Some(Status::Fail)).count(),
            tests,
        };

        fs::create_dir_all(&self.dir)?;
        let path = self.report_path();
        fs::write(&path, serde_json::to_string_pretty(&report)?)?;
        info!("Generated report: {}", path.display());
        Ok(path)
    }

    fn retire(&self, handle: Arc<ReportHandle>) {
        handle.seal();
        self.finished
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(handle);
    }

    fn record(&self, status: Status, message: &str, screenshot: bool) {
        let handle = match self.current() {
            Some(handle) => handle,
            None => {
                warn!("No running test on this thread for event: {}", message);
                return;
            }
        };

        let file = if screenshot { self.take_screenshot() } else { None };
        handle.record(status, message, file);
    }

    /// Save a screenshot into the report directory and return its file name
    ///
    /// Failures are logged and yield `None` so they never mask the step outcome.
    pub fn take_screenshot(&self) -> Option<String> {
        let source = self.screenshots.as_ref()?;

        let png = match source.capture() {
            Ok(png) => png,
            Err(e) => {
                warn!("Error while capturing screenshot: {}", e);
                return None;
            }
        };

        let file_name = format!(
            "screenshot_{}_{}.png",
            Utc::now().format("%Y%m%d_%H%M%S_%3f"),
            &uuid::Uuid::new_v4().simple().to_string()[..8]
        );
        let path = self.dir.join(&file_name);

        let written = fs::create_dir_all(&self.dir).and_then(|_| fs::write(&path, png));
        match written {
            Ok(()) => {
                info!("Screenshot saved at: {}", path.display());
                Some(file_name)
            }
            Err(e) => {
                warn!("Error while saving screenshot {}: {}", path.display(), e);
                None
            }
        }
    }
}

impl ReportSink for Reporter {
    fn pass(&self, message: &str) {
        self.pass_step(message);
    }

    fn fail(&self, message: &str) {
        self.fail_step(message);
    }

    fn info(&self, message: &str) {
        self.log_info(message);
    }
}

impl std::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter")
            .field("title", &self.title)
            .field("name", &self.name)
            .field("dir", &self.dir)
            .field("active", &self.active.len())
            .finish()
    }
}
