//! Application lifecycle on the device under test

use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::session::{Platform, Session};
use crate::{Error, Result};

/// Launches, terminates and removes the app under test
#[derive(Debug, Clone)]
pub struct AppManager {
    session: Arc<Session>,
    app: AppConfig,
    remote_lab: bool,
}

impl AppManager {
    pub fn new(session: Arc<Session>, app: AppConfig, remote_lab: bool) -> Self {
        Self {
            session,
            app,
            remote_lab,
        }
    }

    /// Identifier the platform uses for the app
    fn app_id(&self) -> Result<&str> {
        match self.session.platform() {
            Platform::Android => Ok(&self.app.android_package),
            Platform::Ios => Ok(&self.app.ios_bundle_id),
            Platform::Other(name) => Err(Error::unsupported_platform(name.clone())),
        }
    }

    /// Bring the app to the foreground; skipped in remote-lab mode
    pub fn launch(&self) -> Result<()> {
        if self.remote_lab {
            info!("App launch is not required in remote-lab mode, skipping");
            return Ok(());
        }

        match self.session.platform() {
            Platform::Android => {
                let intent = format!("{}/{}", self.app.android_package, self.app.android_activity);
                debug!("Launching Android app with activity: {}", intent);
                self.session
                    .execute("mobile: startActivity", json!({ "intent": intent }))?;
            }
            Platform::Ios => {
                debug!("Launching iOS app with bundleId: {}", self.app.ios_bundle_id);
                self.session.execute(
                    "mobile: launchApp",
                    json!({ "bundleId": self.app.ios_bundle_id }),
                )?;
            }
            Platform::Other(name) => return Err(Error::unsupported_platform(name.clone())),
        }
        Ok(())
    }

    /// Terminate the app
    pub fn close(&self) -> Result<()> {
        let app_id = self.app_id()?;
        debug!("Terminating app: {}", app_id);
        let key = self.id_key();
        self.session
            .execute("mobile: terminateApp", json!({ key: app_id }))?;
        Ok(())
    }

    /// Uninstall the app; skipped in remote-lab mode
    pub fn remove(&self) -> Result<()> {
        if self.remote_lab {
            info!("App removal is not required in remote-lab mode, skipping");
            return Ok(());
        }

        let app_id = self.app_id()?;
        debug!("Removing app: {}", app_id);
        let key = self.id_key();
        self.session.execute("mobile: removeApp", json!({ key: app_id }))?;
        Ok(())
    }

    fn id_key(&self) -> &'static str {
        match self.session.platform() {
            Platform::Ios => "bundleId",
            _ => "appId",
        }
    }
}
