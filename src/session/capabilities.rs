//! Session configuration and capability construction

use serde_json::{json, Map, Value};
use std::fmt;
use std::time::Duration;

use super::platform::Platform;
use crate::config::{Config, DeviceProfile};
use crate::{Error, Result};

/// Vendor options key used by the remote device lab
pub const REMOTE_LAB_OPTIONS: &str = "perfecto:options";

const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(300);

/// Everything needed to open one remote session
#[derive(Clone)]
pub struct SessionConfig {
    pub platform: Platform,
    pub endpoint: String,
    pub capabilities: Map<String, Value>,
    pub command_timeout: Duration,
    pub remote_lab: bool,
}

impl SessionConfig {
    /// Create a config for `platform` against `endpoint`
    ///
    /// Fails with a configuration error when the platform is outside the
    /// supported set or the endpoint is not an http(s) URL.
    pub fn new(platform: Platform, endpoint: impl Into<String>) -> Result<Self> {
        if !platform.is_supported() {
            return Err(Error::configuration(format!(
                "Unsupported platform variant '{}'",
                platform
            )));
        }

        let endpoint = endpoint.into();
        validate_endpoint(&endpoint)?;

        let mut capabilities = Map::new();
        capabilities.insert("platformName".to_string(), json!(platform.name()));

        Ok(Self {
            platform,
            endpoint,
            capabilities,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            remote_lab: false,
        })
    }

    pub fn with_capability(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.capabilities.insert(key.into(), value.into());
        self
    }

    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Build the session config for one test case from suite settings and the device profile
    pub fn from_settings(config: &Config, profile: &DeviceProfile) -> Result<Self> {
        let platform = Platform::requested(&profile.platform_name)?;
        let command_timeout = Duration::from_secs(config.endpoint.command_timeout_secs);
        let mut session = Self::new(platform.clone(), config.endpoint_url())?
            .with_command_timeout(command_timeout);

        if config.remote_lab.enabled {
            session.remote_lab = true;
            let options = remote_lab_options(config, profile);
            return Ok(session.with_capability(REMOTE_LAB_OPTIONS, options));
        }

        require(&profile.device_name, "device_name")?;
        let app = &config.app;
        let command_timeout = config.endpoint.command_timeout_secs;

        session = session.with_capability("appium:deviceName", profile.device_name.clone());

        match platform {
            Platform::Android => {
                let automation = profile
                    .automation_name
                    .clone()
                    .unwrap_or_else(|| "UiAutomator2".to_string());
                session = session
                    .with_capability("appium:automationName", automation)
                    .with_capability("appium:newCommandTimeout", command_timeout)
                    .with_capability("appium:autoGrantPermissions", true)
                    .with_capability("appium:avdLaunchTimeout", 60_000)
                    .with_capability("appium:avdReadyTimeout", 60_000)
                    .with_capability("appium:uiautomator2ServerInstallTimeout", 120_000);

                if !app.preinstalled {
                    session = session
                        .with_capability("appium:app", app.apk_path.display().to_string())
                        .with_capability("appium:appPackage", app.android_package.clone())
                        .with_capability("appium:appActivity", app.android_activity.clone());
                }
            }
            Platform::Ios => {
                let version = profile
                    .platform_version
                    .clone()
                    .ok_or_else(|| Error::configuration("Device profile has no platform_version"))?;
                session = session
                    .with_capability("appium:automationName", "XCUITest")
                    .with_capability("appium:platformVersion", version)
                    .with_capability("appium:newCommandTimeout", command_timeout)
                    .with_capability("appium:wdaLaunchTimeout", 120_000)
                    .with_capability("appium:wdaConnectionTimeout", 120_000);

                if !app.preinstalled {
                    session = session
                        .with_capability("appium:app", app.ios_app_path.display().to_string())
                        .with_capability("appium:bundleId", app.ios_bundle_id.clone());
                }
            }
            Platform::Other(name) => return Err(Error::unsupported_platform(name)),
        }

        Ok(session)
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut capabilities = self.capabilities.clone();
        if let Some(Value::Object(options)) = capabilities.get_mut(REMOTE_LAB_OPTIONS) {
            if options.contains_key("securityToken") {
                options.insert("securityToken".to_string(), json!("<redacted>"));
            }
        }

        f.debug_struct("SessionConfig")
            .field("platform", &self.platform)
            .field("endpoint", &self.endpoint)
            .field("capabilities", &capabilities)
            .field("command_timeout", &self.command_timeout)
            .field("remote_lab", &self.remote_lab)
            .finish()
    }
}

fn remote_lab_options(config: &Config, profile: &DeviceProfile) -> Value {
    let mut options = Map::new();
    options.insert("securityToken".to_string(), json!(config.remote_lab.token));
    options.insert("model".to_string(), json!(profile.device_name));

    let optional = [
        ("manufacturer", profile.manufacturer.clone()),
        ("resolution", profile.resolution.clone()),
        ("platformVersion", profile.platform_version.clone()),
        ("platformBuild", profile.platform_build.clone()),
    ];
    for (key, value) in optional {
        if let Some(value) = value {
            options.insert(key.to_string(), json!(value));
        }
    }

    if !config.remote_lab.app.is_empty() {
        options.insert("app".to_string(), json!(config.remote_lab.app));
    }
    if let Some(auto_launch) = profile.auto_launch {
        options.insert("autoLaunch".to_string(), json!(auto_launch));
    }
    if let Some(appium) = profile.enable_appium_behavior {
        options.insert("enableAppiumBehavior".to_string(), json!(appium));
    }

    Value::Object(options)
}

fn validate_endpoint(endpoint: &str) -> Result<()> {
    let url = reqwest::Url::parse(endpoint)
        .map_err(|e| Error::configuration(format!("Malformed endpoint '{}': {}", endpoint, e)))?;

    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(()),
        _ => Err(Error::configuration(format!(
            "Endpoint '{}' must be an http(s) URL",
            endpoint
        ))),
    }
}

fn require(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::configuration(format!(
            "Missing required capability {}",
            field
        )));
    }
    Ok(())
}
