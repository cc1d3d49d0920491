//! Configuration management for the suite
//!
//! Process-wide settings are read once at suite start from a TOML file and
//! `SWAGLABS_*` environment overrides. The device profile is a separate JSON
//! document selected by `device.profile` and read before each test case.

use crate::{Error, Result};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Suite configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Local automation endpoint
    pub endpoint: EndpointConfig,

    /// Remote device lab
    pub remote_lab: RemoteLabConfig,

    /// Application under test
    pub app: AppConfig,

    /// Device profile selection
    pub device: DeviceConfig,

    /// Report output
    pub report: ReportConfig,

    /// Wait and gesture tunables
    pub timing: TimingConfig,

    /// Run scenarios on parallel worker threads
    pub parallel: bool,
}

/// Local Appium endpoint settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Address the endpoint listens on
    pub host: String,

    /// Port the endpoint listens on
    pub port: u16,

    /// Start and stop the endpoint process around the suite
    pub manage_service: bool,

    /// Node executable used to run the endpoint
    pub node_path: String,

    /// Path to the endpoint's main script
    pub appium_js_path: String,

    /// HTTP timeout for a single remote command, in seconds
    pub command_timeout_secs: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 4723,
            manage_service: true,
            node_path: "node".to_string(),
            appium_js_path: "/usr/local/lib/node_modules/appium/build/lib/main.js".to_string(),
            command_timeout_secs: 300,
        }
    }
}

/// Remote device lab settings
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct RemoteLabConfig {
    /// Use the remote lab instead of a local endpoint
    pub enabled: bool,

    /// Lab endpoint URL
    pub url: String,

    /// Lab security token
    pub token: String,

    /// App reference as uploaded to the lab repository
    pub app: String,
}

impl std::fmt::Debug for RemoteLabConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteLabConfig")
            .field("enabled", &self.enabled)
            .field("url", &self.url)
            .field("token", &"<redacted>")
            .field("app", &self.app)
            .finish()
    }
}

/// Application under test
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// App is already installed on the device
    pub preinstalled: bool,

    /// Android package file
    pub apk_path: PathBuf,

    /// Android application package
    pub android_package: String,

    /// Android launch activity
    pub android_activity: String,

    /// iOS application bundle
    pub ios_app_path: PathBuf,

    /// iOS bundle identifier
    pub ios_bundle_id: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            preinstalled: false,
            apk_path: PathBuf::from("apps/Android.SauceLabs.Mobile.Sample.app.2.7.1.apk"),
            android_package: "com.swaglabsmobileapp".to_string(),
            android_activity: "com.swaglabsmobileapp.MainActivity".to_string(),
            ios_app_path: PathBuf::from("apps/iOS.Simulator.SauceLabs.Mobile.Sample.app.2.7.1.app"),
            ios_bundle_id: "org.reactjs.native.example.SwagLabsMobileApp".to_string(),
        }
    }
}

/// Device profile selection and launch scripts
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Profile file name inside `profile_dir`
    pub profile: String,

    /// Directory holding device profile JSON files
    pub profile_dir: PathBuf,

    /// Directory holding the emulator/simulator launch scripts
    pub scripts_dir: PathBuf,

    /// Boot the device before each test case
    pub launch: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            profile: "android_emulator.json".to_string(),
            profile_dir: PathBuf::from("resources/device-profiles"),
            scripts_dir: PathBuf::from("resources/scripts"),
            launch: false,
        }
    }
}

/// Report output settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Output directory for the report and screenshots
    pub dir: PathBuf,

    /// Document title
    pub title: String,

    /// Report name
    pub name: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("target/reports"),
            title: "Automation Report".to_string(),
            name: "SwagLabs App Tests".to_string(),
        }
    }
}

/// Wait and gesture tunables
///
/// The delays and the scroll region are environment-tuned stability
/// workarounds; they are kept as named values rather than literals.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Default polling wait timeout
    pub wait_timeout_secs: u64,

    /// Delay between predicate evaluations
    pub poll_interval_secs: u64,

    /// Timeout used by `validate*` checks
    pub validate_timeout_secs: u64,

    /// Short timeout for quick visibility checks
    pub quick_timeout_secs: u64,

    /// Delay after focusing a text field before typing
    pub keyboard_settle_secs: u64,

    /// Delay before opening the cart
    pub cart_settle_secs: u64,

    /// Upper bound on scroll-until-visible iterations
    pub max_scroll_attempts: u32,

    /// Time allowed for the endpoint service to answer `/status`
    pub service_startup_secs: u64,

    /// Swipe region used by `scroll`
    pub scroll: ScrollRegion,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            wait_timeout_secs: 10,
            poll_interval_secs: 2,
            validate_timeout_secs: 5,
            quick_timeout_secs: 2,
            keyboard_settle_secs: 1,
            cart_settle_secs: 5,
            max_scroll_attempts: 10,
            service_startup_secs: 60,
            scroll: ScrollRegion::default(),
        }
    }
}

impl TimingConfig {
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn validate_timeout(&self) -> Duration {
        Duration::from_secs(self.validate_timeout_secs)
    }

    pub fn quick_timeout(&self) -> Duration {
        Duration::from_secs(self.quick_timeout_secs)
    }

    pub fn keyboard_settle(&self) -> Duration {
        Duration::from_secs(self.keyboard_settle_secs)
    }

    pub fn cart_settle(&self) -> Duration {
        Duration::from_secs(self.cart_settle_secs)
    }
}

/// Fixed swipe region, in device pixels
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScrollRegion {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
    /// Travel as a fraction of the region
    pub percent: f64,
}

impl Default for ScrollRegion {
    fn default() -> Self {
        Self {
            left: 450,
            top: 1900,
            width: 400,
            height: 1300,
            percent: 0.75,
        }
    }
}

impl Config {
    /// Load configuration from environment variables on top of defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::configuration(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Apply `SWAGLABS_*` environment overrides
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(host) = env::var("SWAGLABS_HOST") {
            self.endpoint.host = host;
        }

        if let Ok(port) = env::var("SWAGLABS_PORT") {
            self.endpoint.port = parse_env("SWAGLABS_PORT", &port)?;
        }

        if let Ok(manage) = env::var("SWAGLABS_MANAGE_SERVICE") {
            self.endpoint.manage_service = parse_env("SWAGLABS_MANAGE_SERVICE", &manage)?;
        }

        if let Ok(enabled) = env::var("SWAGLABS_REMOTE_LAB") {
            self.remote_lab.enabled = parse_env("SWAGLABS_REMOTE_LAB", &enabled)?;
        }

        if let Ok(url) = env::var("SWAGLABS_REMOTE_LAB_URL") {
            self.remote_lab.url = url;
        }

        if let Ok(token) = env::var("SWAGLABS_REMOTE_LAB_TOKEN") {
            self.remote_lab.token = token;
        }

        if let Ok(preinstalled) = env::var("SWAGLABS_APP_PREINSTALLED") {
            self.app.preinstalled = parse_env("SWAGLABS_APP_PREINSTALLED", &preinstalled)?;
        }

        if let Ok(profile) = env::var("SWAGLABS_DEVICE_PROFILE") {
            self.device.profile = profile;
        }

        if let Ok(dir) = env::var("SWAGLABS_REPORT_DIR") {
            self.report.dir = PathBuf::from(dir);
        }

        if let Ok(parallel) = env::var("SWAGLABS_PARALLEL") {
            self.parallel = parse_env("SWAGLABS_PARALLEL", &parallel)?;
        }

        Ok(())
    }

    /// Reject settings that cannot produce a working run
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.port == 0 && !self.remote_lab.enabled {
            return Err(Error::configuration("endpoint.port must be non-zero"));
        }
        if self.timing.poll_interval_secs == 0 {
            return Err(Error::configuration("timing.poll_interval_secs must be non-zero"));
        }
        if self.remote_lab.enabled && self.remote_lab.url.trim().is_empty() {
            return Err(Error::configuration("remote_lab.url is required when remote_lab.enabled"));
        }
        Ok(())
    }

    /// Address of the automation endpoint sessions are opened against
    pub fn endpoint_url(&self) -> String {
        if self.remote_lab.enabled {
            self.remote_lab.url.clone()
        } else {
            format!("http://{}:{}", self.endpoint.host, self.endpoint.port)
        }
    }

    /// Path of the device profile selected for this run
    pub fn device_profile_path(&self) -> PathBuf {
        self.device.profile_dir.join(&self.device.profile)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::configuration(format!("Invalid {}", key)))
}

/// Per-run device description
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeviceProfile {
    pub platform_name: String,
    pub platform_version: Option<String>,
    pub device_name: String,
    pub automation_name: Option<String>,

    // Remote lab extras
    pub platform_build: Option<String>,
    pub manufacturer: Option<String>,
    pub resolution: Option<String>,
    pub auto_launch: Option<bool>,
    pub enable_appium_behavior: Option<bool>,
}

impl DeviceProfile {
    /// Load a device profile document
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::error!("Device profile not found: {}", path.display());
            return Err(Error::configuration(format!(
                "Device profile not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let profile: DeviceProfile = serde_json::from_str(&content).map_err(|e| {
            Error::configuration(format!("Invalid device profile {}: {}", path.display(), e))
        })?;

        if profile.platform_name.trim().is_empty() {
            return Err(Error::configuration(format!(
                "Device profile {} has no platform_name",
                path.display()
            )));
        }

        tracing::info!("Loaded device profile: {}", path.display());
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_observed_policy() {
        let config = Config::default();
        assert_eq!(config.timing.wait_timeout(), Duration::from_secs(10));
        assert_eq!(config.timing.poll_interval(), Duration::from_secs(2));
        assert_eq!(config.timing.scroll.percent, 0.75);
        assert_eq!(config.endpoint_url(), "http://127.0.0.1:4723");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[endpoint]\nport = 4799\n\n[timing]\nkeyboard_settle_secs = 3\n\n[timing.scroll]\ntop = 1500"
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.endpoint.port, 4799);
        assert_eq!(config.endpoint.host, "127.0.0.1");
        assert_eq!(config.timing.keyboard_settle_secs, 3);
        assert_eq!(config.timing.scroll.top, 1500);
        assert_eq!(config.timing.scroll.left, 450);
    }

    #[test]
    fn test_unparseable_file_is_configuration_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[endpoint\nport = ").unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_validate_rejects_remote_lab_without_url() {
        let mut config = Config::default();
        config.remote_lab.enabled = true;
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));

        config.remote_lab.url = "https://lab.example.com/wd/hub".to_string();
        assert!(config.validate().is_ok());
        assert_eq!(config.endpoint_url(), "https://lab.example.com/wd/hub");
    }

    #[test]
    fn test_validate_rejects_zero_poll_interval() {
        let mut config = Config::default();
        config.timing.poll_interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_token_not_in_debug_output() {
        let mut config = Config::default();
        config.remote_lab.token = "very-secret".to_string();
        assert!(!format!("{:?}", config).contains("very-secret"));
    }

    #[test]
    fn test_load_device_profile() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pixel.json");
        std::fs::write(
            &path,
            r#"{"platform_name":"Android","platform_version":"14","device_name":"Pixel_7","automation_name":"UiAutomator2"}"#,
        )
        .unwrap();

        let profile = DeviceProfile::load(&path).unwrap();
        assert_eq!(profile.platform_name, "Android");
        assert_eq!(profile.device_name, "Pixel_7");
        assert_eq!(profile.automation_name.as_deref(), Some("UiAutomator2"));
        assert_eq!(profile.manufacturer, None);
    }

    #[test]
    fn test_missing_device_profile() {
        let dir = tempfile::tempdir().unwrap();
        let err = DeviceProfile::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
