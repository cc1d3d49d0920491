//! Emulator and simulator lifecycle

use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{info, warn};

use crate::config::{DeviceConfig, DeviceProfile};
use crate::session::Platform;
use crate::Result;

pub const ANDROID_LAUNCH_SCRIPT: &str = "launch_emulator.sh";
pub const IOS_LAUNCH_SCRIPT: &str = "launch_simulator.sh";

/// Boots and shuts down local devices through helper scripts
#[derive(Debug, Clone)]
pub struct DeviceLauncher {
    scripts_dir: PathBuf,
    remote_lab: bool,
}

impl DeviceLauncher {
    pub fn new(config: &DeviceConfig, remote_lab: bool) -> Self {
        Self {
            scripts_dir: config.scripts_dir.clone(),
            remote_lab,
        }
    }

    /// Boot the device described by `profile`; skipped in remote-lab mode
    pub fn launch(&self, profile: &DeviceProfile) -> Result<()> {
        if self.remote_lab {
            info!("Device launch is not required in remote-lab mode, skipping");
            return Ok(());
        }

        let platform = Platform::requested(&profile.platform_name)?;
        let script = match platform {
            Platform::Android => ANDROID_LAUNCH_SCRIPT,
            _ => IOS_LAUNCH_SCRIPT,
        };
        let path = self.scripts_dir.join(script);

        info!("Launching {} device {}", platform, profile.device_name);
        let mut command = Command::new("bash");
        command.arg(&path).arg(&profile.device_name);
        run_streaming(&mut command, &path)
    }

    /// Shut down running devices of `platform`; skipped in remote-lab mode
    pub fn shutdown(&self, platform: &Platform) -> Result<()> {
        if self.remote_lab {
            return Ok(());
        }

        let mut command = match platform {
            Platform::Android => {
                let mut command = Command::new("adb");
                command.args(["emu", "kill"]);
                command
            }
            Platform::Ios => {
                let mut command = Command::new("xcrun");
                command.args(["simctl", "shutdown", "all"]);
                command
            }
            Platform::Other(name) => {
                warn!("No shutdown command for platform {}", name);
                return Ok(());
            }
        };

        info!("Shutting down {} devices", platform);
        let status = command.stdin(Stdio::null()).status()?;
        if !status.success() {
            warn!("Device shutdown exited with {}", status);
        }
        Ok(())
    }
}

/// Run `command`, logging each output line, and fail on a non-zero exit
fn run_streaming(command: &mut Command, script: &Path) -> Result<()> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()?;

    if let Some(stdout) = child.stdout.take() {
        for line in BufReader::new(stdout).lines() {
            info!("{}", line?);
        }
    }

    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::Other,
            format!("{} exited with {}", script.display(), status),
        )
        .into())
    }
}
