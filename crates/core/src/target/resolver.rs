//! Target resolver implementation.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::fs;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::TargetConfig;

use super::error::TargetError;
use super::types::{MtpSpec, ResolvedTarget, UsbDevice};

const SYSFS_USB_DEVICES: &str = "/sys/bus/usb/devices";

/// Resolves and, for MTP devices, mounts the configured target.
#[derive(Debug, Clone)]
pub struct TargetResolver {
    sysfs_usb_root: PathBuf,
    runtime_dir: PathBuf,
    gio_path: PathBuf,
}

impl Default for TargetResolver {
    fn default() -> Self {
        Self {
            sysfs_usb_root: PathBuf::from(SYSFS_USB_DEVICES),
            runtime_dir: default_runtime_dir(),
            gio_path: PathBuf::from("gio"),
        }
    }
}

/// `$XDG_RUNTIME_DIR`, falling back to `/run/user/<uid>`.
fn default_runtime_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("XDG_RUNTIME_DIR").filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    fallback_runtime_dir()
}

#[cfg(unix)]
fn fallback_runtime_dir() -> PathBuf {
    use std::os::unix::fs::MetadataExt;

    // /proc/self is owned by the real uid of the process
    match std::fs::metadata("/proc/self") {
        Ok(meta) => PathBuf::from(format!("/run/user/{}", meta.uid())),
        Err(_) => std::env::temp_dir(),
    }
}

#[cfg(not(unix))]
fn fallback_runtime_dir() -> PathBuf {
    std::env::temp_dir()
}

fn invalid_data(path: &Path, value: &str) -> TargetError {
    TargetError::Io(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        format!("unexpected value {:?} in {}", value, path.display()),
    ))
}

impl TargetResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the directory scanned for USB devices.
    pub fn with_sysfs_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.sysfs_usb_root = root.into();
        self
    }

    /// Sets the user runtime directory holding the gvfs mounts.
    pub fn with_runtime_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.runtime_dir = dir.into();
        self
    }

    /// Sets the gio binary.
    pub fn with_gio_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.gio_path = path.into();
        self
    }

    /// Resolves the target root and its music folder.
    ///
    /// Nothing is created on the host: a missing `path` target is an error
    /// rather than an empty directory to fill.
    pub async fn resolve(&self, config: &TargetConfig) -> Result<ResolvedTarget, TargetError> {
        let root = match (&config.path, &config.mtp) {
            (Some(path), None) => {
                if !fs::metadata(path).await.map(|m| m.is_dir()).unwrap_or(false) {
                    return Err(TargetError::PathUnavailable(path.clone()));
                }
                path.clone()
            }
            (None, Some(mtp)) => {
                let spec = MtpSpec::parse(mtp)?;
                let mount = self.mount_mtp(&spec.serial).await?;
                join_non_empty(&mount, &spec.path)
            }
            _ => return Err(TargetError::NotConfigured),
        };

        let music_root = join_non_empty(&root, &config.folders.music);
        info!("Target music folder: {}", music_root.display());
        Ok(ResolvedTarget { root, music_root })
    }

    /// Finds the USB device with `serial` below the sysfs root.
    pub async fn find_device(&self, serial: &str) -> Result<UsbDevice, TargetError> {
        let mut candidates = Vec::new();
        let mut entries = fs::read_dir(&self.sysfs_usb_root).await?;
        while let Some(entry) = entries.next_entry().await? {
            candidates.push(entry.path());
        }
        candidates.sort();

        for device in candidates {
            // Interfaces and hubs have no serial file.
            let found = match fs::read_to_string(device.join("serial")).await {
                Ok(s) => s,
                Err(_) => continue,
            };
            if found.trim_end() != serial {
                continue;
            }

            debug!("Found device {} at {}", serial, device.display());
            return Ok(UsbDevice {
                busnum: read_number(&device.join("busnum")).await?,
                devnum: read_number(&device.join("devnum")).await?,
            });
        }

        Err(TargetError::DeviceNotFound(serial.to_string()))
    }

    /// Mounts the device through gvfs and returns its mount point.
    ///
    /// `gio mount` fails for devices that are already mounted, so its exit
    /// status is ignored; only the presence of the mount point counts.
    async fn mount_mtp(&self, serial: &str) -> Result<PathBuf, TargetError> {
        let device = self.find_device(serial).await?;
        let host = device.mtp_host();
        let uri = format!("mtp://{}", host);

        debug!("Running {} mount {}", self.gio_path.display(), uri);
        let output = Command::new(&self.gio_path)
            .arg("mount")
            .arg(&uri)
            .stdin(Stdio::null())
            .output()
            .await?;

        let mount = self.runtime_dir.join("gvfs").join(format!("mtp:host={}", host));
        if fs::metadata(&mount).await.is_err() {
            let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
            text.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(TargetError::MountFailed {
                output: text.trim_end().to_string(),
            });
        }

        info!("Mounted {} at {}", uri, mount.display());
        Ok(mount)
    }
}

fn join_non_empty(base: &Path, child: &Path) -> PathBuf {
    if child.as_os_str().is_empty() {
        base.to_path_buf()
    } else {
        base.join(child)
    }
}

async fn read_number(path: &Path) -> Result<u32, TargetError> {
    let text = fs::read_to_string(path).await?;
    let value = text.trim();
    value.parse().map_err(|_| invalid_data(path, value))
}
