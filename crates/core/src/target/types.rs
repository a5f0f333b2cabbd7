use std::path::PathBuf;

use super::error::TargetError;

/// Parsed `target.mtp` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MtpSpec {
    pub serial: String,
    /// Path below the device's mount point, possibly empty.
    pub path: PathBuf,
}

impl MtpSpec {
    pub fn parse(spec: &str) -> Result<Self, TargetError> {
        let (serial, path) = spec.split_once('/').unwrap_or((spec, ""));
        if serial.trim().is_empty() {
            return Err(TargetError::InvalidMtpSpec(spec.to_string()));
        }
        Ok(Self {
            serial: serial.trim().to_string(),
            path: PathBuf::from(path),
        })
    }
}

/// Bus location of a USB device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsbDevice {
    pub busnum: u32,
    pub devnum: u32,
}

impl UsbDevice {
    /// gvfs host name of the device, e.g. `%5Busb%3A001%2C007%5D`.
    pub fn mtp_host(&self) -> String {
        format!("%5Busb%3A{:03}%2C{:03}%5D", self.busnum, self.devnum)
    }
}

/// Where files are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Target root, the configured path or the MTP mount plus its sub path.
    pub root: PathBuf,
    /// Root of the music folder; library paths are mirrored below it.
    pub music_root: PathBuf,
}
