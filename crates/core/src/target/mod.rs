//! Target resolution - turning the `[target]` config into a directory to write to.
//!
//! A `path` target must already be mounted. An `mtp` target is looked up by
//! USB serial number in sysfs and mounted through gvfs (`gio mount`), after
//! which its files are reachable below the gvfs FUSE mount.

mod error;
mod resolver;
mod types;

pub use error::TargetError;
pub use resolver::TargetResolver;
pub use types::{MtpSpec, ResolvedTarget, UsbDevice};
