//! One-stop imports for the crate's public surface.

pub use crate::error::{WinError, WinResult};

pub use crate::drive::{DiskUsage, DriveType, VolumeInfo};
pub use crate::mem::{MemoryStatus, PerformanceInfo};
pub use crate::pdh::{
    CounterFormat, CounterValue, FormatOptions, FormatSpec, PdhCall, PdhError, PdhStatus,
    QueryError,
};

#[cfg(windows)]
pub use crate::drive::{disk_usage, drive_type, logical_drives, volume_info};
#[cfg(windows)]
pub use crate::mem::{memory_status, performance_info};
#[cfg(windows)]
pub use crate::pdh::{PdhCounter, PdhQuery, UseLocale, query_counter, query_counters};
