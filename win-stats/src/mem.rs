//! Memory and system-wide performance snapshots.

/// Physical, virtual and page-file memory figures
/// (`GlobalMemoryStatusEx`). Sizes are in bytes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStatus {
    /// Memory load, 0..=100 percent.
    pub load_percent: u32,
    pub total_physical: u64,
    pub available_physical: u64,
    pub total_page_file: u64,
    pub available_page_file: u64,
    pub total_virtual: u64,
    pub available_virtual: u64,
}

/// Commit, cache and kernel memory figures plus handle/process/thread counts
/// (`GetPerformanceInfo`). Sizes are in pages except where noted.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PerformanceInfo {
    pub commit_total_pages: u64,
    pub commit_limit_pages: u64,
    pub commit_peak_pages: u64,
    pub physical_total_pages: u64,
    pub physical_available_pages: u64,
    pub system_cache_pages: u64,
    pub kernel_total_pages: u64,
    pub kernel_paged_pages: u64,
    pub kernel_nonpaged_pages: u64,
    /// Page size in bytes.
    pub page_size: u64,
    pub handle_count: u32,
    pub process_count: u32,
    pub thread_count: u32,
}

impl PerformanceInfo {
    /// System cache size in bytes.
    pub fn system_cache_bytes(&self) -> u64 {
        self.system_cache_pages * self.page_size
    }
}

#[cfg(windows)]
mod windows_impl {
    use std::mem;

    use windows::Win32::System::ProcessStatus::{GetPerformanceInfo, PERFORMANCE_INFORMATION};
    use windows::Win32::System::SystemInformation::{GlobalMemoryStatusEx, MEMORYSTATUSEX};

    use super::{MemoryStatus, PerformanceInfo};
    use crate::error::{WinError, WinResult};

    /// Take a memory snapshot.
    pub fn memory_status() -> WinResult<MemoryStatus> {
        // dwLength must be set before the call.
        let mut raw = MEMORYSTATUSEX {
            dwLength: mem::size_of::<MEMORYSTATUSEX>() as u32,
            ..Default::default()
        };
        unsafe { GlobalMemoryStatusEx(&mut raw) }
            .map_err(|e| WinError::from_call("GlobalMemoryStatusEx", e))?;
        Ok(MemoryStatus {
            load_percent: raw.dwMemoryLoad,
            total_physical: raw.ullTotalPhys,
            available_physical: raw.ullAvailPhys,
            total_page_file: raw.ullTotalPageFile,
            available_page_file: raw.ullAvailPageFile,
            total_virtual: raw.ullTotalVirtual,
            available_virtual: raw.ullAvailVirtual,
        })
    }

    /// Take a system performance snapshot.
    pub fn performance_info() -> WinResult<PerformanceInfo> {
        let mut raw = PERFORMANCE_INFORMATION {
            cb: mem::size_of::<PERFORMANCE_INFORMATION>() as u32,
            ..Default::default()
        };
        unsafe { GetPerformanceInfo(&mut raw, raw.cb) }
            .map_err(|e| WinError::from_call("GetPerformanceInfo", e))?;
        Ok(PerformanceInfo {
            commit_total_pages: raw.CommitTotal as u64,
            commit_limit_pages: raw.CommitLimit as u64,
            commit_peak_pages: raw.CommitPeak as u64,
            physical_total_pages: raw.PhysicalTotal as u64,
            physical_available_pages: raw.PhysicalAvailable as u64,
            system_cache_pages: raw.SystemCache as u64,
            kernel_total_pages: raw.KernelTotal as u64,
            kernel_paged_pages: raw.KernelPaged as u64,
            kernel_nonpaged_pages: raw.KernelNonpaged as u64,
            page_size: raw.PageSize as u64,
            handle_count: raw.HandleCount,
            process_count: raw.ProcessCount,
            thread_count: raw.ThreadCount,
        })
    }
}

#[cfg(windows)]
pub use windows_impl::{memory_status, performance_info};

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn cache_bytes_is_pages_times_page_size() {
        let info = PerformanceInfo {
            system_cache_pages: 1234,
            page_size: 4096,
            ..Default::default()
        };
        assert_eq!(info.system_cache_bytes(), 1234 * 4096);
    }
}
