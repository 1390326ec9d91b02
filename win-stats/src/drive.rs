//! Logical drives, filesystem usage and volume information.

use std::fmt;

/// What kind of device a drive root resolves to (`GetDriveTypeW`).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DriveType {
    #[default]
    Unknown,
    /// The root path is invalid.
    NoRootDir,
    Removable,
    Fixed,
    Remote,
    CdRom,
    RamDisk,
}

impl DriveType {
    /// Map a raw `GetDriveTypeW` result. Values outside the documented range
    /// come back as `Unknown`.
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            1 => Self::NoRootDir,
            2 => Self::Removable,
            3 => Self::Fixed,
            4 => Self::Remote,
            5 => Self::CdRom,
            6 => Self::RamDisk,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for DriveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unknown => "unknown",
            Self::NoRootDir => "no root dir",
            Self::Removable => "removable",
            Self::Fixed => "fixed",
            Self::Remote => "remote",
            Self::CdRom => "cdrom",
            Self::RamDisk => "ramdisk",
        })
    }
}

/// Space figures for one filesystem, in bytes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DiskUsage {
    pub total: u64,
    pub used: u64,
    pub free: u64,
}

/// Label, filesystem name and serial number of one volume
/// (`GetVolumeInformationW`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VolumeInfo {
    pub label: String,
    pub file_system: String,
    pub serial_number: Option<u32>,
}

/// Decode the `GetLogicalDrives` bitmask: bit 0 is `A:`, bit 25 is `Z:`.
fn drives_from_mask(mask: u32) -> Vec<char> {
    ('A'..='Z')
        .enumerate()
        .filter(|(bit, _)| mask & (1 << bit) != 0)
        .map(|(_, letter)| letter)
        .collect()
}

/// Expand bare drive inputs to a root path: `"C"` and `"C:"` become `"C:\"`.
fn root_path(drive: &str) -> String {
    match drive.len() {
        1 => format!("{drive}:\\"),
        2 => format!("{drive}\\"),
        _ => drive.to_owned(),
    }
}

#[cfg(windows)]
mod windows_impl {
    use widestring::{U16CStr, U16CString};
    use windows::Win32::Storage::FileSystem::{
        GetDiskFreeSpaceExW, GetDriveTypeW, GetLogicalDrives, GetVolumeInformationW,
    };
    use windows_core::PCWSTR;

    use super::{DiskUsage, DriveType, VolumeInfo, drives_from_mask, root_path};
    use crate::error::{WinError, WinResult};

    /// Letters of every drive with a mounted volume.
    pub fn logical_drives() -> WinResult<Vec<char>> {
        let mask = unsafe { GetLogicalDrives() };
        if mask == 0 {
            return Err(WinError::last_os_error("GetLogicalDrives"));
        }
        Ok(drives_from_mask(mask))
    }

    /// Device type behind a drive root.
    pub fn drive_type(drive: &str) -> DriveType {
        let root = U16CString::from_str_truncate(root_path(drive));
        let raw = unsafe { GetDriveTypeW(PCWSTR(root.as_ptr())) };
        DriveType::from_raw(raw)
    }

    /// Total/used/free bytes of the filesystem at `drive`.
    pub fn disk_usage(drive: &str) -> WinResult<DiskUsage> {
        let root = U16CString::from_str_truncate(root_path(drive));
        let mut total = 0u64;
        let mut free = 0u64;
        unsafe {
            GetDiskFreeSpaceExW(
                PCWSTR(root.as_ptr()),
                None,
                Some(&mut total),
                Some(&mut free),
            )
        }
        .map_err(|e| WinError::from_call("GetDiskFreeSpaceExW", e))?;
        Ok(DiskUsage {
            total,
            used: total - free,
            free,
        })
    }

    /// Label, filesystem name and serial number of the volume at `drive`.
    pub fn volume_info(drive: &str) -> WinResult<VolumeInfo> {
        let root = U16CString::from_str_truncate(root_path(drive));
        // MAX_PATH + 1, per the GetVolumeInformationW docs
        let mut label = [0u16; 261];
        let mut file_system = [0u16; 261];
        let mut serial = 0u32;
        unsafe {
            GetVolumeInformationW(
                PCWSTR(root.as_ptr()),
                Some(&mut label),
                Some(&mut serial),
                None,
                None,
                Some(&mut file_system),
            )
        }
        .map_err(|e| WinError::from_call("GetVolumeInformationW", e))?;
        Ok(VolumeInfo {
            label: truncate_to_string(&label),
            file_system: truncate_to_string(&file_system),
            serial_number: Some(serial),
        })
    }

    fn truncate_to_string(buffer: &[u16]) -> String {
        U16CStr::from_slice_truncate(buffer)
            .map(|s| s.to_string_lossy())
            .unwrap_or_default()
    }
}

#[cfg(windows)]
pub use windows_impl::{disk_usage, drive_type, logical_drives, volume_info};

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn mask_bit_zero_is_drive_a() {
        assert_eq!(drives_from_mask(0b0000_0101), vec!['A', 'C']);
        assert_eq!(drives_from_mask(0), Vec::<char>::new());
        assert_eq!(drives_from_mask(1 << 25), vec!['Z']);
    }

    #[test]
    fn drive_type_mapping() {
        assert_eq!(DriveType::from_raw(3), DriveType::Fixed);
        assert_eq!(DriveType::from_raw(5), DriveType::CdRom);
        assert_eq!(DriveType::from_raw(0), DriveType::Unknown);
        assert_eq!(DriveType::from_raw(42), DriveType::Unknown);
        assert_eq!(DriveType::Fixed.to_string(), "fixed");
    }

    #[test]
    fn bare_drives_become_root_paths() {
        assert_eq!(root_path("C"), "C:\\");
        assert_eq!(root_path("C:"), "C:\\");
        assert_eq!(root_path("C:\\"), "C:\\");
        assert_eq!(root_path("C:\\data"), "C:\\data");
    }
}
