use std::error::Error;
use std::fmt;

/// Error from a failed Win32 call, with the system-formatted message when the
/// system has one for the code.
#[derive(Debug, Clone)]
pub struct WinError {
    call: &'static str,
    code: u32,
    message: Option<String>,
}

/// Rust + Windows extension for error handling
pub type WinResult<T> = Result<T, WinError>;

impl WinError {
    pub fn new(call: &'static str, code: u32) -> Self {
        WinError {
            call,
            code,
            message: None,
        }
    }

    /// Name of the Win32 function that failed.
    pub fn call(&self) -> &'static str {
        self.call
    }

    /// Raw 32-bit error code.
    pub fn code(&self) -> u32 {
        self.code
    }
}

impl fmt::Display for WinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: error 0x{:08X}", self.call, self.code)?;
        if let Some(message) = self.message.as_ref() {
            write!(f, ": {}", message.trim_end())?;
        }
        Ok(())
    }
}

impl Error for WinError {}

#[cfg(windows)]
mod windows_impl {
    use widestring::U16Str;
    use windows::Win32::Foundation::{GetLastError, HLOCAL, LocalFree};
    use windows::Win32::System::Diagnostics::Debug::{
        FORMAT_MESSAGE_ALLOCATE_BUFFER, FORMAT_MESSAGE_FROM_SYSTEM, FORMAT_MESSAGE_IGNORE_INSERTS,
        FormatMessageW,
    };
    use windows_core::PWSTR;

    use super::WinError;

    impl WinError {
        /// Capture `GetLastError()` right after `call` reported failure.
        pub fn last_os_error(call: &'static str) -> Self {
            let code = unsafe { GetLastError() }.0;
            let mut this = WinError::new(call, code);
            this.message = format_message(code);
            this
        }

        /// Wrap an error returned by one of the projected `windows` APIs.
        pub fn from_call(call: &'static str, error: windows_core::Error) -> Self {
            let mut this = WinError::new(call, error.code().0 as u32);
            let message = error.message();
            if !message.is_empty() {
                this.message = Some(message);
            }
            this
        }
    }

    /// `FormatMessageW` for one error code. `None` when the system has no
    /// message table entry for it.
    fn format_message(code: u32) -> Option<String> {
        unsafe {
            let mut buffer = PWSTR::null();
            // With FORMAT_MESSAGE_ALLOCATE_BUFFER the lpBuffer parameter
            // receives a pointer to the allocated buffer.
            let len = FormatMessageW(
                FORMAT_MESSAGE_ALLOCATE_BUFFER
                    | FORMAT_MESSAGE_FROM_SYSTEM
                    | FORMAT_MESSAGE_IGNORE_INSERTS,
                None,
                code,
                0, // default language
                PWSTR(&mut buffer as *mut PWSTR as *mut u16),
                0,
                None,
            );
            if len == 0 || buffer.is_null() {
                return None;
            }
            let message = U16Str::from_ptr(buffer.0, len as usize).to_string_lossy();
            let _ = LocalFree(Some(HLOCAL(buffer.as_ptr() as *mut _)));
            Some(message)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_names_the_call_and_code() {
        let error = WinError::new("GetLogicalDrives", 5);
        assert_eq!(error.to_string(), "GetLogicalDrives failed: error 0x00000005");
        assert_eq!(error.call(), "GetLogicalDrives");
        assert_eq!(error.code(), 5);
    }
}
