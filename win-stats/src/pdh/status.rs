use std::fmt;

/// Status code returned by every PDH call. Zero is success.
///
/// Codes pick up a sign when they travel through `i32`s; both conversions
/// normalize to the unsigned 32-bit value PDH defines.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PdhStatus(u32);

/// Known PDH status symbols, mirroring `pdhmsg.h`.
///
/// Declared as literals rather than pulled from the `windows` crate so that
/// status translation compiles on every target.
const SYMBOLS: &[(u32, &str)] = &[
    (0x0000_0000, "PDH_CSTATUS_VALID_DATA"),
    (0x8000_07D0, "PDH_CSTATUS_NO_MACHINE"),
    (0x8000_07D2, "PDH_MORE_DATA"),
    (0x8000_07D5, "PDH_NO_DATA"),
    (0xC000_0BB8, "PDH_CSTATUS_NO_OBJECT"),
    (0xC000_0BB9, "PDH_CSTATUS_NO_COUNTER"),
    (0xC000_0BBB, "PDH_MEMORY_ALLOCATION_FAILURE"),
    (0xC000_0BBC, "PDH_INVALID_HANDLE"),
    (0xC000_0BBD, "PDH_INVALID_ARGUMENT"),
    (0xC000_0BC0, "PDH_CSTATUS_BAD_COUNTERNAME"),
    (0xC000_0BC2, "PDH_INSUFFICIENT_BUFFER"),
    (0xC000_0BC6, "PDH_INVALID_DATA"),
    (0xC000_0BD3, "PDH_NOT_IMPLEMENTED"),
    (0xC000_0BD4, "PDH_STRING_NOT_FOUND"),
];

impl PdhStatus {
    pub const VALID_DATA: PdhStatus = PdhStatus(0);

    pub fn new(raw: u32) -> Self {
        PdhStatus(raw)
    }

    pub fn is_success(&self) -> bool {
        *self == Self::VALID_DATA
    }

    /// Raw unsigned 32-bit code.
    pub fn raw(&self) -> u32 {
        self.0
    }

    /// Symbolic name when the code is a known PDH status.
    pub fn symbol(&self) -> Option<&'static str> {
        SYMBOLS
            .iter()
            .find(|(code, _)| *code == self.0)
            .map(|(_, name)| *name)
    }
}

impl From<u32> for PdhStatus {
    fn from(raw: u32) -> Self {
        PdhStatus(raw)
    }
}

impl From<i32> for PdhStatus {
    fn from(raw: i32) -> Self {
        // the cast is the 32-bit mask for sign-extended codes
        PdhStatus(raw as u32)
    }
}

impl fmt::Display for PdhStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.symbol() {
            Some(name) => f.write_str(name),
            None => write!(f, "0x{:08X}", self.0),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn zero_is_valid_data() {
        let status = PdhStatus::from(0u32);
        assert!(status.is_success());
        assert_eq!(status.symbol(), Some("PDH_CSTATUS_VALID_DATA"));
        assert_eq!(status.to_string(), "PDH_CSTATUS_VALID_DATA");
    }

    #[test]
    fn sign_extended_codes_translate_the_same() {
        let unsigned = PdhStatus::from(0xC000_0BB9_u32);
        let signed = PdhStatus::from(0xC000_0BB9_u32 as i32);
        assert_eq!(unsigned, signed);
        assert_eq!(signed.symbol(), Some("PDH_CSTATUS_NO_COUNTER"));
        assert!(!signed.is_success());
    }

    #[test]
    fn unknown_codes_pass_through() {
        let status = PdhStatus::from(0xDEAD_BEEF_u32);
        assert_eq!(status.symbol(), None);
        assert_eq!(status.to_string(), "0xDEADBEEF");
        assert_eq!(status.raw(), 0xDEAD_BEEF);
    }
}
