use std::fmt;

use widestring::{U16CStr, U16CString};

use crate::pdh::format::CounterFormat;

/// Owned, decoded counter value, tagged by the format that produced it.
///
/// Replaces field access into the native `PDH_FMT_COUNTERVALUE` union: the
/// tag says which payload is meaningful, and reading it as anything else is
/// an explicit `None` rather than a reinterpreted bit pattern.
#[derive(Clone, Debug, PartialEq)]
pub enum CounterValue {
    Long(i32),
    Double(f64),
    Large(i64),
    Ansi(String),
    Unicode(U16CString),
}

impl CounterValue {
    /// The format this value was produced with.
    pub fn format(&self) -> CounterFormat {
        match self {
            Self::Long(_) => CounterFormat::Long,
            Self::Double(_) => CounterFormat::Double,
            Self::Large(_) => CounterFormat::Large,
            Self::Ansi(_) => CounterFormat::Ansi,
            Self::Unicode(_) => CounterFormat::Unicode,
        }
    }

    pub fn as_long(&self) -> Option<i32> {
        match *self {
            Self::Long(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match *self {
            Self::Double(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_large(&self) -> Option<i64> {
        match *self {
            Self::Large(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_ansi(&self) -> Option<&str> {
        match self {
            Self::Ansi(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_unicode(&self) -> Option<&U16CStr> {
        match self {
            Self::Unicode(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for CounterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Long(value) => value.fmt(f),
            Self::Double(value) => value.fmt(f),
            Self::Large(value) => value.fmt(f),
            Self::Ansi(text) => f.write_str(text),
            Self::Unicode(text) => f.write_str(&text.to_string_lossy()),
        }
    }
}

#[cfg(test)]
mod test {
    use widestring::u16cstr;

    use super::*;

    #[test]
    fn tag_matches_the_variant() {
        assert_eq!(CounterValue::Long(7).format(), CounterFormat::Long);
        assert_eq!(CounterValue::Double(0.5).format(), CounterFormat::Double);
        assert_eq!(CounterValue::Large(1 << 40).format(), CounterFormat::Large);
        assert_eq!(CounterValue::Ansi("x".into()).format(), CounterFormat::Ansi);
        let wide = CounterValue::Unicode(u16cstr!("x").to_ucstring());
        assert_eq!(wide.format(), CounterFormat::Unicode);
    }

    #[test]
    fn accessors_are_checked() {
        let value = CounterValue::Double(99.5);
        assert_eq!(value.as_double(), Some(99.5));
        assert_eq!(value.as_long(), None);
        assert_eq!(value.as_large(), None);
        assert_eq!(value.as_ansi(), None);
    }

    #[test]
    fn display_renders_the_payload() {
        assert_eq!(CounterValue::Large(1024).to_string(), "1024");
        assert_eq!(CounterValue::Ansi("NTFS".into()).to_string(), "NTFS");
        let wide = CounterValue::Unicode(u16cstr!("NTFS").to_ucstring());
        assert_eq!(wide.to_string(), "NTFS");
    }
}
