use bitflags::bitflags;

use crate::pdh::error::QueryError;

/// Native rendition requested for a formatted counter value.
///
/// The five variants correspond to the five payload fields of
/// `PDH_FMT_COUNTERVALUE`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CounterFormat {
    /// 32-bit signed integer (`PDH_FMT_LONG`).
    #[default]
    Long,
    /// Double-precision float (`PDH_FMT_DOUBLE`).
    Double,
    /// 64-bit signed integer (`PDH_FMT_LARGE`).
    Large,
    /// Narrow string (`PDH_FMT_ANSI`).
    Ansi,
    /// Wide string (`PDH_FMT_UNICODE`).
    Unicode,
}

impl CounterFormat {
    /// Case-insensitive lookup of a format by name.
    ///
    /// Unrecognized names select [`CounterFormat::Long`]; `"raw"` has no
    /// formatted rendition and takes the same fallback.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "long" => Self::Long,
            "double" => Self::Double,
            "large" => Self::Large,
            "ansi" => Self::Ansi,
            "unicode" => Self::Unicode,
            other => {
                tracing::warn!(format = other, "unknown counter format, defaulting to \"long\"");
                Self::Long
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Long => "long",
            Self::Double => "double",
            Self::Large => "large",
            Self::Ansi => "ansi",
            Self::Unicode => "unicode",
        }
    }
}

bitflags! {
    /// Scaling modifiers OR-ed into the native format flag.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct FormatOptions: u32 {
        /// Skip the counter's default scaling factor (`PDH_FMT_NOSCALE`).
        const NOSCALE = 0x0000_1000;
        /// Multiply the final value by 1000 (`PDH_FMT_1000`).
        const X1000 = 0x0000_2000;
        /// Do not cap percentages at 100 (`PDH_FMT_NOCAP100`).
        const NOCAP100 = 0x0000_8000;
    }
}

/// Formats requested for a whole query: one shared by every counter, or one
/// per counter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormatSpec {
    Uniform(CounterFormat),
    PerCounter(Vec<CounterFormat>),
}

impl FormatSpec {
    /// Expand to exactly one format per counter path.
    ///
    /// Checked before the first PDH call: a per-counter list whose length
    /// does not match the path count is an argument error, not a subsystem
    /// failure.
    pub fn resolve(&self, paths: usize) -> Result<Vec<CounterFormat>, QueryError> {
        match self {
            Self::Uniform(format) => Ok(vec![*format; paths]),
            Self::PerCounter(formats) if formats.len() == paths => Ok(formats.clone()),
            Self::PerCounter(formats) => Err(QueryError::FormatCountMismatch {
                paths,
                formats: formats.len(),
            }),
        }
    }
}

impl From<CounterFormat> for FormatSpec {
    fn from(format: CounterFormat) -> Self {
        FormatSpec::Uniform(format)
    }
}

impl From<Vec<CounterFormat>> for FormatSpec {
    fn from(formats: Vec<CounterFormat>) -> Self {
        FormatSpec::PerCounter(formats)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn from_name_is_case_insensitive() {
        assert_eq!(CounterFormat::from_name("Double"), CounterFormat::Double);
        assert_eq!(CounterFormat::from_name("double"), CounterFormat::Double);
        assert_eq!(CounterFormat::from_name("DOUBLE"), CounterFormat::Double);
        assert_eq!(CounterFormat::from_name("Unicode"), CounterFormat::Unicode);
    }

    #[test]
    fn unknown_names_fall_back_to_long() {
        assert_eq!(CounterFormat::from_name("bogus"), CounterFormat::from_name("long"));
        assert_eq!(CounterFormat::from_name(""), CounterFormat::Long);
        // "raw" has no payload field in the native value union
        assert_eq!(CounterFormat::from_name("raw"), CounterFormat::Long);
    }

    #[test]
    fn uniform_spec_covers_every_path() {
        let spec = FormatSpec::from(CounterFormat::Large);
        let formats = spec.resolve(3).unwrap();
        assert_eq!(formats, vec![CounterFormat::Large; 3]);
    }

    #[test]
    fn per_counter_spec_preserves_order() {
        let spec = FormatSpec::from(vec![CounterFormat::Double, CounterFormat::Large]);
        let formats = spec.resolve(2).unwrap();
        assert_eq!(formats, vec![CounterFormat::Double, CounterFormat::Large]);
    }

    #[test]
    fn mismatched_lengths_are_an_argument_error() {
        let spec = FormatSpec::from(vec![CounterFormat::Double]);
        match spec.resolve(2) {
            Err(QueryError::FormatCountMismatch { paths, formats }) => {
                assert_eq!((paths, formats), (2, 1));
            }
            other => panic!("expected FormatCountMismatch, got {other:?}"),
        }
    }

    #[test]
    fn format_options_compose() {
        let options = FormatOptions::NOSCALE | FormatOptions::NOCAP100;
        assert_eq!(options.bits(), 0x9000);
        assert!(FormatOptions::default().is_empty());
    }
}
