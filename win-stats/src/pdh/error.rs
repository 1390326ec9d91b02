use std::fmt;

use thiserror::Error;

use crate::pdh::status::PdhStatus;

/// The PDH call a pipeline failure originated from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PdhCall {
    OpenQuery,
    AddCounter,
    AddEnglishCounter,
    CollectQueryData,
    FormattedValue,
    CloseQuery,
}

impl fmt::Display for PdhCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OpenQuery => "PdhOpenQueryW",
            Self::AddCounter => "PdhAddCounterW",
            Self::AddEnglishCounter => "PdhAddEnglishCounterW",
            Self::CollectQueryData => "PdhCollectQueryData",
            Self::FormattedValue => "PdhGetFormattedCounterValue",
            Self::CloseQuery => "PdhCloseQuery",
        })
    }
}

/// A PDH call returned a nonzero status.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{call} failed: {status}")]
pub struct PdhError {
    pub call: PdhCall,
    pub status: PdhStatus,
}

impl PdhError {
    pub fn new(call: PdhCall, status: impl Into<PdhStatus>) -> Self {
        PdhError {
            call,
            status: status.into(),
        }
    }
}

/// Failure of a whole counter query. No partial results: the first failing
/// stage aborts the call.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error(transparent)]
    Pdh(#[from] PdhError),

    /// A per-counter format list must name exactly one format per path.
    #[error("got {formats} formats for {paths} counter paths")]
    FormatCountMismatch { paths: usize, formats: usize },

    /// A query needs at least one counter path.
    #[error("no counter paths given")]
    NoCounterPaths,
}
