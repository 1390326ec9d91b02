//! Performance Data Helper: counter queries, status translation and value
//! formatting.
//!
//! The centerpiece is [`query_counters`]: open a query, register counter
//! paths against it, collect one sample (two separated in time when rate
//! counters are involved), read one formatted value per counter, close the
//! query.
pub mod error;
pub mod format;
pub mod status;
pub mod value;

#[cfg(windows)]
pub mod query;

pub use error::{PdhCall, PdhError, QueryError};
pub use format::{CounterFormat, FormatOptions, FormatSpec};
pub use status::PdhStatus;
pub use value::CounterValue;

#[cfg(windows)]
pub use query::{PdhCounter, PdhQuery, UseLocale, query_counter, query_counters};
