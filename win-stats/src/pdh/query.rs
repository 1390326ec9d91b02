use std::marker::PhantomData;
use std::mem::ManuallyDrop;
use std::thread;
use std::time::Duration;

use widestring::{U16CStr, U16CString};
use windows::Win32::System::Performance::{
    PDH_FMT_1000, PDH_FMT_ANSI, PDH_FMT_COUNTERVALUE, PDH_FMT_DOUBLE, PDH_FMT_LARGE, PDH_FMT_LONG,
    PDH_FMT_NOCAP100, PDH_FMT_NOSCALE, PDH_FMT_UNICODE, PDH_HCOUNTER, PDH_HQUERY, PdhAddCounterW,
    PdhAddEnglishCounterW, PdhCloseQuery, PdhCollectQueryData, PdhGetFormattedCounterValue,
    PdhOpenQueryW,
};
use windows_core::PCWSTR;

use crate::pdh::error::{PdhCall, PdhError, QueryError};
use crate::pdh::format::{CounterFormat, FormatOptions, FormatSpec};
use crate::pdh::status::PdhStatus;
use crate::pdh::value::CounterValue;

/// Which name table counter paths are resolved against at registration.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum UseLocale {
    /// Locale-neutral English counter names (`PdhAddEnglishCounterW`).
    English,
    /// Names localized for the current user (`PdhAddCounterW`).
    #[default]
    UiDefault,
}

impl UseLocale {
    fn add_call(&self) -> PdhCall {
        match self {
            Self::English => PdhCall::AddEnglishCounter,
            Self::UiDefault => PdhCall::AddCounter,
        }
    }
}

fn check(call: PdhCall, status: u32) -> Result<(), PdhError> {
    if status == 0 {
        Ok(())
    } else {
        Err(PdhError::new(call, status))
    }
}

/// An open PDH query: a live counter-collection session.
///
/// The native handle is closed when the query is dropped, on every exit
/// path; [`PdhQuery::close`] closes it eagerly and reports the status of
/// `PdhCloseQuery` itself.
#[derive(Debug)]
pub struct PdhQuery {
    handle: PDH_HQUERY,
}

impl PdhQuery {
    /// Open a new query (`PdhOpenQueryW`).
    pub fn open() -> Result<Self, PdhError> {
        let mut handle = PDH_HQUERY::default();
        // NULL data source: query live performance data.
        let status = unsafe { PdhOpenQueryW(None, 0, &mut handle) };
        check(PdhCall::OpenQuery, status)?;
        Ok(PdhQuery { handle })
    }

    /// Register one counter path against this query.
    ///
    /// The path is opaque here; PDH validates it during registration. The
    /// returned counter stays usable for as long as the query is open and is
    /// released together with it.
    pub fn add_counter(&self, path: &str, locale: UseLocale) -> Result<PdhCounter<'_>, PdhError> {
        let wide = U16CString::from_str_truncate(path);
        let mut handle = PDH_HCOUNTER::default();
        let status = unsafe {
            match locale {
                UseLocale::English => {
                    PdhAddEnglishCounterW(self.handle, PCWSTR(wide.as_ptr()), 0, &mut handle)
                }
                UseLocale::UiDefault => {
                    PdhAddCounterW(self.handle, PCWSTR(wide.as_ptr()), 0, &mut handle)
                }
            }
        };
        check(locale.add_call(), status)?;
        Ok(PdhCounter {
            handle,
            _query: PhantomData,
        })
    }

    /// Collect one sample covering every counter of this query
    /// (`PdhCollectQueryData`).
    pub fn collect(&self) -> Result<(), PdhError> {
        let status = unsafe { PdhCollectQueryData(self.handle) };
        check(PdhCall::CollectQueryData, status)
    }

    /// Close the query eagerly, surfacing the `PdhCloseQuery` status.
    pub fn close(self) -> Result<(), PdhError> {
        let this = ManuallyDrop::new(self);
        let status = unsafe { PdhCloseQuery(this.handle) };
        check(PdhCall::CloseQuery, status)
    }
}

impl Drop for PdhQuery {
    fn drop(&mut self) {
        let status = unsafe { PdhCloseQuery(self.handle) };
        if status != 0 {
            tracing::warn!(status = %PdhStatus::new(status), "PdhCloseQuery failed");
        }
    }
}

/// A counter registered against one query. PDH releases it together with the
/// query; there is no per-counter close.
#[derive(Debug)]
pub struct PdhCounter<'q> {
    handle: PDH_HCOUNTER,
    _query: PhantomData<&'q PdhQuery>,
}

impl PdhCounter<'_> {
    /// Read this counter's value from the last collected sample
    /// (`PdhGetFormattedCounterValue`).
    pub fn formatted_value(
        &self,
        format: CounterFormat,
        options: FormatOptions,
    ) -> Result<CounterValue, PdhError> {
        let mut flag = match format {
            CounterFormat::Long => PDH_FMT_LONG,
            CounterFormat::Double => PDH_FMT_DOUBLE,
            CounterFormat::Large => PDH_FMT_LARGE,
            CounterFormat::Ansi => PDH_FMT_ANSI,
            CounterFormat::Unicode => PDH_FMT_UNICODE,
        };
        if options.contains(FormatOptions::NOSCALE) {
            flag |= PDH_FMT_NOSCALE;
        }
        if options.contains(FormatOptions::X1000) {
            flag |= PDH_FMT_1000;
        }
        if options.contains(FormatOptions::NOCAP100) {
            flag |= PDH_FMT_NOCAP100;
        }

        let mut raw = PDH_FMT_COUNTERVALUE::default();
        let status = unsafe { PdhGetFormattedCounterValue(self.handle, flag, None, &mut raw) };
        check(PdhCall::FormattedValue, status)?;

        // String payloads live only until the next call on this counter;
        // copy them out before returning.
        let value = unsafe {
            match format {
                CounterFormat::Long => CounterValue::Long(raw.Anonymous.longValue),
                CounterFormat::Double => CounterValue::Double(raw.Anonymous.doubleValue),
                CounterFormat::Large => CounterValue::Large(raw.Anonymous.largeValue),
                CounterFormat::Ansi => {
                    let ptr = raw.Anonymous.AnsiStringValue;
                    let text = if ptr.is_null() {
                        String::new()
                    } else {
                        String::from_utf8_lossy(ptr.as_bytes()).into_owned()
                    };
                    CounterValue::Ansi(text)
                }
                CounterFormat::Unicode => {
                    let ptr = raw.Anonymous.WideStringValue;
                    let text = if ptr.is_null() {
                        U16CString::default()
                    } else {
                        U16CStr::from_ptr_str(ptr.0).to_ucstring()
                    };
                    CounterValue::Unicode(text)
                }
            }
        };
        Ok(value)
    }
}

/// Query one or more counters in a single open → add → collect → format →
/// close pass.
///
/// Returns exactly one value per path, in input order, each tagged by the
/// format requested for that position. Rate counters are meaningless from a
/// single point sample: pass a nonzero `delay` to collect a second sample
/// after that pause, and the returned values reflect it. A zero `delay`
/// collects exactly once.
///
/// The first failing stage aborts the call with the stage name and the
/// translated status; no retries, no partial results. The query handle is
/// released on every path out of this function.
pub fn query_counters<S: AsRef<str>>(
    paths: &[S],
    formats: impl Into<FormatSpec>,
    locale: UseLocale,
    delay: Duration,
) -> Result<Vec<CounterValue>, QueryError> {
    if paths.is_empty() {
        return Err(QueryError::NoCounterPaths);
    }
    let formats = formats.into().resolve(paths.len())?;

    let query = PdhQuery::open()?;
    let mut counters = Vec::with_capacity(paths.len());
    for path in paths {
        counters.push(query.add_counter(path.as_ref(), locale)?);
    }

    query.collect()?;
    if !delay.is_zero() {
        thread::sleep(delay);
        query.collect()?;
    }

    let mut values = Vec::with_capacity(counters.len());
    for (counter, format) in counters.iter().zip(formats) {
        values.push(counter.formatted_value(format, FormatOptions::empty())?);
    }

    // counters die with the query
    drop(counters);
    query.close()?;
    Ok(values)
}

/// Single-counter convenience over [`query_counters`].
pub fn query_counter(
    path: &str,
    format: CounterFormat,
    delay: Duration,
) -> Result<CounterValue, QueryError> {
    let mut values = query_counters(&[path], format, UseLocale::default(), delay)?;
    Ok(values.pop().expect("one value per path"))
}

#[cfg(test)]
mod test {
    use std::time::Instant;

    use super::*;

    #[test]
    fn open_and_close() {
        let query = PdhQuery::open().expect("open query");
        query.close().expect("close query");
    }

    #[test]
    fn single_instant_counter() {
        let values = query_counters(
            &["\\System\\Processes"],
            CounterFormat::Long,
            UseLocale::English,
            Duration::ZERO,
        )
        .expect("query");
        assert_eq!(values.len(), 1);
        assert!(values[0].as_long().expect("long value") > 0);
    }

    #[test]
    fn per_counter_formats_keep_input_order() {
        let values = query_counters(
            &["\\Paging File(_Total)\\% Usage", "\\Memory\\Available MBytes"],
            vec![CounterFormat::Double, CounterFormat::Large],
            UseLocale::English,
            Duration::ZERO,
        )
        .expect("query");
        assert_eq!(values.len(), 2);
        assert_eq!(values[0].format(), CounterFormat::Double);
        assert_eq!(values[1].format(), CounterFormat::Large);
    }

    #[test]
    fn rate_counter_waits_for_the_second_sample() {
        let delay = Duration::from_millis(100);
        let before = Instant::now();
        let values = query_counters(
            &["\\Processor(_Total)\\% Processor Time"],
            CounterFormat::Double,
            UseLocale::English,
            delay,
        )
        .expect("query");
        assert!(before.elapsed() >= delay);
        assert!(values[0].as_double().is_some());
    }

    #[test]
    fn bad_counter_path_fails_at_registration() {
        let error = query_counters(
            &["\\No Such Object\\No Such Counter"],
            CounterFormat::Long,
            UseLocale::English,
            Duration::ZERO,
        )
        .unwrap_err();
        match error {
            QueryError::Pdh(e) => assert_eq!(e.call, PdhCall::AddEnglishCounter),
            other => panic!("expected a PDH error, got {other:?}"),
        }
    }

    #[test]
    fn mismatched_formats_fail_before_any_pdh_call() {
        let error = query_counters(
            &["\\System\\Processes", "\\System\\Threads"],
            vec![CounterFormat::Long],
            UseLocale::English,
            Duration::ZERO,
        )
        .unwrap_err();
        assert_eq!(
            error,
            QueryError::FormatCountMismatch { paths: 2, formats: 1 }
        );
    }

    #[test]
    fn empty_path_list_is_rejected() {
        let paths: &[&str] = &[];
        let error = query_counters(paths, CounterFormat::Long, UseLocale::default(), Duration::ZERO)
            .unwrap_err();
        assert_eq!(error, QueryError::NoCounterPaths);
    }
}
