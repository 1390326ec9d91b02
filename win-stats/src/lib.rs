//! # High-level wrappers for Windows host telemetry
//!
//! Memory and system performance snapshots, logical drive and volume queries,
//! and a Performance Data Helper (PDH) counter query engine.
pub mod drive;
pub mod error;
pub mod mem;
pub mod pdh;
pub mod prelude;
