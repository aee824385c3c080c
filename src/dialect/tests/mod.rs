//! Dialect test modules.
//!
//! Tests are organized by category:
//! - `dialects`: per-backend rendering (truncation, casts, intervals,
//!   series, approximate distinct)
//! - `features`: contract properties that must hold across every
//!   registered variant (wildcard placement, date-bin rejection,
//!   granularity support, alias limits)

mod features;
