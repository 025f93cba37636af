pub mod service;
pub mod validate;

pub use service::{IngestError, IngestService, ListLimits, ReadingQuery, StatusSnapshot, Submission};
pub use validate::{RawReading, ValidationError};

/// Pressure in bar above which a reading is classified as a leak.
pub const LEAK_THRESHOLD: f64 = 3.5;

/// Strictly greater than [`LEAK_THRESHOLD`]; exactly 3.5 bar is not a leak.
#[inline]
pub fn classify(pressure: f64) -> bool {
    pressure > LEAK_THRESHOLD
}
