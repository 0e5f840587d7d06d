//! Error type shared by every stage of the envelope pipeline.

use thiserror::Error;

/// Errors that can occur while estimating an envelope.
///
/// Every stage reports the first violation it observes and the pipeline
/// stops there. No partial output is returned.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum DemonError {
    /// Passband width exceeds the passband center frequency.
    #[error("passband width exceeds passband center frequency (low = {low} Hz, high = {high} Hz)")]
    InvalidBandwidth {
        /// Lower passband edge in Hz
        low: f64,
        /// Upper passband edge in Hz
        high: f64,
    },

    /// Normalized cutoffs out of range or misordered, or malformed coefficients.
    #[error("invalid filter specification: {0}")]
    InvalidFilterSpec(&'static str),

    /// `floor(fs / (2 * cutoff))` is below 1 or above
    /// [`MAX_DECIMATION_FACTOR`](crate::decimate::MAX_DECIMATION_FACTOR).
    #[error("decimation factor out of range (fs = {fs} Hz, cutoff = {cutoff} Hz)")]
    InvalidDecimationFactor {
        /// Input sampling rate in Hz
        fs: f64,
        /// Requested envelope bandwidth in Hz
        cutoff: f64,
    },

    /// A negative value reached the square-root stage.
    #[error("negative value {value} at index {index} cannot be square-rooted")]
    NegativeInput {
        /// Position of the first negative sample
        index: usize,
        /// The offending value
        value: f64,
    },

    /// The input signal has no samples.
    #[error("signal is empty")]
    EmptySignal,

    /// A scalar parameter is non-finite or out of its domain.
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, DemonError>;
