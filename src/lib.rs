//! DEMON (Detection of Envelope Modulation on Noise) envelope estimation.
//!
//! Recovers the low-frequency modulation riding on broadband acoustic noise:
//! the signal is bandpassed, demodulated, decimated to the envelope rate,
//! square-root compressed and centered. See [`pipeline`] for the stages.
//!
//! ```
//! use demon::{hilbert_detector, DemonConfig};
//!
//! let config = DemonConfig::default().with_band(22_000.0, 28_000.0);
//! let signal: Vec<f64> = (0..4_000).map(|i| (i as f64 * 0.8).sin()).collect();
//! let envelope = hilbert_detector(&signal, &config).unwrap();
//! assert_eq!(envelope.len(), 40);
//! ```

pub mod decimate;
pub mod envelope;
mod error;
mod filter;
pub mod hilbert;
mod normalize;
pub mod pipeline;
mod stats;
pub mod validate;
mod window;

pub use decimate::{decimation_factor, DecimationMode, Decimator};
pub use envelope::Demodulator;
pub use error::{DemonError, Result};
pub use filter::{
    butterworth_bandpass, butterworth_bandpass_zpk, butterworth_prototype, convolve_at, lfilter,
    lowpass_taps, FilterCoefficients, FilterSpec, IirFilter, ZpkDesign,
};
pub use hilbert::{analytic_signal, instantaneous_amplitude, AnalyticSignal};
pub use normalize::{normalize, SqrtPolicy};
pub use pipeline::{hilbert_detector, square_law, Demon, DemonConfig, EnvelopeEstimate};
pub use stats::OnlineStats;
pub use validate::validate_passband;
pub use window::{window, window_coefficient, WindowType};
