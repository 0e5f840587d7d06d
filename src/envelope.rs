//! Envelope demodulation of a bandpassed signal.
//!
//! Two interchangeable detectors turn the bandpassed carrier into a
//! non-negative envelope estimate of the same length:
//!
//! - [`Demodulator::SquareLaw`]: `x²`, proportional to instantaneous power.
//!   Cheap and pointwise, but produces a component at twice the carrier
//!   frequency that the decimation lowpass has to remove.
//! - [`Demodulator::HilbertMagnitude`]: `|x + i·H[x]|`, the magnitude of the
//!   analytic signal. Needs the whole block for the FFT.

use crate::hilbert::instantaneous_amplitude;

/// Envelope detection method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Demodulator {
    /// Squared value: `x²`
    SquareLaw,
    /// Analytic-signal magnitude: `sqrt(x² + H[x]²)`
    HilbertMagnitude,
}

impl Demodulator {
    /// Demodulates `signal`, returning an envelope estimate of equal length.
    ///
    /// Every output sample is non-negative.
    ///
    /// # Example
    ///
    /// ```
    /// use demon::Demodulator;
    ///
    /// let squared = Demodulator::SquareLaw.demodulate(&[1.0, -2.0, 0.5]);
    /// assert_eq!(squared, vec![1.0, 4.0, 0.25]);
    /// ```
    pub fn demodulate(self, signal: &[f64]) -> Vec<f64> {
        match self {
            Demodulator::SquareLaw => square_law(signal),
            Demodulator::HilbertMagnitude => instantaneous_amplitude(signal),
        }
    }

    /// Short name used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Demodulator::SquareLaw => "square-law",
            Demodulator::HilbertMagnitude => "hilbert",
        }
    }
}

fn square_law(signal: &[f64]) -> Vec<f64> {
    signal.iter().map(|&x| x * x).collect()
}
