//! Hilbert transform for analytic signal computation.
//!
//! The analytic signal is computed in the frequency domain:
//! ```text
//! a(t) = x(t) + i·H[x(t)]
//! ```
//! where `H[x(t)]` is the Hilbert transform (90° phase shift).
//!
//! From the analytic signal, we can extract:
//! - **Instantaneous amplitude**: `|a(t)|`
//! - **Instantaneous phase**: `arg(a(t))`
//!
//! # Important Limitations
//!
//! **Narrowband assumption**: instantaneous amplitude is only meaningful for
//! narrowband signals. Bandpass filter before applying the transform.
//!
//! **Non-causal**: the block transform needs the whole signal in memory.
//! Edges show ringing because the FFT treats the block as periodic.
//!
//! # Example
//!
//! ```
//! use demon::hilbert::analytic_signal;
//! use core::f64::consts::PI;
//!
//! // 10 full cycles of a cosine
//! let signal: Vec<f64> = (0..200)
//!     .map(|i| (2.0 * PI * 10.0 * i as f64 / 200.0).cos())
//!     .collect();
//!
//! let analytic = analytic_signal(&signal);
//! for amplitude in analytic.magnitude() {
//!     assert!((amplitude - 1.0).abs() < 1e-9);
//! }
//! ```

use rustfft::num_complex::Complex64;
use rustfft::FftPlanner;

/// Complex analytic signal: real part is the input, imaginary part its
/// Hilbert transform.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticSignal {
    samples: Vec<Complex64>,
}

impl AnalyticSignal {
    /// Complex samples.
    pub fn samples(&self) -> &[Complex64] {
        &self.samples
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True for an empty signal.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Instantaneous amplitude `sqrt(re² + im²)`.
    pub fn magnitude(&self) -> Vec<f64> {
        self.samples
            .iter()
            .map(|z| libm::hypot(z.re, z.im))
            .collect()
    }

    /// Instantaneous phase in radians, in `[-π, π]`.
    pub fn instantaneous_phase(&self) -> Vec<f64> {
        self.samples
            .iter()
            .map(|z| libm::atan2(z.im, z.re))
            .collect()
    }

    /// The Hilbert transform alone (imaginary part).
    pub fn hilbert_part(&self) -> Vec<f64> {
        self.samples.iter().map(|z| z.im).collect()
    }

    /// Consumes the wrapper, returning the complex samples.
    pub fn into_inner(self) -> Vec<Complex64> {
        self.samples
    }
}

/// Computes the analytic signal of a real sequence of any length.
///
/// 1. Forward FFT
/// 2. Keep DC and, for even lengths, the Nyquist bin
/// 3. Double the positive frequencies
/// 4. Zero the negative frequencies
/// 5. Inverse FFT, scaled by `1/N`
pub fn analytic_signal(signal: &[f64]) -> AnalyticSignal {
    let n = signal.len();
    if n == 0 {
        return AnalyticSignal {
            samples: Vec::new(),
        };
    }

    let mut buffer: Vec<Complex64> = signal.iter().map(|&x| Complex64::new(x, 0.0)).collect();

    let mut planner = FftPlanner::<f64>::new();
    planner.plan_fft_forward(n).process(&mut buffer);

    // Bins 1..positive_end are doubled; the rest past them are zeroed
    let positive_end = (n + 1) / 2;
    for bin in buffer.iter_mut().take(positive_end).skip(1) {
        *bin *= 2.0;
    }
    let negative_start = if n % 2 == 0 { n / 2 + 1 } else { positive_end };
    for bin in buffer.iter_mut().skip(negative_start) {
        *bin = Complex64::new(0.0, 0.0);
    }

    planner.plan_fft_inverse(n).process(&mut buffer);

    let scale = 1.0 / n as f64;
    for z in buffer.iter_mut() {
        *z *= scale;
    }

    AnalyticSignal { samples: buffer }
}

/// Instantaneous amplitude (envelope) of a real signal.
///
/// Shorthand for `analytic_signal(signal).magnitude()`.
pub fn instantaneous_amplitude(signal: &[f64]) -> Vec<f64> {
    analytic_signal(signal).magnitude()
}
