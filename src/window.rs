//! Window functions for windowed-sinc FIR design.
//!
//! | Window | Main Lobe Width | Sidelobe Level |
//! |--------|-----------------|----------------|
//! | Rectangular | Narrowest | -13 dB |
//! | Hann | Moderate | -31 dB |
//! | Hamming | Moderate | -42 dB |
//! | Blackman | Wide | -58 dB |
//!
//! The anti-alias filter in [`crate::decimate`] uses [`WindowType::Hamming`].

use core::f64::consts::PI;

/// Window function types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowType {
    /// Rectangular window (plain truncation).
    Rectangular,

    /// Hann window (raised cosine).
    Hann,

    /// Hamming window.
    ///
    /// Does not taper to zero at the endpoints.
    #[default]
    Hamming,

    /// Blackman window (3-term).
    Blackman,
}

/// Computes a single symmetric window coefficient.
///
/// # Panics
///
/// Panics if `index >= length` or `length == 0`.
///
/// # Example
///
/// ```
/// use demon::{window_coefficient, WindowType};
///
/// // Hamming endpoints sit at 0.08, the center at 1.0
/// let first = window_coefficient(WindowType::Hamming, 0, 21);
/// let middle = window_coefficient(WindowType::Hamming, 10, 21);
/// assert!((first - 0.08).abs() < 1e-12);
/// assert!((middle - 1.0).abs() < 1e-12);
/// ```
#[inline]
pub fn window_coefficient(window: WindowType, index: usize, length: usize) -> f64 {
    assert!(length > 0, "Window length must be positive");
    assert!(index < length, "Index must be less than length");

    if length == 1 {
        return 1.0;
    }

    let ratio = index as f64 / (length - 1) as f64;

    let value = match window {
        WindowType::Rectangular => 1.0,

        // 0.5 * (1 - cos(2*pi*n/(N-1)))
        WindowType::Hann => 0.5 * (1.0 - libm::cos(2.0 * PI * ratio)),

        // 0.54 - 0.46 * cos(2*pi*n/(N-1))
        WindowType::Hamming => 0.54 - 0.46 * libm::cos(2.0 * PI * ratio),

        // 0.42 - 0.5*cos(2*pi*n/(N-1)) + 0.08*cos(4*pi*n/(N-1))
        WindowType::Blackman => {
            0.42 - 0.5 * libm::cos(2.0 * PI * ratio) + 0.08 * libm::cos(4.0 * PI * ratio)
        }
    };

    // Hann and Blackman can dip a hair below zero at the endpoints
    value.max(0.0)
}

/// Builds a full window of `length` coefficients.
///
/// Returns an empty vector for `length == 0`.
pub fn window(window: WindowType, length: usize) -> Vec<f64> {
    (0..length)
        .map(|i| window_coefficient(window, i, length))
        .collect()
}
