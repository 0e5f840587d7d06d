//! Anti-aliased decimation (downsampling) of a complete signal.
//!
//! Decimating by `n` keeps every `n`-th sample starting at index 0. Before
//! subsampling, the signal is lowpass filtered to remove content above the
//! new Nyquist frequency `fs / (2n)`; skipping that step folds high
//! frequencies back into the envelope band.
//!
//! The anti-alias filter is a Hamming-windowed sinc with `20n + 1` taps and
//! cutoff `1/n` of the input Nyquist frequency, normalized to unity DC gain.
//!
//! # Example
//!
//! ```
//! use demon::{decimation_factor, Decimator};
//!
//! // 200 kHz input, 1 kHz envelope bandwidth of interest
//! let factor = decimation_factor(200_000.0, 1_000.0).unwrap();
//! assert_eq!(factor, 100);
//!
//! let decimator = Decimator::new(factor);
//! let output = decimator.process(&vec![1.0; 10_000]);
//! assert_eq!(output.len(), 100);
//! ```

use crate::error::{DemonError, Result};
use crate::filter::{convolve_at, windowed_sinc};
use crate::window::WindowType;

/// Taps per unit of decimation factor on each side of the center tap.
const HALF_TAPS_PER_FACTOR: usize = 10;

/// Largest supported decimation factor (an anti-alias filter of about
/// 20 million taps). A 1 Hz envelope at 2 MHz sampling is still in range.
pub const MAX_DECIMATION_FACTOR: usize = 1_000_000;

/// How the anti-alias filter is aligned with the retained samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecimationMode {
    /// Filter centered on each retained sample; no group delay.
    #[default]
    ZeroPhase,
    /// Plain causal convolution, delayed by `10n` input samples.
    Causal,
}

/// Computes `floor(fs / (2 * cutoff))`.
///
/// Fails with [`DemonError::InvalidDecimationFactor`] when the result is
/// below 1 (the requested envelope bandwidth exceeds the input Nyquist
/// frequency) or above [`MAX_DECIMATION_FACTOR`].
pub fn decimation_factor(fs: f64, cutoff: f64) -> Result<usize> {
    let factor = libm::floor(fs / (2.0 * cutoff));
    // NaN and infinity fail this comparison as well
    if !(1.0..=MAX_DECIMATION_FACTOR as f64).contains(&factor) {
        return Err(DemonError::InvalidDecimationFactor { fs, cutoff });
    }
    Ok(factor as usize)
}

/// Lowpass-then-subsample decimator.
pub struct Decimator {
    /// Decimation factor (keep 1 out of every N samples)
    factor: usize,
    /// Anti-alias taps; empty when factor == 1
    taps: Vec<f64>,
    mode: DecimationMode,
}

impl Decimator {
    /// Creates a decimator with the specified factor.
    ///
    /// A factor of 1 passes the signal through unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `factor` is 0 or exceeds [`MAX_DECIMATION_FACTOR`].
    pub fn new(factor: usize) -> Self {
        assert!(factor >= 1, "Decimation factor must be at least 1");
        assert!(
            factor <= MAX_DECIMATION_FACTOR,
            "Decimation factor must not exceed MAX_DECIMATION_FACTOR"
        );
        let taps = if factor == 1 {
            Vec::new()
        } else {
            let num_taps = 2 * HALF_TAPS_PER_FACTOR * factor + 1;
            windowed_sinc(num_taps, 1.0 / factor as f64, WindowType::Hamming)
        };
        Self {
            factor,
            taps,
            mode: DecimationMode::default(),
        }
    }

    /// Creates a decimator for envelope bandwidth `cutoff` at input rate `fs`.
    pub fn for_cutoff(fs: f64, cutoff: f64) -> Result<Self> {
        decimation_factor(fs, cutoff).map(Self::new)
    }

    /// Selects the filter alignment.
    pub fn with_mode(mut self, mode: DecimationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Get the decimation factor.
    pub fn factor(&self) -> usize {
        self.factor
    }

    /// Anti-alias filter taps (empty for factor 1).
    pub fn taps(&self) -> &[f64] {
        &self.taps
    }

    /// Filter alignment in use.
    pub fn mode(&self) -> DecimationMode {
        self.mode
    }

    /// Output length for an input of `input_len` samples: `ceil(N / n)`.
    pub fn output_len(&self, input_len: usize) -> usize {
        input_len.div_ceil(self.factor)
    }

    /// Filters and downsamples `input`.
    ///
    /// Output sample `k` corresponds to input sample `k * factor`.
    pub fn process(&self, input: &[f64]) -> Vec<f64> {
        if self.factor == 1 {
            return input.to_vec();
        }

        let offset = match self.mode {
            DecimationMode::ZeroPhase => (self.taps.len() - 1) / 2,
            DecimationMode::Causal => 0,
        };

        (0..self.output_len(input.len()))
            .map(|k| convolve_at(&self.taps, input, k * self.factor + offset))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::PI;

    #[test]
    fn test_factor_from_rates() {
        assert_eq!(decimation_factor(200_000.0, 1_000.0).unwrap(), 100);
        assert_eq!(decimation_factor(1_000.0, 300.0).unwrap(), 1);
        assert_eq!(decimation_factor(1_000.0, 90.0).unwrap(), 5);
    }

    #[test]
    fn test_factor_below_one_rejected() {
        assert_eq!(
            decimation_factor(1_000.0, 600.0),
            Err(DemonError::InvalidDecimationFactor {
                fs: 1_000.0,
                cutoff: 600.0
            })
        );
        assert!(decimation_factor(1_000.0, 0.0).is_err());
        assert!(decimation_factor(f64::NAN, 10.0).is_err());
        assert!(decimation_factor(1_000.0, -5.0).is_err());
    }

    #[test]
    fn test_factor_above_limit_rejected() {
        assert_eq!(
            decimation_factor(200_000.0, 1e-300),
            Err(DemonError::InvalidDecimationFactor {
                fs: 200_000.0,
                cutoff: 1e-300
            })
        );
        // 2e9 taps would be needed here
        assert!(decimation_factor(200_000.0, 0.001).is_err());
        assert!(decimation_factor(f64::INFINITY, 10.0).is_err());
        // The limit itself is accepted
        assert_eq!(
            decimation_factor(2.0 * MAX_DECIMATION_FACTOR as f64, 1.0).unwrap(),
            MAX_DECIMATION_FACTOR
        );
    }

    #[test]
    fn test_sidelobes_undershoot_non_negative_input() {
        // A spike under the first negative sidelobe of the output-0 kernel
        // (7 samples from its center at factor 5) drives that output negative
        let mut x = vec![0.0; 100];
        x[7] = 1.0;
        let out = Decimator::new(5).process(&x);
        assert!(out[0] < 0.0, "expected undershoot, got {}", out[0]);
        assert!(out[1] > 0.0);
    }

    #[test]
    fn test_output_length_is_ceil() {
        let dec = Decimator::new(4);
        for n in [0usize, 1, 3, 4, 5, 8, 9, 101] {
            let out = dec.process(&vec![0.5; n]);
            assert_eq!(out.len(), (n + 3) / 4, "input length {}", n);
            assert_eq!(dec.output_len(n), out.len());
        }
    }

    #[test]
    fn test_factor_one_is_passthrough() {
        let dec = Decimator::new(1);
        assert!(dec.taps().is_empty());
        let x = [1.0, -2.0, 3.0];
        assert_eq!(dec.process(&x), x.to_vec());
    }

    #[test]
    fn test_taps_shape() {
        let dec = Decimator::new(5);
        assert_eq!(dec.taps().len(), 101);
        let sum: f64 = dec.taps().iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_is_preserved_away_from_edges() {
        let dec = Decimator::new(10);
        let out = dec.process(&vec![3.0; 5_000]);
        assert_eq!(out.len(), 500);
        // Filter reaches 100 input samples (10 outputs) each way
        for &y in &out[10..490] {
            assert!((y - 3.0).abs() < 1e-9, "constant not preserved: {}", y);
        }
        // Edges see half the kernel
        assert!(out[0] > 1.0 && out[0] < 2.5);
    }

    #[test]
    fn test_causal_constant_after_transient() {
        let dec = Decimator::new(10).with_mode(DecimationMode::Causal);
        assert_eq!(dec.mode(), DecimationMode::Causal);
        let out = dec.process(&vec![2.0; 2_000]);
        // Transient lasts one filter length (201 input samples)
        assert!(out[0].abs() < 0.1);
        for &y in &out[21..] {
            assert!((y - 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zero_phase_keeps_alignment() {
        // A slow tone is reproduced at the retained instants without delay
        let factor = 8;
        let n = 8_000;
        let x: Vec<f64> = (0..n)
            .map(|i| libm::sin(2.0 * PI * i as f64 / 800.0))
            .collect();
        let out = Decimator::new(factor).process(&x);
        for k in 50..(out.len() - 50) {
            let expected = x[k * factor];
            assert!(
                (out[k] - expected).abs() < 1e-3,
                "k={}: {} vs {}",
                k,
                out[k],
                expected
            );
        }
    }

    #[test]
    fn test_aliasing_tone_removed() {
        // 0.45 cycles/sample would alias to 0.05 after naive decimation by 4
        let factor = 4;
        let n = 4_000;
        let x: Vec<f64> = (0..n)
            .map(|i| libm::cos(2.0 * PI * 0.45 * i as f64))
            .collect();
        let out = Decimator::new(factor).process(&x);
        let interior = &out[20..out.len() - 20];
        let peak = interior.iter().fold(0.0f64, |m, &v| m.max(v.abs()));
        assert!(peak < 0.01, "aliased tone leaked with peak {}", peak);
    }

    #[test]
    fn test_for_cutoff() {
        let dec = Decimator::for_cutoff(200_000.0, 1_000.0).unwrap();
        assert_eq!(dec.factor(), 100);
        assert_eq!(dec.taps().len(), 2_001);
        assert!(Decimator::for_cutoff(100.0, 80.0).is_err());
    }

    #[test]
    #[should_panic(expected = "Decimation factor must be at least 1")]
    fn test_decimator_factor_zero_panics() {
        let _dec = Decimator::new(0);
    }

    #[test]
    #[should_panic(expected = "Decimation factor must not exceed MAX_DECIMATION_FACTOR")]
    fn test_decimator_factor_too_large_panics() {
        let _dec = Decimator::new(MAX_DECIMATION_FACTOR + 1);
    }
}
