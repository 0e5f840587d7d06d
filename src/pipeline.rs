//! The DEMON envelope pipeline.
//!
//! Stages run strictly in sequence, each consuming the whole output of the
//! previous one:
//!
//! ```text
//! validate → design bandpass → lfilter → demodulate → decimate → normalize
//! ```
//!
//! [`square_law`] and [`hilbert_detector`] differ only in the demodulator.
//! [`Demon`] validates and designs once, then runs any number of signals.
//!
//! # Example
//!
//! ```
//! use demon::{square_law, DemonConfig};
//! use core::f64::consts::PI;
//!
//! let config = DemonConfig::default();
//! let signal: Vec<f64> = (0..20_000)
//!     .map(|i| {
//!         let t = i as f64 / config.fs;
//!         (1.0 + 0.5 * (2.0 * PI * 50.0 * t).cos()) * (2.0 * PI * 25_000.0 * t).sin()
//!     })
//!     .collect();
//!
//! let envelope = square_law(&signal, &config).unwrap();
//! assert_eq!(envelope.decimation_factor(), 100);
//! assert_eq!(envelope.len(), 200);
//! assert_eq!(envelope.sample_rate(), 2_000.0);
//! ```

use crate::decimate::Decimator;
use crate::envelope::Demodulator;
use crate::error::{DemonError, Result};
use crate::filter::{butterworth_bandpass, lfilter, FilterCoefficients, FilterSpec};
use crate::normalize::{normalize, SqrtPolicy};
use crate::validate::{validate_cutoff, validate_passband, validate_sample_rate};

/// Parameters of a DEMON run.
///
/// Defaults match the reference setup: 200 kHz input, 20–30 kHz passband,
/// 1 kHz envelope bandwidth, order-3 Butterworth. The default
/// [`SqrtPolicy::Clamp`] absorbs the small negative undershoot the
/// anti-alias filter produces on noisy envelopes; with
/// [`SqrtPolicy::Reject`] such input fails with
/// [`DemonError::NegativeInput`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemonConfig {
    /// Envelope bandwidth of interest in Hz; sets the decimation factor
    pub cutoff: f64,
    /// Upper passband edge in Hz
    pub high: f64,
    /// Lower passband edge in Hz
    pub low: f64,
    /// Input sampling rate in Hz
    pub fs: f64,
    /// Butterworth prototype order (the bandpass has twice as many poles)
    pub order: usize,
    /// Handling of negative decimator output at the square-root stage
    pub sqrt_policy: SqrtPolicy,
}

impl Default for DemonConfig {
    fn default() -> Self {
        Self {
            cutoff: 1_000.0,
            high: 30_000.0,
            low: 20_000.0,
            fs: 200_000.0,
            order: 3,
            sqrt_policy: SqrtPolicy::Clamp,
        }
    }
}

impl DemonConfig {
    /// Sets the envelope bandwidth in Hz.
    pub fn with_cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = cutoff;
        self
    }

    /// Sets the passband edges in Hz.
    pub fn with_band(mut self, low: f64, high: f64) -> Self {
        self.low = low;
        self.high = high;
        self
    }

    /// Sets the input sampling rate in Hz.
    pub fn with_sample_rate(mut self, fs: f64) -> Self {
        self.fs = fs;
        self
    }

    /// Sets the Butterworth prototype order.
    pub fn with_order(mut self, order: usize) -> Self {
        self.order = order;
        self
    }

    /// Sets the square-root policy.
    pub fn with_sqrt_policy(mut self, policy: SqrtPolicy) -> Self {
        self.sqrt_policy = policy;
        self
    }
}

/// Final output: the zero-mean envelope at the decimated rate.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopeEstimate {
    samples: Vec<f64>,
    sample_rate: f64,
    decimation_factor: usize,
}

impl EnvelopeEstimate {
    /// Zero-mean envelope samples.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Output rate `fs / n` in Hz.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Decimation factor `n` applied to the input.
    pub fn decimation_factor(&self) -> usize {
        self.decimation_factor
    }

    /// Number of envelope samples, `ceil(N / n)`.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Consumes the estimate, returning the samples.
    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }
}

/// A validated pipeline with its bandpass and anti-alias filters designed.
pub struct Demon {
    config: DemonConfig,
    coeffs: FilterCoefficients,
    decimator: Decimator,
}

impl Demon {
    /// Validates `config` and designs the filters.
    ///
    /// Checks run in pipeline order: scalar parameters, passband geometry,
    /// normalized filter edges, decimation factor.
    pub fn new(config: DemonConfig) -> Result<Self> {
        validate_sample_rate(config.fs)?;
        validate_cutoff(config.cutoff)?;
        validate_passband(config.low, config.high)?;

        let spec = FilterSpec::from_hz(config.order, config.low, config.high, config.fs)?;
        let coeffs = butterworth_bandpass(&spec);

        // Zero-phase alignment. A causal filter's leading tail would make
        // the first outputs strongly negative, not just sidelobe undershoot.
        let decimator = Decimator::for_cutoff(config.fs, config.cutoff)?;
        log::debug!(
            "decimating by {} ({} Hz -> {} Hz)",
            decimator.factor(),
            config.fs,
            config.fs / decimator.factor() as f64
        );

        Ok(Self {
            config,
            coeffs,
            decimator,
        })
    }

    /// Configuration the pipeline was built from.
    pub fn config(&self) -> &DemonConfig {
        &self.config
    }

    /// Bandpass coefficients in use.
    pub fn coefficients(&self) -> &FilterCoefficients {
        &self.coeffs
    }

    /// Anti-alias decimator in use.
    pub fn decimator(&self) -> &Decimator {
        &self.decimator
    }

    /// Runs the full pipeline on `signal` with the chosen demodulator.
    pub fn run(&self, signal: &[f64], demodulator: Demodulator) -> Result<EnvelopeEstimate> {
        if signal.is_empty() {
            return Err(DemonError::EmptySignal);
        }

        let filtered = lfilter(&self.coeffs, signal);
        let envelope = demodulator.demodulate(&filtered);
        let decimated = self.decimator.process(&envelope);
        log::trace!(
            "{}: {} samples in, {} after decimation",
            demodulator.name(),
            signal.len(),
            decimated.len()
        );

        let samples = normalize(&decimated, self.config.sqrt_policy)?;
        let factor = self.decimator.factor();
        Ok(EnvelopeEstimate {
            samples,
            sample_rate: self.config.fs / factor as f64,
            decimation_factor: factor,
        })
    }
}

/// Square-law DEMON: bandpass, square, decimate, `sqrt`, remove mean.
pub fn square_law(signal: &[f64], config: &DemonConfig) -> Result<EnvelopeEstimate> {
    Demon::new(*config)?.run(signal, Demodulator::SquareLaw)
}

/// Hilbert DEMON: bandpass, analytic-signal magnitude, decimate, `sqrt`,
/// remove mean.
///
/// The passband geometry check applies here too, so a band that
/// [`square_law`] rejects is rejected by both detectors.
pub fn hilbert_detector(signal: &[f64], config: &DemonConfig) -> Result<EnvelopeEstimate> {
    Demon::new(*config)?.run(signal, Demodulator::HilbertMagnitude)
}
