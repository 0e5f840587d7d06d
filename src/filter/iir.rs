//! Butterworth bandpass design and recursive (IIR) filtering.
//!
//! Design follows the classic analog-prototype route:
//!
//! 1. Butterworth lowpass prototype poles on the left half of the unit circle
//! 2. Frequency pre-warping of the band edges
//! 3. Lowpass-to-bandpass transform in zero/pole/gain form
//! 4. Bilinear (s-to-z) transform
//! 5. Expansion of zeros and poles into transfer-function polynomials
//!
//! A bandpass of order `N` has `2N` poles, `N` zeros at `z = 1` and `N` zeros
//! at `z = -1`, giving `2N + 1` coefficients in both polynomials.

use core::f64::consts::PI;

use rustfft::num_complex::Complex64;

use crate::error::{DemonError, Result};

/// Bandpass specification with edges normalized to the Nyquist frequency.
///
/// Invariant: `order >= 1` and `0 < low < high < 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSpec {
    order: usize,
    low: f64,
    high: f64,
}

impl FilterSpec {
    /// Creates a specification from normalized cutoffs (fractions of Nyquist).
    pub fn new(order: usize, low: f64, high: f64) -> Result<Self> {
        if order == 0 {
            return Err(DemonError::InvalidFilterSpec("order must be at least 1"));
        }
        if !(low > 0.0 && low < 1.0) || !(high > 0.0 && high < 1.0) {
            return Err(DemonError::InvalidFilterSpec(
                "normalized cutoffs must lie strictly between 0 and 1",
            ));
        }
        if low >= high {
            return Err(DemonError::InvalidFilterSpec(
                "lower cutoff must be below upper cutoff",
            ));
        }
        Ok(Self { order, low, high })
    }

    /// Creates a specification from band edges in Hz and a sampling rate.
    ///
    /// # Example
    ///
    /// ```
    /// use demon::FilterSpec;
    ///
    /// let spec = FilterSpec::from_hz(3, 20_000.0, 30_000.0, 200_000.0).unwrap();
    /// assert!((spec.low() - 0.2).abs() < 1e-12);
    /// assert!((spec.high() - 0.3).abs() < 1e-12);
    /// ```
    pub fn from_hz(order: usize, low: f64, high: f64, fs: f64) -> Result<Self> {
        let nyq = 0.5 * fs;
        Self::new(order, low / nyq, high / nyq)
    }

    /// Prototype order (the bandpass has twice as many poles).
    pub fn order(&self) -> usize {
        self.order
    }

    /// Lower edge as a fraction of Nyquist.
    pub fn low(&self) -> f64 {
        self.low
    }

    /// Upper edge as a fraction of Nyquist.
    pub fn high(&self) -> f64 {
        self.high
    }
}

/// Transfer-function coefficients of a linear time-invariant IIR filter.
///
/// `feedforward` is the numerator `b`, `feedback` the denominator `a`,
/// stored with `a[0] == 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCoefficients {
    feedforward: Vec<f64>,
    feedback: Vec<f64>,
}

impl FilterCoefficients {
    /// Builds coefficients, normalizing both polynomials by `a[0]`.
    ///
    /// Lengths must match, be non-zero, and `a[0]` must be finite and non-zero.
    pub fn new(feedforward: Vec<f64>, feedback: Vec<f64>) -> Result<Self> {
        if feedforward.is_empty() || feedforward.len() != feedback.len() {
            return Err(DemonError::InvalidFilterSpec(
                "feedforward and feedback must be non-empty and equally long",
            ));
        }
        let a0 = feedback[0];
        if a0 == 0.0 || !a0.is_finite() {
            return Err(DemonError::InvalidFilterSpec(
                "leading feedback coefficient must be finite and non-zero",
            ));
        }

        Ok(Self {
            feedforward: feedforward.iter().map(|&b| b / a0).collect(),
            feedback: feedback.iter().map(|&a| a / a0).collect(),
        })
    }

    /// Numerator coefficients `b`.
    pub fn feedforward(&self) -> &[f64] {
        &self.feedforward
    }

    /// Denominator coefficients `a`, with `a[0] == 1`.
    pub fn feedback(&self) -> &[f64] {
        &self.feedback
    }

    /// Number of coefficients in each polynomial.
    pub fn len(&self) -> usize {
        self.feedforward.len()
    }

    /// Always false for validated coefficients.
    pub fn is_empty(&self) -> bool {
        self.feedforward.is_empty()
    }

    /// Complex response `H(e^{jw})` at angular frequency `w` in rad/sample.
    pub fn frequency_response(&self, w: f64) -> Complex64 {
        let eval = |coeffs: &[f64]| {
            coeffs
                .iter()
                .enumerate()
                .fold(Complex64::new(0.0, 0.0), |acc, (k, &c)| {
                    let phase = -w * k as f64;
                    acc + Complex64::new(c * libm::cos(phase), c * libm::sin(phase))
                })
        };
        eval(&self.feedforward) / eval(&self.feedback)
    }

    /// Magnitude response at `freq` Hz for sampling rate `fs`.
    ///
    /// # Example
    ///
    /// ```
    /// use demon::{butterworth_bandpass, FilterSpec};
    ///
    /// let spec = FilterSpec::from_hz(3, 20_000.0, 30_000.0, 200_000.0).unwrap();
    /// let coeffs = butterworth_bandpass(&spec);
    /// let gain = coeffs.magnitude_at(24_500.0, 200_000.0);
    /// assert!((gain - 1.0).abs() < 0.01);
    /// ```
    pub fn magnitude_at(&self, freq: f64, fs: f64) -> f64 {
        self.frequency_response(2.0 * PI * freq / fs).norm()
    }
}

/// Zero/pole/gain representation of a digital filter.
#[derive(Debug, Clone, PartialEq)]
pub struct ZpkDesign {
    /// Zeros in the z-plane
    pub zeros: Vec<Complex64>,
    /// Poles in the z-plane
    pub poles: Vec<Complex64>,
    /// Overall gain
    pub gain: f64,
}

impl ZpkDesign {
    /// True when every pole lies strictly inside the unit circle.
    pub fn is_stable(&self) -> bool {
        self.poles.iter().all(|p| p.norm() < 1.0)
    }

    /// Expands zeros and poles into transfer-function polynomials.
    pub fn to_coefficients(&self) -> FilterCoefficients {
        let feedforward = poly(&self.zeros)
            .into_iter()
            .map(|c| self.gain * c.re)
            .collect();
        let feedback = poly(&self.poles).into_iter().map(|c| c.re).collect();
        FilterCoefficients {
            feedforward,
            feedback,
        }
    }
}

/// Analog Butterworth lowpass prototype poles (cutoff 1 rad/s).
///
/// `p_k = -exp(j·π·m / 2N)` for `m = -N+1, -N+3, ..., N-1`.
pub fn butterworth_prototype(order: usize) -> Vec<Complex64> {
    let n = order as f64;
    (0..order)
        .map(|k| {
            let m = -(n - 1.0) + 2.0 * k as f64;
            let theta = PI * m / (2.0 * n);
            -Complex64::new(libm::cos(theta), libm::sin(theta))
        })
        .collect()
}

/// Designs a digital Butterworth bandpass in zero/pole/gain form.
pub fn butterworth_bandpass_zpk(spec: &FilterSpec) -> ZpkDesign {
    // Digital design with fs = 2, so the bilinear constant 2 * fs is 4.
    const FS2: f64 = 4.0;

    let order = spec.order();
    let prototype = butterworth_prototype(order);

    let w1 = FS2 * libm::tan(PI * spec.low() / 2.0);
    let w2 = FS2 * libm::tan(PI * spec.high() / 2.0);
    let bw = w2 - w1;
    let wo = libm::sqrt(w1 * w2);

    // Lowpass to bandpass: each prototype pole splits into a pair.
    let mut analog_poles = Vec::with_capacity(2 * order);
    let mut upper = Vec::with_capacity(order);
    for p in &prototype {
        let p_lp = *p * (bw / 2.0);
        let root = (p_lp * p_lp - wo * wo).sqrt();
        analog_poles.push(p_lp + root);
        upper.push(p_lp - root);
    }
    analog_poles.extend(upper);
    let analog_gain = libm::pow(bw, order as f64);

    // Bilinear transform. The N analog zeros at s = 0 map to z = 1 and the
    // N zeros at infinity map to z = -1.
    let fs2 = Complex64::new(FS2, 0.0);
    let poles: Vec<Complex64> = analog_poles
        .iter()
        .map(|&p| (fs2 + p) / (fs2 - p))
        .collect();
    let mut zeros = vec![Complex64::new(1.0, 0.0); order];
    zeros.extend(core::iter::repeat(Complex64::new(-1.0, 0.0)).take(order));

    let denom = analog_poles
        .iter()
        .fold(Complex64::new(1.0, 0.0), |acc, &p| acc * (fs2 - p));
    let gain = analog_gain * (Complex64::new(libm::pow(FS2, order as f64), 0.0) / denom).re;

    ZpkDesign { zeros, poles, gain }
}

/// Designs Butterworth bandpass transfer-function coefficients.
///
/// # Example
///
/// ```
/// use demon::{butterworth_bandpass, FilterSpec};
///
/// let spec = FilterSpec::from_hz(3, 20_000.0, 30_000.0, 200_000.0).unwrap();
/// let coeffs = butterworth_bandpass(&spec);
/// assert_eq!(coeffs.len(), 7);
/// assert_eq!(coeffs.feedback()[0], 1.0);
/// ```
pub fn butterworth_bandpass(spec: &FilterSpec) -> FilterCoefficients {
    let design = butterworth_bandpass_zpk(spec);
    let coeffs = design.to_coefficients();
    log::debug!(
        "butterworth bandpass order {} [{:.4}, {:.4}] x Nyquist: b = {:?}, a = {:?}",
        spec.order(),
        spec.low(),
        spec.high(),
        coeffs.feedforward(),
        coeffs.feedback()
    );
    coeffs
}

/// Coefficients of the monic polynomial with the given roots, highest power first.
fn poly(roots: &[Complex64]) -> Vec<Complex64> {
    let mut coeffs = vec![Complex64::new(1.0, 0.0)];
    for &r in roots {
        coeffs.push(Complex64::new(0.0, 0.0));
        for i in (1..coeffs.len()).rev() {
            let prev = coeffs[i - 1];
            coeffs[i] -= r * prev;
        }
    }
    coeffs
}

/// Single-pass IIR filter in transposed direct form II.
///
/// Realizes the recurrence
/// `y[i] = Σ b[k]·x[i-k] − Σ_{k≥1} a[k]·y[i-k]` with `a[0] == 1`,
/// starting from an all-zero history.
///
/// # Example
///
/// ```
/// use demon::{FilterCoefficients, IirFilter};
///
/// // One-pole smoother: y[i] = 0.5·x[i] + 0.5·y[i-1]
/// let coeffs = FilterCoefficients::new(vec![0.5, 0.0], vec![1.0, -0.5]).unwrap();
/// let mut filter = IirFilter::new(&coeffs);
///
/// assert_eq!(filter.process_sample(1.0), 0.5);
/// assert_eq!(filter.process_sample(1.0), 0.75);
/// ```
pub struct IirFilter {
    b: Vec<f64>,
    a: Vec<f64>,
    // z[k] holds the partial sum feeding output k+1 samples ahead
    state: Vec<f64>,
}

impl IirFilter {
    /// Creates a filter with zeroed history.
    pub fn new(coeffs: &FilterCoefficients) -> Self {
        let taps = coeffs.len();
        Self {
            b: coeffs.feedforward().to_vec(),
            a: coeffs.feedback().to_vec(),
            state: vec![0.0; taps.saturating_sub(1)],
        }
    }

    /// Processes a single sample.
    #[inline]
    pub fn process_sample(&mut self, input: f64) -> f64 {
        let order = self.state.len();
        if order == 0 {
            return self.b[0] * input;
        }

        let output = self.b[0] * input + self.state[0];
        for k in 0..order - 1 {
            self.state[k] = self.b[k + 1] * input + self.state[k + 1] - self.a[k + 1] * output;
        }
        self.state[order - 1] = self.b[order] * input - self.a[order] * output;
        output
    }

    /// Processes multiple samples in place.
    pub fn process_block(&mut self, samples: &mut [f64]) {
        for sample in samples.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }

    /// Clears the delay line.
    pub fn reset(&mut self) {
        self.state.iter_mut().for_each(|z| *z = 0.0);
    }
}

/// Applies `coeffs` to `input` with zero initial history.
///
/// Output has the same length as the input.
pub fn lfilter(coeffs: &FilterCoefficients, input: &[f64]) -> Vec<f64> {
    let mut output = input.to_vec();
    IirFilter::new(coeffs).process_block(&mut output);
    output
}
