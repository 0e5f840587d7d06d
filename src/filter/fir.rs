use core::f64::consts::PI;

use crate::error::{DemonError, Result};
use crate::window::{window_coefficient, WindowType};

/// Designs a windowed-sinc lowpass FIR filter.
///
/// `cutoff` is a fraction of the Nyquist frequency in `(0, 1)`. The taps are
/// symmetric (linear phase) and scaled to unity gain at DC.
///
/// # Example
///
/// ```
/// use demon::{lowpass_taps, WindowType};
///
/// let taps = lowpass_taps(41, 0.25, WindowType::Hamming).unwrap();
/// let dc_gain: f64 = taps.iter().sum();
/// assert!((dc_gain - 1.0).abs() < 1e-12);
/// ```
pub fn lowpass_taps(num_taps: usize, cutoff: f64, window: WindowType) -> Result<Vec<f64>> {
    if num_taps == 0 {
        return Err(DemonError::InvalidFilterSpec(
            "FIR filter needs at least one tap",
        ));
    }
    if !(cutoff > 0.0 && cutoff < 1.0) {
        return Err(DemonError::InvalidFilterSpec(
            "FIR cutoff must lie strictly between 0 and 1",
        ));
    }
    Ok(windowed_sinc(num_taps, cutoff, window))
}

/// Unchecked core of [`lowpass_taps`]; callers guarantee the arguments.
pub(crate) fn windowed_sinc(num_taps: usize, cutoff: f64, window: WindowType) -> Vec<f64> {
    let alpha = 0.5 * (num_taps - 1) as f64;
    let mut taps: Vec<f64> = (0..num_taps)
        .map(|i| {
            let m = i as f64 - alpha;
            cutoff * sinc(cutoff * m) * window_coefficient(window, i, num_taps)
        })
        .collect();

    let dc_gain: f64 = taps.iter().sum();
    for tap in taps.iter_mut() {
        *tap /= dc_gain;
    }
    taps
}

/// One output of the convolution `y = h * x`, evaluated at `index`.
///
/// Computes `sum(h[k] * x[index - k])` with `x` treated as zero outside
/// its bounds.
#[inline]
pub fn convolve_at(taps: &[f64], input: &[f64], index: usize) -> f64 {
    if input.is_empty() || taps.is_empty() {
        return 0.0;
    }

    // index - k must land in [0, input.len())
    let first = (index + 1).saturating_sub(input.len());
    let last = index.min(taps.len() - 1);
    if first > last {
        return 0.0;
    }

    (first..=last).map(|k| taps[k] * input[index - k]).sum()
}

/// Normalized sinc: `sin(pi x) / (pi x)`.
fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        let px = PI * x;
        libm::sin(px) / px
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn magnitude(taps: &[f64], w: f64) -> f64 {
        let (re, im) = taps
            .iter()
            .enumerate()
            .fold((0.0, 0.0), |(re, im), (k, &h)| {
                (
                    re + h * libm::cos(w * k as f64),
                    im - h * libm::sin(w * k as f64),
                )
            });
        libm::sqrt(re * re + im * im)
    }

    #[test]
    fn test_lowpass_taps_symmetric_unity_dc() {
        let taps = lowpass_taps(201, 0.01, WindowType::Hamming).unwrap();
        assert_eq!(taps.len(), 201);
        let sum: f64 = taps.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        for i in 0..taps.len() {
            assert!((taps[i] - taps[200 - i]).abs() < 1e-15);
        }
        let peak = taps.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(peak, taps[100]);
    }

    #[test]
    fn test_lowpass_taps_attenuates_above_cutoff() {
        let taps = lowpass_taps(101, 0.2, WindowType::Hamming).unwrap();

        assert!((magnitude(&taps, 0.0) - 1.0).abs() < 1e-12);
        assert!((magnitude(&taps, 0.05 * PI) - 1.0).abs() < 0.01);
        assert!(magnitude(&taps, 0.4 * PI) < 0.01);
        assert!(magnitude(&taps, 0.8 * PI) < 0.01);
    }

    #[test]
    fn test_window_choice_changes_taps() {
        let hamming = lowpass_taps(31, 0.3, WindowType::Hamming).unwrap();
        let rect = lowpass_taps(31, 0.3, WindowType::Rectangular).unwrap();
        assert_ne!(hamming, rect);
        // Rectangular truncation keeps more ripple past the cutoff
        let worst = |taps: &[f64]| {
            (0..=100)
                .map(|i| magnitude(taps, (0.5 + 0.005 * i as f64) * PI))
                .fold(0.0, f64::max)
        };
        assert!(worst(&rect) > 5.0 * worst(&hamming));
    }

    #[test]
    fn test_lowpass_taps_rejects_bad_cutoff() {
        assert!(lowpass_taps(21, 0.0, WindowType::Hamming).is_err());
        assert!(lowpass_taps(21, 1.0, WindowType::Hamming).is_err());
        assert!(lowpass_taps(0, 0.5, WindowType::Hamming).is_err());
    }

    #[test]
    fn test_convolve_at_impulse_response() {
        let taps = [1.0, 2.0, 3.0, 2.0, 1.0];
        let impulse = [1.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let out: Vec<f64> = (0..impulse.len())
            .map(|i| convolve_at(&taps, &impulse, i))
            .collect();
        assert_eq!(out, vec![1.0, 2.0, 3.0, 2.0, 1.0, 0.0]);
    }

    #[test]
    fn test_convolve_at_past_end() {
        let taps = [0.5, 0.5];
        let x = [2.0, 4.0];
        assert_eq!(convolve_at(&taps, &x, 1), 3.0);
        // Only x[1] overlaps at index 2
        assert_eq!(convolve_at(&taps, &x, 2), 2.0);
        assert_eq!(convolve_at(&taps, &x, 3), 0.0);
        assert_eq!(convolve_at(&taps, &[], 0), 0.0);
    }
}
