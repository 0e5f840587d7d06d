//! Square-root compression and mean removal.
//!
//! The decimated envelope is compressed with `sqrt` (undoing the power scale
//! of the square-law detector) and then centered so the final estimate is
//! zero-mean.
//!
//! The decimator's anti-alias filter has negative sidelobes, so a
//! non-negative envelope can reach this stage with small negative values
//! (a few thousandths of the envelope level on broadband noise).
//! [`SqrtPolicy`] chooses how those are handled.

use crate::error::{DemonError, Result};
use crate::stats::OnlineStats;

/// What to do when a negative value reaches the square root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SqrtPolicy {
    /// Fail with [`DemonError::NegativeInput`].
    #[default]
    Reject,
    /// Produce NaN for the offending samples and carry on.
    Propagate,
    /// Treat negative values as zero before the square root.
    Clamp,
}

/// Computes `sqrt(x) - mean(sqrt(x))`.
///
/// # Example
///
/// ```
/// use demon::{normalize, SqrtPolicy};
///
/// let y = normalize(&[1.0, 4.0, 9.0], SqrtPolicy::Reject).unwrap();
/// assert_eq!(y, vec![-1.0, 0.0, 1.0]);
/// ```
pub fn normalize(signal: &[f64], policy: SqrtPolicy) -> Result<Vec<f64>> {
    if signal.is_empty() {
        return Err(DemonError::EmptySignal);
    }

    if policy == SqrtPolicy::Reject {
        if let Some((index, &value)) = signal.iter().enumerate().find(|&(_, &x)| x < 0.0) {
            return Err(DemonError::NegativeInput { index, value });
        }
    }

    let mut compressed: Vec<f64> = match policy {
        SqrtPolicy::Clamp => signal.iter().map(|&x| libm::sqrt(x.max(0.0))).collect(),
        _ => signal.iter().map(|&x| libm::sqrt(x)).collect(),
    };
    let mean = OnlineStats::from_slice(&compressed).mean();
    for y in compressed.iter_mut() {
        *y -= mean;
    }
    Ok(compressed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_is_zero_mean() {
        let x: Vec<f64> = (0..1000)
            .map(|i| 1.0 + libm::sin(0.05 * i as f64) * libm::sin(0.05 * i as f64) * 40.0)
            .collect();
        let y = normalize(&x, SqrtPolicy::Reject).unwrap();
        assert_eq!(y.len(), x.len());
        let mean = y.iter().sum::<f64>() / y.len() as f64;
        assert!(mean.abs() < 1e-12, "mean should be ~0, got {}", mean);
    }

    #[test]
    fn test_constant_becomes_zero() {
        let y = normalize(&[16.0; 10], SqrtPolicy::Reject).unwrap();
        assert!(y.iter().all(|&v| v.abs() < 1e-12));
    }

    #[test]
    fn test_single_sample() {
        assert_eq!(normalize(&[7.0], SqrtPolicy::Reject).unwrap(), vec![0.0]);
    }

    #[test]
    fn test_negative_rejected() {
        let err = normalize(&[1.0, 2.0, -0.5, -3.0], SqrtPolicy::Reject).unwrap_err();
        assert_eq!(
            err,
            DemonError::NegativeInput {
                index: 2,
                value: -0.5
            }
        );
    }

    #[test]
    fn test_negative_zero_accepted() {
        assert!(normalize(&[-0.0, 4.0], SqrtPolicy::Reject).is_ok());
    }

    #[test]
    fn test_negative_propagates_nan() {
        let y = normalize(&[1.0, -1.0, 4.0], SqrtPolicy::Propagate).unwrap();
        // NaN poisons the mean, as with a permissive numeric library
        assert!(y.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_negative_clamped_to_zero() {
        let y = normalize(&[-0.002, 4.0, 16.0], SqrtPolicy::Clamp).unwrap();
        assert_eq!(y, vec![-2.0, 0.0, 2.0]);
    }

    #[test]
    fn test_clamp_leaves_non_negative_input_alone() {
        let x = [0.25, 1.0, 2.25];
        assert_eq!(
            normalize(&x, SqrtPolicy::Clamp).unwrap(),
            normalize(&x, SqrtPolicy::Reject).unwrap()
        );
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(
            normalize(&[], SqrtPolicy::Propagate),
            Err(DemonError::EmptySignal)
        );
    }
}
