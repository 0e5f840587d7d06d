//! Parameter checks run before any filtering.
//!
//! The bandpass-then-demodulate technique only isolates the modulation
//! sidebands when the passband is narrow relative to its center frequency.
//! [`validate_passband`] enforces that geometry:
//!
//! ```text
//! (high + low) / 2 > 2 * (high - low)
//! ```

use crate::error::{DemonError, Result};

/// Checks the passband geometry.
///
/// Fails with [`DemonError::InvalidBandwidth`] when
/// `(high + low) / 2 <= 2 * (high - low)`.
///
/// # Example
///
/// ```
/// use demon::validate::validate_passband;
///
/// assert!(validate_passband(20_000.0, 30_000.0).is_ok());
/// assert!(validate_passband(5_000.0, 30_000.0).is_err());
/// ```
pub fn validate_passband(low: f64, high: f64) -> Result<()> {
    if !low.is_finite() || !high.is_finite() {
        return Err(DemonError::InvalidParameter("passband edges must be finite"));
    }

    let center = (high + low) / 2.0;
    let width = high - low;
    if center <= 2.0 * width {
        return Err(DemonError::InvalidBandwidth { low, high });
    }
    Ok(())
}

/// Checks that a sampling rate is finite and positive.
pub fn validate_sample_rate(fs: f64) -> Result<()> {
    if !fs.is_finite() || fs <= 0.0 {
        return Err(DemonError::InvalidParameter(
            "sampling rate must be finite and positive",
        ));
    }
    Ok(())
}

/// Checks that the envelope cutoff is finite and positive.
pub fn validate_cutoff(cutoff: f64) -> Result<()> {
    if !cutoff.is_finite() || cutoff <= 0.0 {
        return Err(DemonError::InvalidParameter(
            "envelope cutoff must be finite and positive",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_band_passes() {
        // 25000 > 20000
        assert!(validate_passband(20_000.0, 30_000.0).is_ok());
    }

    #[test]
    fn test_narrow_band_passes() {
        // 28500 > 6000
        assert!(validate_passband(27_000.0, 30_000.0).is_ok());
    }

    #[test]
    fn test_wide_band_rejected() {
        let err = validate_passband(5_000.0, 30_000.0).unwrap_err();
        assert_eq!(
            err,
            DemonError::InvalidBandwidth {
                low: 5_000.0,
                high: 30_000.0
            }
        );
    }

    #[test]
    fn test_equality_is_rejected() {
        // center 25 == 2 * width 25 when low = 18.75, high = 31.25
        assert!(matches!(
            validate_passband(18.75, 31.25),
            Err(DemonError::InvalidBandwidth { .. })
        ));
    }

    #[test]
    fn test_non_finite_edges_rejected() {
        assert!(matches!(
            validate_passband(f64::NAN, 30_000.0),
            Err(DemonError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_sample_rate_and_cutoff() {
        assert!(validate_sample_rate(200_000.0).is_ok());
        assert!(validate_sample_rate(0.0).is_err());
        assert!(validate_sample_rate(f64::INFINITY).is_err());
        assert!(validate_cutoff(1000.0).is_ok());
        assert!(validate_cutoff(-1.0).is_err());
    }
}
