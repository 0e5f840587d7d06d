//! Synthetic signal generators for demonstration.
//!
//! This module provides functions to generate DEMON test signals:
//! - Sine carriers
//! - White noise
//! - Amplitude modulation by one or more low-frequency tones

#![allow(dead_code)] // Functions used across multiple examples

use std::f64::consts::PI;

/// Generates a sine wave.
///
/// # Arguments
/// * `samples` - Number of samples to generate
/// * `sample_rate` - Sample rate in Hz
/// * `frequency` - Sine frequency in Hz
/// * `amplitude` - Peak amplitude
pub fn sine_wave(samples: usize, sample_rate: f64, frequency: f64, amplitude: f64) -> Vec<f64> {
    (0..samples)
        .map(|i| {
            let t = i as f64 / sample_rate;
            amplitude * (2.0 * PI * frequency * t).sin()
        })
        .collect()
}

/// Generates white noise using a simple LCG random number generator.
///
/// # Arguments
/// * `samples` - Number of samples to generate
/// * `amplitude` - Peak amplitude (noise will be in range [-amplitude, amplitude])
/// * `seed` - Random seed for reproducibility
pub fn white_noise(samples: usize, amplitude: f64, seed: u64) -> Vec<f64> {
    let mut state = seed;
    (0..samples)
        .map(|_| {
            // Simple LCG: x_{n+1} = (a * x_n + c) mod m
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            // Top 53 bits to [-1, 1]
            let normalized = (state >> 11) as f64 / (1u64 << 53) as f64 * 2.0 - 1.0;
            amplitude * normalized
        })
        .collect()
}

/// Multiplies `carrier` by `1 + Σ depth·cos(2π·f·t)`.
///
/// # Arguments
/// * `carrier` - Signal to modulate
/// * `sample_rate` - Sample rate in Hz
/// * `tones` - Vec of (frequency, depth) tuples
pub fn modulate(carrier: &[f64], sample_rate: f64, tones: &[(f64, f64)]) -> Vec<f64> {
    carrier
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let t = i as f64 / sample_rate;
            let gain: f64 = 1.0
                + tones
                    .iter()
                    .map(|&(freq, depth)| depth * (2.0 * PI * freq * t).cos())
                    .sum::<f64>();
            gain * c
        })
        .collect()
}

/// Adds `b` to `a` elementwise.
pub fn add(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().zip(b).map(|(&x, &y)| x + y).collect()
}

/// Magnitude spectrum of a real signal, bins `0..=N/2`.
pub fn magnitude_spectrum(signal: &[f64]) -> Vec<f64> {
    use rustfft::num_complex::Complex64;
    use rustfft::FftPlanner;

    let n = signal.len();
    if n == 0 {
        return Vec::new();
    }
    let mut buffer: Vec<Complex64> = signal.iter().map(|&x| Complex64::new(x, 0.0)).collect();
    FftPlanner::<f64>::new()
        .plan_fft_forward(n)
        .process(&mut buffer);
    buffer[..=n / 2].iter().map(|z| z.norm() / n as f64).collect()
}
