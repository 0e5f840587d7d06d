mod fir;
mod iir;

pub(crate) use fir::windowed_sinc;
pub use fir::{convolve_at, lowpass_taps};
pub use iir::{
    butterworth_bandpass, butterworth_bandpass_zpk, butterworth_prototype, lfilter,
    FilterCoefficients, FilterSpec, IirFilter, ZpkDesign,
};
