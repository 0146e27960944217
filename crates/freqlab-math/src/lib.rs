//! Spectral primitives for FreqLab.

pub mod fft;
pub mod shift;
