//! 8-bit display views of spectra, masks and reconstructions.
//!
//! All functions are pure. Constant inputs (max == min) map to an all-zero
//! view instead of dividing by zero.

use freqlab_math::shift::to_centered;
use freqlab_types::config::SpatialScaling;
use freqlab_types::constants::MAX_INTENSITY;
use freqlab_types::state::Spectrum;
use ndarray::Array2;

/// Stretch min..max onto 0..255 and round.
pub fn normalize_min_max(values: &Array2<f64>) -> Array2<u8> {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;
    if range <= 0.0 || !range.is_finite() {
        return Array2::zeros(values.dim());
    }
    values.mapv(|v| ((v - min) / range * MAX_INTENSITY).round() as u8)
}

/// Clip to [0, 255] and round.
pub fn clip_to_u8(values: &Array2<f64>) -> Array2<u8> {
    values.mapv(|v| v.clamp(0.0, MAX_INTENSITY).round() as u8)
}

/// log(1 + |F|), min-max normalized. Natural-order input is centered first.
pub fn magnitude_view(spectrum: &Spectrum) -> Array2<u8> {
    let centered = to_centered(spectrum);
    let log_mag = centered.data.mapv(|c| c.norm().ln_1p());
    normalize_min_max(&log_mag)
}

/// atan2(Im, Re), min-max normalized. Natural-order input is centered first.
///
/// Exact zeros get phase 0 regardless of the sign of their zero components.
pub fn phase_view(spectrum: &Spectrum) -> Array2<u8> {
    let centered = to_centered(spectrum);
    let phase = centered
        .data
        .mapv(|c| if c.norm_sqr() == 0.0 { 0.0 } else { c.arg() });
    normalize_min_max(&phase)
}

/// H·255. No log compression.
pub fn mask_view(mask: &Array2<f64>) -> Array2<u8> {
    clip_to_u8(&mask.mapv(|h| h * MAX_INTENSITY))
}

/// Reconstructed plane for display.
pub fn spatial_view(plane: &Array2<f64>, scaling: SpatialScaling) -> Array2<u8> {
    match scaling {
        SpatialScaling::Clip => clip_to_u8(plane),
        SpatialScaling::MinMax => normalize_min_max(plane),
    }
}

/// Zero-mean reconstruction after DC removal: |x|·boost, then clipped.
///
/// The boost only makes the faint residual visible; it is not part of the
/// numeric result.
pub fn dc_removed_view(plane: &Array2<f64>, boost: f64) -> Array2<u8> {
    clip_to_u8(&plane.mapv(|v| v.abs() * boost))
}
