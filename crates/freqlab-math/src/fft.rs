//! 2D FFT wrappers around rustfft.
//!
//! Convention matches numpy:
//! - Forward FFT (fft2): unnormalized
//! - Inverse FFT (ifft2): normalized by 1/(rows*cols)
//!
//! `forward`/`inverse` are the checked entry points used by the filter
//! pipeline; they validate the plane and track spectrum order.

use freqlab_types::error::{FreqError, FreqResult};
use freqlab_types::state::{validate_plane, Spectrum, SpectrumOrder};
use ndarray::{Array2, Axis};
use num_complex::Complex64;
use rustfft::{FftDirection, FftPlanner};

/// How a complex inverse transform is collapsed to a real plane.
///
/// For a spectrum that is Hermitian-symmetric the imaginary part is only
/// rounding noise, and both modes agree up to sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconstruction {
    /// |z|. Never negative.
    Magnitude,
    /// Re(z). Keeps sign, so zero-mean reconstructions stay zero-mean.
    RealPart,
}

/// Run a 1D transform along every lane of both axes, in place.
///
/// Each lane is staged through one scratch buffer, so the array may have any
/// memory layout.
fn transform_axes(data: &mut Array2<Complex64>, direction: FftDirection) {
    let mut planner = FftPlanner::new();
    for axis in [Axis(1), Axis(0)] {
        let len = data.len_of(axis);
        let fft = planner.plan_fft(len, direction);
        let mut lane_buf = vec![Complex64::new(0.0, 0.0); len];
        for mut lane in data.lanes_mut(axis) {
            lane_buf
                .iter_mut()
                .zip(lane.iter())
                .for_each(|(dst, &src)| *dst = src);
            fft.process(&mut lane_buf);
            lane.iter_mut()
                .zip(&lane_buf)
                .for_each(|(dst, &src)| *dst = src);
        }
    }
}

/// Forward 2D FFT. Matches `numpy.fft.fft2()`.
///
/// numpy does NOT normalize on forward FFT. Output is in natural order.
pub fn fft2(input: &Array2<f64>) -> Array2<Complex64> {
    let mut data = input.mapv(|v| Complex64::new(v, 0.0));
    transform_axes(&mut data, FftDirection::Forward);
    data
}

/// Complex inverse 2D FFT, normalized by 1/(rows*cols).
pub fn ifft2_complex(input: &Array2<Complex64>) -> Array2<Complex64> {
    let (nrows, ncols) = input.dim();
    let norm = 1.0 / (nrows * ncols) as f64;
    let mut data = input.to_owned();
    transform_axes(&mut data, FftDirection::Inverse);
    data.mapv_inplace(|c| c * norm);
    data
}

/// Inverse 2D FFT. Matches `numpy.real(numpy.fft.ifft2())`.
pub fn ifft2(input: &Array2<Complex64>) -> Array2<f64> {
    ifft2_complex(input).mapv(|c| c.re)
}

/// Checked forward transform: validates the plane, returns a natural-order spectrum.
pub fn forward(image: &Array2<f64>) -> FreqResult<Spectrum> {
    validate_plane(image)?;
    Ok(Spectrum::natural(fft2(image)))
}

/// Checked inverse transform of a natural-order spectrum.
pub fn inverse(spectrum: &Spectrum, mode: Reconstruction) -> FreqResult<Array2<f64>> {
    if spectrum.order != SpectrumOrder::Natural {
        return Err(FreqError::InvalidParameter(
            "inverse transform requires a natural-order spectrum; un-shift first".to_string(),
        ));
    }
    let (rows, cols) = spectrum.dim();
    if rows == 0 || cols == 0 {
        return Err(FreqError::InvalidDimensions(format!(
            "spectrum must be non-empty, got {rows}x{cols}"
        )));
    }
    Ok(match mode {
        Reconstruction::Magnitude => ifft2_complex(&spectrum.data).mapv(|c| c.norm()),
        Reconstruction::RealPart => ifft2(&spectrum.data),
    })
}
