//! Quadrant shifts between natural and centered spectrum order.
//!
//! `center_shift` matches `numpy.fft.fftshift` (DC moves to [rows/2, cols/2]),
//! `uncenter_shift` matches `numpy.fft.ifftshift`. For even sizes the two are
//! the same permutation and each is its own inverse.

use freqlab_types::state::{Spectrum, SpectrumOrder};
use ndarray::Array2;

/// Circular roll: out[(r + dr) % rows, (c + dc) % cols] = a[r, c].
fn roll2<T: Clone>(a: &Array2<T>, dr: usize, dc: usize) -> Array2<T> {
    let (rows, cols) = a.dim();
    if rows == 0 || cols == 0 {
        return a.clone();
    }
    Array2::from_shape_fn((rows, cols), |(r, c)| {
        a[[(r + rows - dr % rows) % rows, (c + cols - dc % cols) % cols]].clone()
    })
}

/// Swap quadrants so the DC term lands at the geometric center.
pub fn center_shift<T: Clone>(a: &Array2<T>) -> Array2<T> {
    let (rows, cols) = a.dim();
    roll2(a, rows / 2, cols / 2)
}

/// Exact inverse of `center_shift` for any size.
pub fn uncenter_shift<T: Clone>(a: &Array2<T>) -> Array2<T> {
    let (rows, cols) = a.dim();
    roll2(a, rows - rows / 2, cols - cols / 2)
}

/// Centered copy of a spectrum. Already-centered input is returned as is.
pub fn to_centered(spectrum: &Spectrum) -> Spectrum {
    match spectrum.order {
        SpectrumOrder::Centered => spectrum.clone(),
        SpectrumOrder::Natural => Spectrum::centered(center_shift(&spectrum.data)),
    }
}

/// Natural-order copy of a spectrum. Already-natural input is returned as is.
pub fn to_natural(spectrum: &Spectrum) -> Spectrum {
    match spectrum.order {
        SpectrumOrder::Natural => spectrum.clone(),
        SpectrumOrder::Centered => Spectrum::natural(uncenter_shift(&spectrum.data)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fft::fft2;

    #[test]
    fn test_center_shift_moves_dc_to_center() {
        let input = Array2::from_elem((8, 8), 2.0);
        let spectrum = Spectrum::natural(fft2(&input));
        let centered = to_centered(&spectrum);
        assert!(centered.is_centered());
        let dc = centered.data[[4, 4]];
        assert!((dc.re - 128.0).abs() < 1e-10, "DC at center: {dc}");
        assert!(centered.data[[0, 0]].norm() < 1e-10);
    }

    #[test]
    fn test_center_shift_matches_numpy_layout() {
        // numpy.fft.fftshift([0, 1, 2, 3, 4]) == [3, 4, 0, 1, 2]
        let a = Array2::from_shape_fn((1, 5), |(_, j)| j as i32);
        let s = center_shift(&a);
        assert_eq!(s.row(0).to_vec(), vec![3, 4, 0, 1, 2]);
        // numpy.fft.ifftshift([0, 1, 2, 3, 4]) == [2, 3, 4, 0, 1]
        let u = uncenter_shift(&a);
        assert_eq!(u.row(0).to_vec(), vec![2, 3, 4, 0, 1]);
    }

    #[test]
    fn test_center_shift_involution_even() {
        let a = Array2::from_shape_fn((6, 4), |(i, j)| i * 10 + j);
        assert_eq!(center_shift(&center_shift(&a)), a);
        assert_eq!(center_shift(&a), uncenter_shift(&a));
    }

    #[test]
    fn test_uncenter_inverts_center_odd() {
        let a = Array2::from_shape_fn((5, 7), |(i, j)| i * 10 + j);
        assert_eq!(uncenter_shift(&center_shift(&a)), a);
        assert_eq!(center_shift(&uncenter_shift(&a)), a);
        assert_ne!(center_shift(&center_shift(&a)), a);
    }

    #[test]
    fn test_order_conversions_are_idempotent() {
        let s = Spectrum::natural(fft2(&Array2::from_shape_fn((4, 4), |(i, j)| (i + j) as f64)));
        let c = to_centered(&s);
        assert_eq!(to_centered(&c), c);
        assert_eq!(to_natural(&c), s);
        assert_eq!(to_natural(&s), s);
    }
}
