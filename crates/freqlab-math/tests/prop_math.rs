// ─────────────────────────────────────────────────────────────────────
// FreqLab — Property-Based Tests (proptest) for freqlab-math
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for freqlab-math using proptest.
//!
//! Covers: FFT roundtrip, Parseval energy, center-shift involution,
//! shift/unshift inversion on odd grids.

use freqlab_math::fft::{forward, inverse, Reconstruction};
use freqlab_math::shift::{center_shift, to_centered, to_natural, uncenter_shift};
use ndarray::Array2;
use proptest::prelude::*;

/// 8-bit-range image of random shape.
fn image_strategy(max_side: usize) -> impl Strategy<Value = Array2<f64>> {
    (1usize..max_side, 1usize..max_side).prop_flat_map(|(rows, cols)| {
        proptest::collection::vec(0u8..=255, rows * cols).prop_map(move |px| {
            Array2::from_shape_vec((rows, cols), px.into_iter().map(f64::from).collect())
                .expect("shape matches sample count")
        })
    })
}

// ── Transform Roundtrip ──────────────────────────────────────────────

proptest! {
    /// inverse(forward(X)) == X within 1e-3 for 8-bit-range inputs.
    #[test]
    fn fft_roundtrip_recovers_image(img in image_strategy(24)) {
        let spectrum = forward(&img).unwrap();
        let back = inverse(&spectrum, Reconstruction::RealPart).unwrap();
        for ((i, j), &x) in img.indexed_iter() {
            prop_assert!((back[[i, j]] - x).abs() < 1e-3,
                "roundtrip at ({}, {}): {} vs {}", i, j, back[[i, j]], x);
        }
    }

    /// Roundtrip through centered order is also lossless.
    #[test]
    fn fft_roundtrip_through_centered(img in image_strategy(24)) {
        let centered = to_centered(&forward(&img).unwrap());
        let back = inverse(&to_natural(&centered), Reconstruction::Magnitude).unwrap();
        for ((i, j), &x) in img.indexed_iter() {
            prop_assert!((back[[i, j]] - x).abs() < 1e-3);
        }
    }

    /// Parseval: sum|x|² == sum|X|² / (rows*cols).
    #[test]
    fn fft_parseval(img in image_strategy(20)) {
        let (rows, cols) = img.dim();
        let spectrum = forward(&img).unwrap();
        let spatial: f64 = img.iter().map(|v| v * v).sum();
        let freq: f64 = spectrum.data.iter().map(|c| c.norm_sqr()).sum::<f64>()
            / (rows * cols) as f64;
        prop_assert!((spatial - freq).abs() <= 1e-9 * spatial.max(1.0),
            "Parseval: {} vs {}", spatial, freq);
    }
}

// ── Shift Properties ─────────────────────────────────────────────────

proptest! {
    /// center_shift is an exact involution on even grids.
    #[test]
    fn center_shift_involution_even(h in 1usize..20, w in 1usize..20) {
        let (rows, cols) = (2 * h, 2 * w);
        let a = Array2::from_shape_fn((rows, cols), |(i, j)| (i * 31 + j * 7) as i64);
        prop_assert_eq!(center_shift(&center_shift(&a)), a);
    }

    /// uncenter_shift undoes center_shift on any grid.
    #[test]
    fn uncenter_inverts_center_any(rows in 1usize..25, cols in 1usize..25) {
        let a = Array2::from_shape_fn((rows, cols), |(i, j)| (i * 100 + j) as i64);
        prop_assert_eq!(uncenter_shift(&center_shift(&a)), a.clone());
        prop_assert_eq!(center_shift(&uncenter_shift(&a)), a);
    }

    /// The DC term of any image lands at [rows/2, cols/2] after centering.
    #[test]
    fn centered_dc_location(img in image_strategy(20)) {
        let (rows, cols) = img.dim();
        let natural = forward(&img).unwrap();
        let centered = to_centered(&natural);
        prop_assert_eq!(centered.dc_index(), (rows / 2, cols / 2));
        prop_assert_eq!(centered.data[[rows / 2, cols / 2]], natural.data[[0, 0]]);
    }
}
