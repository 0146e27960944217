// ─────────────────────────────────────────────────────────────────────
// FreqLab — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use ndarray::Array2;
use num_complex::Complex64;

use crate::error::{FreqError, FreqResult};

/// Single-channel intensity plane, promoted to f64.
/// Samples are nominally in [0, 255] but any finite value is accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePlane {
    pub data: Array2<f64>, // [rows, cols]
}

impl ImagePlane {
    pub fn new(data: Array2<f64>) -> Self {
        ImagePlane { data }
    }

    pub fn from_u8(pixels: &Array2<u8>) -> Self {
        ImagePlane {
            data: pixels.mapv(f64::from),
        }
    }

    /// Build from row vectors. Ragged or empty input is rejected.
    pub fn from_rows(rows: Vec<Vec<u8>>) -> FreqResult<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != ncols) {
            return Err(FreqError::InvalidDimensions(format!(
                "row {i} has {} samples, expected {ncols}",
                row.len()
            )));
        }
        let flat: Vec<f64> = rows.into_iter().flatten().map(f64::from).collect();
        let data = Array2::from_shape_vec((nrows, ncols), flat)
            .map_err(|e| FreqError::InvalidDimensions(e.to_string()))?;
        let plane = ImagePlane { data };
        plane.validate()?;
        Ok(plane)
    }

    /// (rows, cols)
    pub fn dim(&self) -> (usize, usize) {
        self.data.dim()
    }

    pub fn mean(&self) -> f64 {
        self.data.mean().unwrap_or(0.0)
    }

    /// Non-empty and every sample finite.
    pub fn validate(&self) -> FreqResult<()> {
        validate_plane(&self.data)
    }
}

/// Shared precondition for every real plane entering a transform.
pub fn validate_plane(data: &Array2<f64>) -> FreqResult<()> {
    let (rows, cols) = data.dim();
    if rows == 0 || cols == 0 {
        return Err(FreqError::InvalidDimensions(format!(
            "image plane must be non-empty, got {rows}x{cols}"
        )));
    }
    if let Some(((row, col), _)) = data.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(FreqError::NonFiniteInput { row, col });
    }
    Ok(())
}

/// Where the zero-frequency term sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpectrumOrder {
    /// DC at [0, 0], as produced by the forward transform.
    Natural,
    /// DC at [rows/2, cols/2]. All masks and views use this order.
    Centered,
}

/// Complex spectrum tagged with its quadrant order.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    pub data: Array2<Complex64>,
    pub order: SpectrumOrder,
}

impl Spectrum {
    pub fn natural(data: Array2<Complex64>) -> Self {
        Spectrum {
            data,
            order: SpectrumOrder::Natural,
        }
    }

    pub fn centered(data: Array2<Complex64>) -> Self {
        Spectrum {
            data,
            order: SpectrumOrder::Centered,
        }
    }

    pub fn dim(&self) -> (usize, usize) {
        self.data.dim()
    }

    pub fn is_centered(&self) -> bool {
        self.order == SpectrumOrder::Centered
    }

    /// Index of the DC term under the current order.
    pub fn dc_index(&self) -> (usize, usize) {
        match self.order {
            SpectrumOrder::Natural => (0, 0),
            SpectrumOrder::Centered => {
                let (rows, cols) = self.dim();
                (rows / 2, cols / 2)
            }
        }
    }
}

/// Centered frequency grid with the precomputed distance field D(u,v).
#[derive(Debug, Clone)]
pub struct FrequencyGrid {
    pub rows: usize,
    pub cols: usize,
    pub center: (usize, usize), // (rows/2, cols/2)
    pub distance: Array2<f64>,  // Euclidean distance to center, floored at epsilon
}

impl FrequencyGrid {
    pub fn new(rows: usize, cols: usize, epsilon: f64) -> FreqResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(FreqError::InvalidDimensions(format!(
                "frequency grid must be non-empty, got {rows}x{cols}"
            )));
        }
        let center = (rows / 2, cols / 2);
        let (crow, ccol) = (center.0 as f64, center.1 as f64);
        let distance = Array2::from_shape_fn((rows, cols), |(r, c)| {
            let dr = r as f64 - crow;
            let dc = c as f64 - ccol;
            (dr * dr + dc * dc).sqrt().max(epsilon)
        });
        Ok(FrequencyGrid {
            rows,
            cols,
            center,
            distance,
        })
    }

    /// Largest D(u,v) on the grid (a corner).
    pub fn max_distance(&self) -> f64 {
        self.distance.iter().cloned().fold(0.0_f64, f64::max)
    }
}
