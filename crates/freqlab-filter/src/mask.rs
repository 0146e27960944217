//! Frequency-domain transfer functions H(u,v).
//!
//! Every mask is built in centered order over a `FrequencyGrid`, so it can
//! be multiplied directly into a centered spectrum. Highpass responses for
//! Butterworth and Gaussian are `1 - lowpass`; Ideal is evaluated per
//! branch so the D == D0 boundary always belongs to the lowpass passband.

use freqlab_types::config::{FilterShape, FilterSpec, PassType};
use freqlab_types::constants::DISTANCE_EPSILON;
use freqlab_types::error::{FreqError, FreqResult};
use freqlab_types::state::{FrequencyGrid, Spectrum};
use ndarray::{Array2, Zip};

/// Lowpass response at distance `d`.
fn lowpass_response(shape: FilterShape, d: f64, d0: f64, order: u32) -> f64 {
    match shape {
        FilterShape::Butterworth => 1.0 / (1.0 + (d / d0).powf(2.0 * order as f64)),
        FilterShape::Gaussian => (-(d * d) / (2.0 * d0 * d0)).exp(),
        FilterShape::Ideal => {
            if d <= d0 {
                1.0
            } else {
                0.0
            }
        }
    }
}

/// Builds transfer functions for one grid size.
#[derive(Debug, Clone)]
pub struct FilterMaskBuilder {
    grid: FrequencyGrid,
}

impl FilterMaskBuilder {
    pub fn new(rows: usize, cols: usize) -> FreqResult<Self> {
        Self::with_epsilon(rows, cols, DISTANCE_EPSILON)
    }

    pub fn with_epsilon(rows: usize, cols: usize, epsilon: f64) -> FreqResult<Self> {
        Ok(FilterMaskBuilder {
            grid: FrequencyGrid::new(rows, cols, epsilon)?,
        })
    }

    pub fn grid(&self) -> &FrequencyGrid {
        &self.grid
    }

    /// H(u,v) for `spec`, centered order, same shape as the grid.
    pub fn build(&self, spec: &FilterSpec) -> FreqResult<Array2<f64>> {
        spec.validate()?;
        if spec.remove_dc {
            return Ok(self.dc_removal());
        }

        let d0 = spec.cutoff;
        let mask = match (spec.shape, spec.pass) {
            (FilterShape::Ideal, PassType::Highpass) => {
                self.grid.distance.mapv(|d| if d > d0 { 1.0 } else { 0.0 })
            }
            (shape, PassType::Lowpass) => self
                .grid
                .distance
                .mapv(|d| lowpass_response(shape, d, d0, spec.order)),
            (shape, PassType::Highpass) => self
                .grid
                .distance
                .mapv(|d| 1.0 - lowpass_response(shape, d, d0, spec.order)),
        };
        Ok(mask)
    }

    /// All ones except H(center) = 0.
    pub fn dc_removal(&self) -> Array2<f64> {
        let mut mask = Array2::ones((self.grid.rows, self.grid.cols));
        mask[[self.grid.center.0, self.grid.center.1]] = 0.0;
        mask
    }
}

/// One-shot mask construction with the default distance floor.
pub fn build_mask(rows: usize, cols: usize, spec: &FilterSpec) -> FreqResult<Array2<f64>> {
    FilterMaskBuilder::new(rows, cols)?.build(spec)
}

/// Element-wise H·F on a centered spectrum.
pub fn apply_mask(spectrum: &Spectrum, mask: &Array2<f64>) -> FreqResult<Spectrum> {
    if !spectrum.is_centered() {
        return Err(FreqError::InvalidParameter(
            "masks are defined in centered order; center the spectrum first".to_string(),
        ));
    }
    if spectrum.dim() != mask.dim() {
        return Err(FreqError::shape_mismatch(
            "mask",
            spectrum.dim(),
            mask.dim(),
        ));
    }
    let mut filtered = spectrum.data.clone();
    Zip::from(&mut filtered)
        .and(mask)
        .for_each(|f, &h| *f *= h);
    Ok(Spectrum::centered(filtered))
}

/// Number of elements with H > 0.5.
pub fn passband_count(mask: &Array2<f64>) -> usize {
    mask.iter().filter(|&&h| h > 0.5).count()
}
