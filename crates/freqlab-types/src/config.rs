// ─────────────────────────────────────────────────────────────────────
// FreqLab — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    CUTOFF_PRESETS, DC_REMOVAL_BOOST, DEFAULT_CUTOFF, DEFAULT_ORDER, DISTANCE_EPSILON,
    WORKING_SIZE,
};
use crate::error::{FreqError, FreqResult};

/// Transfer-function family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterShape {
    Ideal,
    Butterworth,
    Gaussian,
}

/// Which side of the cutoff is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PassType {
    Lowpass,
    Highpass,
}

impl FromStr for FilterShape {
    type Err = FreqError;

    /// Accepts the control labels ("Ideal", "Butterworth", "Gaussian"), any case.
    fn from_str(s: &str) -> FreqResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ideal" => Ok(FilterShape::Ideal),
            "butterworth" => Ok(FilterShape::Butterworth),
            "gaussian" => Ok(FilterShape::Gaussian),
            other => Err(FreqError::InvalidParameter(format!(
                "unrecognized filter shape '{other}'"
            ))),
        }
    }
}

impl FromStr for PassType {
    type Err = FreqError;

    fn from_str(s: &str) -> FreqResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lowpass" | "low" => Ok(PassType::Lowpass),
            "highpass" | "high" => Ok(PassType::Highpass),
            other => Err(FreqError::InvalidParameter(format!(
                "unrecognized pass type '{other}'"
            ))),
        }
    }
}

impl fmt::Display for FilterShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterShape::Ideal => "Ideal",
            FilterShape::Butterworth => "Butterworth",
            FilterShape::Gaussian => "Gaussian",
        };
        f.write_str(name)
    }
}

impl fmt::Display for PassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PassType::Lowpass => "Lowpass",
            PassType::Highpass => "Highpass",
        };
        f.write_str(name)
    }
}

/// Immutable description of one frequency-domain filter.
///
/// When `remove_dc` is set the mask is the DC-removal mask and `shape`,
/// `pass`, `cutoff` and `order` are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub shape: FilterShape,
    pub pass: PassType,
    /// Cutoff radius D0 in frequency-grid units.
    pub cutoff: f64,
    /// Butterworth order n. Unused by the other shapes.
    #[serde(default = "default_order")]
    pub order: u32,
    #[serde(default)]
    pub remove_dc: bool,
}

fn default_order() -> u32 {
    DEFAULT_ORDER
}

impl Default for FilterSpec {
    fn default() -> Self {
        FilterSpec {
            shape: FilterShape::Ideal,
            pass: PassType::Lowpass,
            cutoff: DEFAULT_CUTOFF,
            order: DEFAULT_ORDER,
            remove_dc: false,
        }
    }
}

impl FilterSpec {
    pub fn ideal(pass: PassType, cutoff: f64) -> Self {
        FilterSpec {
            shape: FilterShape::Ideal,
            pass,
            cutoff,
            ..Default::default()
        }
    }

    pub fn butterworth(pass: PassType, cutoff: f64, order: u32) -> Self {
        FilterSpec {
            shape: FilterShape::Butterworth,
            pass,
            cutoff,
            order,
            remove_dc: false,
        }
    }

    pub fn gaussian(pass: PassType, cutoff: f64) -> Self {
        FilterSpec {
            shape: FilterShape::Gaussian,
            pass,
            cutoff,
            ..Default::default()
        }
    }

    /// Mean-removal mask: all ones except the DC term.
    pub fn dc_removal() -> Self {
        FilterSpec {
            remove_dc: true,
            ..Default::default()
        }
    }

    /// Same filter with the opposite pass type.
    pub fn complement(&self) -> Self {
        let pass = match self.pass {
            PassType::Lowpass => PassType::Highpass,
            PassType::Highpass => PassType::Lowpass,
        };
        FilterSpec { pass, ..*self }
    }

    /// This filter at each preset cutoff, smallest radius first.
    pub fn presets(self) -> impl Iterator<Item = FilterSpec> {
        CUTOFF_PRESETS
            .into_iter()
            .map(move |cutoff| FilterSpec { cutoff, ..self })
    }

    /// Check the parameters that the selected mode actually reads.
    pub fn validate(&self) -> FreqResult<()> {
        if self.remove_dc {
            return Ok(());
        }
        if !self.cutoff.is_finite() || self.cutoff <= 0.0 {
            return Err(FreqError::InvalidParameter(format!(
                "cutoff D0 must be finite and > 0, got {}",
                self.cutoff
            )));
        }
        if self.shape == FilterShape::Butterworth && self.order < 1 {
            return Err(FreqError::InvalidParameter(
                "Butterworth order n must be >= 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse from a JSON object, then validate.
    pub fn from_json(json: &str) -> FreqResult<Self> {
        let spec: Self = serde_json::from_str(json)?;
        spec.validate()?;
        Ok(spec)
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.remove_dc {
            return f.write_str("DC removal");
        }
        match self.shape {
            FilterShape::Butterworth => write!(
                f,
                "{} {} (D0={}, n={})",
                self.shape, self.pass, self.cutoff, self.order
            ),
            _ => write!(f, "{} {} (D0={})", self.shape, self.pass, self.cutoff),
        }
    }
}

/// How the reconstructed spatial plane is mapped to 8 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpatialScaling {
    /// Clip to [0, 255]. Preserves absolute intensity.
    #[default]
    Clip,
    /// Stretch min..max onto 0..255.
    MinMax,
}

/// Pipeline-wide settings. Every field has a default, so `{}` is a valid file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_distance_epsilon")]
    pub distance_epsilon: f64,
    /// Display gain for DC-removal reconstructions.
    #[serde(default = "default_dc_boost")]
    pub dc_boost: f64,
    #[serde(default)]
    pub spatial_scaling: SpatialScaling,
    /// Also derive magnitude/phase views of the unfiltered spectrum.
    #[serde(default = "default_original_views")]
    pub original_views: bool,
    /// When set, inputs must be exactly `[rows, cols]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_size: Option<[usize; 2]>,
}

fn default_distance_epsilon() -> f64 {
    DISTANCE_EPSILON
}
fn default_dc_boost() -> f64 {
    DC_REMOVAL_BOOST
}
fn default_original_views() -> bool {
    true
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            distance_epsilon: default_distance_epsilon(),
            dc_boost: default_dc_boost(),
            spatial_scaling: SpatialScaling::default(),
            original_views: default_original_views(),
            working_size: None,
        }
    }
}

impl PipelineConfig {
    /// Defaults, but every source must already be on the square working canvas.
    pub fn working_canvas() -> Self {
        PipelineConfig {
            working_size: Some([WORKING_SIZE, WORKING_SIZE]),
            ..Default::default()
        }
    }

    /// Load from JSON file.
    pub fn from_file(path: &str) -> FreqResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> FreqResult<()> {
        if !self.distance_epsilon.is_finite() || self.distance_epsilon <= 0.0 {
            return Err(FreqError::InvalidParameter(format!(
                "distance_epsilon must be finite and > 0, got {}",
                self.distance_epsilon
            )));
        }
        if !self.dc_boost.is_finite() || self.dc_boost <= 0.0 {
            return Err(FreqError::InvalidParameter(format!(
                "dc_boost must be finite and > 0, got {}",
                self.dc_boost
            )));
        }
        if let Some([rows, cols]) = self.working_size {
            if rows == 0 || cols == 0 {
                return Err(FreqError::InvalidDimensions(format!(
                    "working_size must be positive, got {rows}x{cols}"
                )));
            }
        }
        Ok(())
    }
}
