//! Frequency-domain filtering pipeline.
//!
//! forward FFT → center → H·F → un-center → inverse FFT → 8-bit views.
//!
//! `apply` is the stateless entry point. `FilterPipeline` wraps the same
//! stages with a cache so that changing only the filter reuses the
//! forward transform; every change drops the stages downstream of it.

use freqlab_math::fft::{forward, inverse, Reconstruction};
use freqlab_math::shift::{to_centered, to_natural};
use freqlab_types::config::{FilterSpec, PipelineConfig};
use freqlab_types::error::{FreqError, FreqResult};
use freqlab_types::state::{validate_plane, ImagePlane, Spectrum};
use ndarray::Array2;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::mask::{apply_mask, FilterMaskBuilder};
use crate::visualize::{dc_removed_view, magnitude_view, mask_view, phase_view, spatial_view};

/// Collapse mode for every spatial reconstruction, DC removal included.
pub const RECONSTRUCTION: Reconstruction = Reconstruction::Magnitude;

/// Log-magnitude and phase views of one centered spectrum.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumViews {
    pub magnitude: Array2<u8>,
    pub phase: Array2<u8>,
}

impl SpectrumViews {
    pub fn of(spectrum: &Spectrum) -> Self {
        SpectrumViews {
            magnitude: magnitude_view(spectrum),
            phase: phase_view(spectrum),
        }
    }
}

/// Everything one filter run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutput {
    pub spec: FilterSpec,
    /// Views of H·F.
    pub filtered: SpectrumViews,
    /// Views of the unfiltered spectrum, when `original_views` is enabled.
    pub original: Option<SpectrumViews>,
    pub mask_view: Array2<u8>,
    pub spatial_view: Array2<u8>,
    /// Reconstruction before display scaling.
    pub spatial: Array2<f64>,
}

fn check_working_size(dim: (usize, usize), config: &PipelineConfig) -> FreqResult<()> {
    match config.working_size {
        Some([rows, cols]) if (rows, cols) != dim => Err(FreqError::shape_mismatch(
            "image vs working size",
            (rows, cols),
            dim,
        )),
        _ => Ok(()),
    }
}

fn validate_source(image: &Array2<f64>, config: &PipelineConfig) -> FreqResult<()> {
    validate_plane(image)?;
    check_working_size(image.dim(), config)
}

/// Forward transform of a validated plane, in centered order.
pub fn centered_spectrum(image: &Array2<f64>) -> FreqResult<Spectrum> {
    Ok(to_centered(&forward(image)?))
}

/// Build H for the spectrum's grid and multiply it in. Returns (H, H·F).
pub fn filter_spectrum(
    centered: &Spectrum,
    spec: &FilterSpec,
    config: &PipelineConfig,
) -> FreqResult<(Array2<f64>, Spectrum)> {
    let (rows, cols) = centered.dim();
    let mask = FilterMaskBuilder::with_epsilon(rows, cols, config.distance_epsilon)?.build(spec)?;
    let filtered = apply_mask(centered, &mask)?;
    Ok((mask, filtered))
}

/// Un-center, inverse transform, and derive the spatial view.
pub fn reconstruct(
    filtered: &Spectrum,
    spec: &FilterSpec,
    config: &PipelineConfig,
) -> FreqResult<(Array2<f64>, Array2<u8>)> {
    let spatial = inverse(&to_natural(filtered), RECONSTRUCTION)?;
    let view = if spec.remove_dc {
        dc_removed_view(&spatial, config.dc_boost)
    } else {
        spatial_view(&spatial, config.spatial_scaling)
    };
    Ok((spatial, view))
}

fn assemble(
    spec: &FilterSpec,
    original: Option<SpectrumViews>,
    mask: &Array2<f64>,
    filtered: &Spectrum,
    config: &PipelineConfig,
) -> FreqResult<FilterOutput> {
    let (spatial, spatial_view) = reconstruct(filtered, spec, config)?;
    Ok(FilterOutput {
        spec: *spec,
        filtered: SpectrumViews::of(filtered),
        original,
        mask_view: mask_view(mask),
        spatial_view,
        spatial,
    })
}

/// Run the whole pipeline on one image.
///
/// All validation happens before any transform work. The input is only read.
pub fn apply(
    image: &Array2<f64>,
    spec: &FilterSpec,
    config: &PipelineConfig,
) -> FreqResult<FilterOutput> {
    config.validate()?;
    spec.validate()?;
    validate_source(image, config)?;

    let centered = centered_spectrum(image)?;
    let original = config.original_views.then(|| SpectrumViews::of(&centered));
    let (mask, filtered) = filter_spectrum(&centered, spec, config)?;
    let output = assemble(spec, original, &mask, &filtered, config)?;
    debug!(filter = %spec, rows = image.nrows(), cols = image.ncols(), "filter applied");
    Ok(output)
}

/// `apply` for an 8-bit plane.
pub fn apply_u8(
    image: &Array2<u8>,
    spec: &FilterSpec,
    config: &PipelineConfig,
) -> FreqResult<FilterOutput> {
    apply(&ImagePlane::from_u8(image).data, spec, config)
}

/// Independent `apply` calls in parallel. Results keep request order.
pub fn apply_batch(
    requests: &[(Array2<f64>, FilterSpec)],
    config: &PipelineConfig,
) -> Vec<FreqResult<FilterOutput>> {
    requests
        .par_iter()
        .map(|(image, spec)| apply(image, spec, config))
        .collect()
}

/// Progress of a `FilterPipeline`. Later stages imply the earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineStage {
    Idle,
    SourceLoaded,
    SpectrumComputed,
    MaskApplied,
    Reconstructed,
}

/// Stateful pipeline with per-stage caching.
///
/// Rejected inputs leave the pipeline untouched, so the last valid output
/// stays available.
#[derive(Debug)]
pub struct FilterPipeline {
    config: PipelineConfig,
    spec: FilterSpec,
    stage: PipelineStage,
    source: Option<Array2<f64>>,
    centered: Option<Spectrum>,
    original: Option<SpectrumViews>,
    mask: Option<Array2<f64>>,
    filtered: Option<Spectrum>,
    output: Option<FilterOutput>,
}

fn cache_miss(what: &str) -> FreqError {
    FreqError::Pipeline(format!("pipeline stage cache lost its {what}"))
}

impl FilterPipeline {
    pub fn new(config: PipelineConfig) -> FreqResult<Self> {
        config.validate()?;
        Ok(FilterPipeline {
            config,
            spec: FilterSpec::default(),
            stage: PipelineStage::Idle,
            source: None,
            centered: None,
            original: None,
            mask: None,
            filtered: None,
            output: None,
        })
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    pub fn spec(&self) -> &FilterSpec {
        &self.spec
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn source(&self) -> Option<&Array2<f64>> {
        self.source.as_ref()
    }

    /// Most recent complete output, if the pipeline is reconstructed.
    pub fn output(&self) -> Option<&FilterOutput> {
        self.output.as_ref()
    }

    /// Drop every cached stage after `keep`.
    fn invalidate_after(&mut self, keep: PipelineStage) {
        if keep < PipelineStage::SpectrumComputed {
            self.centered = None;
            self.original = None;
        }
        if keep < PipelineStage::MaskApplied {
            self.mask = None;
            self.filtered = None;
        }
        if keep < PipelineStage::Reconstructed {
            self.output = None;
        }
        self.stage = self.stage.min(keep);
    }

    /// Replace the source image. Everything downstream is recomputed.
    pub fn load_source(&mut self, image: Array2<f64>) -> FreqResult<()> {
        if let Err(e) = validate_source(&image, &self.config) {
            warn!(error = %e, "source image rejected");
            return Err(e);
        }
        info!(rows = image.nrows(), cols = image.ncols(), "source image loaded");
        self.source = Some(image);
        self.invalidate_after(PipelineStage::SourceLoaded);
        self.stage = PipelineStage::SourceLoaded;
        Ok(())
    }

    pub fn load_source_u8(&mut self, image: &Array2<u8>) -> FreqResult<()> {
        self.load_plane(ImagePlane::from_u8(image))
    }

    pub fn load_plane(&mut self, plane: ImagePlane) -> FreqResult<()> {
        self.load_source(plane.data)
    }

    /// Change the filter. An identical spec keeps every cached stage.
    pub fn set_spec(&mut self, spec: FilterSpec) -> FreqResult<()> {
        if let Err(e) = spec.validate() {
            warn!(error = %e, "filter spec rejected");
            return Err(e);
        }
        if spec == self.spec {
            return Ok(());
        }
        debug!(filter = %spec, "filter spec changed");
        self.spec = spec;
        self.invalidate_after(PipelineStage::SpectrumComputed);
        Ok(())
    }

    /// Change pipeline settings. The current source must still fit.
    pub fn set_config(&mut self, config: PipelineConfig) -> FreqResult<()> {
        config.validate()?;
        if let Some(source) = &self.source {
            check_working_size(source.dim(), &config)?;
        }
        if config == self.config {
            return Ok(());
        }
        self.config = config;
        self.invalidate_after(PipelineStage::SourceLoaded);
        Ok(())
    }

    /// Forget the source and every derived array.
    pub fn reset(&mut self) {
        self.source = None;
        self.invalidate_after(PipelineStage::Idle);
    }

    /// Compute exactly one pending stage and return the new stage.
    pub fn advance(&mut self) -> FreqResult<PipelineStage> {
        match self.stage {
            PipelineStage::Idle => {
                return Err(FreqError::Pipeline("no source image loaded".to_string()))
            }
            PipelineStage::SourceLoaded => {
                let source = self.source.as_ref().ok_or_else(|| cache_miss("source"))?;
                let centered = centered_spectrum(source)?;
                self.original = self
                    .config
                    .original_views
                    .then(|| SpectrumViews::of(&centered));
                self.centered = Some(centered);
                self.stage = PipelineStage::SpectrumComputed;
            }
            PipelineStage::SpectrumComputed => {
                let centered = self
                    .centered
                    .as_ref()
                    .ok_or_else(|| cache_miss("spectrum"))?;
                let (mask, filtered) = filter_spectrum(centered, &self.spec, &self.config)?;
                self.mask = Some(mask);
                self.filtered = Some(filtered);
                self.stage = PipelineStage::MaskApplied;
            }
            PipelineStage::MaskApplied => {
                let mask = self.mask.as_ref().ok_or_else(|| cache_miss("mask"))?;
                let filtered = self
                    .filtered
                    .as_ref()
                    .ok_or_else(|| cache_miss("filtered spectrum"))?;
                let output = assemble(
                    &self.spec,
                    self.original.clone(),
                    mask,
                    filtered,
                    &self.config,
                )?;
                self.output = Some(output);
                self.stage = PipelineStage::Reconstructed;
            }
            PipelineStage::Reconstructed => {}
        }
        debug!(stage = ?self.stage, "pipeline advanced");
        Ok(self.stage)
    }

    /// Advance until reconstructed and return the output.
    pub fn run(&mut self) -> FreqResult<&FilterOutput> {
        while self.stage != PipelineStage::Reconstructed {
            self.advance()?;
        }
        self.output.as_ref().ok_or_else(|| cache_miss("output"))
    }
}
