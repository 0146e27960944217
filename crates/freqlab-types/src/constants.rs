// ─────────────────────────────────────────────────────────────────────
// FreqLab — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// Lower bound on the center distance D(u,v), so D0/D never divides by zero.
pub const DISTANCE_EPSILON: f64 = 1e-5;

/// Presentation gain for the zero-mean reconstruction after DC removal.
/// Display convention only; the numeric reconstruction is not scaled.
pub const DC_REMOVAL_BOOST: f64 = 4.0;

/// Upper end of the 8-bit display range.
pub const MAX_INTENSITY: f64 = 255.0;

/// Default cutoff radius D0 (frequency-grid units).
pub const DEFAULT_CUTOFF: f64 = 50.0;

/// Default Butterworth order n.
pub const DEFAULT_ORDER: u32 = 2;

/// Cutoff radii offered as presets by the filtering controls.
pub const CUTOFF_PRESETS: [f64; 5] = [5.0, 15.0, 30.0, 80.0, 230.0];

/// Square working canvas used by the image source.
pub const WORKING_SIZE: usize = 500;
