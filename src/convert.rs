//! Pure conversions from raw sensor readings to physical units.
//!
//! Every function here is deterministic given its inputs and calibration
//! constants; nothing in this module touches resource state.

use core::f32::consts::{PI, TAU};

/// One point on a gas datasheet curve: `(Rs/Ro ratio, concentration ppm)`.
/// Tables are ordered by strictly decreasing ratio / increasing ppm.
pub type GasCurve = [(f32, f32)];

/// LPG concentration curve for the MQ6, from the datasheet plot.
pub const LPG_CURVE: [(f32, f32); 21] = [
    (3.079, 100.0),
    (2.041, 200.0),
    (1.738, 300.0),
    (1.534, 400.0),
    (1.353, 500.0),
    (1.26, 600.0),
    (1.173, 700.0),
    (1.092, 800.0),
    (1.054, 900.0),
    (1.017, 1000.0),
    (0.913, 1281.0),
    (0.835, 1562.0),
    (0.737, 2000.0),
    (0.639, 3000.0),
    (0.563, 4000.0),
    (0.515, 5000.0),
    (0.48, 6000.0),
    (0.455, 7000.0),
    (0.431, 8000.0),
    (0.408, 9000.0),
    (0.394, 10000.0),
];

/// CH4 concentration curve for the MQ6, from the datasheet plot.
pub const CH4_CURVE: [(f32, f32); 20] = [
    (3.463, 100.0),
    (2.609, 200.0),
    (2.213, 300.0),
    (1.974, 400.0),
    (1.802, 500.0),
    (1.682, 600.0),
    (1.578, 700.0),
    (1.493, 800.0),
    (1.414, 900.0),
    (1.357, 1000.0),
    (1.146, 1562.0),
    (1.032, 2000.0),
    (0.895, 3000.0),
    (0.788, 4000.0),
    (0.716, 5000.0),
    (0.665, 6000.0),
    (0.621, 7000.0),
    (0.596, 8000.0),
    (0.567, 9000.0),
    (0.547, 10000.0),
];

/// Gas concentration in ppm from a measured `Rs/Ro` ratio, interpolated in
/// log-log space over a datasheet curve.
///
/// The bracketing interval is found by scanning from the first sample while
/// `ratio < ratio_i`; the local slope between the bracket endpoints then
/// gives `ppm = 10^(((log10 ratio − log10 ratio_i) / slope) + log10 ppm_i)`.
/// Feeding an exact table ratio returns that sample's ppm.
///
/// Ratios outside the table's domain are NOT clamped: they extrapolate
/// through the nearest boundary interval, which can produce values well
/// past the calibrated range. Known boundary behavior, kept as-is.
#[must_use]
pub fn gas_ppm(ratio: f32, curve: &GasCurve) -> f32 {
    debug_assert!(curve.len() >= 2);
    let mut i = 0;
    while i < curve.len() && ratio < curve[i].0 {
        i += 1;
    }
    // ratios below the final sample extrapolate through the last interval
    let i = i.min(curve.len() - 2);
    let (r0, p0) = curve[i];
    let (r1, p1) = curve[i + 1];
    let (r0, p0, r1, p1) = (r0 as f64, p0 as f64, r1 as f64, p1 as f64);
    let slope = (r0.log10() - r1.log10()) / (p0.log10() - p1.log10());
    let ppm = 10f64.powf((f64::from(ratio).log10() - r0.log10()) / slope + p0.log10());
    ppm as f32
}

/// Linear accelerometer scale: counts at zero g and counts per g, fixed
/// per hardware revision (12-bit ADC, 3.3 V reference).
#[derive(Copy, Clone, Debug)]
pub struct GforceScale {
    pub zero_g: f32,
    pub counts_per_g: f32,
}

impl Default for GforceScale {
    fn default() -> Self {
        Self {
            zero_g: 2048.0,
            counts_per_g: 409.5,
        }
    }
}

/// Acceleration in g from a raw axis reading.
#[must_use]
pub fn gforce(raw: f32, scale: &GforceScale) -> f32 {
    (raw - scale.zero_g) / scale.counts_per_g
}

/// The raw range an accelerometer axis spans while the part is held still,
/// used to remap readings onto [-90, 90] degrees.
#[derive(Copy, Clone, Debug)]
pub struct RotationRange {
    pub raw_min: f32,
    pub raw_max: f32,
}

impl Default for RotationRange {
    fn default() -> Self {
        Self {
            raw_min: 255.0,
            raw_max: 405.0,
        }
    }
}

/// Linear remap of `x` from one range onto another.
#[must_use]
pub fn remap(x: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    (x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// Rotation angle in radians, in [0, 2π), from two companion axis
/// readings. Each raw reading is remapped onto [-90, 90] degrees, then
/// `atan2(-a, -b) + π` gives the angle.
#[must_use]
pub fn rotation(a_raw: f32, b_raw: f32, range: &RotationRange) -> f32 {
    let a = remap(a_raw, range.raw_min, range.raw_max, -90.0, 90.0);
    let b = remap(b_raw, range.raw_min, range.raw_max, -90.0, 90.0);
    // atan2 at the origin depends on zero signs; pin the degenerate case
    if a == 0.0 && b == 0.0 {
        return PI;
    }
    let angle = (-a).atan2(-b) + PI;
    // atan2 covers (-π, π]; fold the closed endpoint back to zero
    if angle >= TAU {
        0.0
    } else {
        angle
    }
}

#[must_use]
pub fn celsius_to_fahrenheit(celsius: f32) -> f32 {
    celsius * 1.8 + 32.0
}

#[must_use]
pub fn meters_to_feet(meters: f32) -> f32 {
    meters * 3.28084
}

#[must_use]
pub fn pascals_to_hectopascals(pascals: f32) -> f32 {
    pascals / 100.0
}
