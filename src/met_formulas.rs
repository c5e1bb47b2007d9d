//! Thermodynamic formulas, mostly after Bolton (1980).
//!
//! The units are part of each function's contract and they are deliberately mixed. Saturation and
//! mixing ratio formulas work in Celsius, the LCL temperature comes back in Kelvin, and potential
//! temperatures are always Kelvin. The empirical constants are calibrated for exactly these units,
//! so callers convert (offset 273.15) rather than the functions guessing.
//!
//! Mixing ratios are in kg/kg and relative humidity is in percent, both as plain `f64`.
//!
//! All functions are scalar. Apply them over profiles or grids with iterators.
use crate::error::{AnalysisError, Result};
use metfor::{Celsius, HectoPascal, Kelvin, Quantity};

/// Offset between the Celsius and Kelvin scales.
pub const C_TO_K: f64 = 273.15;
/// Specific heat of dry air at constant pressure, J/(kg K).
pub const CP_DRY: f64 = 1005.7;
/// Gas constant for dry air, J/(kg K).
pub const R_DRY: f64 = 287.04;
/// Specific heat of dry air at constant volume, J/(kg K).
pub const CV_DRY: f64 = CP_DRY - R_DRY;
/// Ratio of the molecular weights of water vapor and dry air.
pub const EPSILON: f64 = 0.622;
/// R_d / c_p for dry air.
pub const KAPPA_DRY: f64 = 0.2854;
/// Standard reference pressure for potential temperatures.
pub const P0: HectoPascal = HectoPascal(1000.0);

/// Saturation vapor pressure over liquid water (hPa) from temperature in Celsius.
///
/// `e_s = 6.112 exp(17.67 T / (T + 243.5))`
///
/// There is no domain check. The result is meaningless far outside the liquid water range and
/// divides by zero at T = -243.5 C.
#[inline]
pub fn saturation_vapor_pressure(temperature: Celsius) -> HectoPascal {
    let t = temperature.unpack();
    HectoPascal(6.112 * ((17.67 * t) / (t + 243.5)).exp())
}

/// Temperature (C) at which the saturation vapor pressure equals `vapor_pressure`.
///
/// The closed form inverse of [`saturation_vapor_pressure`], accurate to about a thousandth of a
/// degree because the constants are rounded.
pub fn inverse_saturation_vapor_pressure(vapor_pressure: HectoPascal) -> Result<Celsius> {
    let e_s = vapor_pressure.unpack();
    if !(e_s > 0.0) {
        return Err(AnalysisError::NonPositiveVaporPressure(e_s));
    }

    let ln_es = e_s.ln();
    let denominator = 19.48 - ln_es;
    if denominator == 0.0 {
        return Err(AnalysisError::SingularVaporPressure(e_s));
    }

    finite(
        (243.5 * ln_es - 440.8) / denominator,
        "inverse saturation vapor pressure",
    )
    .map(Celsius)
}

/// Saturation mixing ratio (kg/kg) at the given pressure (hPa) and temperature (C).
///
/// Fails when the saturation vapor pressure is not less than the total pressure.
pub fn saturation_mixing_ratio(pressure: HectoPascal, temperature: Celsius) -> Result<f64> {
    let p = check_pressure(pressure)?;
    let e_s = saturation_vapor_pressure(temperature).unpack();

    if !e_s.is_finite() {
        return Err(AnalysisError::NonFinite("saturation vapor pressure"));
    }
    if p <= e_s {
        return Err(AnalysisError::VaporPressureExceedsPressure {
            pressure: p,
            vapor_pressure: e_s,
        });
    }

    Ok(EPSILON * e_s / (p - e_s))
}

/// Temperature (C) along a line of constant saturation mixing ratio (kg/kg).
///
/// This inverts the mixing ratio relation to get a vapor pressure and then applies
/// [`inverse_saturation_vapor_pressure`]. The mixing ratio must be positive.
pub fn mixing_ratio_line_temperature(pressure: HectoPascal, mixing_ratio: f64) -> Result<Celsius> {
    let p = check_pressure(pressure)?;
    if !(mixing_ratio > 0.0) || !mixing_ratio.is_finite() {
        return Err(AnalysisError::NonPositiveMixingRatio(mixing_ratio));
    }

    let e_s = mixing_ratio * p / (EPSILON + mixing_ratio);
    inverse_saturation_vapor_pressure(HectoPascal(e_s))
}

/// Relative humidity (%) from temperature (C), pressure (hPa), and mixing ratio (kg/kg).
pub fn relative_humidity(temperature: Celsius, pressure: HectoPascal, mixing_ratio: f64) -> Result<f64> {
    let w_s = saturation_mixing_ratio(pressure, temperature)?;
    Ok(mixing_ratio / w_s * 100.0)
}

/// Temperature of the lifting condensation level (K) from temperature (C) and relative humidity
/// (%).
///
/// `RH = 100` is the saturated case and returns the input temperature. `RH <= 0` has no LCL and is
/// an error. Values above 100 (supersaturation) are accepted.
pub fn lcl_temperature(temperature: Celsius, rh: f64) -> Result<Kelvin> {
    if !(rh > 0.0) || !rh.is_finite() {
        return Err(AnalysisError::RelativeHumidityOutOfRange(rh));
    }

    let t_k = Kelvin::from(temperature).unpack();
    let lcl = 1.0 / ((1.0 / (t_k - 55.0)) - ((rh / 100.0).ln() / 2840.0)) + 55.0;

    finite(lcl, "LCL temperature").map(Kelvin)
}

/// Temperature (K) on the dry adiabat with potential temperature `theta` at pressure `pressure`.
///
/// Poisson's relation, `theta / (p0 / p)^kappa`.
pub fn dry_adiabat_temperature(
    theta: Kelvin,
    pressure: HectoPascal,
    reference: HectoPascal,
) -> Result<Kelvin> {
    let p = check_pressure(pressure)?;
    let p0 = check_pressure(reference)?;

    Ok(Kelvin(theta.unpack() / (p0 / p).powf(KAPPA_DRY)))
}

/// Potential temperature (K) of air at `temperature` (K) and `pressure`.
///
/// The inverse of [`dry_adiabat_temperature`].
pub fn potential_temperature(
    temperature: Kelvin,
    pressure: HectoPascal,
    reference: HectoPascal,
) -> Result<Kelvin> {
    let p = check_pressure(pressure)?;
    let p0 = check_pressure(reference)?;

    Ok(Kelvin(temperature.unpack() * (p0 / p).powf(KAPPA_DRY)))
}

/// Pseudo-equivalent potential temperature (K) from temperature (C), pressure (hPa), and mixing
/// ratio (kg/kg), Bolton's equation 43.
///
/// The moist correction terms are calibrated for a mixing ratio in g/kg, the conversion happens
/// internally. A zero mixing ratio gives zero relative humidity and therefore fails in
/// [`lcl_temperature`].
pub fn pseudoequivalent_potential_temperature(
    temperature: Celsius,
    pressure: HectoPascal,
    mixing_ratio: f64,
    reference: HectoPascal,
) -> Result<Kelvin> {
    let p = check_pressure(pressure)?;
    let p0 = check_pressure(reference)?;

    let t_k = Kelvin::from(temperature).unpack();
    let rh = relative_humidity(temperature, pressure, mixing_ratio)?;
    let t_lcl = lcl_temperature(temperature, rh)?.unpack();

    let w = mixing_ratio * 1000.0;
    let dry_part = t_k * (p0 / p).powf(KAPPA_DRY * (1.0 - 0.28e-3 * w));
    let moist_part = (((3.376 / t_lcl) - 0.00254) * w * (1.0 + 0.81e-3 * w)).exp();

    finite(dry_part * moist_part, "equivalent potential temperature").map(Kelvin)
}

/// Pseudo-equivalent potential temperature (K) of saturated air at temperature (C) and pressure.
///
/// This is the quantity contoured over a (T, p) grid to draw moist adiabats, see
/// [`ThetaEpField`](crate::isopleths::ThetaEpField) for the gridded version.
pub fn theta_ep_field(
    temperature: Celsius,
    pressure: HectoPascal,
    reference: HectoPascal,
) -> Result<Kelvin> {
    let w_s = saturation_mixing_ratio(pressure, temperature)?;
    pseudoequivalent_potential_temperature(temperature, pressure, w_s, reference)
}

#[inline]
fn check_pressure(pressure: HectoPascal) -> Result<f64> {
    let p = pressure.unpack();
    if p > 0.0 && p.is_finite() {
        Ok(p)
    } else {
        Err(AnalysisError::NonPositivePressure(p))
    }
}

#[inline]
fn finite(val: f64, what: &'static str) -> Result<f64> {
    if val.is_finite() {
        Ok(val)
    } else {
        Err(AnalysisError::NonFinite(what))
    }
}
