//! Create profiles derived from an observed sounding.
//!
//! The output is at the same levels as the sounding. A level is missing in the output if it fails
//! the validity mask or if a formula rejects its values, one bad level does not spoil the profile.
//!
//! # Examples
//!
//! ```rust
//! use skewt_analysis::{profile, ValidityMask};
//! # use skewt_analysis::doctest::make_test_sounding;
//!
//! let snd = make_test_sounding();
//! let mask = ValidityMask::all_valid(snd.len());
//!
//! let theta_e = profile::equivalent_potential_temperature(&snd, &mask);
//! assert_eq!(theta_e.len(), snd.len());
//! assert!(theta_e.iter().all(|v| v.is_some()));
//! ```
use crate::{
    met_formulas::{self, P0},
    sounding::Sounding,
    validity::ValidityMask,
};
use itertools::izip;
use metfor::Kelvin;
use optional::Optioned;
use tracing::{debug, warn};

/// Mixing ratio (kg/kg) of each level, the saturation mixing ratio at the dew point.
pub fn mixing_ratio(snd: &Sounding, mask: &ValidityMask) -> Vec<Optioned<f64>> {
    let profile: Vec<Optioned<f64>> = izip!(0.., snd.pressure_profile(), snd.dew_point_profile())
        .map(|(i, &p, &dp)| {
            if !mask.dew_point(i) {
                return None;
            }
            // Ignore errors, if not possible to calculate just use missing value.
            met_formulas::saturation_mixing_ratio(p, dp).ok()
        })
        .map(Optioned::from)
        .collect();

    log_missing("mixing ratio", &profile, |i| mask.dew_point(i));
    profile
}

/// Relative humidity (%) of each level.
pub fn relative_humidity(snd: &Sounding, mask: &ValidityMask) -> Vec<Optioned<f64>> {
    let w_profile = mixing_ratio(snd, mask);

    let profile: Vec<Optioned<f64>> = izip!(
        0..,
        snd.pressure_profile(),
        snd.temperature_profile(),
        w_profile
    )
    .map(|(i, &p, &t, w)| {
        if !mask.temperature(i) {
            return None;
        }
        w.into_option()
            .and_then(|w| met_formulas::relative_humidity(t, p, w).ok())
    })
    .map(Optioned::from)
    .collect();

    log_missing("relative humidity", &profile, |i| {
        mask.temperature(i) && mask.dew_point(i)
    });
    profile
}

/// Potential temperature (K) of each level.
pub fn potential_temperature(snd: &Sounding, mask: &ValidityMask) -> Vec<Optioned<Kelvin>> {
    let profile: Vec<Optioned<Kelvin>> =
        izip!(0.., snd.pressure_profile(), snd.temperature_profile())
            .map(|(i, &p, &t)| {
                if !mask.temperature(i) {
                    return None;
                }
                let t_k = Kelvin::from(t);
                met_formulas::potential_temperature(t_k, p, P0).ok()
            })
            .map(Optioned::from)
            .collect();

    log_missing("potential temperature", &profile, |i| mask.temperature(i));
    profile
}

/// Pseudo-equivalent potential temperature (K) of each level.
pub fn equivalent_potential_temperature(
    snd: &Sounding,
    mask: &ValidityMask,
) -> Vec<Optioned<Kelvin>> {
    let w_profile = mixing_ratio(snd, mask);

    let profile: Vec<Optioned<Kelvin>> = izip!(
        0..,
        snd.pressure_profile(),
        snd.temperature_profile(),
        w_profile
    )
    .map(|(i, &p, &t, w)| {
        if !mask.all(i) {
            return None;
        }
        w.into_option().and_then(|w| {
            met_formulas::pseudoequivalent_potential_temperature(t, p, w, P0).ok()
        })
    })
    .map(Optioned::from)
    .collect();

    log_missing("equivalent potential temperature", &profile, |i| {
        mask.all(i)
    });
    profile
}

/// Count missing values as (masked out, failed a domain check). `usable` tells whether the mask
/// allowed a level.
fn count_missing<T, F>(profile: &[Optioned<T>], usable: F) -> (usize, usize)
where
    T: optional::Noned + Copy,
    F: Fn(usize) -> bool,
{
    profile
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_none())
        .fold((0, 0), |(masked, failed), (i, _)| {
            if usable(i) {
                (masked, failed + 1)
            } else {
                (masked + 1, failed)
            }
        })
}

fn log_missing<T, F>(name: &str, profile: &[Optioned<T>], usable: F)
where
    T: optional::Noned + Copy,
    F: Fn(usize) -> bool,
{
    let (masked, failed) = count_missing(profile, usable);
    if masked > 0 {
        debug!(profile = name, masked, levels = profile.len(), "masked levels");
    }
    if failed > 0 {
        warn!(profile = name, failed, levels = profile.len(), "levels out of formula domain");
    }
}
