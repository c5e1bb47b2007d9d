//! Range checks for observed soundings.
//!
//! The reader keeps every row exactly as written, so missing value sentinels and garbage levels are
//! still in the `Sounding`. These masks flag the physically plausible values so derived quantities
//! and plotted curves can leave the rest out.
use crate::sounding::Sounding;
use itertools::izip;
use metfor::{Celsius, HectoPascal};
use tracing::debug;

/// Open intervals considered physically plausible for observed values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidRanges {
    /// Temperature and dew point must be strictly between these values.
    pub temperature: (Celsius, Celsius),
    /// Pressure must be strictly between these values.
    pub pressure: (HectoPascal, HectoPascal),
}

impl Default for ValidRanges {
    fn default() -> Self {
        ValidRanges {
            temperature: (Celsius(-100.0), Celsius(60.0)),
            pressure: (HectoPascal(50.0), HectoPascal(1005.0)),
        }
    }
}

/// Per level flags for temperature, dew point, and pressure.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidityMask {
    good_t: Vec<bool>,
    good_td: Vec<bool>,
    good_p: Vec<bool>,
}

impl ValidityMask {
    /// Check every level of a sounding.
    pub fn new(snd: &Sounding, ranges: &ValidRanges) -> Self {
        let (t_low, t_high) = ranges.temperature;
        let (p_low, p_high) = ranges.pressure;

        let in_t_range = |t: &Celsius| *t > t_low && *t < t_high;

        let good_t: Vec<bool> = snd.temperature_profile().iter().map(in_t_range).collect();
        let good_td: Vec<bool> = snd.dew_point_profile().iter().map(in_t_range).collect();
        let good_p: Vec<bool> = snd
            .pressure_profile()
            .iter()
            .map(|p| *p > p_low && *p < p_high)
            .collect();

        let mask = ValidityMask {
            good_t,
            good_td,
            good_p,
        };

        debug!(
            levels = snd.len(),
            bad_temperature = mask.count_bad(ValidityMask::temperature),
            bad_dew_point = mask.count_bad(ValidityMask::dew_point),
            "computed validity mask"
        );

        mask
    }

    /// A mask that accepts every level of a sounding with `len` levels.
    pub fn all_valid(len: usize) -> Self {
        ValidityMask {
            good_t: vec![true; len],
            good_td: vec![true; len],
            good_p: vec![true; len],
        }
    }

    /// Number of levels in the mask.
    #[inline]
    pub fn len(&self) -> usize {
        self.good_p.len()
    }

    /// The mask has no levels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.good_p.is_empty()
    }

    /// The temperature at level `idx` is plausible on its own.
    #[inline]
    pub fn good_t(&self, idx: usize) -> bool {
        self.good_t.get(idx).copied().unwrap_or(false)
    }

    /// The dew point at level `idx` is plausible on its own.
    #[inline]
    pub fn good_td(&self, idx: usize) -> bool {
        self.good_td.get(idx).copied().unwrap_or(false)
    }

    /// The pressure at level `idx` is plausible.
    #[inline]
    pub fn good_p(&self, idx: usize) -> bool {
        self.good_p.get(idx).copied().unwrap_or(false)
    }

    /// The temperature point (T, p) at level `idx` can be used.
    #[inline]
    pub fn temperature(&self, idx: usize) -> bool {
        self.good_t(idx) && self.good_p(idx)
    }

    /// The dew point point (Td, p) at level `idx` can be used.
    #[inline]
    pub fn dew_point(&self, idx: usize) -> bool {
        self.good_td(idx) && self.good_p(idx)
    }

    /// Temperature, dew point, and pressure at level `idx` can all be used.
    #[inline]
    pub fn all(&self, idx: usize) -> bool {
        self.good_t(idx) && self.good_td(idx) && self.good_p(idx)
    }

    /// Iterate over the combined temperature/pressure flags.
    pub fn temperature_flags<'a>(&'a self) -> impl Iterator<Item = bool> + 'a {
        izip!(&self.good_t, &self.good_p).map(|(&t, &p)| t && p)
    }

    /// Iterate over the combined dew point/pressure flags.
    pub fn dew_point_flags<'a>(&'a self) -> impl Iterator<Item = bool> + 'a {
        izip!(&self.good_td, &self.good_p).map(|(&td, &p)| td && p)
    }

    fn count_bad<F: Fn(&Self, usize) -> bool>(&self, check: F) -> usize {
        (0..self.len()).filter(|&i| !check(self, i)).count()
    }
}
