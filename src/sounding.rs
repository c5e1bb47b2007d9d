//! Data type and methods to store an observed atmospheric sounding.

use chrono::NaiveDateTime;
use metfor::{Celsius, HectoPascal, Knots, Meters, WindSpdDir};
use std::iter::FromIterator;

pub use self::{data_row::DataRow, station_info::StationInfo};

/// All the variables stored in the sounding.
///
/// The upper air profile variables are stored in parallel vectors in the order they were observed,
/// which is the row order of the source file. Values are stored exactly as read, including any
/// missing value sentinels, see the `validity` module for range checks.
///
#[derive(Clone, Debug, Default)]
pub struct Sounding {
    // Description of the source of the sounding.
    source: Option<String>,

    // Station info
    station: StationInfo,

    // Valid time of sounding
    valid_time: Option<NaiveDateTime>,

    // Profiles
    pressure: Vec<HectoPascal>,
    height: Vec<Meters>,
    temperature: Vec<Celsius>,
    dew_point: Vec<Celsius>,
    wind: Vec<WindSpdDir<Knots>>,
}

macro_rules! make_profile_setter {
    ($(#[$attr:meta])* => $name:tt, $inner_type:ty, $p_var:ident) => {
        $(#[$attr])*
        pub fn $name(self, profile: Vec<$inner_type>) -> Self {
            Self {$p_var: profile, ..self}
        }
    };
}

impl Sounding {
    /// Create a new sounding with default values. This is a proxy for default with a clearer name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use skewt_analysis::Sounding;
    ///
    /// let snd = Sounding::new();
    /// assert!(snd.is_empty());
    /// ```
    #[inline]
    pub fn new() -> Self {
        Sounding::default()
    }

    /// Add a source description to this sounding.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use skewt_analysis::Sounding;
    ///
    /// let snd = Sounding::new().with_source_description("An empty sounding.".to_owned());
    /// assert_eq!(snd.source_description().unwrap(), "An empty sounding.");
    ///
    /// let snd = snd.with_source_description(None);
    /// assert!(snd.source_description().is_none());
    /// ```
    #[inline]
    pub fn with_source_description<S>(mut self, desc: S) -> Self
    where
        Option<String>: From<S>,
    {
        self.source = Option::from(desc);
        self
    }

    /// Retrieve a source description for this sounding.
    #[inline]
    pub fn source_description(&self) -> Option<&str> {
        self.source.as_ref().map(|s| s.as_ref())
    }

    /// Builder function for setting the station info.
    #[inline]
    pub fn with_station_info(mut self, new_value: StationInfo) -> Self {
        self.station = new_value;
        self
    }

    /// Get the station info
    #[inline]
    pub fn station_info(&self) -> &StationInfo {
        &self.station
    }

    /// Valid time of the sounding.
    #[inline]
    pub fn valid_time(&self) -> Option<NaiveDateTime> {
        self.valid_time
    }

    /// Builder method to set the valid time of the sounding.
    ///
    /// # Examples
    /// ```rust
    /// use skewt_analysis::Sounding;
    /// use chrono::NaiveDate;
    ///
    /// let vtime = NaiveDate::from_ymd_opt(2014, 10, 14)
    ///     .and_then(|d| d.and_hms_opt(0, 0, 0))
    ///     .unwrap();
    /// let snd = Sounding::new().with_valid_time(vtime);
    /// assert_eq!(snd.valid_time(), Some(vtime));
    /// let _snd = Sounding::new().with_valid_time(Some(vtime));
    /// ```
    #[inline]
    pub fn with_valid_time<T>(mut self, valid_time: T) -> Self
    where
        Option<NaiveDateTime>: From<T>,
    {
        self.valid_time = Option::from(valid_time);
        self
    }

    make_profile_setter!(
        /// Builder method for the pressure profile.
        ///
        /// # Examples
        /// ```rust
        /// use skewt_analysis::Sounding;
        /// use metfor::HectoPascal;
        ///
        /// let data = vec![1000.0, 925.0, 850.0, 700.0, 500.0, 300.0, 250.0, 200.0, 150.0, 100.0];
        /// let pressure_data: Vec<HectoPascal> = data.into_iter().map(HectoPascal).collect();
        ///
        /// let snd = Sounding::new().with_pressure_profile(pressure_data);
        /// assert_eq!(snd.len(), 10);
        /// ```
        #[inline]
        => with_pressure_profile, HectoPascal, pressure
    );

    /// Get the pressure profile
    #[inline]
    pub fn pressure_profile(&self) -> &[HectoPascal] {
        &self.pressure
    }

    make_profile_setter!(
        /// Builder method for the geopotential height profile.
        #[inline]
        => with_height_profile, Meters, height
    );

    /// Get the geopotential height profile.
    #[inline]
    pub fn height_profile(&self) -> &[Meters] {
        &self.height
    }

    make_profile_setter!(
        /// Builder method for the temperature profile.
        #[inline]
        => with_temperature_profile, Celsius, temperature
    );

    /// Get the temperature profile.
    #[inline]
    pub fn temperature_profile(&self) -> &[Celsius] {
        &self.temperature
    }

    make_profile_setter!(
        /// Builder method for the dew point profile.
        #[inline]
        => with_dew_point_profile, Celsius, dew_point
    );

    /// Get the dew point profile.
    #[inline]
    pub fn dew_point_profile(&self) -> &[Celsius] {
        &self.dew_point
    }

    make_profile_setter!(
        /// Builder method for the wind profile.
        #[inline]
        => with_wind_profile, WindSpdDir<Knots>, wind
    );

    /// Get the wind profile.
    #[inline]
    pub fn wind_profile(&self) -> &[WindSpdDir<Knots>] {
        &self.wind
    }

    /// The number of levels, which is the length of the pressure profile.
    #[inline]
    pub fn len(&self) -> usize {
        self.pressure.len()
    }

    /// There are no levels in this sounding.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pressure.is_empty()
    }

    /// Get a row of data values from this sounding. Returns `None` if the index is out of range or
    /// one of the profiles is too short.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use metfor::{Celsius, HectoPascal};
    /// # use skewt_analysis::doctest::make_test_sounding;
    ///
    /// let snd = make_test_sounding();
    ///
    /// let row = snd.data_row(0).unwrap();
    /// assert_eq!(row.pressure, HectoPascal(1000.0));
    /// assert_eq!(row.temperature, Celsius(20.0));
    ///
    /// assert!(snd.data_row(4).is_none()); // There weren't that many rows!
    /// ```
    #[inline]
    pub fn data_row(&self, idx: usize) -> Option<DataRow> {
        Some(DataRow {
            pressure: *self.pressure.get(idx)?,
            height: *self.height.get(idx)?,
            temperature: *self.temperature.get(idx)?,
            dew_point: *self.dew_point.get(idx)?,
            wind: *self.wind.get(idx)?,
        })
    }

    /// Iterate over the data rows in file order.
    #[inline]
    pub fn rows<'a>(&'a self) -> impl Iterator<Item = DataRow> + 'a {
        (0..self.len()).filter_map(move |i| self.data_row(i))
    }
}

impl FromIterator<DataRow> for Sounding {
    fn from_iter<I: IntoIterator<Item = DataRow>>(iter: I) -> Self {
        let mut snd = Sounding::new();

        for row in iter {
            snd.pressure.push(row.pressure);
            snd.height.push(row.height);
            snd.temperature.push(row.temperature);
            snd.dew_point.push(row.dew_point);
            snd.wind.push(row.wind);
        }

        snd
    }
}

// FIXME: only configure for test and doc tests, not possible as of 1.41
#[doc(hidden)]
pub mod doctest {
    use super::*;

    pub fn make_test_sounding() -> super::Sounding {
        let rows = [
            (1000.0, 110.0, 20.0, 15.0, 180.0, 10.0),
            (925.0, 780.0, 18.0, 10.0, 200.0, 20.0),
            (850.0, 1500.0, 10.0, 2.0, 230.0, 25.0),
            (700.0, 3100.0, 2.0, -10.0, 250.0, 35.0),
        ];

        rows.iter()
            .map(|&(p, z, t, dp, dir, spd)| DataRow {
                pressure: HectoPascal(p),
                height: Meters(z),
                temperature: Celsius(t),
                dew_point: Celsius(dp),
                wind: WindSpdDir {
                    speed: Knots(spd),
                    direction: dir,
                },
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_profile() {
        let snd = doctest::make_test_sounding();

        println!("snd = {:#?}", snd);
        assert_eq!(snd.len(), 4);
        assert_eq!(snd.pressure_profile().len(), 4);
        assert_eq!(snd.height_profile().len(), 4);
        assert_eq!(snd.temperature_profile().len(), 4);
        assert_eq!(snd.dew_point_profile().len(), 4);
        assert_eq!(snd.wind_profile().len(), 4);

        assert_eq!(snd.pressure_profile()[2], HectoPascal(850.0));
        assert_eq!(snd.dew_point_profile()[3], Celsius(-10.0));
    }

    #[test]
    fn test_rows_in_order() {
        let snd = doctest::make_test_sounding();

        let pressures: Vec<HectoPascal> = snd.rows().map(|row| row.pressure).collect();
        assert_eq!(pressures, snd.pressure_profile());

        let rebuilt: Sounding = snd.rows().collect();
        assert_eq!(rebuilt.temperature_profile(), snd.temperature_profile());
    }

    #[test]
    fn test_short_profile() {
        let snd = doctest::make_test_sounding().with_wind_profile(vec![]);
        assert!(snd.data_row(0).is_none());
        assert_eq!(snd.rows().count(), 0);
    }
}

mod data_row;
mod station_info;
