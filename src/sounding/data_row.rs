use metfor::{Celsius, HectoPascal, Knots, Meters, WindSpdDir};

/// A copy of a row of the sounding data, one observation level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DataRow {
    /// Pressure in hPa
    pub pressure: HectoPascal,
    /// Geopotential Height in meters
    pub height: Meters,
    /// Temperature in C
    pub temperature: Celsius,
    /// Dew point in C
    pub dew_point: Celsius,
    /// Wind direction in degrees and speed in knots
    pub wind: WindSpdDir<Knots>,
}
