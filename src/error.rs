//! Error types for the skewt-analysis crate.

/// Error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// A pressure that must be positive (logarithm or ratio) was not.
    #[error("Pressure must be positive, got {0} hPa.")]
    NonPositivePressure(f64),
    /// The inverse saturation vapor pressure formula needs a positive vapor pressure.
    #[error("Vapor pressure must be positive, got {0} hPa.")]
    NonPositiveVaporPressure(f64),
    /// The inverse saturation vapor pressure formula has a pole where ln(e_s) == 19.48.
    #[error("Vapor pressure {0} hPa is at the pole of the inverse saturation formula.")]
    SingularVaporPressure(f64),
    /// Saturation vapor pressure is not smaller than the total pressure.
    #[error("Vapor pressure {vapor_pressure} hPa is not less than pressure {pressure} hPa.")]
    VaporPressureExceedsPressure {
        /// Total pressure in hPa
        pressure: f64,
        /// Saturation vapor pressure in hPa
        vapor_pressure: f64,
    },
    /// A mixing ratio that must be positive and finite was not.
    #[error("Mixing ratio must be positive, got {0} kg/kg.")]
    NonPositiveMixingRatio(f64),
    /// Relative humidity must be in (0, 100] for the LCL temperature.
    #[error("Relative humidity must be positive, got {0}%.")]
    RelativeHumidityOutOfRange(f64),
    /// A formula produced NaN or an infinity.
    #[error("Non-finite result calculating {0}.")]
    NonFinite(&'static str),

    /// The sounding file could not be read.
    #[error("Unable to read sounding file: {0}")]
    Io(#[from] std::io::Error),
    /// A malformed row in a sounding file.
    #[error("Parse error on line {line}: {message}")]
    Parse {
        /// 1-based line number in the file.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },
    /// The diagram could not be rasterized or written.
    #[error("Render error: {0}")]
    Render(String),
}

/// Shorthand for results.
pub type Result<T> = ::std::result::Result<T, AnalysisError>;
