//! Configuration values for building reference isopleths and drawing a diagram.
//!
//! Nothing here is global. A diagram is built from a `DiagramConfig` and owns everything derived
//! from it.
use crate::{
    transform::{PlotBounds, SkewTransform, DEFAULT_SKEW_SLOPE},
    validity::ValidRanges,
};
use metfor::{Celsius, HectoPascal, Kelvin};

/// Levels, sweep ranges, and the transform used to compute the reference isopleths.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceConfig {
    /// Skew slope of the coordinate transform.
    pub skew_slope: f64,
    /// Pressure at the bottom edge of the diagram.
    pub p_bottom: HectoPascal,
    /// Pressure at the top edge of the diagram.
    pub p_top: HectoPascal,
    /// Spacing of the pressure sweep used to draw each curve.
    pub pressure_step: f64,
    /// Temperature at the lower left corner of the diagram.
    pub t_min: Celsius,
    /// Temperature at the lower right corner of the diagram.
    pub t_max: Celsius,
    /// Pressures of the horizontal isobars.
    pub isobar_levels: Vec<HectoPascal>,
    /// Temperatures of the isotherms.
    pub isotherm_levels: Vec<Celsius>,
    /// Potential temperatures of the dry adiabats.
    pub theta_levels: Vec<Kelvin>,
    /// Equivalent potential temperatures of the moist adiabats.
    pub theta_ep_levels: Vec<Kelvin>,
    /// Saturation mixing ratios (kg/kg) of the mixing ratio lines.
    pub mixing_ratios: Vec<f64>,
    /// Mixing ratio lines are only drawn at pressures at or above this one.
    pub mixing_ratio_top: HectoPascal,
    /// Coldest temperature in the grid the moist adiabats are contoured from.
    pub theta_ep_grid_t_min: Celsius,
    /// Temperature spacing of the moist adiabat grid.
    pub theta_ep_grid_t_step: f64,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        let theta_levels: Vec<Kelvin> = (-4..=10)
            .map(|i| Kelvin::from(Celsius(f64::from(i) * 10.0)))
            .collect();

        ReferenceConfig {
            skew_slope: DEFAULT_SKEW_SLOPE,
            p_bottom: HectoPascal(1050.0),
            p_top: HectoPascal(150.0),
            pressure_step: 1.0,
            t_min: Celsius(-40.0),
            t_max: Celsius(50.0),
            isobar_levels: (3..=20)
                .rev()
                .map(|i| HectoPascal(f64::from(i) * 50.0))
                .collect(),
            isotherm_levels: (-8..=4).map(|i| Celsius(f64::from(i) * 10.0)).collect(),
            theta_ep_levels: theta_levels.clone(),
            theta_levels,
            mixing_ratios: [0.4, 1.0, 2.0, 3.0, 5.0, 8.0, 12.0, 16.0, 20.0]
                .iter()
                .map(|g_per_kg| g_per_kg / 1000.0)
                .collect(),
            mixing_ratio_top: HectoPascal(600.0),
            theta_ep_grid_t_min: Celsius(-60.0),
            theta_ep_grid_t_step: 0.1,
        }
    }
}

impl ReferenceConfig {
    /// The coordinate transform for this configuration.
    #[inline]
    pub fn transform(&self) -> SkewTransform {
        SkewTransform::new(self.skew_slope)
    }

    /// The visible extent of the diagram. The left and right edges are the `t_min` and `t_max`
    /// isotherms where they meet the bottom edge.
    pub fn bounds(&self) -> PlotBounds {
        let xform = self.transform();
        let left = xform.thermo_to_plot(self.t_min, self.p_bottom);
        let right = xform.thermo_to_plot(self.t_max, self.p_bottom);

        PlotBounds {
            x_min: left.x,
            x_max: right.x,
            y_min: left.y,
            y_max: xform.y_from_p(self.p_top),
        }
    }

    /// The pressures every reference curve is evaluated at, from the bottom to the top of the
    /// diagram.
    pub fn pressure_sweep(&self) -> Vec<HectoPascal> {
        let (bottom, top) = (self.p_bottom.0, self.p_top.0);
        if !(self.pressure_step > 0.0) || top > bottom {
            return vec![];
        }

        let n = ((bottom - top) / self.pressure_step + 1.0e-9).floor() as usize;
        (0..=n)
            .map(|i| HectoPascal(bottom - i as f64 * self.pressure_step))
            .collect()
    }

    /// Temperatures of the moist adiabat grid, from `theta_ep_grid_t_min` up to the warmest
    /// isotherm.
    pub fn theta_ep_grid_temperatures(&self) -> Vec<Celsius> {
        let start = self.theta_ep_grid_t_min.0;
        let end = self
            .isotherm_levels
            .iter()
            .map(|t| t.0)
            .fold(std::f64::NEG_INFINITY, f64::max);

        if !(self.theta_ep_grid_t_step > 0.0) || !end.is_finite() || end < start {
            return vec![];
        }

        let n = ((end - start) / self.theta_ep_grid_t_step + 1.0e-9).floor() as usize;
        (0..=n)
            .map(|i| Celsius(start + i as f64 * self.theta_ep_grid_t_step))
            .collect()
    }

    /// Builder method for the skew slope.
    pub fn with_skew_slope(self, skew_slope: f64) -> Self {
        ReferenceConfig { skew_slope, ..self }
    }

    /// Builder method for the pressure sweep spacing.
    pub fn with_pressure_step(self, pressure_step: f64) -> Self {
        ReferenceConfig {
            pressure_step,
            ..self
        }
    }

    /// Builder method for the moist adiabat grid temperature spacing.
    pub fn with_theta_ep_grid_step(self, theta_ep_grid_t_step: f64) -> Self {
        ReferenceConfig {
            theta_ep_grid_t_step,
            ..self
        }
    }
}

/// An RGB color with components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub f64, pub f64, pub f64);

impl Rgb {
    /// Format as a CSS/SVG hex color.
    pub fn to_hex(self) -> String {
        let to_byte = |c: f64| (c.max(0.0).min(1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            to_byte(self.0),
            to_byte(self.1),
            to_byte(self.2)
        )
    }
}

/// Colors for each layer of the diagram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagramColors {
    /// Isobars
    pub isobars: Rgb,
    /// Isotherms
    pub isotherms: Rgb,
    /// Dry adiabats
    pub dry_adiabats: Rgb,
    /// Mixing ratio lines
    pub mixing_ratios: Rgb,
    /// Moist adiabats
    pub moist_adiabats: Rgb,
    /// Observed temperature
    pub temperature: Rgb,
    /// Observed dew point
    pub dew_point: Rgb,
    /// Axis labels, ticks, and frame
    pub text: Rgb,
}

impl Default for DiagramColors {
    fn default() -> Self {
        DiagramColors {
            isobars: Rgb(1.0, 0.8, 0.8),
            isotherms: Rgb(1.0, 0.5, 0.6),
            dry_adiabats: Rgb(1.0, 0.7, 0.7),
            mixing_ratios: Rgb(0.8, 0.8, 0.6),
            moist_adiabats: Rgb(0.6, 0.9, 0.7),
            temperature: Rgb(1.0, 0.0, 0.0),
            dew_point: Rgb(0.0, 0.5, 0.0),
            text: Rgb(0.0, 0.0, 0.0),
        }
    }
}

/// Everything needed to draw a skew-T diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramConfig {
    /// Reference isopleths.
    pub reference: ReferenceConfig,
    /// Title, if `None` one is made from the station and valid time.
    pub title: Option<String>,
    /// Label for the x axis.
    pub x_label: String,
    /// Label for the y axis.
    pub y_label: String,
    /// Layer colors.
    pub colors: DiagramColors,
    /// Width of the reference lines in pixels.
    pub reference_line_width: f64,
    /// Width of the observed temperature and dew point lines in pixels.
    pub observed_line_width: f64,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Leave implausible observed values out of the plotted profiles.
    pub apply_validity_mask: bool,
    /// What counts as plausible.
    pub valid_ranges: ValidRanges,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        DiagramConfig {
            reference: ReferenceConfig::default(),
            title: None,
            x_label: "Temperature (C)".to_owned(),
            y_label: "Pressure (mb)".to_owned(),
            colors: DiagramColors::default(),
            reference_line_width: 1.0,
            observed_line_width: 2.0,
            width: 800,
            height: 800,
            apply_validity_mask: true,
            valid_ranges: ValidRanges::default(),
        }
    }
}

impl DiagramConfig {
    /// Create a configuration with the default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method for the reference isopleth configuration.
    pub fn with_reference(self, reference: ReferenceConfig) -> Self {
        DiagramConfig { reference, ..self }
    }

    /// Builder method for the title.
    pub fn with_title<S>(self, title: S) -> Self
    where
        Option<String>: From<S>,
    {
        DiagramConfig {
            title: Option::from(title),
            ..self
        }
    }

    /// Builder method for the canvas size in pixels.
    pub fn with_size(self, width: u32, height: u32) -> Self {
        DiagramConfig {
            width,
            height,
            ..self
        }
    }

    /// Builder method to turn the validity mask on or off.
    pub fn with_validity_mask(self, apply_validity_mask: bool) -> Self {
        DiagramConfig {
            apply_validity_mask,
            ..self
        }
    }
}
