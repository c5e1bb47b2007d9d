//! Mapping between physical (temperature, pressure) space and the skewed plotting plane.
//!
//! The plot coordinates are `x = T - slope * ln(p)` and `y = -ln(p)` with `T` in Kelvin and `p` in
//! hPa. The mapping is an exact bijection for positive pressures, which is what makes reading a
//! temperature and pressure back from a pointer position possible.
//!
//! Pressure must be positive and `y` small enough that `exp(-y)` does not overflow. Keeping the
//! inputs in a physically plausible range (roughly 50 - 1100 hPa) is the caller's job.
use metfor::{Celsius, HectoPascal, Kelvin, Quantity};

/// The skew slope used on the standard diagram.
pub const DEFAULT_SKEW_SLOPE: f64 = 40.0;

/// A point in the skewed plotting plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlotPoint {
    /// Skewed temperature coordinate.
    pub x: f64,
    /// Negative log pressure.
    pub y: f64,
}

impl PlotPoint {
    /// Create a new point.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        PlotPoint { x, y }
    }

    /// A point with no position. Canvases break a line where one appears.
    #[inline]
    pub fn missing() -> Self {
        PlotPoint {
            x: f64::NAN,
            y: f64::NAN,
        }
    }

    /// Both coordinates are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// The visible extent of a diagram in plot coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotBounds {
    /// Left edge
    pub x_min: f64,
    /// Right edge
    pub x_max: f64,
    /// Bottom edge
    pub y_min: f64,
    /// Top edge
    pub y_max: f64,
}

impl PlotBounds {
    /// The point is inside the bounds, edges included.
    #[inline]
    pub fn contains(&self, pnt: PlotPoint) -> bool {
        pnt.x >= self.x_min && pnt.x <= self.x_max && pnt.y >= self.y_min && pnt.y <= self.y_max
    }
}

/// The skew-T / log-p coordinate transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkewTransform {
    skew_slope: f64,
}

impl Default for SkewTransform {
    fn default() -> Self {
        SkewTransform::new(DEFAULT_SKEW_SLOPE)
    }
}

impl SkewTransform {
    /// Create a transform with the given skew slope.
    #[inline]
    pub fn new(skew_slope: f64) -> Self {
        SkewTransform { skew_slope }
    }

    /// The skew slope of this transform.
    #[inline]
    pub fn skew_slope(&self) -> f64 {
        self.skew_slope
    }

    /// The x coordinate of a temperature (K) at a pressure.
    #[inline]
    pub fn x_from_tp(&self, temperature: Kelvin, pressure: HectoPascal) -> f64 {
        temperature.unpack() - self.skew_slope * pressure.unpack().ln()
    }

    /// The y coordinate of a pressure.
    #[inline]
    pub fn y_from_p(&self, pressure: HectoPascal) -> f64 {
        -pressure.unpack().ln()
    }

    /// Temperature (K) at an x coordinate and pressure.
    #[inline]
    pub fn t_from_xp(&self, x: f64, pressure: HectoPascal) -> Kelvin {
        Kelvin(x + self.skew_slope * pressure.unpack().ln())
    }

    /// Pressure at a y coordinate.
    #[inline]
    pub fn p_from_y(&self, y: f64) -> HectoPascal {
        HectoPascal((-y).exp())
    }

    /// Map a temperature in Kelvin and a pressure into the plotting plane.
    #[inline]
    pub fn to_plot(&self, temperature: Kelvin, pressure: HectoPascal) -> PlotPoint {
        PlotPoint {
            x: self.x_from_tp(temperature, pressure),
            y: self.y_from_p(pressure),
        }
    }

    /// Map a temperature in Celsius and a pressure into the plotting plane.
    #[inline]
    pub fn thermo_to_plot(&self, temperature: Celsius, pressure: HectoPascal) -> PlotPoint {
        self.to_plot(Kelvin::from(temperature), pressure)
    }

    /// Map a point in the plotting plane back to a temperature in Celsius and a pressure.
    #[inline]
    pub fn to_physical(&self, pnt: PlotPoint) -> (Celsius, HectoPascal) {
        let pressure = self.p_from_y(pnt.y);
        let t_k = self.t_from_xp(pnt.x, pressure);
        (Celsius::from(t_k), pressure)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_data::approx_equal;

    #[test]
    fn test_to_plot() {
        let xform = SkewTransform::default();

        let pnt = xform.to_plot(Kelvin(300.0), HectoPascal(1000.0));
        assert!(approx_equal(pnt.x, 300.0 - 40.0 * 1000.0f64.ln(), 1.0e-12));
        assert!(approx_equal(pnt.y, -(1000.0f64.ln()), 1.0e-12));

        // Lower pressure is higher on the diagram.
        let upper = xform.to_plot(Kelvin(300.0), HectoPascal(500.0));
        assert!(upper.y > pnt.y);
        // and isotherms lean to the right with height.
        assert!(upper.x > pnt.x);
    }

    #[test]
    fn test_round_trip() {
        let xform = SkewTransform::default();

        for &p in &[1100.0, 1000.0, 850.0, 500.0, 250.0, 100.0, 50.0] {
            for &t in &[-100.0, -40.0, 0.0, 25.5, 60.0] {
                let pnt = xform.thermo_to_plot(Celsius(t), HectoPascal(p));
                let (t_back, p_back) = xform.to_physical(pnt);
                assert!(approx_equal(t_back.unpack(), t, 1.0e-9));
                assert!(approx_equal(p_back.unpack(), p, 1.0e-9 * p));

                let again = xform.thermo_to_plot(t_back, p_back);
                assert!(approx_equal(again.x, pnt.x, 1.0e-9));
                assert!(approx_equal(again.y, pnt.y, 1.0e-12));
            }
        }
    }

    #[test]
    fn test_skew_slope() {
        let flat = SkewTransform::new(0.0);
        let pnt = flat.to_plot(Kelvin(250.0), HectoPascal(700.0));
        assert!(approx_equal(pnt.x, 250.0, 1.0e-12));
        assert_eq!(flat.skew_slope(), 0.0);
    }
}
