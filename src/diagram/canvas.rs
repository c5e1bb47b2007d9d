use crate::{
    config::Rgb,
    isopleths::Curve,
    transform::{PlotBounds, PlotPoint},
};

/// How to stroke a line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    /// Stroke color.
    pub color: Rgb,
    /// Stroke width in pixels.
    pub width: f64,
}

impl LineStyle {
    /// Create a new style.
    #[inline]
    pub fn new(color: Rgb, width: f64) -> Self {
        LineStyle { color, width }
    }
}

/// A labeled tick mark along an axis, `position` is in plot coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Where along the axis the tick goes.
    pub position: f64,
    /// Text next to the tick.
    pub label: String,
}

/// Turns a position in plot coordinates into a readout for the user.
pub type CoordinateFormatter = Box<dyn Fn(f64, f64) -> String>;

/// A 2D drawing surface in plot coordinates.
///
/// Implementations decide how plot coordinates map to the output, everything passed in is in the
/// skewed plotting plane.
pub trait Canvas {
    /// Set the visible extent of the plot.
    fn set_axis_limits(&mut self, bounds: PlotBounds);

    /// Set the title shown above the plot.
    fn set_title(&mut self, title: &str);

    /// Set the axis labels.
    fn set_labels(&mut self, x_label: &str, y_label: &str);

    /// Set the tick marks along the bottom and left edges.
    fn set_ticks(&mut self, x_ticks: &[Tick], y_ticks: &[Tick]);

    /// Draw a polyline.
    fn draw_line(&mut self, points: &[PlotPoint], style: LineStyle);

    /// Draw contour lines, coloring each one by the position of its level in `levels`. Colors are
    /// reused in order if there are fewer colors than levels.
    fn draw_contour_set(&mut self, curves: &[Curve], levels: &[f64], colors: &[Rgb], width: f64) {
        if colors.is_empty() {
            return;
        }

        for curve in curves {
            let idx = levels
                .iter()
                .position(|&lvl| (lvl - curve.label).abs() <= 1.0e-9 * lvl.abs().max(1.0))
                .unwrap_or(0);
            let color = colors[idx % colors.len()];
            self.draw_line(&curve.points, LineStyle::new(color, width));
        }
    }

    /// Register the callback used by `format_coord`.
    fn set_coordinate_formatter(&mut self, formatter: CoordinateFormatter);

    /// Readout for a position in plot coordinates, `None` if no formatter is registered.
    fn format_coord(&self, x: f64, y: f64) -> Option<String>;
}
