//! Draw a sounding on a skew-T log-p diagram.
//!
//! A [`SkewTDiagram`] is built from a [`DiagramConfig`] and owns the reference isopleths computed
//! for it, so one diagram can draw any number of soundings without recomputing the background.
//!
//! ```rust
//! use skewt_analysis::{
//!     diagram::{Canvas, SkewTDiagram, SvgCanvas},
//!     DiagramConfig, ReferenceConfig,
//! };
//! # use skewt_analysis::doctest::make_test_sounding;
//!
//! let reference = ReferenceConfig::default()
//!     .with_pressure_step(10.0)
//!     .with_theta_ep_grid_step(1.0);
//! let diagram = SkewTDiagram::new(DiagramConfig::default().with_reference(reference));
//!
//! let snd = make_test_sounding();
//! let mut canvas = SvgCanvas::new(400, 400);
//! diagram.draw(&snd, &mut canvas);
//!
//! assert!(canvas.to_svg().contains("<polyline"));
//! assert!(canvas.format_coord(-40.0, -6.0).is_some());
//! ```
use crate::{
    config::DiagramConfig,
    isopleths::{build_reference_layers, IsoplethFamilies, IsoplethKind},
    sounding::Sounding,
    transform::{PlotPoint, SkewTransform},
    validity::ValidityMask,
};
use itertools::izip;
use metfor::{Celsius, HectoPascal, Quantity};
use strum::IntoEnumIterator;
use tracing::debug;

pub use self::canvas::{Canvas, CoordinateFormatter, LineStyle, Tick};
pub use self::svg::SvgCanvas;

/// A skew-T diagram with its reference layers.
#[derive(Debug, Clone)]
pub struct SkewTDiagram {
    config: DiagramConfig,
    layers: IsoplethFamilies,
}

impl SkewTDiagram {
    /// Build the reference layers for a configuration.
    pub fn new(config: DiagramConfig) -> Self {
        let layers = build_reference_layers(&config.reference);
        SkewTDiagram { config, layers }
    }

    /// The configuration this diagram was built with.
    #[inline]
    pub fn config(&self) -> &DiagramConfig {
        &self.config
    }

    /// The reference isopleths.
    #[inline]
    pub fn layers(&self) -> &IsoplethFamilies {
        &self.layers
    }

    /// The coordinate transform of this diagram.
    #[inline]
    pub fn transform(&self) -> SkewTransform {
        self.config.reference.transform()
    }

    /// The configured title, or one made from the station and valid time of the sounding.
    pub fn title_for(&self, snd: &Sounding) -> String {
        if let Some(ref title) = self.config.title {
            return title.clone();
        }

        let mut title = "Sounding".to_owned();
        if let Some(stn) = snd.station_info().station_id() {
            title.push(' ');
            title.push_str(stn);
        }
        if let Some(vt) = snd.valid_time() {
            title.push(' ');
            title.push_str(&vt.format("%m/%d/%Y %HZ").to_string());
        }
        title
    }

    /// Validity mask for a sounding, or one that accepts everything if masking is turned off.
    pub fn mask_for(&self, snd: &Sounding) -> ValidityMask {
        if self.config.apply_validity_mask {
            ValidityMask::new(snd, &self.config.valid_ranges)
        } else {
            ValidityMask::all_valid(snd.len())
        }
    }

    /// The observed temperature and dew point curves in plot coordinates, one point per level.
    ///
    /// Masked levels are [`PlotPoint::missing`] so the line breaks there instead of bridging the
    /// gap.
    pub fn observed_curves(&self, snd: &Sounding) -> (Vec<PlotPoint>, Vec<PlotPoint>) {
        let xform = self.transform();
        let mask = self.mask_for(snd);

        let to_plot = |good: bool, t: Celsius, p: HectoPascal| {
            let pnt = xform.thermo_to_plot(t, p);
            if good && pnt.is_finite() {
                pnt
            } else {
                PlotPoint::missing()
            }
        };

        let temperature: Vec<PlotPoint> = izip!(
            snd.pressure_profile(),
            snd.temperature_profile(),
            mask.temperature_flags()
        )
        .map(|(&p, &t, good)| to_plot(good, t, p))
        .collect();

        let dew_point: Vec<PlotPoint> = izip!(
            snd.pressure_profile(),
            snd.dew_point_profile(),
            mask.dew_point_flags()
        )
        .map(|(&p, &td, good)| to_plot(good, td, p))
        .collect();

        debug!(
            levels = snd.len(),
            temperature_points = temperature.iter().filter(|p| p.is_finite()).count(),
            dew_point_points = dew_point.iter().filter(|p| p.is_finite()).count(),
            "observed curves"
        );

        (temperature, dew_point)
    }

    /// Pressure ticks at each isobar and temperature ticks where each isotherm crosses the bottom
    /// edge.
    pub fn ticks(&self) -> (Vec<Tick>, Vec<Tick>) {
        let reference = &self.config.reference;
        let xform = self.transform();
        let bounds = reference.bounds();

        let x_ticks = reference
            .isotherm_levels
            .iter()
            .map(|&t| Tick {
                position: xform.thermo_to_plot(t, reference.p_bottom).x,
                label: format!("{:.0}", t.unpack()),
            })
            .filter(|tick| tick.position >= bounds.x_min && tick.position <= bounds.x_max)
            .collect();

        let y_ticks = reference
            .isobar_levels
            .iter()
            .map(|&p| Tick {
                position: xform.y_from_p(p),
                label: format!("{:.0}", p.unpack()),
            })
            .collect();

        (x_ticks, y_ticks)
    }

    /// Draw the reference layers and a sounding. Layers go down in `IsoplethKind` order and the
    /// observed dew point and temperature go on top.
    pub fn draw<C: Canvas + ?Sized>(&self, snd: &Sounding, canvas: &mut C) {
        let cfg = &self.config;
        let colors = &cfg.colors;

        canvas.set_axis_limits(cfg.reference.bounds());
        canvas.set_title(&self.title_for(snd));
        canvas.set_labels(&cfg.x_label, &cfg.y_label);
        let (x_ticks, y_ticks) = self.ticks();
        canvas.set_ticks(&x_ticks, &y_ticks);

        for kind in IsoplethKind::iter() {
            let family = self.layers.family(kind);
            let color = match kind {
                IsoplethKind::Isobar => colors.isobars,
                IsoplethKind::Isotherm => colors.isotherms,
                IsoplethKind::DryAdiabat => colors.dry_adiabats,
                IsoplethKind::MixingRatio => colors.mixing_ratios,
                IsoplethKind::MoistAdiabat => colors.moist_adiabats,
            };

            if kind == IsoplethKind::MoistAdiabat {
                let levels: Vec<f64> = cfg
                    .reference
                    .theta_ep_levels
                    .iter()
                    .map(|lvl| lvl.unpack())
                    .collect();
                canvas.draw_contour_set(
                    &family.curves,
                    &levels,
                    &[color],
                    cfg.reference_line_width,
                );
            } else {
                let style = LineStyle::new(color, cfg.reference_line_width);
                for curve in &family.curves {
                    canvas.draw_line(&curve.points, style);
                }
            }
        }

        let (temperature, dew_point) = self.observed_curves(snd);
        canvas.draw_line(
            &dew_point,
            LineStyle::new(colors.dew_point, cfg.observed_line_width),
        );
        canvas.draw_line(
            &temperature,
            LineStyle::new(colors.temperature, cfg.observed_line_width),
        );

        let xform = self.transform();
        canvas.set_coordinate_formatter(Box::new(move |x: f64, y: f64| {
            format_coord(&xform, x, y)
        }));
    }

    /// Draw a sounding on a new SVG canvas the size in the configuration.
    pub fn render(&self, snd: &Sounding) -> SvgCanvas {
        let mut canvas = SvgCanvas::new(self.config.width, self.config.height)
            .with_text_color(self.config.colors.text);
        self.draw(snd, &mut canvas);
        canvas
    }
}

/// Readout of the temperature and pressure at a point in the plotting plane.
pub fn format_coord(xform: &SkewTransform, x: f64, y: f64) -> String {
    let (t, p) = xform.to_physical(PlotPoint::new(x, y));
    format!("{:5.1} C, {:5.1} mb", t.unpack(), p.unpack())
}

mod canvas;
mod svg;

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        config::Rgb,
        reader::parse_spc,
        sounding::StationInfo,
        test_data::coarse_reference_config,
        transform::PlotBounds,
    };
    use chrono::NaiveDate;

    #[derive(Default)]
    struct Recorder {
        bounds: Option<PlotBounds>,
        title: String,
        lines: Vec<(usize, Rgb)>,
        formatter: Option<CoordinateFormatter>,
    }

    impl Canvas for Recorder {
        fn set_axis_limits(&mut self, bounds: PlotBounds) {
            self.bounds = Some(bounds);
        }

        fn set_title(&mut self, title: &str) {
            self.title = title.to_owned();
        }

        fn set_labels(&mut self, _x_label: &str, _y_label: &str) {}

        fn set_ticks(&mut self, _x_ticks: &[Tick], _y_ticks: &[Tick]) {}

        fn draw_line(&mut self, points: &[PlotPoint], style: LineStyle) {
            self.lines.push((points.len(), style.color));
        }

        fn set_coordinate_formatter(&mut self, formatter: CoordinateFormatter) {
            self.formatter = Some(formatter);
        }

        fn format_coord(&self, x: f64, y: f64) -> Option<String> {
            self.formatter.as_ref().map(|f| f(x, y))
        }
    }

    fn make_diagram() -> SkewTDiagram {
        SkewTDiagram::new(DiagramConfig::default().with_reference(coarse_reference_config()))
    }

    fn make_sounding() -> Sounding {
        parse_spc(
            " 1000.00,  112.00, -9999.00, -9999.00, -9999.00, -9999.00
               993.00,  196.00,    24.20,    16.20,   155.00,    11.00
               850.00, 1530.00,    14.60,     8.60,   215.00,    29.00
               700.00, 3150.00,     6.00, -9999.00,   240.00,    35.00
               500.00, 5850.00,   -10.00,   -30.00,   250.00,    45.00",
            0,
        )
        .unwrap()
        .with_station_info(StationInfo::new().with_station("FWD".to_owned()))
        .with_valid_time(
            NaiveDate::from_ymd_opt(2014, 10, 14)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .unwrap(),
        )
    }

    #[test]
    fn test_title() {
        let diagram = make_diagram();
        let snd = make_sounding();
        assert_eq!(diagram.title_for(&snd), "Sounding FWD 10/14/2014 00Z");

        assert_eq!(diagram.title_for(&Sounding::new()), "Sounding");

        let diagram = SkewTDiagram::new(
            DiagramConfig::default()
                .with_reference(coarse_reference_config())
                .with_title("My sounding".to_owned()),
        );
        assert_eq!(diagram.title_for(&snd), "My sounding");
    }

    #[test]
    fn test_observed_curves_masked() {
        let diagram = make_diagram();
        let snd = make_sounding();

        let (t, td) = diagram.observed_curves(&snd);
        assert_eq!(t.len(), 5);
        assert_eq!(td.len(), 5);
        assert!(!t[0].is_finite());
        assert_eq!(t.iter().filter(|p| p.is_finite()).count(), 4);
        assert_eq!(td.iter().filter(|p| p.is_finite()).count(), 3);

        let xform = diagram.transform();
        let (t1, p1) = xform.to_physical(t[1]);
        assert!((t1.unpack() - 24.2).abs() < 1.0e-9);
        assert!((p1.unpack() - 993.0).abs() < 1.0e-9);
    }

    #[test]
    fn test_masked_level_breaks_line() {
        let diagram = make_diagram();
        let snd = make_sounding();

        // The 700 hPa dew point is missing between two good levels.
        let (_, td) = diagram.observed_curves(&snd);
        assert!(td[2].is_finite());
        assert!(!td[3].is_finite());
        assert!(td[4].is_finite());

        let mut canvas = SvgCanvas::new(400, 400);
        canvas.set_axis_limits(diagram.config().reference.bounds());
        canvas.draw_line(&td, LineStyle::new(Rgb(0.0, 1.0, 0.0), 1.0));
        let svg = canvas.to_svg();

        // Two good points below the gap make a line, the single point above it does not.
        assert_eq!(svg.matches("<polyline").count(), 1);
        let points = svg
            .split(r#"points=""#)
            .nth(1)
            .and_then(|rest| rest.split('"').next())
            .unwrap();
        assert_eq!(points.split_whitespace().count(), 2);
    }

    #[test]
    fn test_observed_curves_unmasked() {
        let diagram = SkewTDiagram::new(
            DiagramConfig::default()
                .with_reference(coarse_reference_config())
                .with_validity_mask(false),
        );
        let snd = make_sounding();

        let (t, td) = diagram.observed_curves(&snd);
        assert!(t.iter().all(PlotPoint::is_finite));
        assert!(td.iter().all(PlotPoint::is_finite));
    }

    #[test]
    fn test_draw_order() {
        let diagram = make_diagram();
        let snd = make_sounding();
        let colors = diagram.config().colors;

        let mut canvas = Recorder::default();
        diagram.draw(&snd, &mut canvas);

        assert_eq!(canvas.title, "Sounding FWD 10/14/2014 00Z");
        assert_eq!(canvas.bounds, Some(diagram.config().reference.bounds()));

        let n = canvas.lines.len();
        assert!(n > 2);
        assert_eq!(canvas.lines[n - 1], (5, colors.temperature));
        assert_eq!(canvas.lines[n - 2], (5, colors.dew_point));
        assert_eq!(canvas.lines[0].1, colors.isobars);

        // Background layers come in order
        let layer_rank = |c: Rgb| {
            [
                colors.isobars,
                colors.isotherms,
                colors.dry_adiabats,
                colors.mixing_ratios,
                colors.moist_adiabats,
            ]
            .iter()
            .position(|&x| x == c)
        };
        let ranks: Vec<usize> = canvas.lines[..n - 2]
            .iter()
            .filter_map(|&(_, c)| layer_rank(c))
            .collect();
        assert_eq!(ranks.len(), n - 2);
        assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_format_coord() {
        let diagram = make_diagram();
        let snd = make_sounding();
        let mut canvas = Recorder::default();
        diagram.draw(&snd, &mut canvas);

        let xform = diagram.transform();
        let pnt = xform.thermo_to_plot(Celsius(20.0), HectoPascal(850.0));
        assert_eq!(
            canvas.format_coord(pnt.x, pnt.y).as_deref(),
            Some(" 20.0 C, 850.0 mb")
        );
        assert_eq!(format_coord(&xform, pnt.x, pnt.y), " 20.0 C, 850.0 mb");
    }

    #[test]
    fn test_ticks() {
        let diagram = make_diagram();
        let (x_ticks, y_ticks) = diagram.ticks();

        assert_eq!(y_ticks.len(), 18);
        assert_eq!(y_ticks[0].label, "1000");

        // -40 to 40 cross the bottom edge between -40 C and 50 C
        let labels: Vec<&str> = x_ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels.first(), Some(&"-40"));
        assert_eq!(labels.last(), Some(&"40"));
        assert_eq!(labels.len(), 9);
    }

    #[test]
    fn test_render_svg() {
        let diagram = make_diagram();
        let snd = make_sounding();
        let canvas = diagram.render(&snd);

        assert_eq!(canvas.width(), 800);
        let svg = canvas.to_svg();
        assert!(svg.contains("Sounding FWD 10/14/2014 00Z"));
        assert!(svg.contains(&diagram.config().colors.temperature.to_hex()));
    }
}
