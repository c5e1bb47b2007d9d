//! Reference isopleths drawn behind an observed sounding on a skew-T diagram.
//!
//! Everything is computed by [`build_reference_layers`] from a [`ReferenceConfig`]. Nothing is
//! cached between calls, each diagram owns the families it was built with.
use crate::{
    config::ReferenceConfig,
    contour::{isolines, GridPoint, ScalarGrid},
    met_formulas::{self, P0},
    transform::{PlotPoint, SkewTransform},
};
use metfor::{Celsius, HectoPascal, Kelvin, Quantity};
use optional::Optioned;
use strum_macros::{Display, EnumIter};
use tracing::{debug, warn};

/// The kinds of reference lines, in the order they are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum IsoplethKind {
    /// Lines of constant pressure.
    #[strum(serialize = "isobars")]
    Isobar,
    /// Lines of constant temperature.
    #[strum(serialize = "isotherms")]
    Isotherm,
    /// Lines of constant potential temperature.
    #[strum(serialize = "dry adiabats")]
    DryAdiabat,
    /// Lines of constant saturation mixing ratio.
    #[strum(serialize = "mixing ratio lines")]
    MixingRatio,
    /// Lines of constant saturated equivalent potential temperature.
    #[strum(serialize = "moist adiabats")]
    MoistAdiabat,
}

/// One line in a family. `label` is the fixed value along the line in the units of the family,
/// hPa for isobars, Kelvin for temperatures, and kg/kg for mixing ratios.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    /// Value held constant along the curve.
    pub label: f64,
    /// The curve in plot coordinates.
    pub points: Vec<PlotPoint>,
}

/// A set of curves of the same kind.
#[derive(Debug, Clone, PartialEq)]
pub struct IsoplethFamily {
    /// What kind of lines these are.
    pub kind: IsoplethKind,
    /// The lines.
    pub curves: Vec<Curve>,
}

impl IsoplethFamily {
    fn new(kind: IsoplethKind, curves: Vec<Curve>) -> Self {
        IsoplethFamily { kind, curves }
    }
}

/// All the reference layers of a diagram.
#[derive(Debug, Clone)]
pub struct IsoplethFamilies {
    /// Horizontal lines of constant pressure.
    pub isobars: IsoplethFamily,
    /// Skewed lines of constant temperature.
    pub isotherms: IsoplethFamily,
    /// Lines of constant potential temperature.
    pub dry_adiabats: IsoplethFamily,
    /// Lines of constant saturation mixing ratio.
    pub mixing_ratios: IsoplethFamily,
    /// Contours of the saturated equivalent potential temperature field.
    pub moist_adiabats: IsoplethFamily,
    /// The field the moist adiabats were contoured from.
    pub theta_ep_field: ThetaEpField,
}

impl IsoplethFamilies {
    /// Get a family by kind.
    pub fn family(&self, kind: IsoplethKind) -> &IsoplethFamily {
        match kind {
            IsoplethKind::Isobar => &self.isobars,
            IsoplethKind::Isotherm => &self.isotherms,
            IsoplethKind::DryAdiabat => &self.dry_adiabats,
            IsoplethKind::MixingRatio => &self.mixing_ratios,
            IsoplethKind::MoistAdiabat => &self.moist_adiabats,
        }
    }
}

/// Saturated pseudo-equivalent potential temperature on a regular (T, p) grid.
///
/// Rows are pressures and columns are temperatures. Grid nodes where the formulas fail are missing.
#[derive(Debug, Clone)]
pub struct ThetaEpField {
    temperatures: Vec<Celsius>,
    pressures: Vec<HectoPascal>,
    values: Vec<Optioned<Kelvin>>,
}

impl ThetaEpField {
    /// Evaluate the field at every combination of temperature and pressure.
    pub fn compute(temperatures: Vec<Celsius>, pressures: Vec<HectoPascal>) -> Self {
        let values: Vec<Optioned<Kelvin>> = pressures
            .iter()
            .flat_map(|&p| temperatures.iter().map(move |&t| (t, p)))
            .map(|(t, p)| Optioned::from(met_formulas::theta_ep_field(t, p, P0).ok()))
            .collect();

        let missing = values.iter().filter(|v| v.is_none()).count();
        if missing > 0 {
            warn!(missing, nodes = values.len(), "theta-ep grid nodes out of formula domain");
        }

        ThetaEpField {
            temperatures,
            pressures,
            values,
        }
    }

    /// Temperatures of the grid columns.
    #[inline]
    pub fn temperatures(&self) -> &[Celsius] {
        &self.temperatures
    }

    /// Pressures of the grid rows.
    #[inline]
    pub fn pressures(&self) -> &[HectoPascal] {
        &self.pressures
    }

    /// Value at temperature column `i` and pressure row `j`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Optioned<Kelvin> {
        if i < self.temperatures.len() && j < self.pressures.len() {
            self.values[j * self.temperatures.len() + i]
        } else {
            optional::none()
        }
    }

    /// Contour the field at each level and map the lines to plot coordinates.
    pub fn contours(&self, levels: &[Kelvin], xform: &SkewTransform) -> Vec<Curve> {
        let grid = match ScalarGrid::new(
            self.temperatures.len(),
            self.pressures.len(),
            self.values
                .iter()
                .map(|v| Optioned::from(v.into_option().map(|k| k.unpack())))
                .collect(),
        ) {
            Some(grid) => grid,
            None => return vec![],
        };

        levels
            .iter()
            .flat_map(|level| isolines(&grid, level.unpack()))
            .map(|line| Curve {
                label: line.level,
                points: line
                    .points
                    .iter()
                    .map(|&pnt| self.grid_to_plot(pnt, xform))
                    .collect(),
            })
            .collect()
    }

    fn grid_to_plot(&self, pnt: GridPoint, xform: &SkewTransform) -> PlotPoint {
        let t = interpolate_index(&self.temperatures, pnt.i);
        let p = interpolate_index(&self.pressures, pnt.j);
        xform.thermo_to_plot(Celsius(t), HectoPascal(p))
    }
}

fn interpolate_index<Q: Quantity + Copy>(vals: &[Q], idx: f64) -> f64 {
    let last = vals.len().saturating_sub(1);
    let i0 = (idx.floor().max(0.0) as usize).min(last);
    let i1 = (i0 + 1).min(last);
    let frac = idx - i0 as f64;

    let v0 = vals[i0].unpack();
    let v1 = vals[i1].unpack();
    v0 + frac * (v1 - v0)
}

/// Build every reference isopleth family for a diagram.
pub fn build_reference_layers(config: &ReferenceConfig) -> IsoplethFamilies {
    let xform = config.transform();
    let bounds = config.bounds();
    let sweep = config.pressure_sweep();

    let isobars = config
        .isobar_levels
        .iter()
        .map(|&p| {
            let y = xform.y_from_p(p);
            Curve {
                label: p.unpack(),
                points: vec![
                    PlotPoint::new(bounds.x_min, y),
                    PlotPoint::new(bounds.x_max, y),
                ],
            }
        })
        .collect();

    let isotherms = config
        .isotherm_levels
        .iter()
        .map(|&t| {
            let t_k = Kelvin::from(t);
            Curve {
                label: t_k.unpack(),
                points: sweep.iter().map(|&p| xform.to_plot(t_k, p)).collect(),
            }
        })
        .collect();

    let dry_adiabats = config
        .theta_levels
        .iter()
        .map(|&theta| Curve {
            label: theta.unpack(),
            points: sweep
                .iter()
                .filter_map(|&p| {
                    met_formulas::dry_adiabat_temperature(theta, p, P0)
                        .ok()
                        .map(|t| xform.to_plot(t, p))
                })
                .collect(),
        })
        .collect();

    let mixing_ratios = config
        .mixing_ratios
        .iter()
        .map(|&w| Curve {
            label: w,
            points: sweep
                .iter()
                .take_while(|&&p| p >= config.mixing_ratio_top)
                .filter_map(|&p| {
                    met_formulas::mixing_ratio_line_temperature(p, w)
                        .ok()
                        .map(|t| xform.thermo_to_plot(t, p))
                })
                .collect(),
        })
        .collect();

    let theta_ep_field = ThetaEpField::compute(config.theta_ep_grid_temperatures(), sweep);
    let moist_adiabats = theta_ep_field.contours(&config.theta_ep_levels, &xform);

    let families = IsoplethFamilies {
        isobars: IsoplethFamily::new(IsoplethKind::Isobar, isobars),
        isotherms: IsoplethFamily::new(IsoplethKind::Isotherm, isotherms),
        dry_adiabats: IsoplethFamily::new(IsoplethKind::DryAdiabat, dry_adiabats),
        mixing_ratios: IsoplethFamily::new(IsoplethKind::MixingRatio, mixing_ratios),
        moist_adiabats: IsoplethFamily::new(IsoplethKind::MoistAdiabat, moist_adiabats),
        theta_ep_field,
    };

    debug!(
        isobars = families.isobars.curves.len(),
        isotherms = families.isotherms.curves.len(),
        dry_adiabats = families.dry_adiabats.curves.len(),
        mixing_ratios = families.mixing_ratios.curves.len(),
        moist_adiabats = families.moist_adiabats.curves.len(),
        "built reference layers"
    );

    families
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_data::{approx_equal, coarse_reference_config};
    use strum::IntoEnumIterator;

    #[test]
    fn test_kind_order() {
        let kinds: Vec<IsoplethKind> = IsoplethKind::iter().collect();
        assert_eq!(kinds.first(), Some(&IsoplethKind::Isobar));
        assert_eq!(kinds.last(), Some(&IsoplethKind::MoistAdiabat));
        assert_eq!(IsoplethKind::DryAdiabat.to_string(), "dry adiabats");
    }

    #[test]
    fn test_family_sizes() {
        let config = coarse_reference_config();
        let families = build_reference_layers(&config);

        assert_eq!(families.isobars.curves.len(), config.isobar_levels.len());
        assert_eq!(families.isotherms.curves.len(), config.isotherm_levels.len());
        assert_eq!(families.dry_adiabats.curves.len(), config.theta_levels.len());
        assert_eq!(families.mixing_ratios.curves.len(), config.mixing_ratios.len());
        assert!(!families.moist_adiabats.curves.is_empty());

        for kind in IsoplethKind::iter() {
            assert_eq!(families.family(kind).kind, kind);
        }
    }

    #[test]
    fn test_isobars_are_horizontal() {
        let config = coarse_reference_config();
        let families = build_reference_layers(&config);
        let bounds = config.bounds();

        for curve in &families.isobars.curves {
            assert_eq!(curve.points.len(), 2);
            assert!(approx_equal(curve.points[0].y, curve.points[1].y, 1.0e-12));
            assert!(approx_equal(curve.points[0].x, bounds.x_min, 1.0e-12));
            assert!(approx_equal(curve.points[1].x, bounds.x_max, 1.0e-12));
        }
    }

    #[test]
    fn test_isotherms_read_back() {
        let config = coarse_reference_config();
        let xform = config.transform();
        let families = build_reference_layers(&config);

        for (curve, t) in families
            .isotherms
            .curves
            .iter()
            .zip(&config.isotherm_levels)
        {
            assert_eq!(curve.points.len(), config.pressure_sweep().len());
            for &pnt in &curve.points {
                let (t_back, _) = xform.to_physical(pnt);
                assert!(approx_equal(t_back.unpack(), t.unpack(), 1.0e-9));
            }
        }
    }

    #[test]
    fn test_dry_adiabats_conserve_theta() {
        let config = coarse_reference_config();
        let xform = config.transform();
        let families = build_reference_layers(&config);

        for curve in &families.dry_adiabats.curves {
            for &pnt in &curve.points {
                let (t, p) = xform.to_physical(pnt);
                let theta =
                    met_formulas::potential_temperature(Kelvin::from(t), p, P0)
                        .unwrap();
                assert!(approx_equal(theta.unpack(), curve.label, 1.0e-6));
            }
        }
    }

    #[test]
    fn test_mixing_ratio_lines_stop_at_top() {
        let config = coarse_reference_config();
        let xform = config.transform();
        let families = build_reference_layers(&config);

        for curve in &families.mixing_ratios.curves {
            assert!(!curve.points.is_empty());
            for &pnt in &curve.points {
                let (t, p) = xform.to_physical(pnt);
                assert!(p.unpack() >= config.mixing_ratio_top.unpack() - 1.0e-6);

                let w = met_formulas::saturation_mixing_ratio(p, t).unwrap();
                assert!(approx_equal(w, curve.label, 1.0e-5));
            }
        }
    }

    #[test]
    fn test_moist_adiabats_follow_theta_ep() {
        let config = coarse_reference_config();
        let xform = config.transform();
        let families = build_reference_layers(&config);

        for curve in &families.moist_adiabats.curves {
            assert!(config
                .theta_ep_levels
                .iter()
                .any(|lvl| approx_equal(lvl.unpack(), curve.label, 1.0e-9)));

            for &pnt in &curve.points {
                let (t, p) = xform.to_physical(pnt);
                let theta_ep = met_formulas::theta_ep_field(t, p, P0).unwrap();
                // Linear interpolation inside grid cells, so only approximately on the level.
                assert!(
                    (theta_ep.unpack() - curve.label).abs() < 2.0,
                    "{} vs {}",
                    theta_ep.unpack(),
                    curve.label
                );
            }
        }
    }

    #[test]
    fn test_theta_ep_field() {
        let temps = vec![Celsius(-10.0), Celsius(0.0), Celsius(10.0)];
        let press = vec![HectoPascal(1000.0), HectoPascal(500.0)];
        let field = ThetaEpField::compute(temps, press);

        assert_eq!(field.temperatures().len(), 3);
        assert_eq!(field.pressures().len(), 2);

        let expected =
            met_formulas::theta_ep_field(Celsius(0.0), HectoPascal(500.0), P0).unwrap();
        assert!(approx_equal(field.get(1, 1).unpack().unpack(), expected.unpack(), 1.0e-12));

        // Warmer is higher theta-e
        assert!(field.get(2, 0).unpack() > field.get(0, 0).unpack());

        assert!(field.get(3, 0).is_none());
    }

    #[test]
    fn test_theta_ep_field_domain_errors() {
        // 40 C air can't be saturated at 50 hPa
        let field = ThetaEpField::compute(vec![Celsius(40.0)], vec![HectoPascal(50.0)]);
        assert!(field.get(0, 0).is_none());
    }
}
