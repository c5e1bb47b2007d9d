use metfor::Quantity;
use skewt_analysis::{
    diagram::{Canvas, SkewTDiagram},
    DiagramConfig, PlotPoint, ReferenceConfig, Sounding, ValidRanges, ValidityMask,
};

fn make_diagram(apply_mask: bool) -> SkewTDiagram {
    let reference = ReferenceConfig::default()
        .with_pressure_step(25.0)
        .with_theta_ep_grid_step(1.0);

    SkewTDiagram::new(
        DiagramConfig::default()
            .with_reference(reference)
            .with_validity_mask(apply_mask),
    )
}

pub fn test_masked_curves(snd: &Sounding) {
    let (t, td) = make_diagram(true).observed_curves(snd);
    let mask = ValidityMask::new(snd, &ValidRanges::default());

    assert_eq!(t.len(), snd.len());
    assert_eq!(td.len(), snd.len());
    for (pnt, good) in t.iter().zip(mask.temperature_flags()) {
        assert_eq!(pnt.is_finite(), good);
    }
    for (pnt, good) in td.iter().zip(mask.dew_point_flags()) {
        assert_eq!(pnt.is_finite(), good);
    }

    let finite = |pnts: &[PlotPoint]| pnts.iter().filter(|p| p.is_finite()).count();
    assert!(finite(&t) < snd.len());
    assert!(finite(&td) < finite(&t));

    let (t, td) = make_diagram(false).observed_curves(snd);
    assert_eq!(finite(&t), snd.len());
    assert_eq!(finite(&td), snd.len());
}

pub fn test_readout_matches_observations(snd: &Sounding) {
    let diagram = make_diagram(true);
    let canvas = diagram.render(snd);
    let (t_curve, _) = diagram.observed_curves(snd);

    for (pnt, row) in t_curve.iter().zip(snd.rows()) {
        if !pnt.is_finite() {
            continue;
        }

        let readout = canvas.format_coord(pnt.x, pnt.y).unwrap();
        let expected = format!(
            "{:5.1} C, {:5.1} mb",
            row.temperature.unpack(),
            row.pressure.unpack()
        );
        assert_eq!(readout, expected);
    }
}

pub fn test_svg_document(snd: &Sounding) {
    let diagram = make_diagram(true);
    let svg = diagram.render(snd).to_svg();

    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("Sounding FWD 10/14/2014 00Z"));
    assert!(svg.contains("Pressure (mb)"));
    assert!(svg.contains("Temperature (C)"));

    let colors = diagram.config().colors;
    for color in &[
        colors.isobars,
        colors.isotherms,
        colors.dry_adiabats,
        colors.mixing_ratios,
        colors.moist_adiabats,
        colors.dew_point,
        colors.temperature,
    ] {
        assert!(svg.contains(&color.to_hex()), "missing {}", color.to_hex());
    }

    // Observed curves are the last things drawn inside the plot area.
    let temperature = svg
        .rfind(&format!(r#"stroke="{}""#, colors.temperature.to_hex()))
        .unwrap();
    let dew_point = svg
        .rfind(&format!(r#"stroke="{}""#, colors.dew_point.to_hex()))
        .unwrap();
    let moist = svg
        .rfind(&format!(r#"stroke="{}""#, colors.moist_adiabats.to_hex()))
        .unwrap();
    assert!(moist < dew_point);
    assert!(dew_point < temperature);
}
