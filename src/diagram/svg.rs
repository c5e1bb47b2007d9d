//! A `Canvas` that writes an SVG document, with PNG export through `resvg`.
use super::canvas::{Canvas, CoordinateFormatter, LineStyle, Tick};
use crate::{
    config::Rgb,
    error::{AnalysisError, Result},
    transform::{PlotBounds, PlotPoint},
};
use std::{path::Path, sync::Arc};
use tracing::debug;

const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 60.0;
const TICK_LENGTH: f64 = 5.0;
const FONT_SIZE: f64 = 12.0;

/// Draws into an in-memory SVG document.
pub struct SvgCanvas {
    width: u32,
    height: u32,
    bounds: Option<PlotBounds>,
    title: Option<String>,
    x_label: String,
    y_label: String,
    x_ticks: Vec<Tick>,
    y_ticks: Vec<Tick>,
    lines: Vec<(Vec<PlotPoint>, LineStyle)>,
    text_color: Rgb,
    formatter: Option<CoordinateFormatter>,
}

impl std::fmt::Debug for SvgCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SvgCanvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bounds", &self.bounds)
            .field("title", &self.title)
            .field("lines", &self.lines.len())
            .field("formatter", &self.formatter.is_some())
            .finish()
    }
}

impl SvgCanvas {
    /// Create an empty canvas with the size in pixels.
    pub fn new(width: u32, height: u32) -> Self {
        SvgCanvas {
            width,
            height,
            bounds: None,
            title: None,
            x_label: String::new(),
            y_label: String::new(),
            x_ticks: vec![],
            y_ticks: vec![],
            lines: vec![],
            text_color: Rgb(0.0, 0.0, 0.0),
            formatter: None,
        }
    }

    /// Builder method for the color of the frame, ticks, and text.
    pub fn with_text_color(self, text_color: Rgb) -> Self {
        SvgCanvas { text_color, ..self }
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of lines drawn so far.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// The axis limits, either as set or the extent of everything drawn.
    pub fn axis_limits(&self) -> Option<PlotBounds> {
        self.bounds.or_else(|| self.data_extent())
    }

    fn data_extent(&self) -> Option<PlotBounds> {
        let mut pnts = self
            .lines
            .iter()
            .flat_map(|(pnts, _)| pnts.iter())
            .filter(|p| p.is_finite());

        let first = pnts.next()?;
        let init = PlotBounds {
            x_min: first.x,
            x_max: first.x,
            y_min: first.y,
            y_max: first.y,
        };

        Some(pnts.fold(init, |acc, p| PlotBounds {
            x_min: acc.x_min.min(p.x),
            x_max: acc.x_max.max(p.x),
            y_min: acc.y_min.min(p.y),
            y_max: acc.y_max.max(p.y),
        }))
    }

    /// Serialize everything drawn so far as an SVG document.
    pub fn to_svg(&self) -> String {
        let (w, h) = (f64::from(self.width), f64::from(self.height));
        let area = PixelArea::new(
            self.axis_limits().unwrap_or(PlotBounds {
                x_min: 0.0,
                x_max: 1.0,
                y_min: 0.0,
                y_max: 1.0,
            }),
            w,
            h,
        );
        let text_color = self.text_color.to_hex();

        let mut svg = String::with_capacity(4096 + self.lines.len() * 1024);
        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        ));
        svg.push('\n');
        svg.push_str(r#"<rect x="0" y="0" width="100%" height="100%" fill="white"/>"#);
        svg.push('\n');
        svg.push_str(&format!(
            r#"<defs><clipPath id="plot-area"><rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}"/></clipPath></defs>"#,
            area.left,
            area.top,
            area.width(),
            area.height()
        ));
        svg.push('\n');

        svg.push_str(r#"<g clip-path="url(#plot-area)">"#);
        svg.push('\n');
        for (pnts, style) in &self.lines {
            for run in finite_runs(pnts) {
                let coords: Vec<String> = run
                    .iter()
                    .map(|&p| {
                        let (px, py) = area.to_pixel(p);
                        format!("{:.2},{:.2}", px, py)
                    })
                    .collect();
                svg.push_str(&format!(
                    r#"<polyline fill="none" stroke="{}" stroke-width="{}" stroke-linejoin="round" points="{}"/>"#,
                    style.color.to_hex(),
                    style.width,
                    coords.join(" ")
                ));
                svg.push('\n');
            }
        }
        svg.push_str("</g>\n");

        svg.push_str(&format!(
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="none" stroke="{}" stroke-width="1"/>"#,
            area.left,
            area.top,
            area.width(),
            area.height(),
            text_color
        ));
        svg.push('\n');

        let bottom = area.bottom();
        for tick in self
            .x_ticks
            .iter()
            .filter(|t| t.position >= area.bounds.x_min && t.position <= area.bounds.x_max)
        {
            let (px, _) = area.to_pixel(PlotPoint::new(tick.position, area.bounds.y_min));
            svg.push_str(&format!(
                r#"<line x1="{px:.2}" y1="{y0:.2}" x2="{px:.2}" y2="{y1:.2}" stroke="{c}" stroke-width="1"/>"#,
                px = px,
                y0 = bottom,
                y1 = bottom + TICK_LENGTH,
                c = text_color
            ));
            svg.push_str(&text_element(
                px,
                bottom + TICK_LENGTH + FONT_SIZE + 2.0,
                "middle",
                &text_color,
                &tick.label,
                None,
            ));
        }

        for tick in self
            .y_ticks
            .iter()
            .filter(|t| t.position >= area.bounds.y_min && t.position <= area.bounds.y_max)
        {
            let (_, py) = area.to_pixel(PlotPoint::new(area.bounds.x_min, tick.position));
            svg.push_str(&format!(
                r#"<line x1="{x0:.2}" y1="{py:.2}" x2="{x1:.2}" y2="{py:.2}" stroke="{c}" stroke-width="1"/>"#,
                x0 = area.left - TICK_LENGTH,
                x1 = area.left,
                py = py,
                c = text_color
            ));
            svg.push_str(&text_element(
                area.left - TICK_LENGTH - 3.0,
                py + FONT_SIZE / 3.0,
                "end",
                &text_color,
                &tick.label,
                None,
            ));
        }

        if !self.x_label.is_empty() {
            svg.push_str(&text_element(
                area.left + area.width() / 2.0,
                h - FONT_SIZE,
                "middle",
                &text_color,
                &self.x_label,
                None,
            ));
        }

        if !self.y_label.is_empty() {
            svg.push_str(&text_element(
                FONT_SIZE * 1.5,
                area.top + area.height() / 2.0,
                "middle",
                &text_color,
                &self.y_label,
                Some(-90.0),
            ));
        }

        if let Some(ref title) = self.title {
            svg.push_str(&text_element(
                w / 2.0,
                MARGIN_TOP / 2.0 + FONT_SIZE / 2.0,
                "middle",
                &text_color,
                title,
                None,
            ));
        }

        svg.push_str("</svg>\n");
        svg
    }

    /// Rasterize the document.
    pub fn render_png(&self) -> Result<Vec<u8>> {
        let svg = self.to_svg();

        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();
        let mut opt = usvg::Options::default();
        opt.fontdb = Arc::new(fontdb);

        let tree = usvg::Tree::from_str(&svg, &opt)
            .map_err(|err| AnalysisError::Render(format!("invalid svg: {}", err)))?;

        let mut pixmap = tiny_skia::Pixmap::new(self.width, self.height).ok_or_else(|| {
            AnalysisError::Render(format!("invalid image size {}x{}", self.width, self.height))
        })?;

        resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());

        pixmap
            .encode_png()
            .map_err(|err| AnalysisError::Render(format!("png encoding failed: {}", err)))
    }

    /// Write the document to a file, a `.png` extension rasterizes it and `.svg` writes it as is.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let bytes = match ext.as_deref() {
            Some("png") => self.render_png()?,
            Some("svg") => self.to_svg().into_bytes(),
            _ => {
                return Err(AnalysisError::Render(format!(
                    "unsupported output format: {}",
                    path.display()
                )))
            }
        };

        std::fs::write(path, &bytes)?;
        debug!(path = %path.display(), bytes = bytes.len(), "saved diagram");
        Ok(())
    }
}

impl Canvas for SvgCanvas {
    fn set_axis_limits(&mut self, bounds: PlotBounds) {
        self.bounds = Some(bounds);
    }

    fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_owned());
    }

    fn set_labels(&mut self, x_label: &str, y_label: &str) {
        self.x_label = x_label.to_owned();
        self.y_label = y_label.to_owned();
    }

    fn set_ticks(&mut self, x_ticks: &[Tick], y_ticks: &[Tick]) {
        self.x_ticks = x_ticks.to_vec();
        self.y_ticks = y_ticks.to_vec();
    }

    fn draw_line(&mut self, points: &[PlotPoint], style: LineStyle) {
        if points.len() >= 2 {
            self.lines.push((points.to_vec(), style));
        }
    }

    fn set_coordinate_formatter(&mut self, formatter: CoordinateFormatter) {
        self.formatter = Some(formatter);
    }

    fn format_coord(&self, x: f64, y: f64) -> Option<String> {
        self.formatter.as_ref().map(|f| f(x, y))
    }
}

// Maps plot coordinates into the pixel rectangle inside the margins. Larger y is higher up.
struct PixelArea {
    bounds: PlotBounds,
    left: f64,
    top: f64,
    right: f64,
    bottom_edge: f64,
}

impl PixelArea {
    fn new(bounds: PlotBounds, width: f64, height: f64) -> Self {
        PixelArea {
            bounds,
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            right: (width - MARGIN_RIGHT).max(MARGIN_LEFT + 1.0),
            bottom_edge: (height - MARGIN_BOTTOM).max(MARGIN_TOP + 1.0),
        }
    }

    fn width(&self) -> f64 {
        self.right - self.left
    }

    fn height(&self) -> f64 {
        self.bottom_edge - self.top
    }

    fn bottom(&self) -> f64 {
        self.bottom_edge
    }

    fn to_pixel(&self, pnt: PlotPoint) -> (f64, f64) {
        let PlotBounds {
            x_min,
            x_max,
            y_min,
            y_max,
        } = self.bounds;

        let x_span = if x_max > x_min { x_max - x_min } else { 1.0 };
        let y_span = if y_max > y_min { y_max - y_min } else { 1.0 };

        (
            self.left + (pnt.x - x_min) / x_span * self.width(),
            self.top + (y_max - pnt.y) / y_span * self.height(),
        )
    }
}

// Non-finite points break a line into pieces.
fn finite_runs(pnts: &[PlotPoint]) -> impl Iterator<Item = &[PlotPoint]> {
    pnts.split(|p| !p.is_finite()).filter(|run| run.len() >= 2)
}

fn text_element(
    x: f64,
    y: f64,
    anchor: &str,
    color: &str,
    text: &str,
    rotate: Option<f64>,
) -> String {
    let transform = rotate
        .map(|deg| format!(r#" transform="rotate({} {:.2} {:.2})""#, deg, x, y))
        .unwrap_or_default();

    format!(
        r#"<text x="{:.2}" y="{:.2}" font-family="sans-serif" font-size="{}" text-anchor="{}" fill="{}"{}>{}</text>"#,
        x,
        y,
        FONT_SIZE,
        anchor,
        color,
        transform,
        escape_xml(text)
    ) + "\n"
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
