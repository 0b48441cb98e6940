//! # Rendering
//!
//! Draws a `Figure` with `plotters`: white background, light grid and labels every tick step,
//! thick black axes through the origin, one colour per series and a legend when
//! there is more than one thing to tell apart. PNG goes through a temporary file
//! because the bitmap backend encodes on `present()`; SVG is rendered into a string.
use crate::Utils::config::RenderConfig;
use crate::graphs::curves::{Figure, Point};
use crate::graphs::errors::GraphError;
use log::debug;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use serde::{Deserialize, Serialize};
use std::fs;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ImageFormat {
    #[default]
    Png,
    Svg,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Svg => "image/svg+xml",
        }
    }
}

/// matplotlib's default colour cycle
const PALETTE: [RGBColor; 6] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
];
const GRID: RGBColor = RGBColor(220, 220, 220);

fn color(i: usize) -> RGBColor {
    PALETTE[i % PALETTE.len()]
}

fn render_error<E: std::fmt::Display>(e: E) -> GraphError {
    GraphError::Render(e.to_string())
}

/// Smallest `step * 2^k` that puts at most `max_ticks` grid lines on `span`.
pub fn effective_tick_step(span: f64, step: f64, max_ticks: usize) -> f64 {
    let mut step = step;
    while span / step + 1.0 > max_ticks as f64 {
        step *= 2.0;
    }
    step
}

/// multiples of `step` inside `[lo, hi]`
pub fn tick_values(lo: f64, hi: f64, step: f64) -> Vec<f64> {
    let first = (lo / step).ceil() as i64;
    let last = (hi / step).floor() as i64;
    (first..=last).map(|k| k as f64 * step).collect()
}

/// Tick text with as many decimals as `step` needs, so 0.30000000000000004 prints as 0.3.
pub fn tick_label(value: f64, step: f64) -> String {
    let decimals = (0..=6)
        .find(|&d| {
            let scaled = step * 10f64.powi(d);
            (scaled - scaled.round()).abs() < 1e-9 * scaled.abs().max(1.0)
        })
        .unwrap_or(6) as usize;
    let value = if value.abs() < step * 1e-9 { 0.0 } else { value };
    format!("{:.*}", decimals, value)
}

pub fn render(figure: &Figure, config: &RenderConfig) -> Result<Vec<u8>, GraphError> {
    let size = (config.width, config.height);
    let bytes = match config.format {
        ImageFormat::Png => {
            let file = tempfile::Builder::new().suffix(".png").tempfile()?;
            {
                let root = BitMapBackend::new(file.path(), size).into_drawing_area();
                draw_figure(&root, figure, config)?;
                root.present().map_err(render_error)?;
            }
            fs::read(file.path())?
        }
        ImageFormat::Svg => {
            let mut svg = String::new();
            {
                let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
                draw_figure(&root, figure, config)?;
                root.present().map_err(render_error)?;
            }
            svg.into_bytes()
        }
    };
    debug!(
        "rendered '{}' as {} ({} bytes)",
        figure.title,
        config.format,
        bytes.len()
    );
    Ok(bytes)
}

/// Tick labels under the bottom edge (at `corner.1`) and left of the left edge (at `corner.0`).
fn draw_tick_labels<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    to_pixel: impl Fn(Point) -> (i32, i32),
    (x_ticks, x_step): (&[f64], f64),
    (y_ticks, y_step): (&[f64], f64),
    corner: Point,
    style: &TextStyle,
) -> Result<(), GraphError> {
    let x_style = style.pos(Pos::new(HPos::Center, VPos::Top));
    let y_style = style.pos(Pos::new(HPos::Right, VPos::Center));
    for &x in x_ticks {
        let (px, py) = to_pixel((x, corner.1));
        root.draw(&Text::new(tick_label(x, x_step), (px, py + 5), &x_style))
            .map_err(render_error)?;
    }
    for &y in y_ticks {
        let (px, py) = to_pixel((corner.0, y));
        root.draw(&Text::new(tick_label(y, y_step), (px - 5, py), &y_style))
            .map_err(render_error)?;
    }
    Ok(())
}

fn draw_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    config: &RenderConfig,
) -> Result<(), GraphError> {
    root.fill(&WHITE).map_err(render_error)?;
    let (x0, x1) = figure.x_range;
    let (y0, y1) = figure.y_range;
    let font = config.font_family.as_str();

    let mut builder = ChartBuilder::on(root);
    builder.margin(20);
    if config.draw_labels {
        builder
            .caption(&figure.title, (font, config.title_font_size))
            .x_label_area_size(40)
            .y_label_area_size(50);
    }
    let mut chart = builder
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(render_error)?;

    let x_step = effective_tick_step(x1 - x0, figure.tick_step, config.max_ticks);
    let y_step = effective_tick_step(y1 - y0, figure.tick_step, config.max_ticks);
    let x_ticks = tick_values(x0, x1, x_step);
    let y_ticks = tick_values(y0, y1, y_step);

    if config.draw_labels {
        // plotters picks its own label positions, so only the axis names come from the mesh
        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(0)
            .y_labels(0)
            .x_desc("x")
            .y_desc("y")
            .axis_desc_style((font, config.label_font_size))
            .draw()
            .map_err(render_error)?;

        let style = TextStyle::from((font, config.label_font_size));
        draw_tick_labels(
            root,
            |p| chart.backend_coord(&p),
            (x_ticks.as_slice(), x_step),
            (y_ticks.as_slice(), y_step),
            (x0, y0),
            &style,
        )?;
    }

    // grid
    let grid = x_ticks
        .iter()
        .map(|&x| vec![(x, y0), (x, y1)])
        .chain(y_ticks.iter().map(|&y| vec![(x0, y), (x1, y)]));
    chart
        .draw_series(grid.map(|line| PathElement::new(line, GRID.stroke_width(1))))
        .map_err(render_error)?;

    // axes through the origin
    let axis_style = BLACK.stroke_width(config.axis_width);
    let mut axes: Vec<Vec<Point>> = Vec::new();
    if y0 <= 0.0 && 0.0 <= y1 {
        axes.push(vec![(x0, 0.0), (x1, 0.0)]);
    }
    if x0 <= 0.0 && 0.0 <= x1 {
        axes.push(vec![(0.0, y0), (0.0, y1)]);
    }
    chart
        .draw_series(axes.into_iter().map(|line| PathElement::new(line, axis_style)))
        .map_err(render_error)?;

    let with_legend =
        config.draw_labels && (figure.series.len() > 1 || !figure.fills.is_empty());

    for fill in &figure.fills {
        let fill_style = color(fill.color_of).mix(0.3).filled();
        let drawn = chart
            .draw_series(std::iter::once(Polygon::new(fill.polygon.clone(), fill_style)))
            .map_err(render_error)?;
        if with_legend {
            drawn.label(fill.label.as_str()).legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 20, y + 5)], fill_style)
            });
        }
    }

    for (i, series) in figure.series.iter().enumerate() {
        let line_style = color(i).stroke_width(config.line_width);
        let drawn = chart
            .draw_series(
                series
                    .segments
                    .iter()
                    .map(|segment| PathElement::new(segment.clone(), line_style)),
            )
            .map_err(render_error)?;
        if with_legend {
            drawn.label(series.label.as_str()).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], line_style)
            });
        }
    }

    if with_legend {
        chart
            .configure_series_labels()
            .label_font((font, config.label_font_size))
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(render_error)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphs::curves::build_figure;
    use crate::graphs::graph_task::{GraphTask, GraphType};

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn quiet_config() -> RenderConfig {
        RenderConfig {
            width: 200,
            height: 160,
            samples: 200,
            draw_labels: false,
            ..RenderConfig::default()
        }
    }

    #[test]
    fn test_effective_tick_step() {
        assert_eq!(effective_tick_step(20.0, 1.0, 40), 1.0);
        assert_eq!(effective_tick_step(200.0, 1.0, 40), 8.0);
        assert_eq!(effective_tick_step(1.0, 0.1, 40), 0.1);
    }

    #[test]
    fn test_tick_values() {
        assert_eq!(tick_values(-2.5, 2.5, 1.0), vec![-2.0, -1.0, 0.0, 1.0, 2.0]);
        assert_eq!(tick_values(0.0, 4.0, 2.0), vec![0.0, 2.0, 4.0]);
    }

    #[test]
    fn test_tick_label() {
        assert_eq!(tick_label(3.0, 1.0), "3");
        assert_eq!(tick_label(0.1 + 0.2, 0.1), "0.3");
        assert_eq!(tick_label(-1e-17, 0.1), "0.0");
        assert_eq!(tick_label(-0.75, 0.25), "-0.75");
        assert_eq!(tick_label(16.0, 8.0), "16");
    }

    #[test]
    fn test_labels_follow_tick_step() {
        let (x_lo, x_hi) = (-3.0, 3.0);
        let x_step = effective_tick_step(x_hi - x_lo, 0.5, 10);
        assert_eq!(x_step, 1.0);
        let x_ticks = tick_values(x_lo, x_hi, x_step);
        let y_ticks = tick_values(-1.0, 1.0, 0.25);
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (300, 200)).into_drawing_area();
            // 40 px per x unit, 80 px per y unit, origin at (150, 100)
            let to_pixel = |(x, y): Point| ((150.0 + 40.0 * x) as i32, (100.0 - 80.0 * y) as i32);
            let style = TextStyle::from(("sans-serif", 12.0));
            draw_tick_labels(
                &root,
                to_pixel,
                (x_ticks.as_slice(), x_step),
                (y_ticks.as_slice(), 0.25),
                (x_lo, -1.0),
                &style,
            )
            .unwrap();
            root.present().unwrap();
        }
        for label in ["-3", "-2", "-1", "0", "1", "2", "3", "-0.75", "0.00", "0.50", "1.00"] {
            assert!(svg.contains(&format!(">\n{}\n</text>", label)), "missing {}", label);
        }
        // the x label for 1 sits under x = 1, the y label for 0.5 left of y = 0.5
        assert!(svg.contains(r#"x="190" y="185""#));
        assert!(svg.contains(r#"x="25" y="60""#));
        assert!(!svg.contains(">\n2.5\n</text>"));
    }

    #[test]
    fn test_render_png() {
        let task = GraphTask::new(GraphType::Linear, "y = 2x + 3");
        let config = quiet_config();
        let figure = build_figure(&task, &config).unwrap();
        let bytes = render(&figure, &config).unwrap();
        assert_eq!(bytes[..8], PNG_SIGNATURE);
    }

    #[test]
    fn test_render_svg_with_fill() {
        let mut task = GraphTask::new(GraphType::Integral, "x^2");
        task.area = Some([0.0, 2.0]);
        let config = RenderConfig {
            format: ImageFormat::Svg,
            ..quiet_config()
        };
        let figure = build_figure(&task, &config).unwrap();
        let bytes = render(&figure, &config).unwrap();
        let svg = String::from_utf8(bytes).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("polygon") || svg.contains("path"));
    }

    #[test]
    fn test_format_names() {
        assert_eq!(ImageFormat::Png.to_string(), "png");
        assert_eq!("SVG".parse::<ImageFormat>().unwrap(), ImageFormat::Svg);
        assert_eq!(ImageFormat::Svg.mime(), "image/svg+xml");
    }
}
