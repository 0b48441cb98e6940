//! # Sampling
//!
//! Turns a `GraphTask` into a `Figure`: a title, the visible window and a list of
//! already sampled and clipped polylines. Rendering never evaluates functions.
//!
//! Curves are broken into segments at non-finite samples and at poles (the
//! asymptotes of `tan x` or `1/x`): a jump across the whole window whose midpoint
//! value falls outside the jump. Steep but continuous curves stay in one piece, and
//! every segment is clipped to the window with interpolated boundary points.

use crate::Utils::config::RenderConfig;
use crate::graphs::errors::GraphError;
use crate::graphs::graph_task::{GraphTask, GraphType, MAX_SAMPLES};
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_integration::quad_fn;
use crate::symbolic::utils::{cumulative_trapezoid, linspace, nearest_index};
use log::{debug, info, warn};
use std::f64::consts::PI;

/// Gauss-Legendre degree for definite integrals
const QUAD_DEGREE: usize = 32;

pub type Point = (f64, f64);

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub segments: Vec<Vec<Point>>,
}

/// closed polygon filled with the colour of series `color_of`
#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    pub label: String,
    pub polygon: Vec<Point>,
    pub color_of: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: String,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub series: Vec<Series>,
    pub fills: Vec<Fill>,
    pub tick_step: f64,
}

impl Figure {
    /// number of points left after clipping
    pub fn sampled_points(&self) -> usize {
        self.series
            .iter()
            .flat_map(|s| s.segments.iter())
            .map(|seg| seg.len())
            .sum()
    }
}

pub fn build_figure(task: &GraphTask, config: &RenderConfig) -> Result<Figure, GraphError> {
    task.validate()?;
    let samples = task.samples.unwrap_or(config.samples).clamp(2, MAX_SAMPLES);
    let x_range = (task.x_min, task.x_max);
    let y_range = (task.y_min, task.y_max);
    let xs = linspace(task.x_min, task.x_max, samples);
    info!(
        "building {} graph '{}' on [{}, {}] x [{}, {}] with {} samples",
        task.graph_type, task.equation, task.x_min, task.x_max, task.y_min, task.y_max, samples
    );

    let mut figure = Figure {
        title: String::new(),
        x_range,
        y_range,
        series: Vec::new(),
        fills: Vec::new(),
        tick_step: task.tick_step,
    };

    match task.graph_type {
        GraphType::Linear => {
            let eq = task.linear_equation();
            let label = eq.to_string();
            let points = xs.iter().map(|&x| (x, eq.eval(x))).collect::<Vec<_>>();
            figure.series.push(Series {
                segments: split_segments(&points, x_range, y_range, None),
                label: label.clone(),
            });
            figure.title = task.title_or(&label);
        }
        GraphType::Polynomial | GraphType::Trigonometric => {
            let expr = task.function_expr()?;
            let label = function_label(task, &expr);
            let f = expr.lambdify_x("x")?;
            figure.series.push(sampled_series(&label, &f, &xs, x_range, y_range));
            figure.title = task.title_or(&label);
        }
        GraphType::Derivative => {
            let expr = task.function_expr()?;
            let derivative = expr.diff("x").simplify();
            let label = function_label(task, &expr);
            if task.show_original {
                let f = expr.lambdify_x("x")?;
                figure.series.push(sampled_series(&label, &f, &xs, x_range, y_range));
            }
            let df = derivative.lambdify_x("x")?;
            let df_label = format!("f'(x) = {}", derivative);
            figure.series.push(sampled_series(&df_label, &df, &xs, x_range, y_range));
            figure.title = task.title_or(&df_label);
        }
        GraphType::Integral => integral_figure(task, &xs, &mut figure)?,
        GraphType::Circle => {
            let [h, k] = task.center;
            let r = task.radius;
            let points = arc_points(task.center, r, 0.0, 2.0 * PI, samples);
            let label = format!("(x - {})^2 + (y - {})^2 = {}^2", h, k, r);
            let (x_range, y_range) = equal_aspect(x_range, y_range, config.width, config.height);
            figure.x_range = x_range;
            figure.y_range = y_range;
            figure.series.push(Series {
                segments: split_segments(&points, x_range, y_range, None),
                label: label.clone(),
            });
            figure.title = task.title_or(&label);
        }
        GraphType::Sector => {
            let (start, sweep) = normalize_angles(task.start_angle, task.end_angle);
            let arc = arc_points(task.center, task.radius, start, start + sweep, samples);
            let mut outline = Vec::with_capacity(arc.len() + 2);
            outline.push((task.center[0], task.center[1]));
            outline.extend(arc);
            outline.push((task.center[0], task.center[1]));
            let label = format!(
                "sector r = {}, {}° to {}°",
                task.radius, task.start_angle, task.end_angle
            );
            let (x_range, y_range) = equal_aspect(x_range, y_range, config.width, config.height);
            figure.x_range = x_range;
            figure.y_range = y_range;
            figure.series.push(Series {
                segments: split_segments(&outline, x_range, y_range, None),
                label: label.clone(),
            });
            figure.fills.push(Fill {
                label: format!("area = {:.4}", 0.5 * task.radius.powi(2) * sweep),
                polygon: clamp_polygon(&outline, x_range, y_range),
                color_of: 0,
            });
            figure.title = task.title_or(&label);
        }
    }
    debug!(
        "figure '{}': {} series, {} points after clipping",
        figure.title,
        figure.series.len(),
        figure.sampled_points()
    );
    Ok(figure)
}

/// `F(x) = ∫ f` from `lower_bound` to `x`, symbolically when the antiderivative is in
/// the table, by a running trapezoid anchored with Gauss-Legendre otherwise.
fn integral_figure(task: &GraphTask, xs: &[f64], figure: &mut Figure) -> Result<(), GraphError> {
    let (x_range, y_range) = (figure.x_range, figure.y_range);
    let expr = task.function_expr()?;
    let label = function_label(task, &expr);
    let f = expr.lambdify_x("x")?;
    let ys: Vec<f64> = xs.iter().map(|&x| f(x)).collect();
    if task.show_original {
        let points: Vec<Point> = xs.iter().copied().zip(ys.iter().copied()).collect();
        figure.series.push(Series {
            label: label.clone(),
            segments: split_segments(&points, x_range, y_range, Some(&f)),
        });
    }

    let lower = task.lower_bound;
    let integral_label = format!("F(x) = ∫ f dt from {} to x", lower);
    let segments = match expr.integrate("x") {
        Ok(antiderivative) => {
            let definite = (antiderivative.clone()
                - antiderivative.set_variable("x", lower))
            .simplify();
            debug!("F(x) = {}", definite);
            let big_f = definite.lambdify_x("x")?;
            let points: Vec<Point> = xs.iter().map(|&x| (x, big_f(x))).collect();
            split_segments(&points, x_range, y_range, Some(&big_f))
        }
        Err(e) => {
            debug!("{}, integrating numerically", e);
            let k = nearest_index(xs, lower);
            let anchor = quad_fn(&f, lower, xs[k], QUAD_DEGREE)?;
            let big_f = cumulative_trapezoid(xs, &ys, k, anchor);
            let points: Vec<Point> = xs.iter().copied().zip(big_f).collect();
            // a running sum has no poles, only non-finite samples break it
            split_segments(&points, x_range, y_range, None)
        }
    };
    figure.series.push(Series {
        label: integral_label.clone(),
        segments,
    });

    if let Some([a, b]) = task.area {
        let value = quad_fn(&f, a, b, QUAD_DEGREE)?;
        info!("∫ f dx over [{}, {}] = {}", a, b, value);
        let n = xs.len().max(2);
        let mut polygon: Vec<Point> = linspace(a, b, n).into_iter().map(|x| (x, f(x))).collect();
        if polygon.iter().any(|(_, y)| !y.is_finite()) {
            warn!("f is not finite on [{}, {}], the area is not shaded", a, b);
        } else {
            polygon.push((b, 0.0));
            polygon.push((a, 0.0));
            figure.fills.push(Fill {
                label: format!("∫ f dx from {} to {} = {:.4}", a, b, value),
                polygon: clamp_polygon(&polygon, x_range, y_range),
                color_of: 0,
            });
        }
    }
    figure.title = task.title_or(&integral_label);
    Ok(())
}

/// the equation as typed, or `y = <expression>` when it was built from coefficients
fn function_label(task: &GraphTask, expr: &Expr) -> String {
    let equation = task.equation.trim();
    if equation.is_empty() {
        format!("y = {}", expr.simplify())
    } else if equation.contains('=') {
        equation.to_string()
    } else {
        format!("y = {}", equation)
    }
}

fn sampled_series(
    label: &str,
    f: &dyn Fn(f64) -> f64,
    xs: &[f64],
    x_range: (f64, f64),
    y_range: (f64, f64),
) -> Series {
    let points: Vec<Point> = xs.iter().map(|&x| (x, f(x))).collect();
    Series {
        label: label.to_string(),
        segments: split_segments(&points, x_range, y_range, Some(f)),
    }
}

/// points on the circle arc from `from` to `to` radians
pub fn arc_points(center: [f64; 2], radius: f64, from: f64, to: f64, n: usize) -> Vec<Point> {
    linspace(from, to, n.max(2))
        .into_iter()
        .map(|t| (center[0] + radius * t.cos(), center[1] + radius * t.sin()))
        .collect()
}

/// start angle and counterclockwise sweep in radians; equal angles give a full circle
pub fn normalize_angles(start_deg: f64, end_deg: f64) -> (f64, f64) {
    let mut sweep = (end_deg - start_deg).rem_euclid(360.0);
    if sweep == 0.0 {
        sweep = 360.0;
    }
    (start_deg.to_radians(), sweep.to_radians())
}

/// Widens the shorter range so one x unit and one y unit take the same number of pixels.
pub fn equal_aspect(
    x_range: (f64, f64),
    y_range: (f64, f64),
    width: u32,
    height: u32,
) -> ((f64, f64), (f64, f64)) {
    let (w, h) = (width.max(1) as f64, height.max(1) as f64);
    let x_per_px = (x_range.1 - x_range.0) / w;
    let y_per_px = (y_range.1 - y_range.0) / h;
    if x_per_px > y_per_px {
        let half = 0.5 * x_per_px * h;
        let mid = 0.5 * (y_range.0 + y_range.1);
        (x_range, (mid - half, mid + half))
    } else {
        let half = 0.5 * y_per_px * w;
        let mid = 0.5 * (x_range.0 + x_range.1);
        ((mid - half, mid + half), y_range)
    }
}

fn clamp_polygon(points: &[Point], x_range: (f64, f64), y_range: (f64, f64)) -> Vec<Point> {
    points
        .iter()
        .map(|&(x, y)| (x.clamp(x_range.0, x_range.1), y.clamp(y_range.0, y_range.1)))
        .collect()
}

/// Liang-Barsky clipping of the segment `p -> q` to the window.
/// Returns the visible part and its parameters `t0 <= t1` on `[0, 1]`.
pub fn clip_segment(
    p: Point,
    q: Point,
    x_range: (f64, f64),
    y_range: (f64, f64),
) -> Option<(Point, Point, f64, f64)> {
    let (dx, dy) = (q.0 - p.0, q.1 - p.1);
    let checks = [
        (-dx, p.0 - x_range.0),
        (dx, x_range.1 - p.0),
        (-dy, p.1 - y_range.0),
        (dy, y_range.1 - p.1),
    ];
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (pk, qk) in checks {
        if pk == 0.0 {
            if qk < 0.0 {
                return None;
            }
        } else {
            let t = qk / pk;
            if pk < 0.0 {
                t0 = t0.max(t);
            } else {
                t1 = t1.min(t);
            }
        }
    }
    if t0 > t1 {
        return None;
    }
    let at = |t: f64| {
        if t == 0.0 {
            p
        } else if t == 1.0 {
            q
        } else {
            // snap to the edge, interpolation may overshoot by an ulp
            (
                (p.0 + t * dx).clamp(x_range.0, x_range.1),
                (p.1 + t * dy).clamp(y_range.0, y_range.1),
            )
        }
    };
    Some((at(t0), at(t1), t0, t1))
}

/// Splits a sampled curve into drawable polylines inside the window.
///
/// `f` is the sampled function when the curve may have poles. A jump across the
/// whole window is only broken when `f` confirms a pole between the two samples;
/// without `f` the curve is continuous and steep pieces are kept.
pub fn split_segments(
    points: &[Point],
    x_range: (f64, f64),
    y_range: (f64, f64),
    f: Option<&dyn Fn(f64) -> f64>,
) -> Vec<Vec<Point>> {
    let y_span = y_range.1 - y_range.0;
    let mut segments = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    let mut dropped = 0usize;

    fn flush(current: &mut Vec<Point>, segments: &mut Vec<Vec<Point>>) {
        if current.len() >= 2 {
            segments.push(std::mem::take(current));
        } else {
            current.clear();
        }
    }

    for pair in points.windows(2) {
        let (p, q) = (pair[0], pair[1]);
        let finite = p.0.is_finite() && p.1.is_finite() && q.0.is_finite() && q.1.is_finite();
        if !finite {
            if !(q.0.is_finite() && q.1.is_finite()) {
                dropped += 1;
            }
            flush(&mut current, &mut segments);
            continue;
        }
        // a jump taller than the window between neighbours is an asymptote, not a line
        if (q.1 - p.1).abs() > y_span && crosses_window(p.1, q.1, y_range) && has_pole(f, p, q) {
            flush(&mut current, &mut segments);
            continue;
        }
        match clip_segment(p, q, x_range, y_range) {
            None => flush(&mut current, &mut segments),
            Some((a, b, t0, t1)) => {
                if t0 > 0.0 || current.is_empty() {
                    flush(&mut current, &mut segments);
                    current.push(a);
                }
                current.push(b);
                if t1 < 1.0 {
                    flush(&mut current, &mut segments);
                }
            }
        }
    }
    flush(&mut current, &mut segments);
    if dropped > 0 {
        warn!("{} samples are not finite and were skipped", dropped);
    }
    segments
}

/// A continuous function takes a value between `p.1` and `q.1` somewhere on `[p.0, q.0]`;
/// a midpoint value outside that interval (or not finite) means the jump is a pole.
fn has_pole(f: Option<&dyn Fn(f64) -> f64>, p: Point, q: Point) -> bool {
    let Some(f) = f else {
        return false;
    };
    let mid = f(0.5 * (p.0 + q.0));
    !mid.is_finite() || mid < p.1.min(q.1) || mid > p.1.max(q.1)
}

/// both ends outside the window on opposite sides
fn crosses_window(y0: f64, y1: f64, y_range: (f64, f64)) -> bool {
    (y0 < y_range.0 && y1 > y_range.1) || (y0 > y_range.1 && y1 < y_range.0)
}
