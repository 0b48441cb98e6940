//! # Graph request model
//!
//! One `GraphTask` describes one picture. Every field has a default so a request
//! may name only what differs, e.g. `{"graph_type": "linear", "equation": "y = 2x + 3"}`.
//!
//! The task knows how to turn itself into the function to plot:
//! - linear: the equation through the linear parser, the coefficients `a`, `b` when
//!   the equation is empty or not linear;
//! - polynomial, derivative, integral: the equation through the expression parser,
//!   or a polynomial built from the coefficients;
//! - trigonometric: the equation, or `a·f(b·x + c) + d`;
//! - circle and sector are drawn parametrically and have no `y(x)`.

use crate::graphs::errors::GraphError;
use crate::symbolic::linear_parser::LinearEquation;
use crate::symbolic::parse_expr::ParseError;
use crate::symbolic::symbolic_engine::Expr;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum_macros::{Display, EnumIter, EnumString};

/// highest power a `cN` coefficient may name
pub const MAX_POLY_DEGREE: usize = 64;
/// upper bound on samples per curve, for a task and for the render config
pub const MAX_SAMPLES: usize = 1_000_000;

/// index of a `cN` key, an error when N is above `MAX_POLY_DEGREE`, `None` for other keys
fn coefficient_index(key: &str) -> Option<Result<usize, String>> {
    let digits = key.strip_prefix('c')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(match digits.parse::<usize>() {
        Ok(n) if n <= MAX_POLY_DEGREE => Ok(n),
        _ => Err(format!(
            "coefficient {} is above the highest supported degree {}",
            key, MAX_POLY_DEGREE
        )),
    })
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum GraphType {
    #[default]
    Linear,
    Polynomial,
    Trigonometric,
    Derivative,
    Integral,
    Circle,
    Sector,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TrigFunction {
    #[default]
    Sin,
    Cos,
    Tan,
}

impl TrigFunction {
    pub fn apply(&self, arg: Expr) -> Expr {
        match self {
            TrigFunction::Sin => Expr::sin(arg.boxed()),
            TrigFunction::Cos => Expr::cos(arg.boxed()),
            TrigFunction::Tan => Expr::tg(arg.boxed()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphTask {
    pub graph_type: GraphType,
    pub equation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub coefficients: BTreeMap<String, f64>,
    /// trigonometric graphs without an equation
    pub function: TrigFunction,
    /// circle and sector
    pub center: [f64; 2],
    pub radius: f64,
    /// sector, degrees counterclockwise from the positive x axis
    pub start_angle: f64,
    pub end_angle: f64,
    /// integral graphs plot `F(x) = ∫ f` from `lower_bound` to `x`
    pub lower_bound: f64,
    /// integral graphs: shaded definite integral over `[area[0], area[1]]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<[f64; 2]>,
    /// derivative and integral graphs also draw `f` itself
    pub show_original: bool,
    pub tick_step: f64,
    /// overrides the configured number of samples
    #[serde(skip_serializing_if = "Option::is_none")]
    pub samples: Option<usize>,
}

impl Default for GraphTask {
    fn default() -> Self {
        GraphTask {
            graph_type: GraphType::Linear,
            equation: String::new(),
            title: None,
            x_min: -10.0,
            x_max: 10.0,
            y_min: -10.0,
            y_max: 10.0,
            coefficients: BTreeMap::new(),
            function: TrigFunction::Sin,
            center: [0.0, 0.0],
            radius: 1.0,
            start_angle: 0.0,
            end_angle: 90.0,
            lower_bound: 0.0,
            area: None,
            show_original: true,
            tick_step: 1.0,
            samples: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphRequest {
    #[serde(default)]
    pub graphs: Vec<GraphTask>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphResponse {
    pub images: Vec<String>,
}

impl GraphTask {
    pub fn new(graph_type: GraphType, equation: &str) -> Self {
        GraphTask {
            graph_type,
            equation: equation.to_string(),
            ..Default::default()
        }
    }

    pub fn coefficient(&self, name: &str, default: f64) -> f64 {
        self.coefficients.get(name).copied().unwrap_or(default)
    }

    pub fn validate(&self) -> Result<(), GraphError> {
        let numbers = [
            ("x_min", self.x_min),
            ("x_max", self.x_max),
            ("y_min", self.y_min),
            ("y_max", self.y_max),
            ("tick_step", self.tick_step),
            ("radius", self.radius),
            ("start_angle", self.start_angle),
            ("end_angle", self.end_angle),
            ("lower_bound", self.lower_bound),
            ("center[0]", self.center[0]),
            ("center[1]", self.center[1]),
        ];
        if let Some((name, _)) = numbers.iter().find(|(_, v)| !v.is_finite()) {
            return Err(GraphError::Validation(format!("{} must be a finite number", name)));
        }
        if let Some((name, _)) = self.coefficients.iter().find(|(_, v)| !v.is_finite()) {
            return Err(GraphError::Validation(format!(
                "coefficient {} must be a finite number",
                name
            )));
        }
        if self.x_min >= self.x_max {
            return Err(GraphError::Validation(format!(
                "x_min ({}) must be less than x_max ({})",
                self.x_min, self.x_max
            )));
        }
        if self.y_min >= self.y_max {
            return Err(GraphError::Validation(format!(
                "y_min ({}) must be less than y_max ({})",
                self.y_min, self.y_max
            )));
        }
        if self.tick_step <= 0.0 {
            return Err(GraphError::Validation("tick_step must be positive".to_string()));
        }
        if matches!(self.graph_type, GraphType::Circle | GraphType::Sector) && self.radius <= 0.0
        {
            return Err(GraphError::Validation("radius must be positive".to_string()));
        }
        if let Some(n) = self.samples {
            if !(2..=MAX_SAMPLES).contains(&n) {
                return Err(GraphError::Validation(format!(
                    "samples must be between 2 and {}, got {}",
                    MAX_SAMPLES, n
                )));
            }
        }
        for key in self.coefficients.keys() {
            if let Some(Err(e)) = coefficient_index(key) {
                return Err(GraphError::Validation(e));
            }
        }
        if let Some([a, b]) = self.area {
            if !a.is_finite() || !b.is_finite() {
                return Err(GraphError::Validation("area bounds must be finite".to_string()));
            }
        }
        Ok(())
    }

    /// Title of the picture: `title`, else the equation as typed, else `fallback`.
    pub fn title_or(&self, fallback: &str) -> String {
        match &self.title {
            Some(title) if !title.trim().is_empty() => title.clone(),
            _ if !self.equation.trim().is_empty() => self.equation.trim().to_string(),
            _ => fallback.to_string(),
        }
    }

    /// Coefficients of a linear graph. A non-empty equation wins over the coefficients
    /// map; when it is not linear the coefficients are used and a warning is logged.
    pub fn linear_equation(&self) -> LinearEquation {
        let from_coefficients = LinearEquation::new(self.coefficient("a", 1.0), self.coefficient("b", 0.0));
        if self.equation.trim().is_empty() {
            return from_coefficients;
        }
        match self.equation.parse::<LinearEquation>() {
            Ok(eq) => eq,
            Err(e) => {
                warn!(
                    "'{}' is not a linear equation ({}), using coefficients a = {}, b = {}",
                    self.equation, e, from_coefficients.a, from_coefficients.b
                );
                from_coefficients
            }
        }
    }

    /// Polynomial coefficients, lowest degree first.
    ///
    /// `c0, c1, ..., cN` name the coefficient of `x^k` directly. Otherwise the letters
    /// `a, b, c, d` are read highest degree first: `a, b` is `a x + b`, `a, b, c` is
    /// `a x^2 + b x + c`. Without any coefficient the polynomial is `x^2`.
    pub fn polynomial_coefficients(&self) -> Vec<f64> {
        let indexed: Vec<(usize, f64)> = self
            .coefficients
            .iter()
            .filter_map(|(k, v)| match coefficient_index(k) {
                Some(Ok(n)) => Some((n, *v)),
                _ => None,
            })
            .collect();
        if !indexed.is_empty() {
            let degree = indexed.iter().map(|(n, _)| *n).max().unwrap_or(0);
            let mut coeffs = vec![0.0; degree + 1];
            for (n, v) in indexed {
                coeffs[n] = v;
            }
            return coeffs;
        }
        let letters = ["a", "b", "c", "d"];
        match letters.iter().rposition(|l| self.coefficients.contains_key(*l)) {
            Some(last) => letters[..=last]
                .iter()
                .rev()
                .map(|l| self.coefficient(l, 0.0))
                .collect(),
            None => vec![0.0, 0.0, 1.0],
        }
    }

    /// `f(x)` of every graph type that has one.
    pub fn function_expr(&self) -> Result<Expr, GraphError> {
        let equation = self.equation.trim();
        let expr = match self.graph_type {
            GraphType::Linear => self.linear_equation().to_expr(),
            GraphType::Polynomial | GraphType::Derivative | GraphType::Integral => {
                if equation.is_empty() {
                    Expr::polyval(&self.polynomial_coefficients(), "x")
                } else {
                    Expr::parse_expression(equation)?
                }
            }
            GraphType::Trigonometric => {
                if equation.is_empty() {
                    let x = Expr::Var("x".to_string());
                    let arg = Expr::Const(self.coefficient("b", 1.0)) * x
                        + Expr::Const(self.coefficient("c", 0.0));
                    Expr::Const(self.coefficient("a", 1.0)) * self.function.apply(arg.simplify())
                        + Expr::Const(self.coefficient("d", 0.0))
                } else {
                    Expr::parse_expression(equation)?
                }
            }
            GraphType::Circle | GraphType::Sector => {
                return Err(GraphError::Validation(format!(
                    "{} graphs have no function of x",
                    self.graph_type
                )));
            }
        };
        let vars = expr.all_arguments_are_variables();
        if let Some(other) = vars.iter().find(|v| v.as_str() != "x") {
            return Err(ParseError::UnknownVariable(other.clone()).into());
        }
        debug!("graph {}: f(x) = {}", self.graph_type, expr);
        Ok(expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_defaults_from_empty_json() {
        let task: GraphTask = serde_json::from_str("{}").unwrap();
        assert_eq!(task, GraphTask::default());
        assert_eq!(task.graph_type, GraphType::Linear);
        assert_eq!((task.x_min, task.x_max, task.y_min, task.y_max), (-10.0, 10.0, -10.0, 10.0));
        assert!(task.show_original);
    }

    #[test]
    fn test_request_parsing() {
        let json = r#"{"graphs": [
            {"graph_type": "linear", "equation": "y = |x - 1|", "x_min": -5, "x_max": 5},
            {"graph_type": "trigonometric", "function": "cos", "coefficients": {"a": 2}},
            {"graph_type": "circle", "center": [1, -2], "radius": 3}
        ]}"#;
        let request: GraphRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.graphs.len(), 3);
        assert_eq!(request.graphs[0].x_min, -5.0);
        assert_eq!(request.graphs[1].function, TrigFunction::Cos);
        assert_eq!(request.graphs[1].coefficient("a", 1.0), 2.0);
        assert_eq!(request.graphs[2].center, [1.0, -2.0]);
        let empty: GraphRequest = serde_json::from_str("{}").unwrap();
        assert!(empty.graphs.is_empty());
    }

    #[test]
    fn test_unknown_graph_type_is_rejected() {
        assert!(serde_json::from_str::<GraphTask>(r#"{"graph_type": "spiral"}"#).is_err());
    }

    #[test]
    fn test_graph_type_names() {
        let names: Vec<String> = GraphType::iter().map(|t| t.to_string()).collect();
        assert_eq!(
            names,
            vec!["linear", "polynomial", "trigonometric", "derivative", "integral", "circle", "sector"]
        );
        assert_eq!(GraphType::from_str("Sector").unwrap(), GraphType::Sector);
    }

    #[test]
    fn test_validate() {
        assert!(GraphTask::default().validate().is_ok());
        let mut task = GraphTask::default();
        task.x_min = 3.0;
        task.x_max = 3.0;
        assert!(matches!(task.validate(), Err(GraphError::Validation(_))));
        let mut task = GraphTask::new(GraphType::Circle, "");
        task.radius = 0.0;
        assert!(task.validate().is_err());
        let mut task = GraphTask::default();
        task.samples = Some(1);
        assert!(task.validate().is_err());
        let mut task = GraphTask::default();
        task.tick_step = -1.0;
        assert!(task.validate().is_err());
    }

    #[test]
    fn test_linear_equation_wins_over_coefficients() {
        let mut task = GraphTask::new(GraphType::Linear, "y = 2x + 3");
        task.coefficients.insert("a".to_string(), 5.0);
        let eq = task.linear_equation();
        assert_eq!((eq.a, eq.b), (2.0, 3.0));
        // not linear: coefficients are used
        task.equation = "x^2".to_string();
        let eq = task.linear_equation();
        assert_eq!((eq.a, eq.b), (5.0, 0.0));
        // empty: default line y = x
        let eq = GraphTask::default().linear_equation();
        assert_eq!((eq.a, eq.b, eq.absolute), (1.0, 0.0, false));
    }

    #[test]
    fn test_polynomial_coefficients() {
        let mut task = GraphTask::new(GraphType::Polynomial, "");
        assert_eq!(task.polynomial_coefficients(), vec![0.0, 0.0, 1.0]);
        task.coefficients.insert("a".to_string(), 2.0);
        task.coefficients.insert("c".to_string(), -1.0);
        // a x^2 + b x + c with b missing
        assert_eq!(task.polynomial_coefficients(), vec![-1.0, 0.0, 2.0]);
        let mut task = GraphTask::new(GraphType::Polynomial, "");
        task.coefficients.insert("c0".to_string(), 1.0);
        task.coefficients.insert("c3".to_string(), 4.0);
        assert_eq!(task.polynomial_coefficients(), vec![1.0, 0.0, 0.0, 4.0]);
    }

    #[test]
    fn test_huge_coefficient_index_is_rejected() {
        let json = r#"{"graph_type": "polynomial", "coefficients": {"c18446744073709551615": 1}}"#;
        let task: GraphTask = serde_json::from_str(json).unwrap();
        assert!(matches!(task.validate(), Err(GraphError::Validation(_))));
        // ignored rather than allocated when called directly
        assert_eq!(task.polynomial_coefficients(), vec![0.0, 0.0, 1.0]);

        let mut task = GraphTask::new(GraphType::Polynomial, "");
        task.coefficients.insert("c10000000000".to_string(), 1.0);
        assert!(task.validate().is_err());
        task.coefficients.clear();
        task.coefficients.insert(format!("c{}", MAX_POLY_DEGREE), 2.0);
        assert!(task.validate().is_ok());
        assert_eq!(task.polynomial_coefficients().len(), MAX_POLY_DEGREE + 1);
    }

    #[test]
    fn test_samples_upper_bound() {
        let task: GraphTask = serde_json::from_str(r#"{"samples": 10000000000}"#).unwrap();
        assert!(matches!(task.validate(), Err(GraphError::Validation(_))));
        let mut task = GraphTask::default();
        task.samples = Some(MAX_SAMPLES);
        assert!(task.validate().is_ok());
    }

    #[test]
    fn test_function_expr() {
        let task = GraphTask::new(GraphType::Polynomial, "y = x^3 - x");
        let f = task.function_expr().unwrap().lambdify1D().unwrap();
        assert_eq!(f(2.0), 6.0);

        let mut trig = GraphTask::new(GraphType::Trigonometric, "");
        trig.coefficients.insert("a".to_string(), 2.0);
        trig.coefficients.insert("d".to_string(), 1.0);
        let g = trig.function_expr().unwrap().lambdify1D().unwrap();
        assert!((g(std::f64::consts::FRAC_PI_2) - 3.0).abs() < 1e-12);

        let bad = GraphTask::new(GraphType::Polynomial, "x + t");
        assert!(matches!(
            bad.function_expr(),
            Err(GraphError::Parse(ParseError::UnknownVariable(_)))
        ));
        assert!(GraphTask::new(GraphType::Circle, "").function_expr().is_err());
    }

    #[test]
    fn test_title() {
        let task = GraphTask::new(GraphType::Linear, " y = 2x ");
        assert_eq!(task.title_or("fallback"), "y = 2x");
        let mut task = GraphTask::default();
        assert_eq!(task.title_or("fallback"), "fallback");
        task.title = Some("My graph".to_string());
        assert_eq!(task.title_or("fallback"), "My graph");
    }
}
