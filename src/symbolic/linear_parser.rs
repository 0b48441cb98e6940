//! # Linear equation parser
//!
//! Extracts the coefficients of `y = a·x + b` (or `y = |a·x + b|`) from strings
//! such as `"2x + 3"`, `"y = -x"`, `"|x - 1|"` or `"x + x + 1"`.
//!
//! Two ways in:
//! - `parse_linear` - strict term-by-term reader built on a regex tokenizer;
//! - `LinearEquation::from_expr` - symbolic fallback for anything the generic
//!   parser understands and that is linear in `x`, e.g. `"2(x + 1)"` or `"3 - x/2"`.
//!
//! `str::parse::<LinearEquation>()` tries the first and then the second.
//!
//! # Example
//! ```
//! use RustedGraphs::symbolic::linear_parser::{parse_linear, LinearEquation};
//! let eq = parse_linear("y = |2x - 4|").unwrap();
//! assert_eq!((eq.a, eq.b, eq.absolute), (2.0, -4.0, true));
//! assert_eq!(eq.eval(0.0), 4.0);
//! let eq: LinearEquation = "2(x + 1)".parse().unwrap();
//! assert_eq!(eq.to_string(), "y = 2x + 2");
//! ```

use crate::symbolic::parse_expr::{ParseError, strip_lhs};
use crate::symbolic::symbolic_engine::Expr;
use log::debug;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// one signed term: `+2.5x`, `-x`, `3*x`, `+7`, `1e-3x`
static TERM: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<sign>[+-])?(?:(?P<num>(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)(?P<var>\*?x)?|(?P<bare>x))",
    )
});

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearEquation {
    /// slope
    pub a: f64,
    /// intercept
    pub b: f64,
    /// `y = |a·x + b|`
    pub absolute: bool,
}

impl Default for LinearEquation {
    fn default() -> Self {
        LinearEquation {
            a: 1.0,
            b: 0.0,
            absolute: false,
        }
    }
}

/// Reads `[y =] [|] term (± term)* [|]` where a term is a number, `x`, or a number times `x`.
pub fn parse_linear(equation: &str) -> Result<LinearEquation, ParseError> {
    let body: String = strip_lhs(equation)?
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if body.is_empty() {
        return Err(ParseError::Empty);
    }
    let not_linear = || ParseError::NotLinear(equation.trim().to_string());

    let bars = body.matches('|').count();
    let (inner, absolute) = match bars {
        0 => (body.as_str(), false),
        2 if body.len() > 2 && body.starts_with('|') && body.ends_with('|') => {
            (&body[1..body.len() - 1], true)
        }
        _ => return Err(not_linear()),
    };
    if inner.is_empty() {
        return Err(ParseError::Empty);
    }

    let term_re = TERM
        .as_ref()
        .map_err(|e| ParseError::InvalidToken(e.to_string()))?;
    let (mut a, mut b) = (0.0, 0.0);
    let mut rest = inner;
    let mut first = true;
    while !rest.is_empty() {
        let caps = term_re.captures(rest).ok_or_else(not_linear)?;
        let sign = match caps.name("sign").map(|m| m.as_str()) {
            Some("-") => -1.0,
            Some(_) => 1.0,
            // terms after the first one must carry their own sign: "2x3" is not "2x + 3"
            None if first => 1.0,
            None => return Err(not_linear()),
        };
        match (caps.name("num"), caps.name("var"), caps.name("bare")) {
            (Some(num), var, _) => {
                let value: f64 = num.as_str().parse().map_err(|_| not_linear())?;
                if var.is_some() {
                    a += sign * value;
                } else {
                    b += sign * value;
                }
            }
            (None, _, Some(_)) => a += sign,
            _ => return Err(not_linear()),
        }
        let matched = caps.get(0).map_or(0, |m| m.end());
        rest = &rest[matched..];
        first = false;
    }
    debug!(
        "linear equation '{}': a = {}, b = {}, absolute = {}",
        equation, a, b, absolute
    );
    Ok(LinearEquation { a, b, absolute })
}

impl LinearEquation {
    pub fn new(a: f64, b: f64) -> Self {
        LinearEquation {
            a,
            b,
            absolute: false,
        }
    }

    /// Symbolic fallback: accepted when the expression depends on `x` only and its
    /// derivative is constant. An outer `|…|` becomes `absolute`.
    pub fn from_expr(expr: &Expr) -> Result<LinearEquation, ParseError> {
        let (inner, absolute) = match expr {
            Expr::Abs(inner) => (inner.as_ref(), true),
            other => (other, false),
        };
        let vars = inner.all_arguments_are_variables();
        if vars.iter().any(|v| v != "x") {
            return Err(ParseError::NotLinear(expr.to_string()));
        }
        match inner.as_linear("x") {
            Some((a, b)) => Ok(LinearEquation { a, b, absolute }),
            None => Err(ParseError::NotLinear(expr.to_string())),
        }
    }

    pub fn eval(&self, x: f64) -> f64 {
        let y = self.a * x + self.b;
        if self.absolute { y.abs() } else { y }
    }

    /// `a*x + b` with zero terms dropped, wrapped in `Abs` when absolute
    pub fn to_expr(&self) -> Expr {
        let x = Expr::Var("x".to_string());
        let linear = match (self.a, self.b) {
            (a, b) if a == 0.0 => Expr::Const(b),
            (a, b) if b == 0.0 => Expr::Const(a) * x,
            (a, b) => Expr::Const(a) * x + Expr::Const(b),
        };
        if self.absolute { linear.abs() } else { linear }
    }

    fn body(&self) -> String {
        let slope = match self.a {
            a if a == 1.0 => "x".to_string(),
            a if a == -1.0 => "-x".to_string(),
            a => format!("{}x", a),
        };
        match (self.a, self.b) {
            (a, b) if a == 0.0 => format!("{}", b),
            (_, b) if b == 0.0 => slope,
            (_, b) if b < 0.0 => format!("{} - {}", slope, -b),
            (_, b) => format!("{} + {}", slope, b),
        }
    }
}

impl fmt::Display for LinearEquation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.absolute {
            write!(f, "y = |{}|", self.body())
        } else {
            write!(f, "y = {}", self.body())
        }
    }
}

impl FromStr for LinearEquation {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match parse_linear(s) {
            Ok(eq) => Ok(eq),
            Err(ParseError::Empty) => Err(ParseError::Empty),
            Err(strict) => {
                debug!("strict linear reader failed ({}), trying the expression parser", strict);
                let expr = Expr::parse_expression(s)?;
                LinearEquation::from_expr(&expr)
            }
        }
    }
}
