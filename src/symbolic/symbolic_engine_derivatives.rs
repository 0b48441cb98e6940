//! # Symbolic Engine Derivatives Module
//!
//! Differentiation and direct evaluation of symbolic expressions.
//!
//! ## Key Methods
//!
//! ### Differentiation
//! - `diff(var: &str)` - Analytical derivative
//! - `n_th_derivative1D()` - Higher-order derivatives
//!
//! ### Function evaluation
//! - `eval_expression()` - Direct evaluation without closure creation
//!
//! ### Numerical Analysis
//! - `compare_num1D()` - Validate 1D derivatives numerically

use crate::symbolic::parse_expr::ParseError;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::utils::{linspace, norm, numerical_derivative};
use std::f64::consts::PI;

impl Expr {
    /// DIFFERENTIATION

    /// Computes the analytical derivative of the expression with respect to a variable.
    ///
    /// Implements the standard differentiation rules:
    /// - Power rule: d/dx(x^n) = n*x^(n-1) (constant exponent)
    /// - General power: d/dx(u^v) = u^v * (v' * ln(u) + v * u'/u)
    /// - Product rule: d/dx(f*g) = f'*g + f*g'
    /// - Quotient rule: d/dx(f/g) = (f'*g - f*g')/g^2
    /// - Chain rule: d/dx(f(g(x))) = f'(g(x))*g'(x)
    ///
    /// # Examples
    /// ```
    /// use RustedGraphs::symbolic::symbolic_engine::Expr;
    /// let f = Expr::parse_expression("x^3").unwrap();
    /// let df = f.diff("x");
    /// assert_eq!(df.eval_expression(vec!["x"], &[2.0]).unwrap(), 12.0);
    /// ```
    pub fn diff(&self, var: &str) -> Expr {
        match self {
            Expr::Var(name) => {
                if name == var {
                    Expr::Const(1.0)
                } else {
                    Expr::Const(0.0)
                }
            }
            Expr::Const(_) => Expr::Const(0.0),
            Expr::Add(lhs, rhs) => Expr::Add(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Sub(lhs, rhs) => Expr::Sub(Box::new(lhs.diff(var)), Box::new(rhs.diff(var))),
            Expr::Mul(lhs, rhs) => Expr::Add(
                Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                Box::new(Expr::Mul(lhs.clone(), Box::new(rhs.diff(var)))),
            ),
            Expr::Div(lhs, rhs) => Expr::Div(
                Box::new(Expr::Sub(
                    Box::new(Expr::Mul(Box::new(lhs.diff(var)), rhs.clone())),
                    Box::new(Expr::Mul(lhs.clone(), Box::new(rhs.diff(var)))),
                )),
                Box::new(Expr::Pow(rhs.clone(), Box::new(Expr::Const(2.0)))),
            ),
            Expr::Pow(base, exp) if !exp.contains_variable(var) => Expr::Mul(
                Box::new(Expr::Mul(
                    exp.clone(),
                    Box::new(Expr::Pow(
                        base.clone(),
                        Box::new(Expr::Sub(exp.clone(), Box::new(Expr::Const(1.0)))),
                    )),
                )),
                Box::new(base.diff(var)),
            ),
            Expr::Pow(base, exp) => Expr::Mul(
                Box::new(self.clone()),
                Box::new(Expr::Add(
                    Box::new(Expr::Mul(Box::new(exp.diff(var)), Box::new(Expr::Ln(base.clone())))),
                    Box::new(Expr::Div(
                        Box::new(Expr::Mul(exp.clone(), Box::new(base.diff(var)))),
                        base.clone(),
                    )),
                )),
            ),
            Expr::Exp(expr) => {
                Expr::Mul(Box::new(Expr::Exp(expr.clone())), Box::new(expr.diff(var)))
            }
            Expr::Ln(expr) => Expr::Div(Box::new(expr.diff(var)), expr.clone()),
            // d|u| = u/|u| * u', undefined at u = 0
            Expr::Abs(expr) => Expr::Mul(
                Box::new(Expr::Div(expr.clone(), Box::new(Expr::Abs(expr.clone())))),
                Box::new(expr.diff(var)),
            ),
            Expr::sin(expr) => {
                Expr::Mul(Box::new(Expr::cos(expr.clone())), Box::new(expr.diff(var)))
            }
            Expr::cos(expr) => Expr::Mul(
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(Expr::sin(expr.clone())),
                )),
                Box::new(expr.diff(var)),
            ),
            Expr::tg(expr) => Expr::Mul(
                Box::new(Expr::Div(
                    Box::new(Expr::Const(1.0)),
                    Box::new(Expr::Pow(
                        Box::new(Expr::cos(expr.clone())),
                        Box::new(Expr::Const(2.0)),
                    )),
                )),
                Box::new(expr.diff(var)),
            ),
            Expr::ctg(expr) => Expr::Mul(
                Box::new(Expr::Div(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(Expr::Pow(
                        Box::new(Expr::sin(expr.clone())),
                        Box::new(Expr::Const(2.0)),
                    )),
                )),
                Box::new(expr.diff(var)),
            ),
            Expr::arcsin(expr) => Expr::Div(
                Box::new(expr.diff(var)),
                Box::new(Expr::Pow(
                    Box::new(Expr::Sub(
                        Box::new(Expr::Const(1.0)),
                        Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                    )),
                    Box::new(Expr::Const(0.5)),
                )),
            ),
            Expr::arccos(expr) => Expr::Div(
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(expr.diff(var)),
                )),
                Box::new(Expr::Pow(
                    Box::new(Expr::Sub(
                        Box::new(Expr::Const(1.0)),
                        Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                    )),
                    Box::new(Expr::Const(0.5)),
                )),
            ),
            Expr::arctg(expr) => Expr::Div(
                Box::new(expr.diff(var)),
                Box::new(Expr::Add(
                    Box::new(Expr::Const(1.0)),
                    Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                )),
            ),
            Expr::arcctg(expr) => Expr::Div(
                Box::new(Expr::Mul(
                    Box::new(Expr::Const(-1.0)),
                    Box::new(expr.diff(var)),
                )),
                Box::new(Expr::Add(
                    Box::new(Expr::Const(1.0)),
                    Box::new(Expr::Pow(expr.clone(), Box::new(Expr::Const(2.0)))),
                )),
            ),
        }
    }

    /// n-th derivative, simplified after every step to keep the tree small
    pub fn n_th_derivative1D(&self, var_name: &str, n: usize) -> Expr {
        let mut expr = self.clone();
        for _ in 0..n {
            expr = expr.diff(var_name).simplify();
        }
        expr
    }

    /// FUNCTION EVALUATION

    /// Evaluates the expression for the given variable values without building a closure.
    /// A variable missing from `vars` is an error; domain violations give `NaN`.
    pub fn eval_expression(&self, vars: Vec<&str>, values: &[f64]) -> Result<f64, ParseError> {
        let value = match self {
            Expr::Var(name) => match vars.iter().position(|v| *v == name.as_str()) {
                Some(i) => values
                    .get(i)
                    .copied()
                    .ok_or_else(|| ParseError::UnknownVariable(name.clone()))?,
                None => return Err(ParseError::UnknownVariable(name.clone())),
            },
            Expr::Const(val) => *val,
            Expr::Add(lhs, rhs) => {
                lhs.eval_expression(vars.clone(), values)? + rhs.eval_expression(vars, values)?
            }
            Expr::Sub(lhs, rhs) => {
                lhs.eval_expression(vars.clone(), values)? - rhs.eval_expression(vars, values)?
            }
            Expr::Mul(lhs, rhs) => {
                lhs.eval_expression(vars.clone(), values)? * rhs.eval_expression(vars, values)?
            }
            Expr::Div(lhs, rhs) => {
                lhs.eval_expression(vars.clone(), values)? / rhs.eval_expression(vars, values)?
            }
            Expr::Pow(base, exp) => base
                .eval_expression(vars.clone(), values)?
                .powf(exp.eval_expression(vars, values)?),
            Expr::Exp(expr) => expr.eval_expression(vars, values)?.exp(),
            Expr::Ln(expr) => expr.eval_expression(vars, values)?.ln(),
            Expr::Abs(expr) => expr.eval_expression(vars, values)?.abs(),
            Expr::sin(expr) => expr.eval_expression(vars, values)?.sin(),
            Expr::cos(expr) => expr.eval_expression(vars, values)?.cos(),
            Expr::tg(expr) => expr.eval_expression(vars, values)?.tan(),
            Expr::ctg(expr) => 1.0 / expr.eval_expression(vars, values)?.tan(),
            Expr::arcsin(expr) => expr.eval_expression(vars, values)?.asin(),
            Expr::arccos(expr) => expr.eval_expression(vars, values)?.acos(),
            Expr::arctg(expr) => expr.eval_expression(vars, values)?.atan(),
            Expr::arcctg(expr) => PI / 2.0 - expr.eval_expression(vars, values)?.atan(),
        };
        Ok(value)
    }

    /// NUMERICAL ANALYSIS

    /// Compares the analytical derivative with a central difference on a grid.
    /// Returns the norm of the difference and whether it is below `max_norm`.
    pub fn compare_num1D(
        &self,
        var: &str,
        start: f64,
        end: f64,
        num_values: usize,
        max_norm: f64,
    ) -> Result<(f64, bool), ParseError> {
        let f = self.lambdify_x(var)?;
        let analytical = self.diff(var).lambdify_x(var)?;
        let grid = linspace(start, end, num_values);
        let numerical = numerical_derivative(&f, &grid, 1e-6);
        let exact: Vec<f64> = grid.iter().map(|&x| analytical(x)).collect();
        let norm_res = norm(&numerical, &exact);
        Ok((norm_res, norm_res < max_norm))
    }
}

impl Expr {
    /// `Some((k, b))` when the expression equals `k*var + b` for every `var`,
    /// decided symbolically through the first derivative.
    ///
    /// # Examples
    /// ```
    /// use RustedGraphs::symbolic::symbolic_engine::Expr;
    /// let f = Expr::parse_expression("3 - 2(x - 1)").unwrap();
    /// assert_eq!(f.as_linear("x"), Some((-2.0, 5.0)));
    /// assert_eq!(Expr::parse_expression("x^2").unwrap().as_linear("x"), None);
    /// ```
    pub fn as_linear(&self, var: &str) -> Option<(f64, f64)> {
        let slope = self.diff(var).simplify();
        if slope.contains_variable(var) {
            return None;
        }
        let k = slope.eval_expression(vec![], &[]).ok()?;
        let b = self.set_variable(var, 0.0).eval_expression(vec![], &[]).ok()?;
        if k.is_finite() && b.is_finite() {
            Some((k, b))
        } else {
            None
        }
    }
}
