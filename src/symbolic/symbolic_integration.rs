use crate::symbolic::parse_expr::ParseError;
use crate::symbolic::symbolic_engine::Expr;
use gauss_quad::GaussLegendre;

impl Expr {
    /// SYMBOLIC INTEGRATION

    /// Indefinite integral (without constant of integration) for a small table of forms:
    /// constants, `x^n`, `1/x`, sums, constant multiples and `exp/sin/cos` of a linear argument.
    /// Everything else is reported as `NotIntegrable`; the caller then integrates numerically.
    ///
    /// # Examples
    /// ```
    /// use RustedGraphs::symbolic::symbolic_engine::Expr;
    /// let f = Expr::parse_expression("3x^2 + 1").unwrap();
    /// let big_f = f.integrate("x").unwrap();
    /// let value = big_f.eval_expression(vec!["x"], &[2.0]).unwrap();
    /// assert!((value - 10.0).abs() < 1e-12);
    /// ```
    pub fn integrate(&self, var: &str) -> Result<Expr, ParseError> {
        let x = Expr::Var(var.to_string());
        if !self.contains_variable(var) {
            // ∫ c dx = c*x
            return Ok(self.clone() * x);
        }
        match self {
            // ∫ x dx = x²/2
            Expr::Var(_) => Ok(x.pow(Expr::Const(2.0)) / Expr::Const(2.0)),
            Expr::Add(lhs, rhs) => Ok(lhs.integrate(var)? + rhs.integrate(var)?),
            Expr::Sub(lhs, rhs) => Ok(lhs.integrate(var)? - rhs.integrate(var)?),
            Expr::Mul(lhs, rhs) if !lhs.contains_variable(var) => {
                Ok(lhs.as_ref().clone() * rhs.integrate(var)?)
            }
            Expr::Mul(lhs, rhs) if !rhs.contains_variable(var) => {
                Ok(rhs.as_ref().clone() * lhs.integrate(var)?)
            }
            Expr::Div(lhs, rhs) if !rhs.contains_variable(var) => {
                Ok(lhs.integrate(var)? / rhs.as_ref().clone())
            }
            // ∫ c/(kx+b) dx = c*ln|kx+b|/k
            Expr::Div(lhs, rhs) if !lhs.contains_variable(var) => match rhs.as_linear(var) {
                Some((k, _)) if k != 0.0 => Ok(lhs.as_ref().clone()
                    * Expr::Ln(Box::new(Expr::Abs(rhs.clone())))
                    / Expr::Const(k)),
                _ => Err(ParseError::NotIntegrable(self.to_string())),
            },
            // ∫ (kx+b)^n dx = (kx+b)^(n+1)/((n+1)k), n = -1 gives the logarithm
            Expr::Pow(base, exp) if !exp.contains_variable(var) => {
                let n = exp
                    .eval_expression(vec![], &[])
                    .map_err(|_| ParseError::NotIntegrable(self.to_string()))?;
                match base.as_linear(var) {
                    Some((k, _)) if k != 0.0 && n == -1.0 => {
                        Ok(Expr::Ln(Box::new(Expr::Abs(base.clone()))) / Expr::Const(k))
                    }
                    Some((k, _)) if k != 0.0 => Ok(base.as_ref().clone().pow(Expr::Const(n + 1.0))
                        / Expr::Const((n + 1.0) * k)),
                    _ => Err(ParseError::NotIntegrable(self.to_string())),
                }
            }
            Expr::Exp(inner) => match inner.as_linear(var) {
                Some((k, _)) if k != 0.0 => Ok(self.clone() / Expr::Const(k)),
                _ => Err(ParseError::NotIntegrable(self.to_string())),
            },
            Expr::sin(inner) => match inner.as_linear(var) {
                Some((k, _)) if k != 0.0 => Ok(Expr::cos(inner.clone()) / Expr::Const(-k)),
                _ => Err(ParseError::NotIntegrable(self.to_string())),
            },
            Expr::cos(inner) => match inner.as_linear(var) {
                Some((k, _)) if k != 0.0 => Ok(Expr::sin(inner.clone()) / Expr::Const(k)),
                _ => Err(ParseError::NotIntegrable(self.to_string())),
            },
            _ => Err(ParseError::NotIntegrable(self.to_string())),
        }
    }

    /// Definite integral using the fundamental theorem of calculus
    pub fn definite_integrate(&self, var: &str, lower: f64, upper: f64) -> Result<f64, ParseError> {
        let indefinite = self.integrate(var)?;
        let upper_val = indefinite.eval_expression(vec![var], &[upper])?;
        let lower_val = indefinite.eval_expression(vec![var], &[lower])?;
        Ok(upper_val - lower_val)
    }

    /// Numerical integration using Simpson's rule; an odd `n` is bumped to the next even number.
    pub fn numerical_integrate(&self, lower: f64, upper: f64, n: usize) -> Result<f64, ParseError> {
        let n = if n % 2 == 0 { n.max(2) } else { n + 1 };
        let h = (upper - lower) / (n as f64);
        let f = self.lambdify1D()?;
        let mut sum = f(lower) + f(upper);
        for i in 1..n {
            let x = lower + (i as f64) * h;
            sum += if i % 2 == 0 { 2.0 * f(x) } else { 4.0 * f(x) };
        }
        Ok(sum * h / 3.0)
    }

    /// Gauss-Legendre quadrature of the one-variable expression over `[lower, upper]`.
    pub fn quad(&self, lower: f64, upper: f64, degree: usize) -> Result<f64, ParseError> {
        let f = self.lambdify1D()?;
        quad_fn(&f, lower, upper, degree)
    }
}

/// Gauss-Legendre quadrature of an already compiled function.
pub fn quad_fn<F>(f: &F, lower: f64, upper: f64, degree: usize) -> Result<f64, ParseError>
where
    F: Fn(f64) -> f64 + ?Sized,
{
    if lower == upper {
        return Ok(0.0);
    }
    let quad = GaussLegendre::new(degree).map_err(|e| {
        ParseError::NotIntegrable(format!("Gauss-Legendre quadrature of degree {}: {:?}", degree, e))
    })?;
    Ok(quad.integrate(lower, upper, |x| f(x)))
}
