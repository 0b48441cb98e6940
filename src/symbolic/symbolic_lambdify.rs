use crate::symbolic::parse_expr::ParseError;
use crate::symbolic::symbolic_engine::Expr;
use std::f64::consts::PI;

/// closure of a single real argument, what the graph sampler consumes
pub type Func1D = Box<dyn Fn(f64) -> f64 + Send + Sync>;

impl Expr {
    /// LAMBDIFICATION - Converting Symbolic Expressions to Executable Functions

    /// Converts a single-variable symbolic expression into an executable Rust closure.
    /// A constant expression gives a constant closure; more than one free variable is an error.
    ///
    /// # Examples
    /// ```
    /// use RustedGraphs::symbolic::symbolic_engine::Expr;
    /// let f = Expr::parse_expression("x^2").unwrap().lambdify1D().unwrap();
    /// assert_eq!(f(3.0), 9.0);
    /// ```
    pub fn lambdify1D(&self) -> Result<Func1D, ParseError> {
        let vars = self.all_arguments_are_variables();
        if vars.len() > 1 {
            return Err(ParseError::TooManyVariables(vars));
        }
        Ok(self.compile())
    }

    /// Same as `lambdify1D` but the argument name is fixed, so `y` in an `x`-graph is an error.
    pub fn lambdify_x(&self, var: &str) -> Result<Func1D, ParseError> {
        let vars = self.all_arguments_are_variables();
        if let Some(other) = vars.iter().find(|v| v.as_str() != var) {
            return Err(ParseError::UnknownVariable(other.clone()));
        }
        Ok(self.compile())
    }

    /// recursive closure builder; every `Var` is treated as the argument
    fn compile(&self) -> Func1D {
        match self {
            Expr::Var(_) => Box::new(|x| x),
            Expr::Const(val) => {
                let val = *val;
                Box::new(move |_| val)
            }
            Expr::Add(lhs, rhs) => {
                let (lhs_fn, rhs_fn) = (lhs.compile(), rhs.compile());
                Box::new(move |x| lhs_fn(x) + rhs_fn(x))
            }
            Expr::Sub(lhs, rhs) => {
                let (lhs_fn, rhs_fn) = (lhs.compile(), rhs.compile());
                Box::new(move |x| lhs_fn(x) - rhs_fn(x))
            }
            Expr::Mul(lhs, rhs) => {
                let (lhs_fn, rhs_fn) = (lhs.compile(), rhs.compile());
                Box::new(move |x| lhs_fn(x) * rhs_fn(x))
            }
            Expr::Div(lhs, rhs) => {
                let (lhs_fn, rhs_fn) = (lhs.compile(), rhs.compile());
                Box::new(move |x| lhs_fn(x) / rhs_fn(x))
            }
            Expr::Pow(base, exp) => match exp.as_ref() {
                // integer powers keep negative bases defined: (-2)^3
                Expr::Const(n) if n.fract() == 0.0 && n.abs() < i32::MAX as f64 => {
                    let n = *n as i32;
                    let base_fn = base.compile();
                    Box::new(move |x| base_fn(x).powi(n))
                }
                _ => {
                    let (base_fn, exp_fn) = (base.compile(), exp.compile());
                    Box::new(move |x| base_fn(x).powf(exp_fn(x)))
                }
            },
            Expr::Exp(expr) => {
                let expr_fn = expr.compile();
                Box::new(move |x| expr_fn(x).exp())
            }
            Expr::Ln(expr) => {
                let expr_fn = expr.compile();
                Box::new(move |x| expr_fn(x).ln())
            }
            Expr::Abs(expr) => {
                let expr_fn = expr.compile();
                Box::new(move |x| expr_fn(x).abs())
            }
            Expr::sin(expr) => {
                let expr_fn = expr.compile();
                Box::new(move |x| expr_fn(x).sin())
            }
            Expr::cos(expr) => {
                let expr_fn = expr.compile();
                Box::new(move |x| expr_fn(x).cos())
            }
            Expr::tg(expr) => {
                let expr_fn = expr.compile();
                Box::new(move |x| expr_fn(x).tan())
            }
            Expr::ctg(expr) => {
                let expr_fn = expr.compile();
                Box::new(move |x| 1.0 / expr_fn(x).tan())
            }
            Expr::arcsin(expr) => {
                let expr_fn = expr.compile();
                Box::new(move |x| expr_fn(x).asin())
            }
            Expr::arccos(expr) => {
                let expr_fn = expr.compile();
                Box::new(move |x| expr_fn(x).acos())
            }
            Expr::arctg(expr) => {
                let expr_fn = expr.compile();
                Box::new(move |x| expr_fn(x).atan())
            }
            Expr::arcctg(expr) => {
                let expr_fn = expr.compile();
                Box::new(move |x| PI / 2.0 - expr_fn(x).atan())
            }
        }
    }
}
