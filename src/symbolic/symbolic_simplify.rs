use crate::symbolic::symbolic_engine::Expr;
use std::f64::consts::PI;

impl Expr {
    /// SIMPLIFICATION

    /// Folds constants and removes neutral elements, recursively, bottom-up.
    ///
    /// Rules: `a op b` for constants, `0 + e`, `e - 0`, `e - e`, `1 * e`, `0 * e`,
    /// `e / 1`, `0 / e`, `e ^ 1`, `e ^ 0`, `(-1) * ((-1) * e)`, and functions of constants.
    /// The result is only used for labels, so it does not try to reach a normal form.
    ///
    /// # Examples
    /// ```
    /// use RustedGraphs::symbolic::symbolic_engine::Expr;
    /// let f = Expr::parse_expression("x^2").unwrap();
    /// assert_eq!(f.diff("x").simplify().to_string(), "(2 * x)");
    /// ```
    pub fn simplify(&self) -> Expr {
        let node = self.map_children(&|e| e.simplify());
        let folded = match &node {
            Expr::Add(lhs, rhs) => match (lhs.as_ref(), rhs.as_ref()) {
                (Expr::Const(a), Expr::Const(b)) => Some(Expr::Const(a + b)),
                (l, r) if l.is_zero() => Some(r.clone()),
                (l, r) if r.is_zero() => Some(l.clone()),
                _ => None,
            },
            Expr::Sub(lhs, rhs) => match (lhs.as_ref(), rhs.as_ref()) {
                (Expr::Const(a), Expr::Const(b)) => Some(Expr::Const(a - b)),
                (l, r) if r.is_zero() => Some(l.clone()),
                (l, r) if l == r => Some(Expr::Const(0.0)),
                (l, r) if l.is_zero() => Some((-r.clone()).simplify()),
                _ => None,
            },
            Expr::Mul(lhs, rhs) => match (lhs.as_ref(), rhs.as_ref()) {
                (Expr::Const(a), Expr::Const(b)) => Some(Expr::Const(a * b)),
                (l, r) if l.is_zero() || r.is_zero() => Some(Expr::Const(0.0)),
                (l, r) if l.is_one() => Some(r.clone()),
                (l, r) if r.is_one() => Some(l.clone()),
                // keep the constant on the left: x * 2 -> 2 * x
                (l, Expr::Const(c)) => Some(Expr::Const(*c) * l.clone()),
                // c1 * (c2 * e) -> (c1*c2) * e
                (Expr::Const(c1), Expr::Mul(inner_l, inner_r)) => match inner_l.as_ref() {
                    Expr::Const(c2) => Some(
                        Expr::Mul(Box::new(Expr::Const(c1 * c2)), inner_r.clone()).simplify(),
                    ),
                    _ => None,
                },
                _ => None,
            },
            Expr::Div(lhs, rhs) => match (lhs.as_ref(), rhs.as_ref()) {
                (Expr::Const(a), Expr::Const(b)) if *b != 0.0 => Some(Expr::Const(a / b)),
                (l, _) if l.is_zero() => Some(Expr::Const(0.0)),
                (l, r) if r.is_one() => Some(l.clone()),
                (l, r) if l == r => Some(Expr::Const(1.0)),
                _ => None,
            },
            Expr::Pow(base, exp) => match (base.as_ref(), exp.as_ref()) {
                (Expr::Const(a), Expr::Const(b)) => Some(Expr::Const(a.powf(*b))),
                (_, e) if e.is_zero() => Some(Expr::Const(1.0)),
                (b, e) if e.is_one() => Some(b.clone()),
                _ => None,
            },
            _ => match node.children().as_slice() {
                [Expr::Const(c)] => Self::fold_function(&node, *c),
                _ => None,
            },
        };
        folded.unwrap_or(node)
    }

    /// value of a unary function node applied to a constant argument
    fn fold_function(node: &Expr, c: f64) -> Option<Expr> {
        let value = match node {
            Expr::Exp(_) => c.exp(),
            Expr::Ln(_) => c.ln(),
            Expr::Abs(_) => c.abs(),
            Expr::sin(_) => c.sin(),
            Expr::cos(_) => c.cos(),
            Expr::tg(_) => c.tan(),
            Expr::ctg(_) => 1.0 / c.tan(),
            Expr::arcsin(_) => c.asin(),
            Expr::arccos(_) => c.acos(),
            Expr::arctg(_) => c.atan(),
            Expr::arcctg(_) => PI / 2.0 - c.atan(),
            _ => return None,
        };
        // ln(-1) and friends stay symbolic
        if value.is_finite() {
            Some(Expr::Const(value))
        } else {
            None
        }
    }
}
