//___________________________________TESTS____________________________________

#[cfg(test)]
mod tests {
    use crate::symbolic::parse_expr::ParseError;
    use crate::symbolic::symbolic_engine::Expr;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn x() -> Expr {
        Expr::Var("x".to_string())
    }

    fn parse(s: &str) -> Expr {
        Expr::parse_expression(s).unwrap()
    }

    #[test]
    fn test_operators_build_trees() {
        let expr = x() + Expr::Const(2.0);
        assert_eq!(expr, Expr::Add(Box::new(x()), Box::new(Expr::Const(2.0))));
        let expr = x() - Expr::Const(2.0);
        assert_eq!(expr, Expr::Sub(Box::new(x()), Box::new(Expr::Const(2.0))));
        let expr = Expr::Const(2.0) * x();
        assert_eq!(expr, Expr::Mul(Box::new(Expr::Const(2.0)), Box::new(x())));
        let expr = x() / Expr::Const(2.0);
        assert_eq!(expr, Expr::Div(Box::new(x()), Box::new(Expr::Const(2.0))));
    }

    #[test]
    fn test_neg() {
        let neg_expr = -x();
        let expected = Expr::Mul(Box::new(Expr::Const(-1.0)), Box::new(x()));
        assert_eq!(neg_expr, expected);
    }

    #[test]
    fn test_display() {
        assert_eq!(parse("2x + 3").to_string(), "((2 * x) + 3)");
        assert_eq!(parse("|x - 1|").to_string(), "|(x - 1)|");
        assert_eq!(parse("sin(x)^2").to_string(), "(sin(x) ^ 2)");
    }

    #[test]
    fn test_symbols_and_variables() {
        let vars = Expr::Symbols("x, y");
        assert_eq!(vars, vec![x(), Expr::Var("y".to_string())]);
        let expr = parse("y*x + x");
        assert_eq!(expr.all_arguments_are_variables(), vec!["x", "y"]);
        assert!(expr.contains_variable("y"));
        assert!(!expr.contains_variable("z"));
        assert!(parse("2*pi").is_const());
    }

    #[test]
    fn test_set_variable() {
        let expr = parse("x^2 + 1");
        let at_three = expr.set_variable("x", 3.0);
        assert!(at_three.is_const());
        assert_eq!(at_three.eval_expression(vec![], &[]).unwrap(), 10.0);
    }

    #[test]
    fn test_eval_unknown_variable() {
        assert_eq!(
            parse("x + t").eval_expression(vec!["x"], &[1.0]),
            Err(ParseError::UnknownVariable("t".to_string()))
        );
    }

    #[test]
    fn test_diff_rules() {
        let cases: Vec<(&str, Box<dyn Fn(f64) -> f64>)> = vec![
            ("x^3", Box::new(|x: f64| 3.0 * x * x)),
            ("sin(2x)", Box::new(|x: f64| 2.0 * (2.0 * x).cos())),
            ("x*exp(x)", Box::new(|x: f64| (1.0 + x) * x.exp())),
            ("1/x", Box::new(|x: f64| -1.0 / (x * x))),
            ("ln(x^2 + 1)", Box::new(|x: f64| 2.0 * x / (x * x + 1.0))),
            ("x^x", Box::new(|x: f64| x.powf(x) * (x.ln() + 1.0))),
            ("tan(x)", Box::new(|x: f64| 1.0 / x.cos().powi(2))),
            ("arctan(x)", Box::new(|x: f64| 1.0 / (1.0 + x * x))),
            ("|x - 1|", Box::new(|x: f64| (x - 1.0).signum())),
        ];
        for (input, expected) in cases {
            let df = parse(input).diff("x");
            for point in [0.3, 0.7, 1.9] {
                assert_relative_eq!(
                    df.eval_expression(vec!["x"], &[point]).unwrap(),
                    expected(point),
                    epsilon = 1e-10
                );
            }
        }
    }

    #[test]
    fn test_n_th_derivative() {
        let f = parse("x^4");
        let d2 = f.n_th_derivative1D("x", 2);
        assert_relative_eq!(d2.eval_expression(vec!["x"], &[2.0]).unwrap(), 48.0);
        assert_eq!(f.n_th_derivative1D("x", 5), Expr::Const(0.0));
    }

    #[test]
    fn test_compare_num1D() {
        let (norm, ok) = parse("sin(x)*x^2").compare_num1D("x", -2.0, 2.0, 50, 1e-6).unwrap();
        assert!(ok, "norm = {}", norm);
    }

    #[test]
    fn test_lambdify() {
        let f = parse("y = x^2 - 2x").lambdify1D().unwrap();
        assert_eq!(f(3.0), 3.0);
        let c = parse("2*pi").lambdify1D().unwrap();
        assert_relative_eq!(c(100.0), 2.0 * PI);
        // negative base with integer power stays defined
        let cube = parse("x^3").lambdify1D().unwrap();
        assert_eq!(cube(-2.0), -8.0);
        // domain violations give NaN
        let log = parse("ln(x)").lambdify1D().unwrap();
        assert!(log(-1.0).is_nan());
    }

    #[test]
    fn test_lambdify_errors() {
        assert!(matches!(
            parse("x*y").lambdify1D(),
            Err(ParseError::TooManyVariables(_))
        ));
        assert_eq!(
            parse("t + 1").lambdify_x("x").err(),
            Some(ParseError::UnknownVariable("t".to_string()))
        );
        assert_eq!(parse("3").lambdify_x("x").unwrap()(5.0), 3.0);
    }

    #[test]
    fn test_polyval() {
        let p = Expr::polyval(&[-1.0, 0.0, 0.5], "x");
        assert_eq!(p.to_string(), "(-1 + (0.5 * (x ^ 2)))");
        assert_eq!(Expr::polyval(&[0.0, 0.0], "x"), Expr::Const(0.0));
    }

    #[test]
    fn test_as_linear() {
        assert_eq!(parse("(x + 1)/2").as_linear("x"), Some((0.5, 0.5)));
        assert_eq!(parse("sin(x)").as_linear("x"), None);
        assert_eq!(parse("4").as_linear("x"), Some((0.0, 4.0)));
    }
}
