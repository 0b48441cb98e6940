#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
/// a module turns a String expression into a symbolic expression
///
///# Example
/// ```
/// use RustedGraphs::symbolic::symbolic_engine::Expr;
/// let input = "2x^2 - 3x + |x - 1|";
/// let parsed_expression = Expr::parse_expression(input).unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// let parsed_function = parsed_expression.lambdify1D().unwrap();
/// println!("{}, Rust function: {}  \n", input, parsed_function(2.0));
/// ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) turns a String expression into a symbolic expression
/// 2) turns a symbolic expression into a Rust function
/// 3) differentiates and integrates symbolic expressions for the derivative/integral graphs
///# Example#
/// ```
/// use RustedGraphs::symbolic::symbolic_engine::Expr;
/// let input = "sin(2x) + x^3";
/// // here you've got symbolic expression
/// let parsed_expression = Expr::parse_expression(input).unwrap();
/// // differentiate with respect to x
/// let df_dx = parsed_expression.diff("x").simplify();
/// println!("df_dx = {}", df_dx);
/// // integrate with respect to x
/// let big_f = parsed_expression.integrate("x").unwrap();
/// println!("F = {}", big_f.simplify());
/// // convert symbolic expression to a Rust function and evaluate the function
/// let f = parsed_expression.lambdify1D().unwrap();
/// println!("f(1) = {}", f(1.0));
/// // compare numerical and analytical derivatives on a grid
/// let (norm, ok) = parsed_expression.compare_num1D("x", 0.0, 1.0, 100, 1e-4).unwrap();
/// assert!(ok, "norm {}", norm);
/// ```
pub mod symbolic_engine;
pub mod symbolic_engine_derivatives;
mod symbolic_engine_tests;
/// integrals: a small table of antiderivatives and Gauss-Legendre quadrature
pub mod symbolic_integration;
pub mod symbolic_lambdify;
pub mod symbolic_simplify;
/// coefficients `a`, `b` of `y = a*x + b` or `y = |a*x + b|` from a string
///# Example
/// ```
/// use RustedGraphs::symbolic::linear_parser::parse_linear;
/// let eq = parse_linear("y = 2x + 3").unwrap();
/// assert_eq!((eq.a, eq.b), (2.0, 3.0));
/// ```
pub mod linear_parser;
/// numerical helpers: linspace, finite differences, running integrals
pub mod utils;

pub use parse_expr::ParseError;
