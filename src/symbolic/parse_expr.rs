use crate::symbolic::symbolic_engine::Expr;
use log::debug;
use std::f64::consts::{E, PI};
use thiserror::Error;
/// a module turns a String expression into a symbolic expression
///# Example
/// ```
/// use RustedGraphs::symbolic::symbolic_engine::Expr;
/// let parsed_expression = Expr::parse_expression("y = 2x + |x - 1|").unwrap();
/// let f = parsed_expression.lambdify1D().unwrap();
/// assert_eq!(f(3.0), 8.0);
/// ```
//                  search recursion diagram
//                "2x^2+sin(x)-3"                   |
//                |       left  | right             |
//                |_________________________________|
//                |     split at rightmost +/-      |
//                |_________________________________|
//                |  2*x^2+sin(x)  |       3        |
//                |       |        |      Ok        |
//                |______\|/_______|________________|
//                |     split at rightmost +/-      |
//                |_________________________________|
//                |     2*x^2      |   sin(x)       |
//                |  split at *    |  function call |
//                |_____\|/________|_____\|/________|
//                |   2   |  x^2   |       x        |
//                |  Ok   | split ^|      Ok        |
//                  etc...

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("empty expression")]
    Empty,
    #[error("unbalanced brackets in '{0}'")]
    UnbalancedBrackets(String),
    #[error("unknown function '{0}'")]
    UnknownFunction(String),
    #[error("invalid token '{0}'")]
    InvalidToken(String),
    #[error("expected a function of one variable, found {0:?}")]
    TooManyVariables(Vec<String>),
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),
    #[error("'{0}' is not a linear equation")]
    NotLinear(String),
    #[error("cannot integrate '{0}' symbolically")]
    NotIntegrable(String),
}

const FUNCTIONS: &[&str] = &[
    "sin", "cos", "tan", "tg", "cot", "ctg", "asin", "arcsin", "acos", "arccos", "atan",
    "arctan", "arctg", "acot", "arccot", "arcctg", "exp", "ln", "log", "sqrt", "abs",
];

fn is_function(name: &str) -> bool {
    FUNCTIONS.contains(&name)
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Num(f64),
    Ident(String),
    Op(char),
    LParen,
    RParen,
}

impl Token {
    /// token that can close an operand: `2`, `x`, `)`
    fn ends_operand(&self) -> bool {
        match self {
            Token::Num(_) | Token::RParen => true,
            Token::Ident(name) => !is_function(name),
            Token::Op(_) | Token::LParen => false,
        }
    }

    fn starts_operand(&self) -> bool {
        matches!(self, Token::Num(_) | Token::Ident(_) | Token::LParen)
    }
}

fn render(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| match t {
            Token::Num(v) => v.to_string(),
            Token::Ident(name) => name.clone(),
            Token::Op(c) => c.to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
        })
        .collect()
}

/// Drops a leading `y =`, `y(x) =` or `f(x) =`; any other `=` is rejected.
pub fn strip_lhs(input: &str) -> Result<&str, ParseError> {
    match input.split_once('=') {
        Some((lhs, rhs)) => {
            let lhs: String = lhs.chars().filter(|c| !c.is_whitespace()).collect();
            if matches!(lhs.as_str(), "y" | "y(x)" | "f(x)") && !rhs.contains('=') {
                Ok(rhs.trim())
            } else {
                Err(ParseError::InvalidToken(format!("{}=", lhs)))
            }
        }
        None => Ok(input.trim()),
    }
}

/// Splits the input into tokens. `|...|` becomes `abs(...)`, `**` becomes `^`.
pub(crate) fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens: Vec<Token> = Vec::new();
    let mut open_bars = 0usize;
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        if c.is_ascii_digit() || c == '.' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            // scientific notation: 1e-3, 2.5E4
            if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                let mut j = i + 1;
                if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                    j += 1;
                }
                if j < chars.len() && chars[j].is_ascii_digit() {
                    while j < chars.len() && chars[j].is_ascii_digit() {
                        j += 1;
                    }
                    i = j;
                }
            }
            let text: String = chars[start..i].iter().collect();
            let value = text
                .parse::<f64>()
                .map_err(|_| ParseError::InvalidToken(text.clone()))?;
            tokens.push(Token::Num(value));
            continue;
        }
        if c.is_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            tokens.push(Token::Ident(chars[start..i].iter().collect()));
            continue;
        }
        match c {
            '+' | '-' | '/' | '^' => tokens.push(Token::Op(c)),
            '*' => {
                if i + 1 < chars.len() && chars[i + 1] == '*' {
                    tokens.push(Token::Op('^'));
                    i += 1;
                } else {
                    tokens.push(Token::Op('*'));
                }
            }
            '(' | '[' => tokens.push(Token::LParen),
            ')' | ']' => tokens.push(Token::RParen),
            '|' => {
                let closes = open_bars > 0 && tokens.last().is_some_and(|t| t.ends_operand());
                if closes {
                    open_bars -= 1;
                    tokens.push(Token::RParen);
                } else {
                    open_bars += 1;
                    tokens.push(Token::Ident("abs".to_string()));
                    tokens.push(Token::LParen);
                }
            }
            _ => return Err(ParseError::InvalidToken(c.to_string())),
        }
        i += 1;
    }
    if open_bars != 0 {
        return Err(ParseError::UnbalancedBrackets(input.to_string()));
    }
    check_function_calls(&tokens)?;
    Ok(insert_implicit_multiplication(tokens))
}

/// A name right before `(` is a call unless it is `x`, `pi` or `e`, where `x(x + 1)`
/// still means a product, so `sinh(x)` is an unknown function rather than `sinh * x`.
fn check_function_calls(tokens: &[Token]) -> Result<(), ParseError> {
    for pair in tokens.windows(2) {
        if let [Token::Ident(name), Token::LParen] = pair {
            if !is_function(name) && !matches!(name.as_str(), "x" | "pi" | "e") {
                return Err(ParseError::UnknownFunction(name.clone()));
            }
        }
    }
    Ok(())
}

/// `2x` -> `2*x`, `(x+1)(x-1)` -> `(x+1)*(x-1)`, `2sin(x)` -> `2*sin(x)`
fn insert_implicit_multiplication(tokens: Vec<Token>) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens {
        if let Some(prev) = out.last() {
            let both_numbers = matches!((prev, &token), (Token::Num(_), Token::Num(_)));
            if prev.ends_operand() && token.starts_operand() && !both_numbers {
                out.push(Token::Op('*'));
            }
        }
        out.push(token);
    }
    out
}

/// position of the rightmost operator from `ops` at bracket depth 0 that is used as a
/// binary operator (a `-` right after another operator or `(` is a sign)
fn find_rightmost_operator_outside_brackets(tokens: &[Token], ops: &[char]) -> Option<usize> {
    let mut depth = 0i32;
    let mut found = None;
    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::LParen => depth += 1,
            Token::RParen => depth -= 1,
            Token::Op(op) if depth == 0 && ops.contains(op) => {
                if i > 0 && tokens[i - 1].ends_operand() {
                    found = Some(i);
                }
            }
            _ => {}
        }
    }
    found
}

fn find_leftmost_operator_outside_brackets(tokens: &[Token], op: char) -> Option<usize> {
    let mut depth = 0i32;
    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::LParen => depth += 1,
            Token::RParen => depth -= 1,
            Token::Op(c) if depth == 0 && *c == op => return Some(i),
            _ => {}
        }
    }
    None
}

/// index of the bracket closing the one opened at `open`
fn find_pair_to_this_bracket(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0i32;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        match token {
            Token::LParen => depth += 1,
            Token::RParen => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn check_brackets(tokens: &[Token], input: &str) -> Result<(), ParseError> {
    let mut depth = 0i32;
    for token in tokens {
        match token {
            Token::LParen => depth += 1,
            Token::RParen => depth -= 1,
            _ => {}
        }
        if depth < 0 {
            return Err(ParseError::UnbalancedBrackets(input.to_string()));
        }
    }
    if depth != 0 {
        return Err(ParseError::UnbalancedBrackets(input.to_string()));
    }
    Ok(())
}

fn apply_function(name: &str, arg: Expr) -> Result<Expr, ParseError> {
    let arg = Box::new(arg);
    let expr = match name {
        "sin" => Expr::sin(arg),
        "cos" => Expr::cos(arg),
        "tan" | "tg" => Expr::tg(arg),
        "cot" | "ctg" => Expr::ctg(arg),
        "asin" | "arcsin" => Expr::arcsin(arg),
        "acos" | "arccos" => Expr::arccos(arg),
        "atan" | "arctan" | "arctg" => Expr::arctg(arg),
        "acot" | "arccot" | "arcctg" => Expr::arcctg(arg),
        "exp" => Expr::Exp(arg),
        "ln" | "log" => Expr::Ln(arg),
        "sqrt" => Expr::Pow(arg, Box::new(Expr::Const(0.5))),
        "abs" => Expr::Abs(arg),
        _ => return Err(ParseError::UnknownFunction(name.to_string())),
    };
    Ok(expr)
}

fn parse_tokens(tokens: &[Token]) -> Result<Expr, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }
    debug!("parsing tokens: {}", render(tokens));

    // addition and subtraction, left associative
    if let Some(pos) = find_rightmost_operator_outside_brackets(tokens, &['+', '-']) {
        let left = parse_tokens(&tokens[..pos])?;
        let right = parse_tokens(&tokens[pos + 1..])?;
        return Ok(match tokens[pos] {
            Token::Op('+') => Expr::Add(Box::new(left), Box::new(right)),
            _ => Expr::Sub(Box::new(left), Box::new(right)),
        });
    }
    // multiplication and division, left associative
    if let Some(pos) = find_rightmost_operator_outside_brackets(tokens, &['*', '/']) {
        let left = parse_tokens(&tokens[..pos])?;
        let right = parse_tokens(&tokens[pos + 1..])?;
        return Ok(match tokens[pos] {
            Token::Op('*') => Expr::Mul(Box::new(left), Box::new(right)),
            _ => Expr::Div(Box::new(left), Box::new(right)),
        });
    }
    // unary sign binds weaker than ^: -x^2 = -(x^2)
    match &tokens[0] {
        Token::Op('-') => {
            return Ok(match parse_tokens(&tokens[1..])? {
                Expr::Const(value) => Expr::Const(-value),
                inner => -inner,
            });
        }
        Token::Op('+') => return parse_tokens(&tokens[1..]),
        _ => {}
    }
    // power, right associative
    if let Some(pos) = find_leftmost_operator_outside_brackets(tokens, '^') {
        let base = parse_tokens(&tokens[..pos])?;
        let exponent = parse_tokens(&tokens[pos + 1..])?;
        return Ok(Expr::Pow(Box::new(base), Box::new(exponent)));
    }

    match tokens {
        [Token::Num(value)] => Ok(Expr::Const(*value)),
        [Token::Ident(name)] => match name.as_str() {
            "pi" => Ok(Expr::Const(PI)),
            "e" => Ok(Expr::Const(E)),
            _ if is_function(name) => Err(ParseError::InvalidToken(name.clone())),
            _ => Ok(Expr::Var(name.clone())),
        },
        [Token::LParen, .., Token::RParen] if find_pair_to_this_bracket(tokens, 0) == Some(tokens.len() - 1) => {
            parse_tokens(&tokens[1..tokens.len() - 1])
        }
        [Token::Ident(name), Token::LParen, .., Token::RParen]
            if find_pair_to_this_bracket(tokens, 1) == Some(tokens.len() - 1) =>
        {
            let inner = parse_tokens(&tokens[2..tokens.len() - 1])?;
            apply_function(name, inner)
        }
        _ => Err(ParseError::InvalidToken(render(tokens))),
    }
}

/// Parses a string like `y = 2x^2 - sin(x) + |x - 1|` into a symbolic expression.
pub fn parse_expression_func(input: &str) -> Result<Expr, ParseError> {
    let body = strip_lhs(input)?;
    if body.is_empty() {
        return Err(ParseError::Empty);
    }
    let tokens = tokenize(body)?;
    check_brackets(&tokens, body)?;
    parse_tokens(&tokens)
}

impl Expr {
    /// turns a String expression into a symbolic expression
    pub fn parse_expression(input: &str) -> Result<Expr, ParseError> {
        parse_expression_func(input)
    }
}
