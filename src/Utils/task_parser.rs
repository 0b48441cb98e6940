/// parse document with structure like " title1 key1: value1, value2 key2: value2 title2 key3:value3, value4" which has titles and
/// pairs key-vector of values. Sections are returned in document order and a title may repeat, so
/// a document can hold several sections of the same kind:
/// ```text
/// graph
///   graph_type: linear
///   equation: "y = 2x + 3"
/// graph
///   graph_type: circle
///   center: 1, -2
/// ```
/// Values are integers, floats, booleans, bare words or double-quoted strings (which may contain spaces and commas).
/// Lines starting with //, #, % or ; are comments.
use crate::graphs::errors::GraphError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{alpha1, alphanumeric1, multispace0, space0},
    combinator::{map, recognize},
    multi::{many0, many1, separated_list0},
    sequence::{delimited, pair, separated_pair, terminated},
};
use std::fmt::Display;

/// one titled block of key-value pairs
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    /// pairs in document order, a repeated key keeps its last values
    pub pairs: Vec<(String, Vec<Value>)>,
}

impl Section {
    pub fn get(&self, key: &str) -> Option<&Vec<Value>> {
        self.pairs.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

/// enum to represent different value types:
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Float(f64),
    Integer(i64),
    Boolean(bool),
}

impl Value {
    pub fn as_string(&self) -> Option<&String> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    /// integers are accepted where a float is expected
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        if let Value::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        if let Value::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    pub fn to_string_value(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Float(f) => f.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Boolean(b) => b.to_string(),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // quoted back when it would not survive a round trip as a bare word
            Value::String(s)
                if s.is_empty() || s.contains(|c: char| matches!(c, ',' | ' ' | '\t' | ';')) =>
            {
                write!(f, "\"{}\"", s)
            }
            Value::String(s) => write!(f, "{}", s),
            Value::Float(val) => write!(f, "{:?}", val),
            Value::Integer(val) => write!(f, "{}", val),
            Value::Boolean(val) => write!(f, "{}", val),
        }
    }
}

fn identifier(input: &str) -> IResult<&str, String> {
    let parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    let mut parser = map(parser, String::from);
    parser.parse(input)
}

/// Parses a title (word characters without spaces)
pub(crate) fn parse_title(input: &str) -> IResult<&str, String> {
    let (input, result) = identifier(input)?;
    // Ignore trailing whitespace and newline characters
    let input = input.trim_start();
    Ok((input, result))
}

/// Parses a key (word characters without spaces)
pub(crate) fn parse_key(input: &str) -> IResult<&str, String> {
    identifier(input)
}

/// `"..."` without escapes; the quotes are dropped and the content is always a string
fn parse_quoted(input: &str) -> IResult<&str, Value> {
    let quoted = delimited(tag("\""), take_while(|c: char| c != '"' && c != '\n'), tag("\""));
    let mut parser = map(quoted, |s: &str| Value::String(s.to_string()));
    parser.parse(input)
}

fn parse_bare(input: &str) -> IResult<&str, Value> {
    // a bare value ends at commas, whitespace and semicolons
    let value_parser = take_while1(|c: char| !matches!(c, ',' | ' ' | '\t' | '\n' | '\r' | ';'));
    let mut value_parser = map(value_parser, |s: &str| {
        // Try parsing as different types in order
        if let Ok(val) = s.parse::<i64>() {
            Value::Integer(val)
        } else if let Ok(val) = s.parse::<f64>() {
            Value::Float(val)
        } else if let Ok(val) = s.parse::<bool>() {
            Value::Boolean(val)
        } else {
            Value::String(s.to_string())
        }
    });
    value_parser.parse(input)
}

pub(crate) fn parse_value(input: &str) -> IResult<&str, Value> {
    alt((parse_quoted, parse_bare)).parse(input)
}

/// comma-separated values on the rest of the line
pub(crate) fn parse_value_list(input: &str) -> IResult<&str, Vec<Value>> {
    let (input, _) = space0(input)?;
    let separator_coma = delimited(space0, tag(","), space0);
    let mut value_parser = separated_list0(separator_coma, parse_value);
    value_parser.parse(input)
}

/// Parses a key-value pair where value is a list
pub(crate) fn parse_key_value_pair(input: &str) -> IResult<&str, (String, Vec<Value>)> {
    let colon_separator = delimited(space0, tag(":"), space0);
    let mut parser = separated_pair(parse_key, colon_separator, parse_value_list);
    let (input, result) = parser.parse(input)?;
    Ok((input.trim_start(), result))
}

/// Parses a section with a title and one or more key-value pairs
pub(crate) fn parse_section(input: &str) -> IResult<&str, Section> {
    let (input, _) = space0(input)?;
    let (input, title) = parse_title(input)?;
    let (input, _) = multispace0(input)?;
    let mut parser = many1(terminated(parse_key_value_pair, space0));
    let (input, pairs) = parser.parse(input)?;
    Ok((input, Section { title, pairs }))
}

/// Filters out comment lines (starting with //, #, %, or ;) and blank lines
pub fn filter_comments(input: &str) -> String {
    input
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("//")
                && !trimmed.starts_with('#')
                && !trimmed.starts_with('%')
                && !trimmed.starts_with(';')
                && !trimmed.is_empty()
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

/// Parses the sections of a document without comments
pub(crate) fn parse_document(input: &str) -> IResult<&str, Vec<Section>> {
    let mut parser = many1(delimited(space0, parse_section, multispace0));
    parser.parse(input)
}

/// Parses a whole document; comments are dropped and nothing may be left over.
pub fn parse_document_as(input: &str) -> Result<Vec<Section>, GraphError> {
    let filtered = filter_comments(input);
    if filtered.trim().is_empty() {
        return Err(GraphError::Form("the document is empty".to_string()));
    }
    match parse_document(&filtered) {
        Ok((remaining, sections)) => {
            if !remaining.trim().is_empty() {
                return Err(GraphError::Form(format!(
                    "Failed to parse entire document. Remaining: '{}'",
                    remaining.lines().next().unwrap_or(remaining)
                )));
            }
            Ok(sections)
        }
        Err(e) => Err(GraphError::Form(format!("Parsing error: {:?}", e))),
    }
}
