//! Form documents: the text counterpart of a JSON graph request.
//!
//! Every `graph` section of a task_parser document becomes one `GraphTask`. Known
//! keys fill the task fields, any other key with a single number becomes a
//! coefficient, so `a: 2` and `"coefficients": {"a": 2}` mean the same thing.
use crate::Utils::task_parser::{Section, Value, parse_document_as};
use crate::graphs::errors::GraphError;
use crate::graphs::graph_task::{GraphTask, GraphType, TrigFunction};
use log::{debug, info};
use std::fmt::Write;
use std::str::FromStr;

pub const SECTION_TITLE: &str = "graph";

fn form_error(index: usize, message: String) -> GraphError {
    GraphError::Form(format!("graph section {}: {}", index, message))
}

fn single<'a>(key: &str, values: &'a [Value]) -> Result<&'a Value, String> {
    match values {
        [value] => Ok(value),
        _ => Err(format!("{} expects one value, found {}", key, values.len())),
    }
}

fn float(key: &str, values: &[Value]) -> Result<f64, String> {
    single(key, values)?
        .as_float()
        .ok_or_else(|| format!("{} must be a number", key))
}

fn text(key: &str, values: &[Value]) -> Result<String, String> {
    // an unquoted equation like y=2x may be read as a word or even as a number
    Ok(single(key, values)?.to_string_value())
}

fn pair_of_floats(key: &str, values: &[Value]) -> Result<[f64; 2], String> {
    match values {
        [a, b] => match (a.as_float(), b.as_float()) {
            (Some(a), Some(b)) => Ok([a, b]),
            _ => Err(format!("{} must be two numbers", key)),
        },
        _ => Err(format!("{} expects two values, found {}", key, values.len())),
    }
}

fn apply_key(task: &mut GraphTask, key: &str, values: &[Value]) -> Result<(), String> {
    match key {
        "graph_type" => {
            let name = text(key, values)?;
            task.graph_type =
                GraphType::from_str(&name).map_err(|_| format!("unknown graph type '{}'", name))?;
        }
        "equation" => task.equation = text(key, values)?,
        "title" => task.title = Some(text(key, values)?),
        "x_min" => task.x_min = float(key, values)?,
        "x_max" => task.x_max = float(key, values)?,
        "y_min" => task.y_min = float(key, values)?,
        "y_max" => task.y_max = float(key, values)?,
        "tick_step" => task.tick_step = float(key, values)?,
        "function" => {
            let name = text(key, values)?;
            task.function = TrigFunction::from_str(&name)
                .map_err(|_| format!("unknown function '{}', expected sin, cos or tan", name))?;
        }
        "center" => task.center = pair_of_floats(key, values)?,
        "radius" => task.radius = float(key, values)?,
        "start_angle" => task.start_angle = float(key, values)?,
        "end_angle" => task.end_angle = float(key, values)?,
        "lower_bound" => task.lower_bound = float(key, values)?,
        "area" => task.area = Some(pair_of_floats(key, values)?),
        "show_original" => {
            task.show_original = single(key, values)?
                .as_boolean()
                .ok_or_else(|| format!("{} must be true or false", key))?;
        }
        "samples" => {
            let n = single(key, values)?
                .as_integer()
                .filter(|n| *n >= 0)
                .ok_or_else(|| format!("{} must be a non-negative integer", key))?;
            task.samples = Some(n as usize);
        }
        other => match values {
            [value] if value.as_float().is_some() => {
                task.coefficients
                    .insert(other.to_string(), value.as_float().unwrap_or_default());
            }
            _ => return Err(format!("unknown key '{}'", other)),
        },
    }
    Ok(())
}

pub fn task_from_section(section: &Section, index: usize) -> Result<GraphTask, GraphError> {
    if section.title != SECTION_TITLE {
        return Err(form_error(
            index,
            format!("unexpected section '{}', expected '{}'", section.title, SECTION_TITLE),
        ));
    }
    let mut task = GraphTask::default();
    for (key, values) in &section.pairs {
        // `key:` with nothing after it leaves the default
        if values.is_empty() {
            continue;
        }
        apply_key(&mut task, key, values).map_err(|e| form_error(index, e))?;
    }
    debug!("form section {} -> {:?}", index, task);
    Ok(task)
}

/// All `graph` sections of a form document, in order.
pub fn tasks_from_document(text: &str) -> Result<Vec<GraphTask>, GraphError> {
    let sections = parse_document_as(text)?;
    let tasks = sections
        .iter()
        .enumerate()
        .map(|(i, section)| task_from_section(section, i + 1))
        .collect::<Result<Vec<_>, _>>()?;
    info!("form document with {} graph(s)", tasks.len());
    Ok(tasks)
}

fn write_pair(out: &mut String, key: &str, values: &[Value]) {
    let joined = values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let _ = writeln!(out, "  {}: {}", key, joined);
}

/// `key: "text"`, failing on what a quoted form value cannot hold
fn write_quoted(out: &mut String, index: usize, key: &str, text: &str) -> Result<(), GraphError> {
    if text.contains(['"', '\n', '\r']) {
        return Err(form_error(
            index,
            format!("{} cannot contain quotes or line breaks: {:?}", key, text),
        ));
    }
    let _ = writeln!(out, "  {}: \"{}\"", key, text);
    Ok(())
}

/// Writes tasks as a form document, keeping only the keys that matter for each graph type.
pub fn to_document(tasks: &[GraphTask]) -> Result<String, GraphError> {
    let mut out = String::new();
    for (i, task) in tasks.iter().enumerate() {
        let _ = writeln!(out, "{}", SECTION_TITLE);
        let num = |v: f64| vec![Value::Float(v)];
        write_pair(&mut out, "graph_type", &[Value::String(task.graph_type.to_string())]);
        // always quoted, an equation is never a number or a list
        write_quoted(&mut out, i + 1, "equation", &task.equation)?;
        if let Some(title) = &task.title {
            write_quoted(&mut out, i + 1, "title", title)?;
        }
        write_pair(&mut out, "x_min", &num(task.x_min));
        write_pair(&mut out, "x_max", &num(task.x_max));
        write_pair(&mut out, "y_min", &num(task.y_min));
        write_pair(&mut out, "y_max", &num(task.y_max));
        write_pair(&mut out, "tick_step", &num(task.tick_step));
        if let Some(n) = task.samples {
            write_pair(&mut out, "samples", &[Value::Integer(n as i64)]);
        }
        match task.graph_type {
            GraphType::Trigonometric => {
                write_pair(&mut out, "function", &[Value::String(task.function.to_string())]);
            }
            GraphType::Derivative => {
                write_pair(&mut out, "show_original", &[Value::Boolean(task.show_original)]);
            }
            GraphType::Integral => {
                write_pair(&mut out, "lower_bound", &num(task.lower_bound));
                if let Some([a, b]) = task.area {
                    write_pair(&mut out, "area", &[Value::Float(a), Value::Float(b)]);
                }
                write_pair(&mut out, "show_original", &[Value::Boolean(task.show_original)]);
            }
            GraphType::Circle | GraphType::Sector => {
                let [h, k] = task.center;
                write_pair(&mut out, "center", &[Value::Float(h), Value::Float(k)]);
                write_pair(&mut out, "radius", &num(task.radius));
                if task.graph_type == GraphType::Sector {
                    write_pair(&mut out, "start_angle", &num(task.start_angle));
                    write_pair(&mut out, "end_angle", &num(task.end_angle));
                }
            }
            GraphType::Linear | GraphType::Polynomial => {}
        }
        for (name, value) in &task.coefficients {
            write_pair(&mut out, name, &num(*value));
        }
    }
    Ok(out)
}

/// the task a blank form of this type starts from
pub fn template_task(graph_type: GraphType) -> GraphTask {
    let mut task = GraphTask {
        graph_type,
        ..Default::default()
    };
    let coefficients: &[(&str, f64)] = match graph_type {
        GraphType::Linear => &[("a", 1.0), ("b", 0.0)],
        GraphType::Polynomial | GraphType::Derivative => &[("a", 1.0), ("b", 0.0), ("c", 0.0)],
        GraphType::Trigonometric => &[("a", 1.0), ("b", 1.0), ("c", 0.0), ("d", 0.0)],
        GraphType::Integral => {
            task.area = Some([0.0, 1.0]);
            &[("a", 1.0), ("b", 0.0), ("c", 0.0)]
        }
        GraphType::Circle | GraphType::Sector => &[],
    };
    for (name, value) in coefficients {
        task.coefficients.insert(name.to_string(), *value);
    }
    task
}

/// A blank form for one graph of the given type, pre-filled with the defaults.
pub fn template(graph_type: GraphType) -> Result<String, GraphError> {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "// {} graph: fill in the equation or the coefficients, repeat the section for more graphs",
        graph_type
    );
    out.push_str(&to_document(&[template_task(graph_type)])?);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_document_to_tasks() {
        let document = r#"
// two graphs
graph
  graph_type: linear
  equation: "y = 2x + 3"
  x_min: -5
  x_max: 5
graph
  graph_type: circle
  center: 1, -2
  radius: 3
  title: "unit circle, shifted"
"#;
        let tasks = tasks_from_document(document).unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].equation, "y = 2x + 3");
        assert_eq!((tasks[0].x_min, tasks[0].x_max), (-5.0, 5.0));
        assert_eq!(tasks[1].graph_type, GraphType::Circle);
        assert_eq!(tasks[1].center, [1.0, -2.0]);
        assert_eq!(tasks[1].title.as_deref(), Some("unit circle, shifted"));
    }

    #[test]
    fn test_numeric_keys_become_coefficients() {
        let tasks = tasks_from_document("graph graph_type: trigonometric function: cos a: 2 d: -1").unwrap();
        assert_eq!(tasks[0].function, TrigFunction::Cos);
        assert_eq!(tasks[0].coefficient("a", 1.0), 2.0);
        assert_eq!(tasks[0].coefficient("d", 0.0), -1.0);
    }

    #[test]
    fn test_unquoted_equation() {
        let tasks = tasks_from_document("graph equation: y=|x-1|").unwrap();
        assert_eq!(tasks[0].equation, "y=|x-1|");
    }

    #[test]
    fn test_form_errors() {
        let err = tasks_from_document("graph graph_type: spiral").unwrap_err();
        assert!(err.to_string().contains("unknown graph type 'spiral'"));
        let err = tasks_from_document("graph x_min: 1\ngraph center: 1").unwrap_err();
        assert!(err.to_string().contains("graph section 2"));
        assert!(tasks_from_document("graph colour: red").is_err());
        assert!(tasks_from_document("plot x_min: 1").is_err());
        assert!(tasks_from_document("// nothing here\n").is_err());
    }

    #[test]
    fn test_template_round_trip() {
        for graph_type in GraphType::iter() {
            let text = template(graph_type).unwrap();
            let tasks = tasks_from_document(&text).unwrap();
            assert_eq!(tasks, vec![template_task(graph_type)], "template of {}", graph_type);
        }
    }

    #[test]
    fn test_to_document_keeps_optional_fields() {
        let mut task = GraphTask::new(GraphType::Integral, "x^2");
        task.area = Some([-1.0, 2.5]);
        task.samples = Some(500);
        task.title = Some("area under x^2".to_string());
        task.show_original = false;
        let tasks = tasks_from_document(&to_document(&[task.clone()]).unwrap()).unwrap();
        assert_eq!(tasks, vec![task]);
    }

    #[test]
    fn test_to_document_rejects_quotes() {
        let mut task = GraphTask::new(GraphType::Linear, "y = 2x");
        task.title = Some(r#"the "steep" line"#.to_string());
        let err = to_document(&[GraphTask::new(GraphType::Linear, "y = x"), task]).unwrap_err();
        assert!(matches!(err, GraphError::Form(_)));
        assert!(err.to_string().contains("graph section 2"));
        assert!(err.to_string().contains("title"));

        let task = GraphTask::new(GraphType::Polynomial, "x^2\ngraph_type: circle");
        let err = to_document(&[task]).unwrap_err();
        assert!(err.to_string().contains("equation"));

        // single quotes are fine and come back unchanged
        let mut task = GraphTask::new(GraphType::Linear, "y = x");
        task.title = Some("f'(x) of y = x".to_string());
        let tasks = tasks_from_document(&to_document(&[task.clone()]).unwrap()).unwrap();
        assert_eq!(tasks, vec![task]);
    }
}
