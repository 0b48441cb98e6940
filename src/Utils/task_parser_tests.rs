/////////////////////////////TESTS////////////////////////////////////////////////////
/*
comprehensive tests:
Basic parsing test
Mixed type parsing test
Quoted strings test
Repeated sections test
Empty document test
Malformed document test
File-based parsing test
*/

#[cfg(test)]
mod tests1 {

    use crate::Utils::task_parser::{
        Value, parse_document, parse_document_as, parse_key, parse_key_value_pair, parse_section,
        parse_title, parse_value, parse_value_list,
    };
    #[test]
    fn test_parse_title() {
        // Basic title
        let (remaining, title) = parse_title("title1\n key1: value1").unwrap();
        assert_eq!(title, "title1");
        assert_eq!(remaining, "key1: value1");

        // Title with underscore
        let (remaining, title) = parse_title("title_with_underscore key1: value1").unwrap();
        assert_eq!(title, "title_with_underscore");
        assert_eq!(remaining, "key1: value1");
    }

    #[test]
    fn test_parse_key() {
        let (remaining, key) = parse_key("x_min: -5").unwrap();
        assert_eq!(key, "x_min");
        assert_eq!(remaining, ": -5");

        // Key with numbers
        let (remaining, key) = parse_key("c12: 1").unwrap();
        assert_eq!(key, "c12");
        assert_eq!(remaining, ": 1");
    }

    #[test]
    fn test_parse_value() {
        // String value
        let (remaining, value) = parse_value("linear, next").unwrap();
        assert_eq!(value, Value::String("linear".to_string()));
        assert_eq!(remaining, ", next");

        // Integer value
        let (remaining, value) = parse_value("-123, next").unwrap();
        assert_eq!(value, Value::Integer(-123));
        assert_eq!(remaining, ", next");

        // Float value
        let (remaining, value) = parse_value("1.5e-3 next").unwrap();
        assert_eq!(value, Value::Float(1.5e-3));
        assert_eq!(remaining, " next");

        // Boolean value
        let (remaining, value) = parse_value("true;").unwrap();
        assert_eq!(value, Value::Boolean(true));
        assert_eq!(remaining, ";");

        // Quoted value keeps spaces and commas
        let (remaining, value) = parse_value("\"y = |x - 1|, shifted\" rest").unwrap();
        assert_eq!(value, Value::String("y = |x - 1|, shifted".to_string()));
        assert_eq!(remaining, " rest");

        // Quoted number stays a string
        let (_, value) = parse_value("\"42\"").unwrap();
        assert_eq!(value, Value::String("42".to_string()));
    }

    #[test]
    fn test_parse_value_list() {
        // Mixed type list
        let (remaining, values) = parse_value_list("cos, 123, 45.67, true").unwrap();
        assert_eq!(
            values,
            vec![
                Value::String("cos".to_string()),
                Value::Integer(123),
                Value::Float(45.67),
                Value::Boolean(true)
            ]
        );
        assert_eq!(remaining, "");

        // Empty list
        let (remaining, values) = parse_value_list("").unwrap();
        assert_eq!(values, Vec::<Value>::new());
        assert_eq!(remaining, "");

        // values never continue on the next line
        let (remaining, values) = parse_value_list("\nkey: 1").unwrap();
        assert!(values.is_empty());
        assert_eq!(remaining, "\nkey: 1");
    }

    #[test]
    fn test_parse_key_value_pair() {
        let (remaining, (key, values)) = parse_key_value_pair("center : 1 , -2").unwrap();
        assert_eq!(key, "center");
        assert_eq!(values, vec![Value::Integer(1), Value::Integer(-2)]);
        assert_eq!(remaining, "");

        // With trailing text
        let (remaining, (key, values)) = parse_key_value_pair("radius: 2;").unwrap();
        assert_eq!(key, "radius");
        assert_eq!(values, vec![Value::Integer(2)]);
        assert_eq!(remaining, ";");

        // Empty value list
        let (remaining, (key, values)) = parse_key_value_pair("title:").unwrap();
        assert_eq!(key, "title");
        assert_eq!(values, Vec::<Value>::new());
        assert_eq!(remaining, "");
    }

    #[test]
    fn test_parse_section() {
        let input = "graph graph_type: linear equation: \"2x + 3\" x_min: -5 graph";
        let (remaining, section) = parse_section(input).unwrap();
        assert_eq!(section.title, "graph");
        assert_eq!(section.pairs.len(), 3);
        assert_eq!(
            section.get("equation").unwrap(),
            &vec![Value::String("2x + 3".to_string())]
        );
        assert_eq!(section.get("x_min").unwrap(), &vec![Value::Integer(-5)]);
        assert_eq!(remaining, "graph");

        // a repeated key keeps the last values
        let (_, section) = parse_section("graph a: 1 a: 2").unwrap();
        assert_eq!(section.get("a").unwrap(), &vec![Value::Integer(2)]);
        assert_eq!(section.pairs.len(), 2);
    }

    #[test]
    fn test_parse_document_keeps_order_and_repeats() {
        let input = "graph\n graph_type: circle\ngraph\n graph_type: sector\nsettings\n width: 10";
        let (remaining, doc) = parse_document(input).unwrap();
        assert_eq!(remaining, "");
        let titles: Vec<&str> = doc.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["graph", "graph", "settings"]);
        assert_eq!(
            doc[1].get("graph_type").unwrap(),
            &vec![Value::String("sector".to_string())]
        );
    }

    #[test]
    fn test_parse_document_with_comments() {
        let input = "// header\n# another\ngraph\n  % inline comment line\n  x_min: -1\n; trailing\n";
        let doc = parse_document_as(input).unwrap();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc[0].get("x_min").unwrap(), &vec![Value::Integer(-1)]);
    }

    #[test]
    fn test_parse_document_empty_and_malformed() {
        assert!(parse_document("").is_err());
        assert!(parse_document_as("   \n").is_err());
        // title without pairs
        assert!(parse_document_as("graph").is_err());
        // garbage after a valid section
        let err = parse_document_as("graph x_min: 1\n: 2").unwrap_err();
        assert!(err.to_string().contains("Remaining"));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Float(2.0).to_string(), "2.0");
        assert_eq!(Value::String("a b".to_string()).to_string(), "\"a b\"");
        assert_eq!(Value::String(String::new()).to_string(), "\"\"");
        assert_eq!(Value::Integer(3).as_float(), Some(3.0));
    }
}

#[cfg(test)]
mod tests2 {
    use crate::Utils::form::tasks_from_document;
    use crate::Utils::task_parser::parse_document_as;
    use crate::graphs::graph_task::GraphType;
    use std::fs::File;
    use std::io::{Read, Write};
    use tempfile::tempdir;

    #[test]
    fn test_parse_document_from_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("graphs.form");
        let mut file = File::create(&file_path).unwrap();
        writeln!(file, "// generated").unwrap();
        writeln!(file, "graph").unwrap();
        writeln!(file, "  graph_type: derivative").unwrap();
        writeln!(file, "  equation: \"sin(x) * x\"").unwrap();
        writeln!(file, "  show_original: false").unwrap();
        writeln!(file, "graph").unwrap();
        writeln!(file, "  graph_type: integral").unwrap();
        writeln!(file, "  equation: \"1/x\"").unwrap();
        writeln!(file, "  lower_bound: 1").unwrap();
        writeln!(file, "  area: 1, 2.5").unwrap();
        drop(file);

        let mut content = String::new();
        File::open(&file_path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        let sections = parse_document_as(&content).unwrap();
        assert_eq!(sections.len(), 2);

        let tasks = tasks_from_document(&content).unwrap();
        assert_eq!(tasks[0].graph_type, GraphType::Derivative);
        assert_eq!(tasks[0].equation, "sin(x) * x");
        assert!(!tasks[0].show_original);
        assert_eq!(tasks[1].lower_bound, 1.0);
        assert_eq!(tasks[1].area, Some([1.0, 2.5]));
    }

    #[test]
    fn test_windows_line_endings() {
        let content = "graph\r\n  graph_type: polynomial\r\n  c2: 1\r\n";
        let tasks = tasks_from_document(content).unwrap();
        assert_eq!(tasks[0].graph_type, GraphType::Polynomial);
        assert_eq!(tasks[0].coefficient("c2", 0.0), 1.0);
    }
}
