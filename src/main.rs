#![allow(non_snake_case)]
use RustedGraphs::Utils::config::RenderConfig;
use RustedGraphs::Utils::form::{tasks_from_document, template};
use RustedGraphs::Utils::logger::{init_logger, save_images, save_series_to_csv};
use RustedGraphs::graphs::curves::build_figure;
use RustedGraphs::graphs::graph_task::{GraphRequest, GraphResponse, GraphTask, GraphType};
use RustedGraphs::graphs::pipeline::process_tasks;
use RustedGraphs::graphs::render::ImageFormat;
use RustedGraphs::symbolic::linear_parser::LinearEquation;
use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use log::info;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tabled::{builder::Builder, settings::Style};

#[derive(Debug, Parser)]
#[command(
    name = "rusted_graphs",
    about = "Render 2D function graphs (linear, polynomial, trigonometric, derivative, integral, circle, sector) as base64 images",
    version,
    propagate_version = true
)]
struct Cli {
    /// Global: render settings (TOML)
    #[arg(long = "config", value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Global: off, error, warn, info, debug or trace (overrides the config)
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    log_level: Option<String>,

    /// Global: log file, or a directory for a timestamped one
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Args)]
struct Output {
    /// Image format (overrides the config)
    #[arg(long = "format", value_name = "FORMAT")]
    format: Option<ImageFormat>,

    /// Prefix images with `data:<mime>;base64,`
    #[arg(long = "data-uri", action = ArgAction::SetTrue)]
    data_uri: bool,

    /// Write graph_<n>.<ext> files into this directory instead of printing JSON
    #[arg(short = 'o', long = "out", value_name = "DIR")]
    out: Option<PathBuf>,

    /// Also write the sampled curves of every graph as graph_<n>.csv into this directory
    #[arg(long = "csv", value_name = "DIR")]
    csv: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render a JSON request `{"graphs": [...]}` (file or `-` for stdin)
    Render {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        #[command(flatten)]
        output: Output,
    },
    /// Render the graph sections of a form document
    Form {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        #[command(flatten)]
        output: Output,
    },
    /// Render one graph straight from the command line
    ///
    /// Examples:
    ///   rusted_graphs plot "y = 2x + 3" -o out
    ///   rusted_graphs plot "sin(x)/x" --graph-type derivative
    ///   rusted_graphs plot --graph-type polynomial --coef a=1 --coef c=-4
    Plot {
        #[arg(value_name = "EQUATION")]
        equation: Option<String>,
        #[arg(long = "graph-type", value_name = "TYPE", default_value = "linear")]
        graph_type: GraphType,
        /// Coefficient used when there is no equation, repeatable
        #[arg(long = "coef", value_name = "NAME=VALUE", value_parser = parse_coefficient, allow_hyphen_values = true)]
        coefficients: Vec<(String, f64)>,
        #[arg(long = "x-min", allow_hyphen_values = true)]
        x_min: Option<f64>,
        #[arg(long = "x-max", allow_hyphen_values = true)]
        x_max: Option<f64>,
        #[command(flatten)]
        output: Output,
    },
    /// Print a blank form document for one graph type
    Template {
        #[arg(value_name = "TYPE", default_value = "linear")]
        graph_type: GraphType,
    },
    /// Show the coefficients of linear equations like "y = 2x + 3" or "|x - 1|"
    Parse {
        #[arg(value_name = "EQUATION", required = true)]
        equations: Vec<String>,
    },
}

fn parse_coefficient(arg: &str) -> Result<(String, f64), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", arg))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("coefficient {}: {}", name, e))?;
    Ok((name.trim().to_string(), value))
}

fn read_input(input: &Path) -> Result<String> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("cannot read stdin")?;
        Ok(text)
    } else {
        fs::read_to_string(input).with_context(|| format!("cannot read {}", input.display()))
    }
}

fn write_output(
    tasks: &[GraphTask],
    output: &Output,
    config: &RenderConfig,
) -> Result<()> {
    let mut config = config.clone();
    if let Some(format) = output.format {
        config.format = format;
    }
    config.data_uri |= output.data_uri;

    if let Some(dir) = &output.csv {
        fs::create_dir_all(dir).with_context(|| format!("cannot create {}", dir.display()))?;
        for (i, task) in tasks.iter().enumerate() {
            let figure = build_figure(task, &config).map_err(|e| e.in_graph(i + 1))?;
            save_series_to_csv(&figure, &dir.join(format!("graph_{}.csv", i + 1)))?;
        }
    }

    let response: GraphResponse = process_tasks(tasks, &config)?;
    match &output.out {
        Some(dir) => {
            let paths = save_images(dir, &response.images, config.format)?;
            info!("{} image(s) written to {}", paths.len(), dir.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&response)?),
    }
    Ok(())
}

fn parse_table(equations: &[String]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["input", "a", "b", "absolute", "equation"]);
    for input in equations {
        match input.parse::<LinearEquation>() {
            Ok(eq) => builder.push_record([
                input.clone(),
                eq.a.to_string(),
                eq.b.to_string(),
                eq.absolute.to_string(),
                eq.to_string(),
            ]),
            Err(e) => builder.push_record([
                input.clone(),
                String::new(),
                String::new(),
                String::new(),
                format!("error: {}", e),
            ]),
        }
    }
    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.to_string()
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(path) = &cli.log_file {
        config.log_file = Some(path.clone());
    }
    init_logger(&config.log_level, config.log_file.as_deref())?;

    match cli.cmd {
        Command::Render { input, output } => {
            let text = read_input(&input)?;
            let request: GraphRequest = serde_json::from_str(&text)
                .with_context(|| format!("invalid JSON format in {}", input.display()))?;
            write_output(&request.graphs, &output, &config)?;
        }
        Command::Form { input, output } => {
            let text = read_input(&input)?;
            let tasks = tasks_from_document(&text)?;
            write_output(&tasks, &output, &config)?;
        }
        Command::Plot {
            equation,
            graph_type,
            coefficients,
            x_min,
            x_max,
            output,
        } => {
            let mut task = GraphTask::new(graph_type, equation.as_deref().unwrap_or(""));
            task.coefficients.extend(coefficients);
            if let Some(x_min) = x_min {
                task.x_min = x_min;
            }
            if let Some(x_max) = x_max {
                task.x_max = x_max;
            }
            write_output(&[task], &output, &config)?;
        }
        Command::Template { graph_type } => print!("{}", template(graph_type)?),
        Command::Parse { equations } => println!("{}", parse_table(&equations)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_plot_arguments() {
        let cli = Cli::parse_from([
            "rusted_graphs",
            "plot",
            "x^3",
            "--graph-type",
            "Polynomial",
            "--x-min",
            "-2",
            "--format",
            "svg",
            "--log-level",
            "off",
        ]);
        assert_eq!(cli.log_level.as_deref(), Some("off"));
        match cli.cmd {
            Command::Plot {
                equation,
                graph_type,
                x_min,
                output,
                ..
            } => {
                assert_eq!(equation.as_deref(), Some("x^3"));
                assert_eq!(graph_type, GraphType::Polynomial);
                assert_eq!(x_min, Some(-2.0));
                assert_eq!(output.format, Some(ImageFormat::Svg));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_coefficient_flags() {
        let cli = Cli::parse_from(["rusted_graphs", "plot", "--coef", "a=2", "--coef", "c=-4"]);
        match cli.cmd {
            Command::Plot {
                equation,
                coefficients,
                ..
            } => {
                assert!(equation.is_none());
                assert_eq!(
                    coefficients,
                    vec![("a".to_string(), 2.0), ("c".to_string(), -4.0)]
                );
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert!(parse_coefficient("a2").is_err());
        assert!(parse_coefficient("a=two").is_err());
    }

    #[test]
    fn test_parse_table() {
        let table = parse_table(&["y = 2x + 3".to_string(), "y = x^2".to_string()]);
        assert!(table.contains("y = 2x + 3"));
        assert!(table.contains("error"));
    }

    #[test]
    fn test_write_output_to_directory() {
        let dir = tempfile::tempdir().unwrap();
        let output = Output {
            format: Some(ImageFormat::Svg),
            data_uri: false,
            out: Some(dir.path().join("images")),
            csv: Some(dir.path().join("csv")),
        };
        let config = RenderConfig {
            width: 120,
            height: 100,
            samples: 50,
            draw_labels: false,
            ..RenderConfig::default()
        };
        let tasks = vec![GraphTask::new(GraphType::Linear, "y = -x")];
        write_output(&tasks, &output, &config).unwrap();
        assert!(dir.path().join("images/graph_1.svg").exists());
        assert!(dir.path().join("csv/graph_1.csv").exists());
    }
}
