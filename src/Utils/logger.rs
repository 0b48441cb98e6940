use crate::graphs::curves::Figure;
use crate::graphs::errors::GraphError;
use crate::graphs::pipeline::decode_image;
use crate::graphs::render::ImageFormat;
use chrono::Local;
use csv::Writer;
use log::{LevelFilter, info};
use nalgebra::DMatrix;
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// `None` means logging is switched off
pub fn level_filter(level: &str) -> Result<Option<LevelFilter>, GraphError> {
    let filter = match level.to_ascii_lowercase().as_str() {
        "off" | "none" => return Ok(None),
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        other => {
            return Err(GraphError::Config(format!(
                "log level must be off, error, warn, info, debug or trace, got '{}'",
                other
            )));
        }
    };
    Ok(Some(filter))
}

/// A directory gets a timestamped `log_<date>.txt` inside it, anything else is used as the file name.
pub fn log_file_path(log_file: &Path) -> PathBuf {
    if log_file.is_dir() {
        let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
        log_file.join(format!("log_{}.txt", date_and_time))
    } else {
        log_file.to_path_buf()
    }
}

/// Terminal logger plus an optional file logger. A second call keeps the first logger.
pub fn init_logger(level: &str, log_file: Option<&Path>) -> Result<(), GraphError> {
    let Some(level) = level_filter(level)? else {
        return Ok(());
    };
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = log_file {
        let path = log_file_path(path);
        let file = File::create(&path)?;
        loggers.push(WriteLogger::new(level, Config::default(), file));
    }
    if CombinedLogger::init(loggers).is_ok() {
        info!("logging at level {}", level);
    }
    Ok(())
}

/// Writes base64 images as `graph_<n>.<ext>` (1-based) and returns the written paths.
pub fn save_images(
    dir: &Path,
    images: &[String],
    format: ImageFormat,
) -> Result<Vec<PathBuf>, GraphError> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(images.len());
    for (i, image) in images.iter().enumerate() {
        let path = dir.join(format!("graph_{}.{}", i + 1, format.extension()));
        fs::write(&path, decode_image(image)?)?;
        info!("saved {}", path.display());
        written.push(path);
    }
    Ok(written)
}

/// Sampled points as columns: an `x` and a `y` column per series. Segments of a
/// series are separated by one NaN row and shorter series are padded with NaN.
pub fn series_matrix(figure: &Figure) -> (Vec<String>, DMatrix<f64>) {
    let columns: Vec<Vec<(f64, f64)>> = figure
        .series
        .iter()
        .map(|series| {
            let mut points = Vec::new();
            for (i, segment) in series.segments.iter().enumerate() {
                if i > 0 {
                    points.push((f64::NAN, f64::NAN));
                }
                points.extend_from_slice(segment);
            }
            points
        })
        .collect();
    let rows = columns.iter().map(|c| c.len()).max().unwrap_or(0);
    let mut matrix = DMatrix::from_element(rows, 2 * columns.len(), f64::NAN);
    for (j, points) in columns.iter().enumerate() {
        for (i, &(x, y)) in points.iter().enumerate() {
            matrix[(i, 2 * j)] = x;
            matrix[(i, 2 * j + 1)] = y;
        }
    }
    let headers = figure
        .series
        .iter()
        .flat_map(|s| [format!("{} x", s.label), format!("{} y", s.label)])
        .collect();
    (headers, matrix)
}

pub fn save_series_to_csv(figure: &Figure, filename: &Path) -> Result<(), GraphError> {
    let (headers, matrix) = series_matrix(figure);
    let file = File::create(filename)?;
    let mut writer = Writer::from_writer(file);
    writer.write_record(&headers)?;
    for row in matrix.row_iter() {
        let row_data: Vec<String> = row
            .iter()
            .map(|&val| if val.is_nan() { String::new() } else { val.to_string() })
            .collect();
        writer.write_record(&row_data)?;
    }
    writer.flush()?;
    info!("series of '{}' saved to {}", figure.title, filename.display());
    Ok(())
}
