//! Rendering and logging settings, read from a TOML file:
//! ```toml
//! width = 1200
//! height = 900
//! format = "svg"
//! draw_labels = true
//! log_level = "debug"
//! ```
//! Missing keys keep their defaults.
use crate::graphs::errors::GraphError;
use crate::graphs::graph_task::MAX_SAMPLES;
use crate::graphs::render::ImageFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// image size in pixels, 10 x 8 inches at 100 dpi
    pub width: u32,
    pub height: u32,
    /// samples per curve when the graph does not set its own
    pub samples: usize,
    pub line_width: u32,
    /// width of the x = 0 and y = 0 axes
    pub axis_width: u32,
    pub font_family: String,
    pub title_font_size: u32,
    pub label_font_size: u32,
    /// false renders no text at all: no title, tick labels or legend
    pub draw_labels: bool,
    pub format: ImageFormat,
    /// prefix encoded images with `data:<mime>;base64,`
    pub data_uri: bool,
    /// upper bound on grid lines per axis, the tick step is doubled until it fits
    pub max_ticks: usize,
    pub log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            width: 1000,
            height: 800,
            samples: 1000,
            line_width: 2,
            axis_width: 2,
            font_family: "sans-serif".to_string(),
            title_font_size: 32,
            label_font_size: 20,
            draw_labels: true,
            format: ImageFormat::Png,
            data_uri: false,
            max_ticks: 40,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl RenderConfig {
    pub fn from_toml(text: &str) -> Result<Self, GraphError> {
        let config: RenderConfig =
            toml::from_str(text).map_err(|e| GraphError::Config(e.to_string()))?;
        config.check()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, GraphError> {
        let text = fs::read_to_string(path)
            .map_err(|e| GraphError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml(&text)
    }

    pub fn to_toml(&self) -> Result<String, GraphError> {
        toml::to_string(self).map_err(|e| GraphError::Config(e.to_string()))
    }

    fn check(&self) -> Result<(), GraphError> {
        if self.width < 16 || self.height < 16 {
            return Err(GraphError::Config(format!(
                "image size {}x{} is too small",
                self.width, self.height
            )));
        }
        if !(2..=MAX_SAMPLES).contains(&self.samples) {
            return Err(GraphError::Config(format!(
                "samples must be between 2 and {}, got {}",
                MAX_SAMPLES, self.samples
            )));
        }
        if self.max_ticks < 2 {
            return Err(GraphError::Config("max_ticks must be at least 2".to_string()));
        }
        Ok(())
    }
}
