//! # Request processing
//!
//! `{"graphs": [...]}` in, `{"images": [...]}` out: every graph is validated,
//! sampled, rendered and base64 encoded, in input order. The first graph that fails
//! stops the request and the error names its 1-based position.
//!
//! # Example
//! ```
//! use RustedGraphs::Utils::config::RenderConfig;
//! use RustedGraphs::graphs::pipeline::process_json;
//! let config = RenderConfig { width: 120, height: 100, draw_labels: false, ..Default::default() };
//! let response = process_json(r#"{"graphs": [{"equation": "y = |x - 1|"}]}"#, &config).unwrap();
//! assert_eq!(response.images.len(), 1);
//! ```
use crate::Utils::config::RenderConfig;
use crate::graphs::curves::build_figure;
use crate::graphs::errors::GraphError;
use crate::graphs::graph_task::{GraphRequest, GraphResponse, GraphTask};
use crate::graphs::render::{ImageFormat, render};
use base64::{Engine as _, engine::general_purpose};
use log::{error, info};
use std::time::Instant;

/// validated, sampled and rendered image bytes of one graph
pub fn render_task(task: &GraphTask, config: &RenderConfig) -> Result<Vec<u8>, GraphError> {
    let figure = build_figure(task, config)?;
    render(&figure, config)
}

pub fn process_tasks(tasks: &[GraphTask], config: &RenderConfig) -> Result<GraphResponse, GraphError> {
    let begin = Instant::now();
    let mut images = Vec::with_capacity(tasks.len());
    for (i, task) in tasks.iter().enumerate() {
        let bytes = render_task(task, config).map_err(|e| {
            error!("graph {} failed: {}", i + 1, e);
            e.in_graph(i + 1)
        })?;
        images.push(encode_image(&bytes, config.format, config.data_uri));
    }
    info!(
        "{} graph(s) rendered in {:.3} s",
        images.len(),
        begin.elapsed().as_secs_f64()
    );
    Ok(GraphResponse { images })
}

pub fn process_request(request: &GraphRequest, config: &RenderConfig) -> Result<GraphResponse, GraphError> {
    process_tasks(&request.graphs, config)
}

pub fn process_json(text: &str, config: &RenderConfig) -> Result<GraphResponse, GraphError> {
    let request: GraphRequest = serde_json::from_str(text)?;
    process_request(&request, config)
}

/// standard base64, optionally as a `data:` URI ready for an `<img src>`
pub fn encode_image(bytes: &[u8], format: ImageFormat, data_uri: bool) -> String {
    let encoded = general_purpose::STANDARD.encode(bytes);
    if data_uri {
        format!("data:{};base64,{}", format.mime(), encoded)
    } else {
        encoded
    }
}

/// inverse of `encode_image`, the `data:` prefix is optional
pub fn decode_image(image: &str) -> Result<Vec<u8>, GraphError> {
    let payload = match image.split_once(";base64,") {
        Some((prefix, payload)) if prefix.starts_with("data:") => payload,
        _ => image,
    };
    Ok(general_purpose::STANDARD.decode(payload.trim())?)
}
