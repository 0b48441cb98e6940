use crate::symbolic::parse_expr::ParseError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("invalid JSON format: {0}")]
    InvalidJson(#[from] serde_json::Error),
    /// failure of one graph of a request, `index` is 1-based
    #[error("graph {index}: {source}")]
    Graph {
        index: usize,
        source: Box<GraphError>,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("invalid graph parameters: {0}")]
    Validation(String),
    #[error("rendering failed: {0}")]
    Render(String),
    #[error("form document: {0}")]
    Form(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("image is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl GraphError {
    pub fn in_graph(self, index: usize) -> GraphError {
        GraphError::Graph {
            index,
            source: Box::new(self),
        }
    }
}
