use thiserror::Error;

use crate::shape::ShapeKind;

#[derive(Debug, Error)]
pub enum DesignError {
    #[error("Specify the number of input channels and the image size first")]
    UninitializedShape,

    #[error("No block is open: call `open_block` before adding layers")]
    NoOpenBlock,

    #[error("`{op}` cannot be applied to a {found} shape")]
    ShapeKind { op: &'static str, found: ShapeKind },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("`{op}` produces an empty output of {width}x{height}")]
    DegenerateShape {
        op: &'static str,
        width: f64,
        height: f64,
    },

    #[error("Step {index}: {source}")]
    Step {
        index: usize,
        #[source]
        source: Box<DesignError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DesignError>;
