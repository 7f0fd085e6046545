//! Layer vocabulary: one config type per stage, each knowing how it reshapes
//! its input.

use serde::{Deserialize, Serialize};

use crate::config::DesignerOptions;
use crate::error::{DesignError, Result};
use crate::shape::ShapeRecord;

pub mod activation;
pub mod conv;
pub mod dropout;
pub mod flatten;
pub mod linear;
pub mod pool;

pub use activation::*;
pub use conv::*;
pub use dropout::*;
pub use flatten::*;
pub use linear::*;
pub use pool::*;

pub const DEFAULT_NORM_EPS: f64 = 1e-3;
pub const DEFAULT_ACTIVATION_SLOPE: f64 = 0.1;

pub(crate) fn default_norm_eps() -> f64 {
    DEFAULT_NORM_EPS
}

pub(crate) fn default_activation_slope() -> f64 {
    DEFAULT_ACTIVATION_SLOPE
}

/// A resolved stage, with every size known at the time it was appended.
///
/// Conv and FC blocks fold their normalization and activation into the same
/// variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerKind {
    Conv {
        in_channels: usize,
        out_channels: usize,
        kernel_size: [usize; 2],
        stride: [usize; 2],
        padding: [usize; 2],
        norm_eps: f64,
        activation_slope: f64,
    },
    Pool {
        size: [usize; 2],
    },
    Dropout {
        probability: f64,
    },
    View {
        features: usize,
    },
    FcBlock {
        in_features: usize,
        out_features: usize,
        norm_eps: f64,
        activation_slope: f64,
    },
    Fc {
        in_features: usize,
        out_features: usize,
    },
    Softmax,
}

impl LayerKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Conv { .. } => "conv",
            Self::Pool { .. } => "pool",
            Self::Dropout { .. } => "dropout",
            Self::View { .. } => "view",
            Self::FcBlock { .. } => "fc_block",
            Self::Fc { .. } => "fc",
            Self::Softmax => "softmax",
        }
    }

    /// Stages whose output extent is computed and therefore checked for
    /// integrality.
    pub fn resizes_extent(&self) -> bool {
        matches!(self, Self::Conv { .. } | Self::Pool { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stage {
    pub kind: LayerKind,
    pub output: ShapeRecord,
}

/// Shape arithmetic of one stage.
///
/// Implementations validate their own parameters and never see an
/// uninitialized shape: the builder checks that before calling in.
pub trait Propagate {
    /// Name of the builder operation, used in error messages.
    const OP: &'static str;

    fn propagate(&self, input: &ShapeRecord, options: &DesignerOptions) -> Result<Stage>;
}

pub(crate) fn spatial_input(op: &'static str, input: &ShapeRecord) -> Result<(usize, f64, f64)> {
    match *input {
        ShapeRecord::Spatial {
            channels,
            width,
            height,
        } => Ok((channels, width, height)),
        ShapeRecord::Features { .. } => Err(DesignError::ShapeKind {
            op,
            found: input.kind(),
        }),
    }
}

pub(crate) fn positive(name: &str, value: usize) -> Result<()> {
    if value == 0 {
        return Err(DesignError::InvalidParameter(format!(
            "{name} must be greater than 0"
        )));
    }
    Ok(())
}

pub(crate) fn positive_pair(name: &str, [w, h]: [usize; 2]) -> Result<()> {
    if w == 0 || h == 0 {
        return Err(DesignError::InvalidParameter(format!(
            "{name} must be greater than 0, got {w}x{h}"
        )));
    }
    Ok(())
}

pub(crate) fn non_degenerate(op: &'static str, width: f64, height: f64) -> Result<()> {
    if width <= 0.0 || height <= 0.0 {
        return Err(DesignError::DegenerateShape { op, width, height });
    }
    Ok(())
}
