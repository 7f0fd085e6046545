use derive_new::new;
use serde::{Deserialize, Serialize};

use super::{
    default_activation_slope, default_norm_eps, LayerKind, Propagate, Stage,
    DEFAULT_ACTIVATION_SLOPE, DEFAULT_NORM_EPS,
};
use crate::config::DesignerOptions;
use crate::error::{DesignError, Result};
use crate::shape::ShapeRecord;

/// Width of a fully-connected stage.
///
/// Written as `-1` in plans, where it means "as wide as the previous stage".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum OutFeatures {
    Same,
    Exact(usize),
}

impl OutFeatures {
    pub fn resolve(self, in_features: usize) -> usize {
        match self {
            Self::Same => in_features,
            Self::Exact(n) => n,
        }
    }
}

impl From<usize> for OutFeatures {
    fn from(n: usize) -> Self {
        Self::Exact(n)
    }
}

impl TryFrom<i64> for OutFeatures {
    type Error = DesignError;

    fn try_from(n: i64) -> Result<Self> {
        match n {
            -1 => Ok(Self::Same),
            n if n > 0 => Ok(Self::Exact(n as usize)),
            n => Err(DesignError::InvalidParameter(format!(
                "output features must be positive or -1, got {n}"
            ))),
        }
    }
}

impl From<OutFeatures> for i64 {
    fn from(out: OutFeatures) -> Self {
        match out {
            OutFeatures::Same => -1,
            OutFeatures::Exact(n) => n as i64,
        }
    }
}

fn resolve_features(out_features: OutFeatures, input: &ShapeRecord) -> Result<(usize, usize)> {
    let in_features = input.channels();
    let out = out_features.resolve(in_features);
    if out == 0 {
        return Err(DesignError::InvalidParameter(
            "output features must be greater than 0".to_string(),
        ));
    }
    Ok((in_features, out))
}

/// Linear layer followed by batch normalization and a leaky ReLU.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, new)]
pub struct FcBlockConfig {
    pub out_features: OutFeatures,
    #[new(value = "DEFAULT_NORM_EPS")]
    #[serde(default = "default_norm_eps")]
    pub norm_eps: f64,
    #[new(value = "DEFAULT_ACTIVATION_SLOPE")]
    #[serde(default = "default_activation_slope")]
    pub activation_slope: f64,
}

impl FcBlockConfig {
    pub fn with_norm_eps(mut self, norm_eps: f64) -> Self {
        self.norm_eps = norm_eps;
        self
    }

    pub fn with_activation_slope(mut self, activation_slope: f64) -> Self {
        self.activation_slope = activation_slope;
        self
    }
}

impl Propagate for FcBlockConfig {
    const OP: &'static str = "add_fc_block";

    fn propagate(&self, input: &ShapeRecord, _options: &DesignerOptions) -> Result<Stage> {
        let (in_features, out_features) = resolve_features(self.out_features, input)?;
        Ok(Stage {
            kind: LayerKind::FcBlock {
                in_features,
                out_features,
                norm_eps: self.norm_eps,
                activation_slope: self.activation_slope,
            },
            output: ShapeRecord::features(out_features),
        })
    }
}

/// Bare linear layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct FcConfig {
    pub out_features: OutFeatures,
}

impl Propagate for FcConfig {
    const OP: &'static str = "add_fc";

    fn propagate(&self, input: &ShapeRecord, _options: &DesignerOptions) -> Result<Stage> {
        let (in_features, out_features) = resolve_features(self.out_features, input)?;
        Ok(Stage {
            kind: LayerKind::Fc {
                in_features,
                out_features,
            },
            output: ShapeRecord::features(out_features),
        })
    }
}
