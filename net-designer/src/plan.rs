//! Architectures written down as JSON instead of code.
//!
//! ```json
//! {
//!   "input": { "channels": 3, "width": 32, "height": 32 },
//!   "steps": [
//!     { "op": "block", "name": "features" },
//!     { "op": "conv_block", "out_channels": 64, "kernel_size": [3, 3], "padding": [1, 1] },
//!     { "op": "pool" },
//!     { "op": "block", "name": "classifier" },
//!     { "op": "view" },
//!     { "op": "fc", "out_features": 10 }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::builder::ArchitectureBuilder;
use crate::config::{DesignerOptions, InputConfig};
use crate::error::{DesignError, Result};
use crate::nn::{ConvBlockConfig, FcBlockConfig, FcConfig, PoolConfig};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    SetChannels { channels: usize },
    SetSpatialSize { width: usize, height: usize },
    Block { name: String },
    ConvBlock(ConvBlockConfig),
    Pool(PoolConfig),
    Dropout { probability: f64 },
    View,
    FcBlock(FcBlockConfig),
    Fc(FcConfig),
    Softmax,
}

impl Step {
    pub fn apply(&self, builder: &mut ArchitectureBuilder) -> Result<()> {
        match self {
            Self::SetChannels { channels } => {
                builder.set_channels(*channels)?;
            }
            Self::SetSpatialSize { width, height } => {
                builder.set_spatial_size(*width, *height)?;
            }
            Self::Block { name } => {
                builder.open_block(name.as_str());
            }
            Self::ConvBlock(config) => {
                builder.add_conv_block(*config)?;
            }
            Self::Pool(config) => {
                builder.add_pool(*config)?;
            }
            Self::Dropout { probability } => {
                builder.add_dropout(*probability)?;
            }
            Self::View => {
                builder.add_view()?;
            }
            Self::FcBlock(config) => {
                builder.add_fc_block(*config)?;
            }
            Self::Fc(config) => {
                builder.add_fc(config.out_features)?;
            }
            Self::Softmax => {
                builder.add_softmax()?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignPlan {
    #[serde(default)]
    pub input: Option<InputConfig>,
    #[serde(default)]
    pub options: DesignerOptions,
    pub steps: Vec<Step>,
}

impl DesignPlan {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        contents.parse()
    }

    /// Replays the plan on a fresh builder.
    ///
    /// A failing step is reported with its position in `steps`.
    pub fn build(&self) -> Result<ArchitectureBuilder> {
        let mut builder = ArchitectureBuilder::with_options(self.options);
        if let Some(input) = self.input {
            builder
                .set_spatial_size(input.width, input.height)?
                .set_channels(input.channels)?;
        }
        for (index, step) in self.steps.iter().enumerate() {
            step.apply(&mut builder).map_err(|source| DesignError::Step {
                index,
                source: Box::new(source),
            })?;
        }
        Ok(builder)
    }
}

impl FromStr for DesignPlan {
    type Err = DesignError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConvHeightMode;
    use crate::nn::OutFeatures;
    use crate::shape::ShapeRecord;

    #[test]
    fn parses_every_op() {
        let plan: DesignPlan = r#"{
            "options": { "conv_height": "from_height" },
            "steps": [
                { "op": "set_channels", "channels": 1 },
                { "op": "set_spatial_size", "width": 28, "height": 28 },
                { "op": "block", "name": "features" },
                { "op": "conv_block", "out_channels": 8, "kernel_size": [5, 5] },
                { "op": "pool", "size": [2, 2] },
                { "op": "dropout", "probability": 0.25 },
                { "op": "block", "name": "classifier" },
                { "op": "view" },
                { "op": "fc_block", "out_features": -1, "activation_slope": 0.2 },
                { "op": "fc", "out_features": 10 },
                { "op": "softmax" }
            ]
        }"#
        .parse()
        .unwrap();

        assert_eq!(plan.input, None);
        assert_eq!(plan.options.conv_height, ConvHeightMode::FromHeight);
        assert_eq!(plan.steps.len(), 11);
        assert_eq!(plan.steps[3], Step::ConvBlock(ConvBlockConfig::new(8, [5, 5])));
        assert_eq!(plan.steps[4], Step::Pool(PoolConfig::default()));
        assert_eq!(
            plan.steps[8],
            Step::FcBlock(FcBlockConfig::new(OutFeatures::Same).with_activation_slope(0.2))
        );

        let builder = plan.build().unwrap();
        let design = builder.finalize();
        assert_eq!(design.layers.len(), 7);
        assert_eq!(design.blocks.len(), 2);
        // 28 -> conv 5x5 -> 24 -> pool -> 12; 8 * 12 * 12
        assert_eq!(design.layers[3].output, ShapeRecord::features(1152));
        assert_eq!(builder.current_shape().unwrap(), ShapeRecord::features(1));
    }

    #[test]
    fn failing_step_is_located() {
        let plan: DesignPlan = r#"{
            "input": { "channels": 3, "width": 32, "height": 32 },
            "steps": [
                { "op": "block", "name": "classifier" },
                { "op": "view" },
                { "op": "view" }
            ]
        }"#
        .parse()
        .unwrap();

        match plan.build() {
            Err(DesignError::Step { index, source }) => {
                assert_eq!(index, 2);
                assert!(matches!(*source, DesignError::ShapeKind { .. }));
            }
            other => panic!("expected a step error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_op_is_a_json_error() {
        let result = r#"{ "steps": [ { "op": "upsample" } ] }"#.parse::<DesignPlan>();
        assert!(matches!(result, Err(DesignError::Json(_))));
    }
}
