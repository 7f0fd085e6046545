use derive_new::new;
use serde::{Deserialize, Serialize};

use super::{
    default_activation_slope, default_norm_eps, non_degenerate, positive, positive_pair,
    spatial_input, LayerKind, Propagate, Stage, DEFAULT_ACTIVATION_SLOPE, DEFAULT_NORM_EPS,
};
use crate::config::{ConvHeightMode, DesignerOptions};
use crate::error::Result;
use crate::shape::ShapeRecord;

fn default_stride() -> [usize; 2] {
    [1, 1]
}

/// Convolution followed by batch normalization and a leaky ReLU.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, new)]
pub struct ConvBlockConfig {
    pub out_channels: usize,
    pub kernel_size: [usize; 2],
    #[new(value = "[1, 1]")]
    #[serde(default = "default_stride")]
    pub stride: [usize; 2],
    #[new(value = "[0, 0]")]
    #[serde(default)]
    pub padding: [usize; 2],
    #[new(value = "DEFAULT_NORM_EPS")]
    #[serde(default = "default_norm_eps")]
    pub norm_eps: f64,
    #[new(value = "DEFAULT_ACTIVATION_SLOPE")]
    #[serde(default = "default_activation_slope")]
    pub activation_slope: f64,
}

impl ConvBlockConfig {
    pub fn with_stride(mut self, stride: [usize; 2]) -> Self {
        self.stride = stride;
        self
    }

    pub fn with_padding(mut self, padding: [usize; 2]) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_norm_eps(mut self, norm_eps: f64) -> Self {
        self.norm_eps = norm_eps;
        self
    }

    pub fn with_activation_slope(mut self, activation_slope: f64) -> Self {
        self.activation_slope = activation_slope;
        self
    }
}

/// `(input + 2 * padding - kernel) / stride + 1`, kept fractional.
pub fn conv_output_extent(input: f64, kernel: usize, stride: usize, padding: usize) -> f64 {
    (input + 2.0 * padding as f64 - kernel as f64) / stride as f64 + 1.0
}

impl Propagate for ConvBlockConfig {
    const OP: &'static str = "add_conv_block";

    fn propagate(&self, input: &ShapeRecord, options: &DesignerOptions) -> Result<Stage> {
        let (in_channels, in_width, in_height) = spatial_input(Self::OP, input)?;
        positive("out_channels", self.out_channels)?;
        positive_pair("kernel_size", self.kernel_size)?;
        positive_pair("stride", self.stride)?;

        let [kw, kh] = self.kernel_size;
        let [sw, sh] = self.stride;
        let [pw, ph] = self.padding;

        let width = conv_output_extent(in_width, kw, sw, pw);
        let height_input = match options.conv_height {
            ConvHeightMode::MirrorWidth => in_width,
            ConvHeightMode::FromHeight => in_height,
        };
        let height = conv_output_extent(height_input, kh, sh, ph);
        non_degenerate(Self::OP, width, height)?;

        Ok(Stage {
            kind: LayerKind::Conv {
                in_channels,
                out_channels: self.out_channels,
                kernel_size: self.kernel_size,
                stride: self.stride,
                padding: self.padding,
                norm_eps: self.norm_eps,
                activation_slope: self.activation_slope,
            },
            output: ShapeRecord::spatial(self.out_channels, width, height),
        })
    }
}
