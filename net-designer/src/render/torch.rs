//! Torch 7 (Lua) script output.
//!
//! Every block becomes a `local <name> = nn.Sequential()` container followed by
//! its `<name>:add(...)` statements, and a final `model` container adds the
//! blocks in declaration order. Conv and pooling statements carry a
//! `-- WxH -> W'xH'` comment.

use itertools::Itertools;

use super::Renderer;
use crate::design::{Design, LayerDescriptor};
use crate::error::Result;
use crate::nn::LayerKind;
use crate::shape::ShapeRecord;

#[derive(Debug, Clone)]
pub struct TorchRenderer {
    pub shape_comments: bool,
    pub model_name: String,
}

impl Default for TorchRenderer {
    fn default() -> Self {
        Self {
            shape_comments: true,
            model_name: "model".to_string(),
        }
    }
}

impl TorchRenderer {
    pub fn with_shape_comments(mut self, shape_comments: bool) -> Self {
        self.shape_comments = shape_comments;
        self
    }

    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    fn shape_comment(&self, input: &ShapeRecord, output: &ShapeRecord) -> String {
        match (input.extent(), output.extent()) {
            (Some((iw, ih)), Some((ow, oh))) if self.shape_comments => format!(
                " -- {}x{} -> {}x{}",
                iw as i64, ih as i64, ow as i64, oh as i64
            ),
            _ => String::new(),
        }
    }

    fn layer(&self, block: &str, layer: &LayerDescriptor) -> String {
        let comment = self.shape_comment(&layer.input, &layer.output);
        match layer.kind {
            LayerKind::Conv {
                in_channels,
                out_channels,
                kernel_size: [kw, kh],
                stride: [sw, sh],
                padding: [pw, ph],
                norm_eps,
                activation_slope,
            } => format!(
                "{block}:add(nn.SpatialConvolution({in_channels}, {out_channels}, {kw}, {kh}, {sw}, {sh}, {pw}, {ph}))\n\
                 {block}:add(nn.SpatialBatchNormalization({out_channels}, {norm_eps}))\n\
                 {block}:add(nn.LeakyReLU({activation_slope},true)){comment}"
            ),
            LayerKind::Pool { size: [pw, ph] } => {
                format!("{block}:add(nn.SpatialMaxPooling({pw}, {ph})){comment}")
            }
            LayerKind::Dropout { probability } => {
                format!("{block}:add(nn.Dropout({probability}))")
            }
            LayerKind::View { features } => format!("{block}:add(nn.View({features}))"),
            LayerKind::FcBlock {
                in_features,
                out_features,
                norm_eps,
                activation_slope,
            } => format!(
                "{block}:add(nn.Linear({in_features}, {out_features}))\n\
                 {block}:add(nn.BatchNormalization({out_features}, {norm_eps}))\n\
                 {block}:add(nn.LeakyReLU({activation_slope},true))"
            ),
            LayerKind::Fc {
                in_features,
                out_features,
            } => format!("{block}:add(nn.Linear({in_features}, {out_features}))"),
            LayerKind::Softmax => format!("{block}:add(nn.LogSoftMax())"),
        }
    }
}

impl Renderer for TorchRenderer {
    fn render(&self, design: &Design) -> Result<String> {
        let mut entries = Vec::new();
        for block in &design.blocks {
            entries.push(format!("local {} = nn.Sequential()", block.name));
            entries.extend(
                design
                    .block_layers(block)
                    .map(|layer| self.layer(&block.name, layer)),
            );
        }
        entries.push(format!(
            "{} = nn.Sequential(){}",
            self.model_name,
            design
                .blocks
                .iter()
                .map(|block| format!(":add({})", block.name))
                .join("")
        ));

        Ok(entries.into_iter().join("\n\n") + "\n")
    }
}
