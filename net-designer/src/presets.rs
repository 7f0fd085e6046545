//! Ready-made architectures.

use crate::builder::ArchitectureBuilder;
use crate::conv_block;
use crate::error::Result;
use crate::nn::{FcBlockConfig, OutFeatures, PoolConfig};

pub const PRESETS: &[&str] = &["cifar-vgg", "mnist-classifier"];

pub fn by_name(name: &str) -> Option<Result<ArchitectureBuilder>> {
    match name {
        "cifar-vgg" => Some(cifar_vgg()),
        "mnist-classifier" => Some(mnist_classifier()),
        _ => None,
    }
}

/// VGG-style network for 3x32x32 images with a 10-way regression head.
pub fn cifar_vgg() -> Result<ArchitectureBuilder> {
    let mut builder = ArchitectureBuilder::new();
    builder.set_channels(3)?.set_spatial_size(32, 32)?;

    builder.open_block("features");
    builder
        .add_conv_block(conv_block!(64, kernel_size = 3, padding = 1))?
        .add_dropout(0.3)?
        .add_conv_block(conv_block!(64, kernel_size = 3, padding = 1))?
        .add_pool(PoolConfig::new([2, 2]))?
        .add_conv_block(conv_block!(128, kernel_size = 3, padding = 1))?
        .add_dropout(0.4)?
        .add_conv_block(conv_block!(128, kernel_size = 3, padding = 1))?
        .add_pool(PoolConfig::new([2, 2]))?;

    builder.open_block("regressor");
    builder
        .add_view()?
        .add_dropout(0.4)?
        .add_fc_block(FcBlockConfig::new(OutFeatures::Same))?
        .add_fc_block(FcBlockConfig::new(OutFeatures::Exact(1024)))?
        .add_fc(10usize)?;

    Ok(builder)
}

/// Two conv/pool stages on 1x28x28 digits, log-softmax over 10 classes.
pub fn mnist_classifier() -> Result<ArchitectureBuilder> {
    let mut builder = ArchitectureBuilder::with_input(1, 28, 28)?;

    builder.open_block("features");
    builder
        .add_conv_block(conv_block!(32, kernel_size = 5, padding = 2))?
        .add_pool(PoolConfig::default())?
        .add_conv_block(conv_block!(64, kernel_size = 5, padding = 2))?
        .add_pool(PoolConfig::default())?;

    builder.open_block("classifier");
    builder
        .add_view()?
        .add_fc_block(FcBlockConfig::new(OutFeatures::Exact(512)))?
        .add_dropout(0.5)?
        .add_fc(10usize)?
        .add_softmax()?;

    Ok(builder)
}
