use crate::config::DesignerOptions;
use crate::design::{BlockDescriptor, Design, LayerDescriptor, NonIntegerOutput};
use crate::error::{DesignError, Result};
use crate::nn::{
    ConvBlockConfig, DropoutConfig, FcBlockConfig, FcConfig, Flatten, OutFeatures, PoolConfig,
    Propagate, Softmax, Stage,
};
use crate::shape::{ShapeRecord, ShapeTracker};

/// Builds a [`ConvBlockConfig`] with square kernel, stride and padding.
///
/// ```
/// use net_designer::conv_block;
///
/// let config = conv_block!(64, kernel_size = 3, padding = 1);
/// assert_eq!(config.padding, [1, 1]);
/// ```
#[macro_export]
macro_rules! conv_block {
        ({$builder:expr}$(,)?) => {
            $builder
        };

        ({$builder:expr} , padding=$padding:expr $(, $($rest:tt)*)?) => {
            $crate::conv_block!({ $builder.with_padding([$padding, $padding]) } $(, $($rest)*)?)
        };

        ({$builder:expr} , stride=$stride:expr $(, $($rest:tt)*)?) => {
            $crate::conv_block!({ $builder.with_stride([$stride, $stride]) } $(, $($rest)*)?)
        };

        ({$builder:expr} , norm_eps=$eps:expr $(, $($rest:tt)*)?) => {
            $crate::conv_block!({ $builder.with_norm_eps($eps) } $(, $($rest)*)?)
        };

        ({$builder:expr} , slope=$slope:expr $(, $($rest:tt)*)?) => {
            $crate::conv_block!({ $builder.with_activation_slope($slope) } $(, $($rest)*)?)
        };

        ($c_out:expr, kernel_size = $kernel_size:expr $(, $($rest:tt)*)?) => {
            $crate::conv_block!({$crate::nn::ConvBlockConfig::new($c_out, [$kernel_size, $kernel_size])} $(, $($rest)*)?)
        };
    }

/// Describes a layered network one stage at a time while tracking the shape
/// flowing between stages.
///
/// Layer-adding calls need both the channel count and the spatial size to be
/// known, and a block to be open. A failing call leaves the builder untouched.
#[derive(Debug, Clone, Default)]
pub struct ArchitectureBuilder {
    options: DesignerOptions,
    shapes: ShapeTracker,
    layers: Vec<LayerDescriptor>,
    blocks: Vec<BlockDescriptor>,
    warnings: Vec<NonIntegerOutput>,
}

impl ArchitectureBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DesignerOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Builder seeded with `channels x width x height` input.
    pub fn with_input(channels: usize, width: usize, height: usize) -> Result<Self> {
        let mut builder = Self::new();
        builder.set_spatial_size(width, height)?;
        builder.set_channels(channels)?;
        Ok(builder)
    }

    pub fn options(&self) -> &DesignerOptions {
        &self.options
    }

    /// Appends a channel count to the shape history.
    ///
    /// Every call appends, so call it once, before any layer.
    pub fn set_channels(&mut self, channels: usize) -> Result<&mut Self> {
        if channels == 0 {
            return Err(DesignError::InvalidParameter(
                "channel count must be greater than 0".to_string(),
            ));
        }
        self.shapes.push_channels(channels);
        Ok(self)
    }

    /// Appends an image size to the shape history.
    ///
    /// Every call appends, so call it once, before any layer.
    pub fn set_spatial_size(&mut self, width: usize, height: usize) -> Result<&mut Self> {
        if width == 0 || height == 0 {
            return Err(DesignError::InvalidParameter(format!(
                "spatial size must be greater than 0, got {width}x{height}"
            )));
        }
        self.shapes.push_extent(width as f64, height as f64);
        Ok(self)
    }

    /// Opens a new block that receives every following layer.
    ///
    /// Names are not checked: opening "features" twice gives two blocks.
    pub fn open_block(&mut self, name: impl Into<String>) -> &mut Self {
        let block = BlockDescriptor::new(name);
        log::debug!("block {} `{}`", self.blocks.len(), block.name);
        self.blocks.push(block);
        self
    }

    pub fn add_conv_block(&mut self, config: ConvBlockConfig) -> Result<&mut Self> {
        self.add(&config)
    }

    pub fn add_pool(&mut self, config: PoolConfig) -> Result<&mut Self> {
        self.add(&config)
    }

    pub fn add_dropout(&mut self, probability: f64) -> Result<&mut Self> {
        self.add(&DropoutConfig::new(probability))
    }

    pub fn add_view(&mut self) -> Result<&mut Self> {
        self.add(&Flatten)
    }

    pub fn add_fc_block(&mut self, config: FcBlockConfig) -> Result<&mut Self> {
        self.add(&config)
    }

    pub fn add_fc(&mut self, out_features: impl Into<OutFeatures>) -> Result<&mut Self> {
        self.add(&FcConfig::new(out_features.into()))
    }

    pub fn add_softmax(&mut self) -> Result<&mut Self> {
        self.add(&Softmax)
    }

    /// Appends any stage to the current block.
    pub fn add<P: Propagate>(&mut self, stage: &P) -> Result<&mut Self> {
        let input = self.shapes.peek()?;
        let block = self
            .blocks
            .len()
            .checked_sub(1)
            .ok_or(DesignError::NoOpenBlock)?;
        let Stage { kind, output } = stage.propagate(&input, &self.options)?;

        let index = self.layers.len();
        let block_name = &self.blocks[block].name;
        let warning = match output.extent() {
            Some((width, height)) if kind.resizes_extent() && !output.is_integral() => {
                Some(NonIntegerOutput {
                    layer_index: index,
                    block: block_name.clone(),
                    width,
                    height,
                })
            }
            _ => None,
        };
        if let Some(warning) = &warning {
            log::warn!("{warning}");
            self.warnings.push(warning.clone());
        }
        log::debug!(
            "{block_name}[{index}]: {} {input} -> {output}",
            kind.name()
        );

        self.layers.push(LayerDescriptor {
            index,
            block,
            kind,
            input,
            output,
            warning,
        });
        self.blocks[block].layer_indices.push(index);
        self.shapes.push(output);
        Ok(self)
    }

    /// Snapshot of everything declared so far.
    pub fn finalize(&self) -> Design {
        Design {
            layers: self.layers.clone(),
            blocks: self.blocks.clone(),
            warnings: self.warnings.clone(),
        }
    }

    pub fn shapes(&self) -> &ShapeTracker {
        &self.shapes
    }

    pub fn current_shape(&self) -> Result<ShapeRecord> {
        self.shapes.peek()
    }

    pub fn current_block(&self) -> Option<&BlockDescriptor> {
        self.blocks.last()
    }

    pub fn layers(&self) -> &[LayerDescriptor] {
        &self.layers
    }

    pub fn blocks(&self) -> &[BlockDescriptor] {
        &self.blocks
    }

    pub fn warnings(&self) -> &[NonIntegerOutput] {
        &self.warnings
    }
}
