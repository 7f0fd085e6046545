//! Structural description of a finished architecture, handed to renderers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::nn::LayerKind;
use crate::shape::ShapeRecord;

/// A stage whose computed width or height is not a whole number.
///
/// Not an error: construction goes on with the fractional shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonIntegerOutput {
    pub layer_index: usize,
    pub block: String,
    pub width: f64,
    pub height: f64,
}

impl fmt::Display for NonIntegerOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "float outputs from layer {} in `{}`: {}x{}",
            self.layer_index, self.block, self.width, self.height
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDescriptor {
    pub index: usize,
    /// Index of the owning block in [`Design::blocks`].
    pub block: usize,
    pub kind: LayerKind,
    pub input: ShapeRecord,
    pub output: ShapeRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<NonIntegerOutput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDescriptor {
    pub name: String,
    pub layer_indices: Vec<usize>,
}

impl BlockDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            layer_indices: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Design {
    pub layers: Vec<LayerDescriptor>,
    pub blocks: Vec<BlockDescriptor>,
    #[serde(default)]
    pub warnings: Vec<NonIntegerOutput>,
}

impl Design {
    pub fn block_layers<'a>(
        &'a self,
        block: &'a BlockDescriptor,
    ) -> impl Iterator<Item = &'a LayerDescriptor> + 'a {
        block
            .layer_indices
            .iter()
            .filter_map(|&index| self.layers.get(index))
    }

    pub fn block(&self, name: &str) -> Option<&BlockDescriptor> {
        self.blocks.iter().find(|block| block.name == name)
    }

    /// The shape leaving the last stage, if any.
    pub fn output(&self) -> Option<ShapeRecord> {
        self.layers.last().map(|layer| layer.output)
    }

    pub fn into_parts(self) -> (Vec<LayerDescriptor>, Vec<BlockDescriptor>) {
        (self.layers, self.blocks)
    }
}
