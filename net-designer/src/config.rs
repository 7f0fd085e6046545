use derive_new::new;
use serde::{Deserialize, Serialize};

/// Which input dimension feeds the height of a convolution output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvHeightMode {
    /// Height is computed from the input *width*, as the Torch 7 designer
    /// always did. Only square inputs get the expected result.
    #[default]
    MirrorWidth,
    /// Height is computed from the input height.
    FromHeight,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct DesignerOptions {
    #[serde(default)]
    pub conv_height: ConvHeightMode,
}

/// Input shape given up front instead of through the setters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct InputConfig {
    pub channels: usize,
    pub width: usize,
    pub height: usize,
}
