//! Declarative design of layered convolutional networks.
//!
//! An [`ArchitectureBuilder`] records stages (conv blocks, pooling, dropout,
//! flattening, fully-connected blocks, softmax) into named blocks while
//! threading the tensor shape through them. The finished [`Design`] is plain
//! data that a [`render::Renderer`] turns into a script.
//!
//! ```
//! use net_designer::{conv_block, ArchitectureBuilder, PoolConfig};
//! use net_designer::render::{Renderer, TorchRenderer};
//!
//! let mut builder = ArchitectureBuilder::with_input(3, 32, 32)?;
//! builder.open_block("features");
//! builder
//!     .add_conv_block(conv_block!(64, kernel_size = 3, padding = 1))?
//!     .add_pool(PoolConfig::default())?;
//! builder.open_block("classifier");
//! builder.add_view()?.add_fc(10usize)?;
//!
//! let script = TorchRenderer::default().render(&builder.finalize())?;
//! assert!(script.contains("classifier:add(nn.Linear(16384, 10))"));
//! # Ok::<(), net_designer::DesignError>(())
//! ```

pub mod builder;
pub mod config;
pub mod design;
pub mod error;
pub mod nn;
pub mod plan;
pub mod presets;
pub mod render;
pub mod shape;

pub use builder::ArchitectureBuilder;
pub use config::{ConvHeightMode, DesignerOptions, InputConfig};
pub use design::{BlockDescriptor, Design, LayerDescriptor, NonIntegerOutput};
pub use error::{DesignError, Result};
pub use nn::{
    ConvBlockConfig, DropoutConfig, FcBlockConfig, FcConfig, Flatten, LayerKind, OutFeatures,
    PoolConfig, Propagate, Softmax,
};
pub use plan::{DesignPlan, Step};
pub use shape::{ShapeEntry, ShapeKind, ShapeRecord, ShapeTracker};
