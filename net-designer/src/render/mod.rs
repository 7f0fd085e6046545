//! Serialization of a [`Design`] into a target syntax.

use crate::design::Design;
use crate::error::Result;

pub mod json;
pub mod torch;

pub use json::JsonRenderer;
pub use torch::TorchRenderer;

pub trait Renderer {
    fn render(&self, design: &Design) -> Result<String>;
}
