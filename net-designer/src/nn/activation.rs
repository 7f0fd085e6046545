use serde::{Deserialize, Serialize};

use super::{LayerKind, Propagate, Stage};
use crate::config::DesignerOptions;
use crate::error::Result;
use crate::shape::ShapeRecord;

/// Log-softmax classification head.
///
/// The tracked feature count is reset to 1 afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Softmax;

impl Propagate for Softmax {
    const OP: &'static str = "add_softmax";

    fn propagate(&self, _input: &ShapeRecord, _options: &DesignerOptions) -> Result<Stage> {
        Ok(Stage {
            kind: LayerKind::Softmax,
            output: ShapeRecord::features(1),
        })
    }
}
