use serde::{Deserialize, Serialize};

use super::{spatial_input, LayerKind, Propagate, Stage};
use crate::config::DesignerOptions;
use crate::error::{DesignError, Result};
use crate::shape::ShapeRecord;

/// Flattens `channels x width x height` feature maps into a feature vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flatten;

impl Propagate for Flatten {
    const OP: &'static str = "add_view";

    fn propagate(&self, input: &ShapeRecord, _options: &DesignerOptions) -> Result<Stage> {
        let (channels, width, height) = spatial_input(Self::OP, input)?;
        // truncated, as the target framework expects a whole element count
        let features = (channels as f64 * width * height) as usize;
        if features == 0 {
            return Err(DesignError::DegenerateShape {
                op: Self::OP,
                width,
                height,
            });
        }

        Ok(Stage {
            kind: LayerKind::View { features },
            output: ShapeRecord::features(features),
        })
    }
}
