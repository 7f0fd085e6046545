use derive_new::new;
use serde::{Deserialize, Serialize};

use super::{LayerKind, Propagate, Stage};
use crate::config::DesignerOptions;
use crate::error::Result;
use crate::shape::ShapeRecord;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, new)]
pub struct DropoutConfig {
    pub probability: f64,
}

impl Propagate for DropoutConfig {
    const OP: &'static str = "add_dropout";

    fn propagate(&self, input: &ShapeRecord, _options: &DesignerOptions) -> Result<Stage> {
        if !(0.0..1.0).contains(&self.probability) {
            log::warn!(
                "dropout probability {} is outside of [0, 1)",
                self.probability
            );
        }

        Ok(Stage {
            kind: LayerKind::Dropout {
                probability: self.probability,
            },
            output: *input,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_shape() {
        let options = DesignerOptions::default();
        for input in [ShapeRecord::spatial(3, 7.5, 7.5), ShapeRecord::features(512)] {
            let stage = DropoutConfig::new(0.4).propagate(&input, &options).unwrap();
            assert_eq!(stage.output, input);
        }
    }

    #[test]
    fn out_of_range_probability_is_accepted() {
        let stage = DropoutConfig::new(1.5)
            .propagate(&ShapeRecord::features(4), &DesignerOptions::default())
            .unwrap();
        assert_eq!(stage.kind, LayerKind::Dropout { probability: 1.5 });
    }
}
