use derive_new::new;
use serde::{Deserialize, Serialize};

use super::{non_degenerate, positive_pair, spatial_input, LayerKind, Propagate, Stage};
use crate::config::DesignerOptions;
use crate::error::Result;
use crate::shape::ShapeRecord;

fn default_size() -> [usize; 2] {
    [2, 2]
}

/// Max pooling; the window doubles as the stride.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, new)]
pub struct PoolConfig {
    #[serde(default = "default_size")]
    pub size: [usize; 2],
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new(default_size())
    }
}

impl Propagate for PoolConfig {
    const OP: &'static str = "add_pool";

    fn propagate(&self, input: &ShapeRecord, _options: &DesignerOptions) -> Result<Stage> {
        let (channels, in_width, in_height) = spatial_input(Self::OP, input)?;
        positive_pair("pool size", self.size)?;

        let [pw, ph] = self.size;
        let width = in_width / pw as f64;
        let height = in_height / ph as f64;
        non_degenerate(Self::OP, width, height)?;

        Ok(Stage {
            kind: LayerKind::Pool { size: self.size },
            output: ShapeRecord::spatial(channels, width, height),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DesignError;

    #[test]
    fn halves_each_dimension() {
        let stage = PoolConfig::default()
            .propagate(
                &ShapeRecord::spatial(64, 32.0, 16.0),
                &DesignerOptions::default(),
            )
            .unwrap();
        assert_eq!(stage.output, ShapeRecord::spatial(64, 16.0, 8.0));
        assert_eq!(stage.kind, LayerKind::Pool { size: [2, 2] });
    }

    #[test]
    fn odd_input_gives_fractional_output() {
        let stage = PoolConfig::new([2, 2])
            .propagate(&ShapeRecord::spatial(8, 7.0, 8.0), &DesignerOptions::default())
            .unwrap();
        assert_eq!(stage.output, ShapeRecord::spatial(8, 3.5, 4.0));
        assert!(!stage.output.is_integral());
    }

    #[test]
    fn zero_window_is_rejected() {
        assert!(matches!(
            PoolConfig::new([0, 2]).propagate(
                &ShapeRecord::spatial(8, 8.0, 8.0),
                &DesignerOptions::default()
            ),
            Err(DesignError::InvalidParameter(_))
        ));
    }
}
