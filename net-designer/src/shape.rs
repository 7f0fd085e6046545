//! Shape bookkeeping shared by every layer-adding operation.
//!
//! The tracker is an append-only history: only the most recent entry is ever
//! read, nothing is popped, so the full sequence of shapes stays available for
//! summaries and diagnostics.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DesignError, Result};

/// The tensor shape available as input to the next stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeRecord {
    /// Feature maps before flattening. Width and height may be fractional when
    /// a previous stage had a non-integer output.
    Spatial {
        channels: usize,
        width: f64,
        height: f64,
    },
    /// A flat feature vector.
    Features { features: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Spatial,
    Features,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spatial => write!(f, "spatial"),
            Self::Features => write!(f, "feature-only"),
        }
    }
}

impl ShapeRecord {
    pub fn spatial(channels: usize, width: f64, height: f64) -> Self {
        Self::Spatial {
            channels,
            width,
            height,
        }
    }

    pub fn features(features: usize) -> Self {
        Self::Features { features }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Spatial { .. } => ShapeKind::Spatial,
            Self::Features { .. } => ShapeKind::Features,
        }
    }

    /// Channel count of a spatial record, feature count of a flat one.
    pub fn channels(&self) -> usize {
        match *self {
            Self::Spatial { channels, .. } => channels,
            Self::Features { features } => features,
        }
    }

    pub fn extent(&self) -> Option<(f64, f64)> {
        match *self {
            Self::Spatial { width, height, .. } => Some((width, height)),
            Self::Features { .. } => None,
        }
    }

    /// `false` when a spatial dimension is fractional.
    pub fn is_integral(&self) -> bool {
        match self.extent() {
            Some((width, height)) => width.fract() == 0.0 && height.fract() == 0.0,
            None => true,
        }
    }
}

impl fmt::Display for ShapeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Spatial {
                channels,
                width,
                height,
            } => write!(f, "{channels}x{width}x{height}"),
            Self::Features { features } => write!(f, "{features}"),
        }
    }
}

/// One step of the shape history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeEntry {
    /// Only part of the input shape has been declared so far.
    Partial {
        channels: Option<usize>,
        extent: Option<(f64, f64)>,
    },
    Complete(ShapeRecord),
}

impl ShapeEntry {
    pub fn record(&self) -> Option<&ShapeRecord> {
        match self {
            Self::Partial { .. } => None,
            Self::Complete(record) => Some(record),
        }
    }
}

impl fmt::Display for ShapeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Complete(record) => write!(f, "{record}"),
            Self::Partial { channels, extent } => {
                match channels {
                    Some(channels) => write!(f, "{channels}")?,
                    None => write!(f, "?")?,
                }
                match extent {
                    Some((width, height)) => write!(f, "x{width}x{height}"),
                    None => write!(f, "x?x?"),
                }
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ShapeTracker {
    history: Vec<ShapeEntry>,
}

impl ShapeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, shape: ShapeRecord) {
        self.history.push(ShapeEntry::Complete(shape));
    }

    /// Declares the channel count, keeping the latest known extent.
    pub fn push_channels(&mut self, channels: usize) {
        let entry = match self.history.last() {
            Some(ShapeEntry::Complete(ShapeRecord::Spatial { width, height, .. })) => {
                ShapeEntry::Complete(ShapeRecord::spatial(channels, *width, *height))
            }
            Some(ShapeEntry::Complete(ShapeRecord::Features { .. })) => {
                ShapeEntry::Complete(ShapeRecord::features(channels))
            }
            Some(ShapeEntry::Partial {
                extent: Some((width, height)),
                ..
            }) => ShapeEntry::Complete(ShapeRecord::spatial(channels, *width, *height)),
            _ => ShapeEntry::Partial {
                channels: Some(channels),
                extent: None,
            },
        };
        self.history.push(entry);
    }

    /// Declares the spatial extent, keeping the latest known channel count.
    pub fn push_extent(&mut self, width: f64, height: f64) {
        let entry = match self.history.last() {
            Some(ShapeEntry::Complete(record)) => {
                ShapeEntry::Complete(ShapeRecord::spatial(record.channels(), width, height))
            }
            Some(ShapeEntry::Partial {
                channels: Some(channels),
                ..
            }) => ShapeEntry::Complete(ShapeRecord::spatial(*channels, width, height)),
            _ => ShapeEntry::Partial {
                channels: None,
                extent: Some((width, height)),
            },
        };
        self.history.push(entry);
    }

    pub fn peek(&self) -> Result<ShapeRecord> {
        self.history
            .last()
            .and_then(ShapeEntry::record)
            .copied()
            .ok_or(DesignError::UninitializedShape)
    }

    pub fn peek_channels(&self) -> Result<usize> {
        self.peek().map(|shape| shape.channels())
    }

    pub fn peek_spatial(&self) -> Result<(f64, f64)> {
        let shape = self.peek()?;
        shape.extent().ok_or(DesignError::ShapeKind {
            op: "peek_spatial",
            found: shape.kind(),
        })
    }

    pub fn is_ready(&self) -> bool {
        self.peek().is_ok()
    }

    pub fn entries(&self) -> &[ShapeEntry] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
