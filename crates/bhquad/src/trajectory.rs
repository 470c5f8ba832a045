//! Recorded body positions over a run.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::body::{Body, BodyId};
use crate::error::Result;
use crate::vector::Vector2;

/// Positions of every body at one recorded step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub step: u64,
    pub time: f64,
    /// Same order as [`Trajectory::ids`]
    pub positions: Vec<Vector2>,
}

/// Evolved position sequence of a set of bodies.
///
/// This is the hand-off to plotting and reporting tools: one frame per
/// recorded step, each frame listing positions in a fixed body order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub ids: Vec<BodyId>,
    pub time_step: f64,
    pub frames: Vec<Frame>,
}

impl Trajectory {
    pub fn new(ids: Vec<BodyId>, time_step: f64) -> Self {
        Self {
            ids,
            time_step,
            frames: Vec::new(),
        }
    }

    /// Appends a frame with the current positions of `bodies`.
    ///
    /// Bodies are matched to [`Trajectory::ids`] by position in the slice.
    pub fn record(&mut self, step: u64, time: f64, bodies: &[Body]) {
        debug_assert_eq!(bodies.len(), self.ids.len());
        self.frames.push(Frame {
            step,
            time,
            positions: bodies.iter().map(Body::position).collect(),
        });
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn last(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// Path of a single body across all frames.
    pub fn track(&self, id: BodyId) -> Option<Vec<Vector2>> {
        let column = self.ids.iter().position(|&other| other == id)?;
        Some(
            self.frames
                .iter()
                .map(|frame| frame.positions[column])
                .collect(),
        )
    }

    /// Serializes the trajectory as pretty-printed JSON.
    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}
