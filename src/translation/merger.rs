/*!
 * Run merging.
 *
 * A message box is stored as consecutive plain text nodes, one per visual
 * line. Translating line by line loses the sentence context, so consecutive
 * lines are merged into a single run, translated as one paragraph, and then
 * reflowed back across the same nodes.
 *
 * The merger is a two-state machine fed with the classified nodes of one
 * container in order. Any node that is not a non-empty plain text line
 * closes the open run, and so does the end of the container.
 */

use std::ops::Range;

use crate::translation::nodes::NodeShape;

/// Merger state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeMode {
    #[default]
    Idle,
    Accumulating,
}

/// Maximal sequence of consecutive plain text nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    /// Node positions covered by the run
    pub range: Range<usize>,
    /// Lines joined by a single space
    pub text: String,
}

impl Run {
    /// Number of nodes available to hold the reflowed lines
    pub fn slots(&self) -> usize {
        self.range.len()
    }
}

/// Per-container merge state
#[derive(Debug, Default)]
pub struct RunMergerState {
    mode: MergeMode,
    buffer: Vec<String>,
    buffer_start_index: usize,
}

impl RunMergerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> MergeMode {
        self.mode
    }

    /// Feed the node at `index`. Returns the run this node closed, if any.
    pub fn observe(&mut self, index: usize, shape: &NodeShape) -> Option<Run> {
        match shape {
            NodeShape::Text(text) => {
                match self.mode {
                    MergeMode::Idle => {
                        self.mode = MergeMode::Accumulating;
                        self.buffer_start_index = index;
                    }
                    MergeMode::Accumulating => {
                        debug_assert_eq!(index, self.buffer_start_index + self.buffer.len());
                    }
                }
                self.buffer.push(text.clone());
                None
            }
            _ => self.flush(),
        }
    }

    /// Close the open run at the end of the container
    pub fn finish(&mut self) -> Option<Run> {
        self.flush()
    }

    fn flush(&mut self) -> Option<Run> {
        if self.mode == MergeMode::Idle {
            return None;
        }

        let start = self.buffer_start_index;
        let lines = std::mem::take(&mut self.buffer);
        self.mode = MergeMode::Idle;

        let text = lines.join(" ");
        if text.trim().is_empty() {
            return None;
        }

        Some(Run {
            range: start..start + lines.len(),
            text,
        })
    }
}
