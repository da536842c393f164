//! # Document
//!
//! Immutable document snapshots backed by an `xi_rope::Rope`.
//!
//! Every scan pass works on one snapshot. Edits produce a new snapshot with
//! a bumped version, so a scan never observes a half-applied change.
//!
//! ## Modules
//!
//! - **`span`**: `Span`, the half-open byte range used by tokens and decorations
//! - **`lines`**: `LineRef` and `lines_with_spans` for line-indexed access
//! - **`slice`**: span to text helpers

pub mod lines;
pub mod slice;
pub mod span;

use std::ops::Range;

use anyhow::ensure;
use xi_rope::Rope;

pub use lines::{LineRef, lines_with_spans};
pub use slice::slice_to_string;
pub use span::Span;

/// One version of the annotated text.
///
/// Cloning is cheap: the rope shares its nodes.
#[derive(Debug, Clone)]
pub struct Document {
    buffer: Rope,
    version: u64,
}

impl Document {
    /// Create a document from raw bytes, rejecting invalid UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::from(text))
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn rope(&self) -> &Rope {
        &self.buffer
    }

    /// Total length in bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn slice(&self, sp: Span) -> String {
        slice_to_string(&self.buffer, sp)
    }

    /// All lines of this snapshot, in order.
    pub fn lines(&self) -> Vec<LineRef> {
        lines_with_spans(&self.buffer).collect()
    }

    pub fn line_count(&self) -> usize {
        lines_with_spans(&self.buffer).count()
    }

    /// Returns the snapshot that results from replacing `range` with `text`.
    ///
    /// The range must lie on character boundaries inside the buffer.
    pub fn replace(&self, range: Range<usize>, text: &str) -> anyhow::Result<Self> {
        ensure!(
            range.start <= range.end && range.end <= self.buffer.len(),
            "edit range {range:?} out of bounds (len {})",
            self.buffer.len()
        );
        let current = self.buffer.to_string();
        ensure!(
            current.is_char_boundary(range.start) && current.is_char_boundary(range.end),
            "edit range {range:?} splits a character"
        );

        let mut buffer = self.buffer.clone();
        buffer.edit(range, text);
        Ok(Self {
            buffer,
            version: self.version + 1,
        })
    }
}

impl From<&str> for Document {
    fn from(text: &str) -> Self {
        Self {
            buffer: Rope::from(text),
            version: 0,
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::from("")
    }
}
