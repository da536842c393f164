//! # Grammar / Scanner
//!
//! Line- and token-level recognizer for the annotation markup.
//!
//! ## Grammar
//!
//! | Construct | Open | Close |
//! |---|---|---|
//! | Global directive | line 1 only: `@@@ role, role` | single line |
//! | Fragment marker | `##fragment` not followed by a word char or `-` | inline |
//! | Permission block | trimmed line starts with `@@@`, is not `@@@` | trimmed `@@@` |
//! | Side-by-side block | trimmed `##side-by-side-start` | trimmed `##side-by-side-end` |
//! | Separator | trimmed `##separator` inside a side-by-side block | single line |
//!
//! All markers are case-sensitive.
//!
//! ## Modules
//!
//! - **`kinds`**: delimiter-owning types shared with the preview normalizer
//! - **`token`**: `Token`, `TokenKind`, `LinePosition`
//! - **`state`**: `BlockParseState`, threaded through each pass
//! - **`scanner`**: `scan` / `scan_lines` / `step`
//! - **`markers`**: matching rules for rendered text (whole elements, inline)
//!
//! ## Key Invariants
//!
//! - A scan is a pure function of the document snapshot
//! - Unterminated blocks emit no tokens; they are reported as `DanglingBlock`
//! - Malformed input never fails, it just does not match

pub mod kinds;
pub mod markers;
pub mod scanner;
pub mod state;
pub mod token;

#[cfg(test)]
mod tests;

pub use markers::{find_inline_markers, is_marker_text};
pub use scanner::{Scan, scan, scan_lines, step};
pub use state::{BlockKind, BlockParseState, DanglingBlock, OpenSideBySide};
pub use token::{FragmentPlacement, LinePosition, Token, TokenKind};
