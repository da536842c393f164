//! Recognition and rendering of SafeLearn annotation markup.
//!
//! Teaching documents carry a small markup layer on top of plain text:
//! permission blocks scoped to audiences (`@@@ role` ... `@@@`), a line-1
//! global directive, `##fragment` answer markers and `##side-by-side-*`
//! comparison columns. This crate scans that markup and renders it on two
//! surfaces: the edit surface, where markup is decorated but kept, and the
//! preview surface, where it is hidden.
//!
//! Data flow:
//!
//! ```text
//! Document ─▶ grammar::scan ─▶ tokens ─▶ decorate::build ─▶ EditSurface
//! rendered Dom ─▶ preview::normalize (same delimiter rules) ─▶ mutated Dom
//! ```
//!
//! ```rust
//! use safelearn_engine::{ClassNames, Document, RenderMode, build, scan};
//!
//! let doc = Document::from("Text ##fragment more");
//! let decorations = build(&scan(&doc).tokens, RenderMode::Preview, &ClassNames::default());
//! assert_eq!((decorations[0].from, decorations[0].to), (5, 16));
//! ```

pub mod coordinator;
pub mod decorate;
pub mod document;
pub mod grammar;
pub mod preview;

// Re-export key types for easier usage
pub use coordinator::{
    ChangeCoordinator, EditSurface, FrameOutcome, RecordingSurface, Signal, SignalHub, SignalKind,
    Subscription,
};
pub use decorate::{Action, ClassNames, Decoration, RenderMode, build};
pub use document::{Document, LineRef, Span};
pub use grammar::{DanglingBlock, Scan, Token, TokenKind, scan};
pub use preview::{Dom, DomError, NodeId, NormalizeReport, PreviewSurface, normalize};
