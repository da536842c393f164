//! # Preview
//!
//! The rendered surface: a DOM-like tree produced by a markdown renderer,
//! and the normalizer that hides annotation markup inside it.
//!
//! Rendering merges and splits source lines, so the normalizer cannot reuse
//! scanner tokens. It re-derives matches from element text with the same
//! delimiter rules (`grammar::markers`).
//!
//! ## Modules
//!
//! - **`dom`**: arena tree (`Dom`, `NodeId`, `DomError`)
//! - **`render`**: reference markdown renderer built on `pulldown-cmark`
//! - **`normalize`**: `normalize`, the idempotent suppression pass
//! - **`surface`**: `PreviewSurface` and stale-request detection

pub mod dom;
pub mod normalize;
pub mod render;
pub mod surface;

pub use dom::{Dom, DomError, NodeData, NodeId};
pub use normalize::{NormalizeReport, normalize};
pub use render::{render_into, render_markdown};
pub use surface::{NormalizeJob, PreviewSurface};
