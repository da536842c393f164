//! # Decorations
//!
//! Turns scanner tokens into render instructions for the edit surface.
//!
//! In [`RenderMode::Edit`] markup is flagged with `Mark` decorations and left
//! intact; line-level tokens become zero-width marks at the start of their
//! line. In [`RenderMode::Preview`] the matched markup text is covered by
//! `Replace` decorations so only content shows.
//!
//! The builder is stateless and always rebuilds from scratch.

pub mod builder;
pub mod classes;

use serde::{Deserialize, Serialize};

use crate::document::Span;

pub use builder::build;
pub use classes::ClassNames;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Edit,
    Preview,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Action {
    /// Visual styling; the text stays. `class` may hold several
    /// space-separated class names.
    Mark { class: String },
    /// The text is hidden.
    Replace,
}

/// A render instruction over the half-open byte range `from..to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decoration {
    pub from: usize,
    pub to: usize,
    pub action: Action,
}

impl Decoration {
    pub fn mark(sp: Span, class: impl Into<String>) -> Self {
        Self {
            from: sp.start,
            to: sp.end,
            action: Action::Mark {
                class: class.into(),
            },
        }
    }

    pub fn replace(sp: Span) -> Self {
        Self {
            from: sp.start,
            to: sp.end,
            action: Action::Replace,
        }
    }

    pub fn span(&self) -> Span {
        Span::new(self.from, self.to)
    }

    pub fn class(&self) -> Option<&str> {
        match &self.action {
            Action::Mark { class } => Some(class),
            Action::Replace => None,
        }
    }
}
