use serde::{Deserialize, Serialize};

/// Visual class names attached to decorations and hidden preview nodes.
///
/// Every field has a default, so a configuration file may override any
/// subset of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassNames {
    pub global_directive: String,
    pub fragment_highlight: String,
    pub fragment_line: String,
    pub permission_block: String,
    pub permission_block_start: String,
    pub permission_block_end: String,
    pub side_by_side_start: String,
    pub side_by_side_block: String,
    pub side_by_side_end: String,
    pub side_by_side_separator: String,
    /// Applied to rendered nodes whose markup is suppressed.
    pub hidden: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            global_directive: "permission-global-directive".into(),
            fragment_highlight: "fragment-highlight".into(),
            fragment_line: "fragment-line".into(),
            permission_block: "permission-block".into(),
            permission_block_start: "permission-block-start".into(),
            permission_block_end: "permission-block-end".into(),
            side_by_side_start: "side-by-side-start".into(),
            side_by_side_block: "side-by-side-block".into(),
            side_by_side_end: "side-by-side-end".into(),
            side_by_side_separator: "side-by-side-separator".into(),
            hidden: "safelearn-hidden".into(),
        }
    }
}
