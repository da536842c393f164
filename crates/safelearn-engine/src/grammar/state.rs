use serde::Serialize;

/// An open side-by-side block and the separator lines seen inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenSideBySide {
    pub start: usize,
    pub separators: Vec<usize>,
}

/// Open-block bookkeeping for one scan pass.
///
/// Each block kind tracks at most one open block; the two kinds are
/// independent and may be open at the same time. The value is created
/// fresh for every pass and threaded through the scan, never shared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockParseState {
    /// Line index of the open permission block, if any.
    pub permission: Option<usize>,
    pub side_by_side: Option<OpenSideBySide>,
}

impl BlockParseState {
    pub fn is_idle(&self) -> bool {
        self.permission.is_none() && self.side_by_side.is_none()
    }

    /// Blocks still open at end of document.
    pub fn dangling(&self) -> Vec<DanglingBlock> {
        let mut out = vec![];
        if let Some(start_line) = self.permission {
            out.push(DanglingBlock {
                kind: BlockKind::Permission,
                start_line,
            });
        }
        if let Some(open) = &self.side_by_side {
            out.push(DanglingBlock {
                kind: BlockKind::SideBySide,
                start_line: open.start,
            });
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BlockKind {
    Permission,
    SideBySide,
}

/// A block that was opened but never closed. It produces no tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DanglingBlock {
    pub kind: BlockKind,
    pub start_line: usize,
}
