//! # Markup Kinds
//!
//! Construct-specific types that own their delimiters.
//!
//! ## Types
//!
//! - **`PermissionBlock`**: `MARKER = "@@@"`, block open/close and the line-1
//!   global directive with its role list
//! - **`Fragment`**: `MARKER = "##fragment"`, inline occurrences and whole lines
//! - **`SideBySide`**: `START`, `END` and `SEPARATOR` column markers
//!
//! ## Design Principle
//!
//! All delimiter constants live here, not scattered in scanner or normalizer
//! code. Both surfaces call these types; neither hardcodes `@@@` or `##...`.

pub mod fragment;
pub mod permission;
pub mod side_by_side;

pub use fragment::Fragment;
pub use permission::PermissionBlock;
pub use side_by_side::SideBySide;
