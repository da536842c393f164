//! # Change Coordinator
//!
//! Wires host signals to rescans and surface updates.
//!
//! - **`signals`**: `SignalHub`, `Signal`, and RAII `Subscription` handles
//! - **`change`**: `ChangeCoordinator`, the `EditSurface` seam and
//!   frame-deferred preview normalization
//!
//! Everything runs on one thread. Rebuilds are full and last-writer-wins;
//! the only deferred step is preview normalization, which waits for the
//! host's next render frame so it runs after the renderer's own mutations.

pub mod change;
pub mod signals;

pub use change::{ChangeCoordinator, EditSurface, FrameOutcome, RecordingSurface};
pub use signals::{Signal, SignalHub, SignalKind, Subscription};
