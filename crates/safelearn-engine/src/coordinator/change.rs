use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::decorate::{ClassNames, Decoration, RenderMode, build};
use crate::document::Document;
use crate::grammar::{DanglingBlock, scan};
use crate::preview::{NormalizeJob, NormalizeReport, PreviewSurface};

use super::signals::{Signal, SignalHub, SignalKind, Subscription};

/// The editing widget's decoration API.
pub trait EditSurface {
    /// Replaces the whole decoration set. `decorations` is sorted by `from`.
    fn replace_decorations(&mut self, decorations: Vec<Decoration>);
}

/// An [`EditSurface`] that keeps the latest decoration set in memory.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub decorations: Vec<Decoration>,
    /// How many times a set was applied.
    pub applied: usize,
}

impl EditSurface for RecordingSurface {
    fn replace_decorations(&mut self, decorations: Vec<Decoration>) {
        self.decorations = decorations;
        self.applied += 1;
    }
}

/// What a call to [`ChangeCoordinator::run_frame`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Nothing was pending.
    Idle,
    /// The pending container was unmounted or superseded; nothing changed.
    Stale,
    /// The coordinator or preview was borrowed; the job stays pending.
    Busy,
    Normalized(NormalizeReport),
}

struct State<S> {
    surface: S,
    preview: Rc<RefCell<PreviewSurface>>,
    classes: ClassNames,
    document: Document,
    mode: RenderMode,
    /// Normalization deferred to the next frame. Later requests replace it.
    pending: Option<NormalizeJob>,
    /// Tree generation right after our own last normalization.
    own_generation: Option<u64>,
    dangling: Vec<DanglingBlock>,
    rebuilds: u64,
}

impl<S: EditSurface> State<S> {
    fn handle(&mut self, signal: &Signal) {
        match signal {
            Signal::ContentChanged(doc) => {
                self.document = doc.clone();
                self.rebuild();
            }
            Signal::ViewportChanged { from, to } => {
                log::trace!("viewport moved to {from}..{to}");
                self.rebuild();
            }
            Signal::ViewModeChanged(mode) => {
                self.mode = *mode;
                self.rebuild();
                if *mode == RenderMode::Preview {
                    self.schedule_normalize();
                }
            }
            Signal::DomMutated => {
                if self.is_own_echo() {
                    log::trace!("ignoring preview mutation caused by normalization");
                    return;
                }
                self.schedule_normalize();
            }
        }
    }

    /// Full rescan of the current snapshot; replaces the surface's set.
    fn rebuild(&mut self) {
        let scan = scan(&self.document);
        let decorations = build(&scan.tokens, self.mode, &self.classes);
        log::trace!(
            "rebuilt {} decorations for version {} ({:?})",
            decorations.len(),
            self.document.version(),
            self.mode
        );
        self.surface.replace_decorations(decorations);
        self.dangling = scan.dangling;
        self.rebuilds += 1;
    }

    fn schedule_normalize(&mut self) {
        let Ok(preview) = self.preview.try_borrow() else {
            log::debug!("preview is being rendered; waiting for its next mutation signal");
            return;
        };
        match preview.current() {
            Some(job) => self.pending = Some(job),
            None => log::trace!("no preview mounted; nothing to normalize"),
        }
    }

    fn is_own_echo(&self) -> bool {
        let Some(own) = self.own_generation else {
            return false;
        };
        self.preview
            .try_borrow()
            .is_ok_and(|p| p.dom().generation() == own)
    }
}

type Inbox = Rc<RefCell<VecDeque<Signal>>>;

/// Queues `signal` and, unless a signal is already being handled further up
/// the stack, handles everything queued in arrival order. A signal raised
/// while the coordinator is busy is therefore handled right after the current
/// one, so the latest content always wins.
fn dispatch<S: EditSurface>(
    state: &RefCell<State<S>>,
    inbox: &RefCell<VecDeque<Signal>>,
    signal: &Signal,
) {
    inbox.borrow_mut().push_back(signal.clone());
    let Ok(mut state) = state.try_borrow_mut() else {
        log::trace!("coordinator busy; queued {:?}", signal.kind());
        return;
    };
    while let Some(next) = next_signal(inbox) {
        state.handle(&next);
    }
}

fn next_signal(inbox: &RefCell<VecDeque<Signal>>) -> Option<Signal> {
    inbox.borrow_mut().pop_front()
}

/// Keeps both surfaces in sync with host signals.
///
/// Content, viewport and mode signals rescan and rebuild the edit surface
/// synchronously. Preview mutations only schedule a normalization, which the
/// host runs on its next render frame via [`ChangeCoordinator::run_frame`].
///
/// The accessors borrow the coordinator's state. Calling them from inside
/// [`EditSurface::replace_decorations`] panics; read the decorations passed
/// to the callback instead.
pub struct ChangeCoordinator<S: EditSurface + 'static> {
    state: Rc<RefCell<State<S>>>,
    inbox: Inbox,
    subscriptions: Vec<Subscription>,
}

impl<S: EditSurface + 'static> ChangeCoordinator<S> {
    /// Creates a coordinator and decorates `document` immediately.
    pub fn new(
        surface: S,
        preview: Rc<RefCell<PreviewSurface>>,
        classes: ClassNames,
        document: Document,
    ) -> Self {
        let mut state = State {
            surface,
            preview,
            classes,
            document,
            mode: RenderMode::Edit,
            pending: None,
            own_generation: None,
            dangling: vec![],
            rebuilds: 0,
        };
        state.rebuild();

        Self {
            state: Rc::new(RefCell::new(state)),
            inbox: Rc::new(RefCell::new(VecDeque::new())),
            subscriptions: vec![],
        }
    }

    /// Registers for every signal kind on `hub`. Calling it again replaces
    /// the previous registrations.
    pub fn attach(&mut self, hub: &SignalHub) {
        self.subscriptions.clear();
        for kind in SignalKind::ALL {
            let weak = Rc::downgrade(&self.state);
            let inbox = Rc::clone(&self.inbox);
            let sub = hub.subscribe(kind, move |signal| {
                let Some(state) = weak.upgrade() else {
                    return;
                };
                dispatch(&state, &inbox, signal);
            });
            self.subscriptions.push(sub);
        }
    }

    pub fn is_attached(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    /// Releases every registration and forgets pending frame work.
    pub fn teardown(&mut self) {
        self.subscriptions.clear();
        self.inbox.borrow_mut().clear();
        if let Ok(mut state) = self.state.try_borrow_mut() {
            state.pending = None;
        }
    }

    /// Handles a signal directly, without a hub.
    pub fn handle(&self, signal: &Signal) {
        dispatch(&self.state, &self.inbox, signal);
    }

    /// Runs deferred work for one render frame.
    pub fn run_frame(&self) -> FrameOutcome {
        let Ok(mut guard) = self.state.try_borrow_mut() else {
            return FrameOutcome::Busy;
        };
        let state = &mut *guard;
        let Some(job) = state.pending.take() else {
            return FrameOutcome::Idle;
        };
        let Ok(mut preview) = state.preview.try_borrow_mut() else {
            state.pending = Some(job);
            return FrameOutcome::Busy;
        };

        match preview.normalize_if_current(job, &state.classes) {
            Some(report) => {
                state.own_generation = Some(preview.dom().generation());
                FrameOutcome::Normalized(report)
            }
            None => FrameOutcome::Stale,
        }
    }

    /// # Panics
    ///
    /// If called while the coordinator is updating the surface.
    pub fn with_surface<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.state.borrow().surface)
    }

    pub fn mode(&self) -> RenderMode {
        self.state.borrow().mode
    }

    pub fn document(&self) -> Document {
        self.state.borrow().document.clone()
    }

    pub fn pending(&self) -> Option<NormalizeJob> {
        self.state.borrow().pending
    }

    /// Blocks left unterminated by the latest scan.
    pub fn dangling(&self) -> Vec<DanglingBlock> {
        self.state.borrow().dangling.clone()
    }

    pub fn rebuild_count(&self) -> u64 {
        self.state.borrow().rebuilds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coordinator(text: &str) -> ChangeCoordinator<RecordingSurface> {
        ChangeCoordinator::new(
            RecordingSurface::default(),
            Rc::new(RefCell::new(PreviewSurface::new())),
            ClassNames::default(),
            Document::from(text),
        )
    }

    #[test]
    fn decorates_on_construction() {
        let c = coordinator("Text ##fragment more");
        assert_eq!(c.with_surface(|s| s.decorations.len()), 1);
        assert_eq!(c.rebuild_count(), 1);
    }

    #[test]
    fn mode_change_switches_to_replace() {
        let c = coordinator("Text ##fragment more");
        c.handle(&Signal::ViewModeChanged(RenderMode::Preview));
        assert_eq!(c.mode(), RenderMode::Preview);
        let first = c.with_surface(|s| s.decorations[0].clone());
        assert_eq!(first, Decoration::replace(crate::document::Span::new(5, 16)));
    }

    #[test]
    fn dangling_blocks_are_observable() {
        let c = coordinator("x\n@@@ teacher\nnever closed");
        assert_eq!(c.dangling().len(), 1);
        c.handle(&Signal::ContentChanged(Document::from("x\n@@@ teacher\n@@@")));
        assert!(c.dangling().is_empty());
    }

    #[test]
    fn frame_without_work_is_idle() {
        let c = coordinator("");
        assert_eq!(c.run_frame(), FrameOutcome::Idle);
    }

    #[test]
    fn mutation_without_mounted_preview_schedules_nothing() {
        let c = coordinator("");
        c.handle(&Signal::DomMutated);
        assert_eq!(c.pending(), None);
    }
}
