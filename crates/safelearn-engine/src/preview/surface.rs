use crate::decorate::ClassNames;

use super::{
    dom::{Dom, NodeId},
    normalize::{NormalizeReport, normalize},
    render::render_into,
};

/// A request to normalize the container rendered for one content version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeJob {
    pub container: NodeId,
    pub version: u64,
}

/// The reader-facing surface: the rendered tree plus which container holds
/// the current content version.
#[derive(Debug, Default)]
pub struct PreviewSurface {
    dom: Dom,
    mounted: Option<NormalizeJob>,
}

impl PreviewSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    /// Mutable access for the external renderer.
    pub fn dom_mut(&mut self) -> &mut Dom {
        &mut self.dom
    }

    /// Marks `container` as the rendering of content `version`.
    pub fn mount(&mut self, container: NodeId, version: u64) {
        self.mounted = Some(NormalizeJob { container, version });
    }

    pub fn unmount(&mut self) {
        self.mounted = None;
    }

    pub fn current(&self) -> Option<NormalizeJob> {
        self.mounted
    }

    /// Renders markdown with the built-in renderer and mounts the result,
    /// freeing the previously mounted container.
    pub fn render_markdown(&mut self, text: &str, version: u64) -> NodeId {
        if let Some(old) = self.mounted.take() {
            match self.dom.remove(old.container) {
                Ok(freed) => log::trace!("freed {freed} nodes of version {}", old.version),
                Err(e) => log::debug!("previous preview container already gone: {e}"),
            }
        }
        let container = render_into(&mut self.dom, text);
        self.mount(container, version);
        container
    }

    /// True while `job` still names the mounted container and version.
    pub fn is_current(&self, job: NormalizeJob) -> bool {
        self.mounted == Some(job) && self.dom.contains(job.container)
    }

    /// Normalizes the job's container if it is still current.
    ///
    /// Returns `None` for a stale job; that is a no-op, never an error.
    pub fn normalize_if_current(
        &mut self,
        job: NormalizeJob,
        classes: &ClassNames,
    ) -> Option<NormalizeReport> {
        if !self.is_current(job) {
            log::debug!(
                "skipping stale preview normalization for {:?} (version {})",
                job.container,
                job.version
            );
            return None;
        }
        match normalize(&mut self.dom, job.container, classes) {
            Ok(report) => Some(report),
            Err(e) => {
                log::debug!("preview normalization abandoned: {e}");
                None
            }
        }
    }
}
