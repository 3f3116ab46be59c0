//! Refresh scheduling.
//!
//! A [`Scheduler`] owns at most one display-link subscription. The refresh mode
//! picks the host run-loop mode the link is scheduled in; changing it while a
//! link is live swaps the subscription (old one invalidated first).

use crate::host::{FrameSync, LinkId, RefreshMode};

pub struct Scheduler {
    sync: Box<dyn FrameSync>,
    mode: RefreshMode,
    link: Option<LinkId>,
}

impl Scheduler {
    pub fn new(sync: Box<dyn FrameSync>, mode: RefreshMode) -> Self {
        Self { sync, mode, link: None }
    }

    #[inline]
    pub fn mode(&self) -> RefreshMode {
        self.mode
    }

    /// The live subscription, if attached.
    #[inline]
    pub fn link(&self) -> Option<LinkId> {
        self.link
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        self.link.is_some()
    }

    /// `true` if a fire carrying `link` should run a tick.
    #[inline]
    pub fn accepts(&self, link: LinkId) -> bool {
        self.link == Some(link)
    }

    /// Subscribes in the current mode. Already-attached schedulers keep their link.
    pub fn attach(&mut self) -> LinkId {
        if let Some(link) = self.link {
            return link;
        }
        self.subscribe()
    }

    /// Invalidates the live link, if any.
    pub fn detach(&mut self) {
        if let Some(link) = self.link.take() {
            self.sync.invalidate(link);
            log::debug!("refresh link {} invalidated", link.0);
        }
    }

    /// Switches the refresh mode.
    ///
    /// Returns `true` if a live link was replaced. Setting the current mode does
    /// nothing; switching while detached only records the mode.
    pub fn set_mode(&mut self, mode: RefreshMode) -> bool {
        if mode == self.mode {
            return false;
        }
        self.mode = mode;
        if self.link.is_none() {
            return false;
        }
        self.detach();
        self.subscribe();
        true
    }

    fn subscribe(&mut self) -> LinkId {
        debug_assert!(self.link.is_none(), "previous link must be invalidated first");
        let run_loop = self.mode.run_loop_mode();
        let link = self.sync.subscribe(run_loop);
        log::debug!("refresh link {} subscribed in {run_loop:?}", link.0);
        self.link = Some(link);
        link
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.detach();
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("mode", &self.mode)
            .field("link", &self.link)
            .finish_non_exhaustive()
    }
}
