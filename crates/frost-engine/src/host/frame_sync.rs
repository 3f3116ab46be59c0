/// Handle to one display-link subscription.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkId(pub u64);

/// Host run-loop mode a display link is scheduled in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RunLoopMode {
    /// Runs only while the user is directly manipulating content (scroll, drag).
    EventTracking,
    /// Runs on every display frame.
    Common,
}

/// How often a blur surface refreshes.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum RefreshMode {
    /// Refresh only during interaction gestures. Cheap; the effect freezes otherwise.
    #[default]
    Tracking,
    /// Refresh every frame. Always live, always paying for the convolution.
    Continuous,
}

impl RefreshMode {
    #[inline]
    pub const fn run_loop_mode(self) -> RunLoopMode {
        match self {
            RefreshMode::Tracking => RunLoopMode::EventTracking,
            RefreshMode::Continuous => RunLoopMode::Common,
        }
    }
}

/// Display-link provider.
///
/// The host fires a live link by calling
/// [`BlurSurface::on_refresh`](crate::surface::BlurSurface::on_refresh) with its id
/// once per refresh interval in which the link's mode is active. Whether a slow
/// frame causes later fires to be dropped is up to the host.
pub trait FrameSync {
    /// Creates a subscription scheduled in `mode`.
    fn subscribe(&mut self, mode: RunLoopMode) -> LinkId;

    /// Cancels a subscription. Invalidating an unknown or dead link is a no-op.
    fn invalidate(&mut self, link: LinkId);
}
