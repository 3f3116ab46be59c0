use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::host::{FrameSync, LinkId, RunLoopMode};

/// Subscription change recorded by [`ManualFrameSync`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    Subscribed(LinkId, RunLoopMode),
    Invalidated(LinkId),
}

#[derive(Debug, Default)]
struct SyncState {
    next_id: u64,
    live: BTreeMap<LinkId, RunLoopMode>,
    events: Vec<SyncEvent>,
}

/// Display link driven by the caller.
///
/// Clones share state: hand one clone to a surface and keep another to decide
/// which links are due each frame.
#[derive(Debug, Clone, Default)]
pub struct ManualFrameSync {
    state: Rc<RefCell<SyncState>>,
}

impl ManualFrameSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Links that fire on a frame. Event-tracking links fire only when
    /// `tracking` is set (a gesture is in progress).
    pub fn due(&self, tracking: bool) -> Vec<LinkId> {
        self.state
            .borrow()
            .live
            .iter()
            .filter(|&(_, &mode)| tracking || mode == RunLoopMode::Common)
            .map(|(&id, _)| id)
            .collect()
    }

    pub fn live_links(&self) -> Vec<LinkId> {
        self.state.borrow().live.keys().copied().collect()
    }

    pub fn live_modes(&self) -> Vec<RunLoopMode> {
        self.state.borrow().live.values().copied().collect()
    }

    pub fn events(&self) -> Vec<SyncEvent> {
        self.state.borrow().events.clone()
    }

    pub fn clear_events(&self) {
        self.state.borrow_mut().events.clear();
    }
}

impl FrameSync for ManualFrameSync {
    fn subscribe(&mut self, mode: RunLoopMode) -> LinkId {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = LinkId(state.next_id);
        state.live.insert(id, mode);
        state.events.push(SyncEvent::Subscribed(id, mode));
        id
    }

    fn invalidate(&mut self, link: LinkId) {
        let mut state = self.state.borrow_mut();
        if state.live.remove(&link).is_some() {
            state.events.push(SyncEvent::Invalidated(link));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracking_links_fire_only_during_gestures() {
        let mut sync = ManualFrameSync::new();
        let tracking = sync.subscribe(RunLoopMode::EventTracking);
        let common = sync.subscribe(RunLoopMode::Common);
        assert_eq!(sync.due(false), vec![common]);
        assert_eq!(sync.due(true), vec![tracking, common]);
    }

    #[test]
    fn invalidating_unknown_link_records_nothing() {
        let mut sync = ManualFrameSync::new();
        sync.invalidate(LinkId(42));
        assert!(sync.events().is_empty());
    }

    #[test]
    fn clones_share_state() {
        let sync = ManualFrameSync::new();
        let mut handle = sync.clone();
        let id = handle.subscribe(RunLoopMode::Common);
        assert_eq!(sync.live_links(), vec![id]);
    }
}
