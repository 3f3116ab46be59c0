//! The frosted-glass surface.
//!
//! A [`BlurSurface`] wires the pieces together. Each accepted display-link fire
//! runs one tick:
//!
//! 1. sample the radius from the [`RadiusAnimator`]
//! 2. [`capture`] what sits behind the surface
//! 3. blur it with [`BoxBlur`] (skipped for empty snapshots)
//! 4. apply the optional tint
//! 5. publish the bitmap as the surface contents
//!
//! Failures never escape a tick: they are logged and the previous contents stay.

use crate::animator::{PresentationValue, RadiusAnimator};
use crate::blur::{apply_tint, BoxBlur, EdgeMode, DEFAULT_ITERATIONS};
use crate::capture::capture;
use crate::error::BlurError;
use crate::host::{AnimationContext, AnimationDescription, Compositor, FrameSync, LayerTree, LinkId, NodeId, RefreshMode};
use crate::paint::Color;
use crate::pixel::Bitmap;
use crate::scheduler::Scheduler;

/// Initial surface settings.
#[derive(Debug, Clone, PartialEq)]
pub struct BlurConfig {
    /// Blur radius in logical points.
    pub blur_radius: f32,
    /// Convolution passes per tick; at least 1.
    pub iterations: u32,
    /// How the convolution treats pixels past the snapshot border.
    pub edge_mode: EdgeMode,
    pub refresh_mode: RefreshMode,
    /// Color composited over the blurred snapshot.
    pub tint: Option<Color>,
    /// When false, ticks leave the contents untouched.
    pub enabled: bool,
}

impl Default for BlurConfig {
    fn default() -> Self {
        Self {
            blur_radius: 0.0,
            iterations: DEFAULT_ITERATIONS,
            edge_mode: EdgeMode::Extend,
            refresh_mode: RefreshMode::Tracking,
            tint: None,
            enabled: true,
        }
    }
}

impl BlurConfig {
    pub fn radius(mut self, radius: f32) -> Self {
        self.blur_radius = radius;
        self
    }

    pub fn iterations(mut self, n: u32) -> Self {
        self.iterations = n.max(1);
        self
    }

    pub fn edge_mode(mut self, edge: EdgeMode) -> Self {
        self.edge_mode = edge;
        self
    }

    pub fn refresh_mode(mut self, mode: RefreshMode) -> Self {
        self.refresh_mode = mode;
        self
    }

    pub fn tint(mut self, tint: Color) -> Self {
        self.tint = Some(tint);
        self
    }
}

/// Result of one tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// A blurred bitmap was published.
    Published { radius: f32, box_size: u32, width: u32, height: u32 },
    /// The snapshot was empty and published as-is.
    PublishedUnblurred,
    /// The surface is disabled; nothing was captured.
    Disabled,
    /// The fire carried a link that is no longer live.
    StaleLink,
    /// Capture or blur failed; the previous contents remain.
    Aborted,
}

/// Live blur overlay bound to one layer of the host tree.
///
/// Everything runs on the caller's thread: the host calls
/// [`on_refresh`](Self::on_refresh) from its display-link callback and each call
/// completes before the next one can start.
#[derive(Debug)]
pub struct BlurSurface {
    node: NodeId,
    animator: RadiusAnimator,
    iterations: u32,
    edge_mode: EdgeMode,
    tint: Option<Color>,
    enabled: bool,
    scheduler: Scheduler,
    contents: Option<Bitmap>,
    contents_scale: f32,
}

impl BlurSurface {
    /// Creates a detached surface for `node`. `sync` provides display links.
    pub fn new(node: NodeId, sync: Box<dyn FrameSync>, config: BlurConfig) -> Self {
        Self {
            node,
            animator: RadiusAnimator::new(config.blur_radius),
            iterations: config.iterations.max(1),
            edge_mode: config.edge_mode,
            tint: config.tint,
            enabled: config.enabled,
            scheduler: Scheduler::new(sync, config.refresh_mode),
            contents: None,
            contents_scale: 1.0,
        }
    }

    #[inline]
    pub fn node(&self) -> NodeId {
        self.node
    }

    // ── properties ────────────────────────────────────────────────────────

    /// Committed blur radius.
    pub fn blur_radius(&self) -> f32 {
        self.animator.committed()
    }

    /// Sets the radius. Inside an animated transaction the returned description
    /// is the transition the host should run for this change.
    pub fn set_blur_radius(&mut self, radius: f32, ctx: &AnimationContext) -> AnimationDescription {
        self.animator.set(radius, ctx)
    }

    pub fn presentation(&self) -> PresentationValue {
        self.animator.presentation()
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Sets the pass count; 0 is raised to 1.
    pub fn set_iterations(&mut self, n: u32) {
        if n == 0 {
            log::warn!("blur iterations must be at least 1; using 1");
        }
        self.iterations = n.max(1);
    }

    pub fn edge_mode(&self) -> EdgeMode {
        self.edge_mode
    }

    pub fn set_edge_mode(&mut self, edge: EdgeMode) {
        self.edge_mode = edge;
    }

    pub fn refresh_mode(&self) -> RefreshMode {
        self.scheduler.mode()
    }

    /// Changes the cadence; a live link is re-subscribed only if the mode differs.
    pub fn set_refresh_mode(&mut self, mode: RefreshMode) {
        self.scheduler.set_mode(mode);
    }

    pub fn tint(&self) -> Option<Color> {
        self.tint
    }

    pub fn set_tint(&mut self, tint: Option<Color>) {
        self.tint = tint;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Last published bitmap.
    pub fn contents(&self) -> Option<&Bitmap> {
        self.contents.as_ref()
    }

    /// Scale of the last published bitmap.
    pub fn contents_scale(&self) -> f32 {
        self.contents_scale
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    /// Host hook: the surface's layer was inserted into a container.
    ///
    /// Subscribes a display link if the layer actually has a container; returns
    /// the live link, if any.
    pub fn attach<T: LayerTree + ?Sized>(&mut self, tree: &T) -> Option<LinkId> {
        if tree.parent(self.node).is_none() {
            log::debug!("blur surface {} has no container; not scheduling", self.node.0);
            return None;
        }
        Some(self.scheduler.attach())
    }

    /// Host hook: the surface's layer left its container. Stops future ticks.
    pub fn detach(&mut self) {
        self.scheduler.detach();
    }

    pub fn is_attached(&self) -> bool {
        self.scheduler.is_attached()
    }

    pub fn link(&self) -> Option<LinkId> {
        self.scheduler.link()
    }

    // ── ticking ───────────────────────────────────────────────────────────

    /// Display-link entry point. Fires for links other than the live one are ignored.
    pub fn on_refresh<C: Compositor + ?Sized>(&mut self, link: LinkId, now: f64, host: &mut C) -> TickOutcome {
        if !self.scheduler.accepts(link) {
            log::trace!("ignoring fire from stale link {}", link.0);
            return TickOutcome::StaleLink;
        }
        self.tick(now, host)
    }

    /// Runs one update outside the display-link cadence, e.g. after content
    /// changed while in tracking mode with no gesture in progress.
    pub fn refresh_now<C: Compositor + ?Sized>(&mut self, now: f64, host: &mut C) -> TickOutcome {
        self.tick(now, host)
    }

    /// Capture, blur, tint, publish.
    pub fn tick<C: Compositor + ?Sized>(&mut self, now: f64, host: &mut C) -> TickOutcome {
        if !self.enabled {
            return TickOutcome::Disabled;
        }

        let radius = self.animator.sample(now);
        match self.render(radius, host) {
            Ok(outcome) => outcome,
            Err(err) => {
                log::warn!("blur tick for layer {} aborted: {err}", self.node.0);
                TickOutcome::Aborted
            }
        }
    }

    fn render<C: Compositor + ?Sized>(&mut self, radius: f32, host: &mut C) -> Result<TickOutcome, BlurError> {
        let snapshot = capture(host, self.node)?;

        if snapshot.is_empty() {
            log::trace!("empty snapshot for layer {}; publishing unblurred", self.node.0);
            self.publish(snapshot);
            return Ok(TickOutcome::PublishedUnblurred);
        }

        let blur = BoxBlur::new(radius, self.iterations).edge(self.edge_mode);
        let box_size = blur.box_size_at(snapshot.scale);
        let mut blurred = blur.apply(&snapshot)?;
        drop(snapshot);

        if let Some(tint) = self.tint {
            apply_tint(&mut blurred, tint);
        }

        let outcome = TickOutcome::Published {
            radius,
            box_size,
            width: blurred.width(),
            height: blurred.height(),
        };
        log::trace!("layer {} published {outcome:?}", self.node.0);
        self.publish(blurred);
        Ok(outcome)
    }

    fn publish(&mut self, bitmap: Bitmap) {
        self.contents_scale = bitmap.scale;
        self.contents = Some(bitmap);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Rect;
    use crate::host::{AnimationTiming, TimingFunction};
    use crate::pixel::Rgba8;
    use crate::soft::{LayerContent, ManualFrameSync, SoftLayerTree, SyncEvent};

    struct Rig {
        tree: SoftLayerTree,
        sync: ManualFrameSync,
        container: NodeId,
        sibling: NodeId,
        surface: BlurSurface,
    }

    /// Container with stripes, the blur layer, and one visible sibling painted above it.
    fn rig(scale: f32, config: BlurConfig) -> Rig {
        let mut tree = SoftLayerTree::new(scale);
        let stripes = LayerContent::Stripes {
            a: Color::from_srgb_u8(240, 240, 240, 255),
            b: Color::from_srgb_u8(20, 20, 20, 255),
            period: 3.0,
            vertical: false,
        };
        let container = tree.add_root(Rect::new(0.0, 0.0, 40.0, 40.0), stripes);
        let node = tree.add_child(container, Rect::new(5.0, 5.0, 20.0, 20.0), LayerContent::Empty);
        let sibling = tree.add_child(
            container,
            Rect::new(0.0, 0.0, 40.0, 40.0),
            LayerContent::Solid(Color::from_srgb_u8(255, 0, 0, 255)),
        );
        let sync = ManualFrameSync::new();
        let surface = BlurSurface::new(node, Box::new(sync.clone()), config);
        Rig { tree, sync, container, sibling, surface }
    }

    /// Fires every link due on this frame, like a host display link would.
    fn frame(rig: &mut Rig, now: f64, gesture: bool) -> Vec<TickOutcome> {
        rig.sync
            .due(gesture)
            .into_iter()
            .map(|link| rig.surface.on_refresh(link, now, &mut rig.tree))
            .collect()
    }

    // ── scheduling ────────────────────────────────────────────────────────

    #[test]
    fn tracking_surface_ticks_only_during_gestures() {
        let mut r = rig(1.0, BlurConfig::default().radius(5.0).iterations(3));
        r.surface.attach(&r.tree);

        assert!(frame(&mut r, 0.016, false).is_empty());
        assert!(r.surface.contents().is_none());

        let outcomes = frame(&mut r, 0.033, true);
        assert_eq!(
            outcomes,
            vec![TickOutcome::Published { radius: 5.0, box_size: 5, width: 20, height: 20 }]
        );
        assert_eq!(r.tree.render_count(), 1);
    }

    #[test]
    fn scroll_tick_hides_sibling_then_restores_it() {
        let mut r = rig(2.0, BlurConfig::default().radius(5.0));
        r.surface.attach(&r.tree);
        let outcomes = frame(&mut r, 0.0, true);

        assert_eq!(
            outcomes,
            vec![TickOutcome::Published { radius: 5.0, box_size: 11, width: 40, height: 40 }]
        );
        assert!(r.tree.hidden_at_last_render().contains(&r.sibling));
        assert!(!r.tree.is_hidden(r.sibling));
        assert!(!r.tree.is_hidden(r.surface.node()));

        // The red sibling must not bleed into the blur.
        let contents = r.surface.contents().unwrap();
        assert_eq!(r.surface.contents_scale(), 2.0);
        for y in 0..contents.height() {
            for px in contents.pixels.row(y) {
                assert_eq!(px.r, px.g, "red leaked into snapshot");
            }
        }
    }

    #[test]
    fn continuous_surface_ticks_every_frame() {
        let mut r = rig(1.0, BlurConfig::default().refresh_mode(RefreshMode::Continuous));
        r.surface.attach(&r.tree);
        assert_eq!(frame(&mut r, 0.0, false).len(), 1);
        assert_eq!(frame(&mut r, 0.016, false).len(), 1);
    }

    #[test]
    fn detached_container_does_not_schedule() {
        let mut r = rig(1.0, BlurConfig::default());
        assert_eq!(r.tree.parent(r.surface.node()), Some(r.container));
        r.tree.remove_from_parent(r.surface.node());
        assert_eq!(r.surface.attach(&r.tree), None);
        assert!(r.sync.live_links().is_empty());
    }

    #[test]
    fn detach_stops_ticks() {
        let mut r = rig(1.0, BlurConfig::default().refresh_mode(RefreshMode::Continuous));
        let link = r.surface.attach(&r.tree).unwrap();
        r.surface.detach();
        assert!(frame(&mut r, 0.0, true).is_empty());
        assert_eq!(r.surface.on_refresh(link, 0.0, &mut r.tree), TickOutcome::StaleLink);
        assert_eq!(r.tree.render_count(), 0);
    }

    #[test]
    fn mode_switch_on_attached_surface_resubscribes_once() {
        let mut r = rig(1.0, BlurConfig::default());
        let old = r.surface.attach(&r.tree).unwrap();
        r.sync.clear_events();

        r.surface.set_refresh_mode(RefreshMode::Tracking);
        assert!(r.sync.events().is_empty());

        r.surface.set_refresh_mode(RefreshMode::Continuous);
        let new = r.surface.link().unwrap();
        assert_eq!(r.sync.events().len(), 2);
        assert_eq!(r.sync.events()[0], SyncEvent::Invalidated(old));
        assert!(matches!(r.sync.events()[1], SyncEvent::Subscribed(id, _) if id == new));
        assert_eq!(r.surface.on_refresh(old, 0.0, &mut r.tree), TickOutcome::StaleLink);
    }

    #[test]
    fn dropping_surface_invalidates_link() {
        let mut r = rig(1.0, BlurConfig::default());
        r.surface.attach(&r.tree);
        let Rig { surface, sync, .. } = r;
        drop(surface);
        assert!(sync.live_links().is_empty());
    }

    // ── pipeline ──────────────────────────────────────────────────────────

    #[test]
    fn zero_radius_publishes_raw_snapshot() {
        let mut r = rig(1.0, BlurConfig::default());
        r.surface.refresh_now(0.0, &mut r.tree);

        let raw = crate::capture::capture(&mut r.tree, r.surface.node()).unwrap();
        assert_eq!(r.surface.contents().map(|b| &b.pixels), Some(&raw.pixels));
    }

    #[test]
    fn empty_frame_publishes_unblurred() {
        let mut r = rig(1.0, BlurConfig::default().radius(8.0));
        r.tree.set_frame(r.surface.node(), Rect::new(5.0, 5.0, 0.0, 10.0));
        assert_eq!(r.surface.refresh_now(0.0, &mut r.tree), TickOutcome::PublishedUnblurred);
        assert!(r.surface.contents().is_some_and(|b| b.is_empty()));
    }

    #[test]
    fn failed_render_keeps_previous_contents() {
        let mut r = rig(1.0, BlurConfig::default().radius(2.0));
        r.surface.refresh_now(0.0, &mut r.tree);
        let before = r.surface.contents().cloned();

        r.tree.set_render_failure(true);
        assert_eq!(r.surface.refresh_now(0.1, &mut r.tree), TickOutcome::Aborted);
        assert_eq!(r.surface.contents().cloned(), before);
        assert!(!r.tree.is_hidden(r.sibling));
    }

    #[test]
    fn disabled_surface_skips_capture() {
        let mut r = rig(1.0, BlurConfig::default());
        r.surface.set_enabled(false);
        assert_eq!(r.surface.refresh_now(0.0, &mut r.tree), TickOutcome::Disabled);
        assert_eq!(r.tree.render_count(), 0);
    }

    #[test]
    fn tint_is_composited_over_blur() {
        let tint = Color::from_srgb_u8(0, 0, 255, 255);
        let mut r = rig(1.0, BlurConfig::default().radius(3.0).tint(tint));
        r.surface.refresh_now(0.0, &mut r.tree);
        let contents = r.surface.contents().unwrap();
        assert_eq!(contents.pixels.pixel(10, 10), Rgba8::new(0, 0, 255, 255));
    }

    #[test]
    fn edge_mode_reaches_the_blur() {
        // Red sibling below the glass covers only its top-left corner.
        let build = |edge: EdgeMode| {
            let mut tree = SoftLayerTree::new(1.0);
            let root = tree.add_root(
                Rect::new(0.0, 0.0, 20.0, 20.0),
                LayerContent::Solid(Color::from_srgb_u8(0, 0, 0, 255)),
            );
            tree.add_child(root, Rect::new(0.0, 0.0, 1.0, 1.0), LayerContent::Solid(Color::from_srgb_u8(255, 0, 0, 255)));
            let node = tree.add_child(root, Rect::new(0.0, 0.0, 6.0, 6.0), LayerContent::Empty);
            let config = BlurConfig::default().radius(2.0).iterations(1).edge_mode(edge);
            let mut surface = BlurSurface::new(node, Box::new(ManualFrameSync::new()), config);
            surface.refresh_now(0.0, &mut tree);
            surface
        };

        let extend = build(EdgeMode::Extend);
        let truncate = build(EdgeMode::Truncate);
        assert_eq!(truncate.edge_mode(), EdgeMode::Truncate);

        // Box 3: extend sees the red pixel replicated 4 times out of 9,
        // truncate sees it once out of the 4 in-bounds samples.
        let corner = |s: &BlurSurface| s.contents().unwrap().pixels.pixel(0, 0).r;
        assert_eq!(corner(&extend), 113);
        assert_eq!(corner(&truncate), 64);
    }

    #[test]
    fn iterations_floor_at_one() {
        let mut r = rig(1.0, BlurConfig::default());
        r.surface.set_iterations(0);
        assert_eq!(r.surface.iterations(), 1);
    }

    // ── animation ─────────────────────────────────────────────────────────

    #[test]
    fn tick_mid_transaction_uses_interpolated_radius() {
        let mut r = rig(1.0, BlurConfig::default().refresh_mode(RefreshMode::Continuous));
        r.surface.attach(&r.tree);

        let timing = AnimationTiming::with_duration(0.3).timing_function(TimingFunction::Linear);
        let desc = r.surface.set_blur_radius(10.0, &AnimationContext::with_timing(timing, 0.0));
        assert!(desc.transition().is_some_and(|t| t.from == 0.0 && t.to == 10.0));

        let outcomes = frame(&mut r, 0.15, false);
        match outcomes.as_slice() {
            [TickOutcome::Published { radius, box_size, .. }] => {
                assert!((radius - 5.0).abs() < 1e-3, "sampled radius {radius}");
                assert_eq!(*box_size, 5);
            }
            other => panic!("unexpected outcomes {other:?}"),
        }

        let outcomes = frame(&mut r, 0.4, false);
        assert!(matches!(outcomes.as_slice(), [TickOutcome::Published { radius, .. }] if *radius == 10.0));
        assert_eq!(r.surface.blur_radius(), 10.0);
    }

    #[test]
    fn plain_radius_change_applies_next_tick() {
        let mut r = rig(1.0, BlurConfig::default());
        assert_eq!(r.surface.set_blur_radius(4.0, &AnimationContext::None), AnimationDescription::None);
        let outcome = r.surface.refresh_now(0.0, &mut r.tree);
        assert!(matches!(outcome, TickOutcome::Published { radius, box_size: 5, .. } if radius == 4.0));
        assert_eq!(r.surface.presentation().live, 4.0);
    }
}
