use crate::host::{AnimationContext, AnimationDescription, RadiusTransition};

use super::presentation::{evaluate, Phase, PresentationValue};

/// Key path reported in synthesized radius transitions.
pub const RADIUS_KEY_PATH: &str = "blur_radius";

/// Radius displayed when an animated change began.
///
/// `start_radius` is only meaningful while `active` is set.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct InterpolationState {
    pub start_radius: f32,
    pub active: bool,
}

/// Owns the committed radius, the running transition and the presentation record.
#[derive(Debug, Clone, Default)]
pub struct RadiusAnimator {
    presentation: PresentationValue,
    interpolation: InterpolationState,
    transition: Option<RadiusTransition>,
}

impl RadiusAnimator {
    pub fn new(radius: f32) -> Self {
        Self {
            presentation: PresentationValue::settled(sanitize(radius)),
            ..Self::default()
        }
    }

    /// The committed (model) radius.
    #[inline]
    pub fn committed(&self) -> f32 {
        self.presentation.committed
    }

    /// Presentation record as of the last [`advance`](Self::advance) or [`sample`](Self::sample).
    #[inline]
    pub fn presentation(&self) -> PresentationValue {
        self.presentation
    }

    #[inline]
    pub fn interpolation(&self) -> InterpolationState {
        self.interpolation
    }

    #[inline]
    pub fn transition(&self) -> Option<&RadiusTransition> {
        self.transition.as_ref()
    }

    /// Writes a new radius.
    ///
    /// Inside an animated transaction this captures the radius on screen as the
    /// interpolation start, starts tracking a transition with the transaction's
    /// timing and returns that transition so the host can run it alongside its
    /// other animations. Otherwise the value applies at the next sample and any
    /// running transition is dropped.
    pub fn set(&mut self, radius: f32, ctx: &AnimationContext) -> AnimationDescription {
        let radius = sanitize(radius);

        let (timing, begin, opened_at) = match (ctx.active(), ctx) {
            (Some((timing, begin)), AnimationContext::Transaction(tx)) => (timing, begin, tx.began_at),
            _ => {
                self.retire(false);
                self.interpolation = InterpolationState::default();
                self.presentation = PresentationValue::settled(radius);
                log::trace!("blur radius set to {radius} without animation");
                return AnimationDescription::None;
            }
        };

        self.advance(opened_at);
        let start = if self.presentation.is_animating {
            self.presentation.live
        } else {
            self.presentation.committed
        };

        let transition = RadiusTransition {
            key_path: RADIUS_KEY_PATH,
            from: start,
            to: radius,
            begin,
            timing: timing.clone(),
        };
        log::debug!(
            "blur radius {start} -> {radius} over {:.3}s starting at {begin:.3}",
            timing.duration
        );

        self.interpolation = InterpolationState { start_radius: start, active: true };
        self.presentation.committed = radius;
        self.retire(false);
        self.transition = Some(transition.clone());
        AnimationDescription::Transition(transition)
    }

    /// Re-evaluates the presentation record at `now`. Finished transitions are dropped.
    pub fn advance(&mut self, now: f64) -> PresentationValue {
        let committed = self.presentation.committed;
        let phase = match &self.transition {
            Some(t) => evaluate(t, now),
            None => Phase::Finished,
        };

        self.presentation = match phase {
            Phase::Running(v) | Phase::Pending(Some(v)) => {
                PresentationValue { committed, live: v, is_animating: true }
            }
            Phase::Pending(None) => PresentationValue::settled(committed),
            Phase::Finished => {
                self.retire(true);
                PresentationValue::settled(committed)
            }
        };
        self.presentation
    }

    /// Drops the tracked transition, telling its completion handler whether it ran out.
    fn retire(&mut self, finished: bool) {
        if let Some(handler) = self.transition.take().and_then(|t| t.timing.completion) {
            handler.call(finished);
        }
    }

    /// Radius the blur should use for a tick at `now`.
    ///
    /// - interpolation active, presentation running: the transition's value,
    ///   which starts at `start_radius`
    /// - interpolation active, nothing running: the committed radius (the
    ///   interpolation state is cleared)
    /// - interpolation inactive: the presentation value
    pub fn sample(&mut self, now: f64) -> f32 {
        let presentation = self.advance(now);
        if self.interpolation.active {
            if presentation.is_animating {
                return presentation.live;
            }
            self.interpolation = InterpolationState::default();
            return presentation.committed;
        }
        presentation.live
    }
}

/// Radii are finite and non-negative; anything else collapses to zero.
#[inline]
fn sanitize(radius: f32) -> f32 {
    if radius.is_finite() && radius > 0.0 { radius } else { 0.0 }
}
