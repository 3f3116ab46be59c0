use crate::host::RadiusTransition;

/// Committed radius alongside the value currently on screen.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct PresentationValue {
    /// The authoritative model value.
    pub committed: f32,
    /// The value as rendered right now; equals `committed` when idle.
    pub live: f32,
    pub is_animating: bool,
}

impl PresentationValue {
    pub fn settled(value: f32) -> Self {
        Self { committed: value, live: value, is_animating: false }
    }
}

/// Where a transition is relative to a point in media time.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Phase {
    /// Not started. Carries the start value if the fill mode holds it.
    Pending(Option<f32>),
    Running(f32),
    Finished,
}

/// Evaluates `transition` at absolute media time `now`.
pub fn evaluate(transition: &RadiusTransition, now: f64) -> Phase {
    let timing = &transition.timing;
    let local = (now - transition.begin) * timing.speed as f64 + timing.time_offset;

    if local < 0.0 {
        let held = timing.fill_mode.fills_backwards().then_some(transition.from);
        return Phase::Pending(held);
    }
    if local >= timing.active_duration() || timing.duration <= 0.0 {
        return Phase::Finished;
    }

    let mut pos = local % timing.cycle_duration();
    if timing.autoreverses && pos > timing.duration {
        pos = timing.cycle_duration() - pos;
    }
    let progress = (pos / timing.duration) as f32;
    let eased = timing.timing_function.apply(progress);
    Phase::Running(transition.from + (transition.to - transition.from) * eased)
}
