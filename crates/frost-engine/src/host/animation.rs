use std::fmt;
use std::rc::Rc;

/// Easing curve applied to normalized progress.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub enum TimingFunction {
    Linear,
    EaseIn,
    EaseOut,
    EaseInEaseOut,
    /// The host's default curve for implicit property changes.
    #[default]
    Default,
    /// Cubic Bézier with control points `(x1, y1)` and `(x2, y2)`; endpoints are (0,0) and (1,1).
    CubicBezier(f32, f32, f32, f32),
}

impl TimingFunction {
    pub fn control_points(self) -> (f32, f32, f32, f32) {
        match self {
            TimingFunction::Linear => (0.0, 0.0, 1.0, 1.0),
            TimingFunction::EaseIn => (0.42, 0.0, 1.0, 1.0),
            TimingFunction::EaseOut => (0.0, 0.0, 0.58, 1.0),
            TimingFunction::EaseInEaseOut => (0.42, 0.0, 0.58, 1.0),
            TimingFunction::Default => (0.25, 0.1, 0.25, 1.0),
            TimingFunction::CubicBezier(x1, y1, x2, y2) => (x1.clamp(0.0, 1.0), y1, x2.clamp(0.0, 1.0), y2),
        }
    }

    /// Maps linear progress `t ∈ [0, 1]` to eased progress.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        if self == TimingFunction::Linear {
            return t;
        }
        let (x1, y1, x2, y2) = self.control_points();
        let curve = UnitBezier::new(x1 as f64, y1 as f64, x2 as f64, y2 as f64);
        curve.y_at(curve.solve_x(t as f64)) as f32
    }
}

/// Polynomial form of a cubic Bézier through (0,0) and (1,1).
struct UnitBezier {
    ax: f64,
    bx: f64,
    cx: f64,
    ay: f64,
    by: f64,
    cy: f64,
}

impl UnitBezier {
    fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let cx = 3.0 * x1;
        let bx = 3.0 * (x2 - x1) - cx;
        let ax = 1.0 - cx - bx;
        let cy = 3.0 * y1;
        let by = 3.0 * (y2 - y1) - cy;
        let ay = 1.0 - cy - by;
        Self { ax, bx, cx, ay, by, cy }
    }

    fn x_at(&self, s: f64) -> f64 {
        ((self.ax * s + self.bx) * s + self.cx) * s
    }

    fn y_at(&self, s: f64) -> f64 {
        ((self.ay * s + self.by) * s + self.cy) * s
    }

    fn dx_at(&self, s: f64) -> f64 {
        (3.0 * self.ax * s + 2.0 * self.bx) * s + self.cx
    }

    /// Curve parameter whose x equals `x`. Newton first, bisection as fallback.
    fn solve_x(&self, x: f64) -> f64 {
        const EPS: f64 = 1e-7;

        let mut s = x;
        for _ in 0..8 {
            let err = self.x_at(s) - x;
            if err.abs() < EPS {
                return s;
            }
            let d = self.dx_at(s);
            if d.abs() < 1e-6 {
                break;
            }
            s -= err / d;
        }

        let (mut lo, mut hi) = (0.0, 1.0);
        s = x;
        while lo < hi {
            let v = self.x_at(s);
            if (v - x).abs() < EPS {
                break;
            }
            if x > v {
                lo = s;
            } else {
                hi = s;
            }
            let next = (hi - lo) * 0.5 + lo;
            if next == s {
                break;
            }
            s = next;
        }
        s
    }
}

/// What happens outside an animation's active span.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum FillMode {
    #[default]
    Removed,
    Forwards,
    Backwards,
    Both,
}

impl FillMode {
    #[inline]
    pub fn fills_backwards(self) -> bool {
        matches!(self, FillMode::Backwards | FillMode::Both)
    }
}

/// Callback the host invokes when an animation it runs stops.
///
/// The argument is `true` if the animation ran to completion.
#[derive(Clone)]
pub struct CompletionHandler(Rc<dyn Fn(bool)>);

impl CompletionHandler {
    pub fn new(f: impl Fn(bool) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, finished: bool) {
        (self.0)(finished)
    }
}

impl fmt::Debug for CompletionHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CompletionHandler(..)")
    }
}

impl PartialEq for CompletionHandler {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Media-timing parameters shared by every animation in a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationTiming {
    /// Length of one cycle, in seconds.
    pub duration: f64,
    /// Local-time rate multiplier.
    pub speed: f32,
    /// Added to local time after speed is applied.
    pub time_offset: f64,
    /// Absolute media time the animation starts at; `None` means "when the transaction began".
    pub begin_time: Option<f64>,
    /// Number of cycles; `0` means one.
    pub repeat_count: f32,
    /// Total active time in seconds; overrides `repeat_count` when positive.
    pub repeat_duration: f64,
    pub autoreverses: bool,
    pub fill_mode: FillMode,
    pub timing_function: TimingFunction,
    pub completion: Option<CompletionHandler>,
}

impl Default for AnimationTiming {
    fn default() -> Self {
        Self {
            duration: 0.25,
            speed: 1.0,
            time_offset: 0.0,
            begin_time: None,
            repeat_count: 0.0,
            repeat_duration: 0.0,
            autoreverses: false,
            fill_mode: FillMode::Removed,
            timing_function: TimingFunction::Default,
            completion: None,
        }
    }
}

impl AnimationTiming {
    pub fn with_duration(duration: f64) -> Self {
        Self { duration, ..Self::default() }
    }

    pub fn timing_function(mut self, f: TimingFunction) -> Self {
        self.timing_function = f;
        self
    }

    pub fn autoreverses(mut self, on: bool) -> Self {
        self.autoreverses = on;
        self
    }

    pub fn repeat_count(mut self, n: f32) -> Self {
        self.repeat_count = n;
        self
    }

    pub fn fill_mode(mut self, mode: FillMode) -> Self {
        self.fill_mode = mode;
        self
    }

    pub fn completion(mut self, handler: CompletionHandler) -> Self {
        self.completion = Some(handler);
        self
    }

    /// Length of one forward (+ reverse) cycle in local time.
    #[inline]
    pub fn cycle_duration(&self) -> f64 {
        if self.autoreverses { self.duration * 2.0 } else { self.duration }
    }

    /// Total local time the animation is active for.
    pub fn active_duration(&self) -> f64 {
        if self.repeat_duration > 0.0 {
            self.repeat_duration
        } else {
            let count = if self.repeat_count > 0.0 { self.repeat_count as f64 } else { 1.0 };
            self.cycle_duration() * count
        }
    }
}

/// An animated transaction the mutation happens inside.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub timing: AnimationTiming,
    /// Media time the transaction was opened at.
    pub began_at: f64,
    /// Mirrors "disable actions": property changes apply without animation.
    pub actions_disabled: bool,
}

/// Animation state in effect when a property is mutated.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AnimationContext {
    /// Plain assignment.
    #[default]
    None,
    Transaction(Transaction),
}

impl AnimationContext {
    /// Animated transaction of `duration` seconds opened at `now`.
    pub fn animated(duration: f64, now: f64) -> Self {
        Self::with_timing(AnimationTiming::with_duration(duration), now)
    }

    pub fn with_timing(timing: AnimationTiming, now: f64) -> Self {
        AnimationContext::Transaction(Transaction { timing, began_at: now, actions_disabled: false })
    }

    /// Timing and begin time, if mutations in this context should animate.
    ///
    /// Transactions with actions disabled, a non-positive duration or a
    /// non-positive speed animate nothing.
    pub fn active(&self) -> Option<(&AnimationTiming, f64)> {
        match self {
            AnimationContext::Transaction(tx)
                if !tx.actions_disabled && tx.timing.duration > 0.0 && tx.timing.speed > 0.0 =>
            {
                Some((&tx.timing, tx.timing.begin_time.unwrap_or(tx.began_at)))
            }
            _ => None,
        }
    }
}

/// Radius animation synthesized for an animated mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct RadiusTransition {
    pub key_path: &'static str,
    pub from: f32,
    pub to: f32,
    /// Absolute media time the transition starts.
    pub begin: f64,
    pub timing: AnimationTiming,
}

/// Result of intercepting a property mutation.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AnimationDescription {
    /// No transition; the value applies at the next tick.
    #[default]
    None,
    Transition(RadiusTransition),
}

impl AnimationDescription {
    pub fn transition(&self) -> Option<&RadiusTransition> {
        match self {
            AnimationDescription::Transition(t) => Some(t),
            AnimationDescription::None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    // ── TimingFunction ────────────────────────────────────────────────────

    #[test]
    fn curves_hit_endpoints() {
        for f in [
            TimingFunction::Linear,
            TimingFunction::EaseIn,
            TimingFunction::EaseOut,
            TimingFunction::EaseInEaseOut,
            TimingFunction::Default,
            TimingFunction::CubicBezier(0.1, 0.7, 0.2, 1.0),
        ] {
            assert!(f.apply(0.0).abs() < 1e-4, "{f:?} at 0");
            assert!((f.apply(1.0) - 1.0).abs() < 1e-4, "{f:?} at 1");
        }
    }

    #[test]
    fn ease_in_out_is_symmetric() {
        let f = TimingFunction::EaseInEaseOut;
        assert!((f.apply(0.5) - 0.5).abs() < 1e-4);
        assert!((f.apply(0.25) + f.apply(0.75) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn ease_in_starts_slow() {
        assert!(TimingFunction::EaseIn.apply(0.25) < 0.25);
        assert!(TimingFunction::EaseOut.apply(0.25) > 0.25);
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(TimingFunction::Linear.apply(-1.0), 0.0);
        assert_eq!(TimingFunction::Linear.apply(2.0), 1.0);
    }

    // ── AnimationTiming ───────────────────────────────────────────────────

    #[test]
    fn active_duration_counts_repeats_and_reverse() {
        let t = AnimationTiming::with_duration(0.5).repeat_count(2.0).autoreverses(true);
        assert_eq!(t.active_duration(), 2.0);
        let t = AnimationTiming { repeat_duration: 0.7, ..AnimationTiming::with_duration(0.5) };
        assert_eq!(t.active_duration(), 0.7);
    }

    // ── AnimationContext ──────────────────────────────────────────────────

    #[test]
    fn plain_context_is_inactive() {
        assert!(AnimationContext::None.active().is_none());
    }

    #[test]
    fn disabled_actions_are_inactive() {
        let mut ctx = AnimationContext::animated(0.3, 1.0);
        if let AnimationContext::Transaction(tx) = &mut ctx {
            tx.actions_disabled = true;
        }
        assert!(ctx.active().is_none());
        assert!(AnimationContext::animated(0.0, 1.0).active().is_none());
    }

    #[test]
    fn stopped_or_reversed_clock_is_inactive() {
        for speed in [0.0, -1.0, f32::NAN] {
            let timing = AnimationTiming { speed, ..AnimationTiming::with_duration(0.3) };
            assert!(AnimationContext::with_timing(timing, 1.0).active().is_none(), "speed {speed}");
        }
    }

    #[test]
    fn begin_time_defaults_to_transaction_start() {
        let ctx = AnimationContext::animated(0.3, 4.0);
        assert_eq!(ctx.active().map(|(_, begin)| begin), Some(4.0));

        let timing = AnimationTiming { begin_time: Some(9.0), ..AnimationTiming::with_duration(0.3) };
        let ctx = AnimationContext::with_timing(timing, 4.0);
        assert_eq!(ctx.active().map(|(_, begin)| begin), Some(9.0));
    }

    #[test]
    fn completion_handler_is_shared() {
        let hits = Rc::new(Cell::new(0));
        let seen = hits.clone();
        let handler = CompletionHandler::new(move |done| {
            if done {
                seen.set(seen.get() + 1);
            }
        });
        let copy = handler.clone();
        assert_eq!(handler, copy);
        copy.call(true);
        assert_eq!(hits.get(), 1);
    }
}
