//! Frame timing.
//!
//! Animation sampling works in *media time*: seconds since the clock started,
//! as `f64`. A host drives one `FrameClock` per display link and passes
//! `FrameTime::media_time` to `BlurSurface::on_refresh`.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
