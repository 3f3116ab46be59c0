//! Narrow interfaces to the host compositing framework.
//!
//! A blur surface never talks to a window system directly. The host injects:
//! - a [`FrameSync`] that hands out display-link subscriptions
//! - a [`Compositor`] exposing the layer tree and offscreen rendering
//!
//! Animation interception is modelled as data: the caller passes an
//! [`AnimationContext`] when mutating the radius and receives an
//! [`AnimationDescription`] back.

mod animation;
mod frame_sync;
mod tree;

pub use animation::{
    AnimationContext, AnimationDescription, AnimationTiming, CompletionHandler, FillMode,
    RadiusTransition, TimingFunction, Transaction,
};
pub use frame_sync::{FrameSync, LinkId, RefreshMode, RunLoopMode};
pub use tree::{Compositor, LayerTree, NodeId};
