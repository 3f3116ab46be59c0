//! Blur-radius animation.
//!
//! The radius is the only animatable property of a blur surface. Mutations go
//! through [`RadiusAnimator::set`] together with the caller's
//! [`AnimationContext`](crate::host::AnimationContext); the animator keeps an
//! explicit presentation record so the pipeline can sample the in-flight value.

mod presentation;
mod radius;

pub use presentation::{Phase, PresentationValue};
pub use radius::{InterpolationState, RadiusAnimator, RADIUS_KEY_PATH};
