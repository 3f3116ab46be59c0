//! Frost engine crate.
//!
//! A live "frosted glass" surface: each refresh captures whatever is painted
//! behind a layer, runs a multi-pass box blur over it and publishes the result
//! as that layer's contents.
//!
//! The host UI framework is reached only through the traits in [`host`]. The
//! [`soft`] module provides a CPU implementation of them for tools and tests.

pub mod animator;
pub mod blur;
pub mod capture;
pub mod error;
pub mod host;
pub mod pixel;
pub mod scheduler;
pub mod surface;

pub mod coords;
pub mod logging;
pub mod paint;
pub mod soft;
pub mod time;

pub use error::BlurError;
pub use surface::{BlurConfig, BlurSurface, TickOutcome};
