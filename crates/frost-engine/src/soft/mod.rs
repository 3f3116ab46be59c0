//! In-memory host.
//!
//! A complete, window-system-free implementation of the [`host`](crate::host)
//! traits: a layer tree with procedural content, a point-sampling rasterizer and
//! a display link driven by hand. The studio binary renders through it and the
//! pipeline tests use it to observe hide/restore and subscription behaviour.

mod frame_sync;
mod raster;
mod tree;

pub use frame_sync::{ManualFrameSync, SyncEvent};
pub use tree::{LayerContent, SoftLayerTree};
