//! Pipeline error type.

/// Failure of a single capture-and-blur cycle.
///
/// None of these reach the consumer of a [`BlurSurface`](crate::surface::BlurSurface):
/// a failed tick is logged and the previously published contents stay visible.
#[derive(Debug, thiserror::Error)]
pub enum BlurError {
    /// A pixel buffer could not be reserved, or its byte size overflows `usize`.
    #[error("failed to allocate {bytes} bytes for a {width}x{height} pixel buffer")]
    Allocation { width: u32, height: u32, bytes: usize },

    /// The surface is not inside a container, so there is nothing to capture.
    #[error("blur surface has no container layer")]
    Detached,

    /// The host rasterizer failed while painting the snapshot.
    #[error("offscreen render failed: {0:#}")]
    Render(#[source] anyhow::Error),
}
