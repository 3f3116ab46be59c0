//! Snapshot of the content behind a blur surface.
//!
//! Capture renders the surface's container into a bitmap covering the
//! surface's bounds. The surface's own layer and every sibling painted after
//! it are hidden for the duration of the render; siblings painted before it are
//! left alone even if they are visible. The hide/restore bracket is a guard, so
//! visibility is restored on success, on error and while unwinding.

use crate::error::BlurError;
use crate::host::{Compositor, NodeId};
use crate::pixel::Bitmap;

/// Layers hidden for one capture. Dropping the set shows them again.
pub struct HiddenLayerSet<'a, C: Compositor + ?Sized> {
    host: &'a mut C,
    hidden: Vec<NodeId>,
}

impl<'a, C: Compositor + ?Sized> HiddenLayerSet<'a, C> {
    /// Hides `surface` and every visible sibling that follows it in paint order.
    ///
    /// Layers that were already hidden are not recorded and stay hidden afterwards.
    pub fn hide_from(host: &'a mut C, container: NodeId, surface: NodeId) -> Self {
        let mut hidden = Vec::new();
        let mut reached_surface = false;
        for child in host.children(container) {
            if child == surface {
                reached_surface = true;
            }
            if !reached_surface || host.is_hidden(child) {
                continue;
            }
            host.set_hidden(child, true);
            hidden.push(child);
        }
        Self { host, hidden }
    }

    /// Layers this set hid, in paint order.
    pub fn layers(&self) -> &[NodeId] {
        &self.hidden
    }

    pub fn host(&self) -> &C {
        self.host
    }
}

impl<C: Compositor + ?Sized> Drop for HiddenLayerSet<'_, C> {
    fn drop(&mut self) {
        for &node in self.hidden.iter().rev() {
            self.host.set_hidden(node, false);
        }
    }
}

/// Renders what sits behind `surface` inside its container.
///
/// The bitmap covers the surface's frame at the host content scale, with the
/// frame's origin at pixel (0, 0).
pub fn capture<C: Compositor + ?Sized>(host: &mut C, surface: NodeId) -> Result<Bitmap, BlurError> {
    let container = host.parent(surface).ok_or(BlurError::Detached)?;
    let region = host.frame(surface);
    let scale = host.content_scale();

    let rendered = {
        let hidden = HiddenLayerSet::hide_from(host, container, surface);
        log::trace!(
            "capturing {:?} of container {} with {} layer(s) hidden",
            region,
            container.0,
            hidden.layers().len()
        );
        hidden.host().render_offscreen(container, region, scale)
    };

    rendered.map_err(BlurError::Render)
}
