use crate::coords::Rect;
use crate::pixel::Bitmap;

/// Opaque layer handle issued by the host.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Read access to the host layer tree plus the one mutation capture needs.
pub trait LayerTree {
    /// Container of `node`, or `None` if it is detached.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Direct children of `node`, back to front (paint order).
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    fn is_hidden(&self, node: NodeId) -> bool;

    fn set_hidden(&mut self, node: NodeId, hidden: bool);

    /// Bounds of `node` in its parent's coordinate space.
    fn frame(&self, node: NodeId) -> Rect;

    /// Pixels per logical point of the display the tree is shown on.
    fn content_scale(&self) -> f32;
}

/// Layer tree that can also paint itself offscreen.
pub trait Compositor: LayerTree {
    /// Paints the visible subtree rooted at `root` into a new bitmap.
    ///
    /// `region` is in `root`'s coordinate space; its origin maps to pixel (0, 0)
    /// and the bitmap measures `region.size × scale` pixels. Hidden layers and
    /// their descendants are skipped.
    fn render_offscreen(&self, root: NodeId, region: Rect, scale: f32) -> anyhow::Result<Bitmap>;
}
