use std::cell::{Cell, RefCell};

use crate::coords::{Rect, Vec2};
use crate::host::{LayerTree, NodeId};
use crate::paint::Color;
use crate::pixel::Bitmap;

/// What a software layer paints inside its bounds.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerContent {
    Empty,
    Solid(Color),
    /// Alternating bands of `period` points, horizontal bands unless `vertical`.
    Stripes { a: Color, b: Color, period: f32, vertical: bool },
    /// Bitmap stretched to the layer bounds (nearest neighbour).
    Image(Bitmap),
}

#[derive(Debug, Clone)]
pub(super) struct SoftLayer {
    pub(super) parent: Option<NodeId>,
    pub(super) children: Vec<NodeId>,
    pub(super) frame: Rect,
    pub(super) hidden: bool,
    pub(super) content: LayerContent,
}

/// Layer tree held entirely in memory.
///
/// Besides implementing [`LayerTree`] and [`Compositor`](crate::host::Compositor),
/// it records which layers were hidden during the most recent offscreen render
/// and can be told to fail renders, so capture behaviour is observable.
#[derive(Debug)]
pub struct SoftLayerTree {
    pub(super) layers: Vec<SoftLayer>,
    scale: f32,
    pub(super) fail_renders: bool,
    pub(super) renders: Cell<u32>,
    pub(super) hidden_at_last_render: RefCell<Vec<NodeId>>,
}

impl SoftLayerTree {
    /// Empty tree displayed at `scale` pixels per point.
    pub fn new(scale: f32) -> Self {
        Self {
            layers: Vec::new(),
            scale,
            fail_renders: false,
            renders: Cell::new(0),
            hidden_at_last_render: RefCell::new(Vec::new()),
        }
    }

    /// Adds a parentless layer.
    pub fn add_root(&mut self, frame: Rect, content: LayerContent) -> NodeId {
        self.push(None, frame, content)
    }

    /// Adds a layer on top of `parent`'s existing children.
    pub fn add_child(&mut self, parent: NodeId, frame: Rect, content: LayerContent) -> NodeId {
        let id = self.push(Some(parent), frame, content);
        self.layers[parent.0 as usize].children.push(id);
        id
    }

    /// Detaches `node` from its parent. The layer itself is kept.
    pub fn remove_from_parent(&mut self, node: NodeId) {
        if let Some(parent) = self.layers[node.0 as usize].parent.take() {
            self.layers[parent.0 as usize].children.retain(|&c| c != node);
        }
    }

    pub fn set_frame(&mut self, node: NodeId, frame: Rect) {
        self.layers[node.0 as usize].frame = frame;
    }

    pub fn offset(&mut self, node: NodeId, delta: Vec2) {
        let layer = &mut self.layers[node.0 as usize];
        layer.frame = layer.frame.translate(delta);
    }

    pub fn set_content(&mut self, node: NodeId, content: LayerContent) {
        self.layers[node.0 as usize].content = content;
    }

    /// Makes subsequent offscreen renders return an error.
    pub fn set_render_failure(&mut self, fail: bool) {
        self.fail_renders = fail;
    }

    /// Number of offscreen renders performed, failed ones included.
    pub fn render_count(&self) -> u32 {
        self.renders.get()
    }

    /// Layers that were hidden while the most recent render ran.
    pub fn hidden_at_last_render(&self) -> Vec<NodeId> {
        self.hidden_at_last_render.borrow().clone()
    }

    fn push(&mut self, parent: Option<NodeId>, frame: Rect, content: LayerContent) -> NodeId {
        let id = NodeId(self.layers.len() as u32);
        self.layers.push(SoftLayer { parent, children: Vec::new(), frame, hidden: false, content });
        id
    }
}

impl LayerTree for SoftLayerTree {
    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.layers.get(node.0 as usize).and_then(|l| l.parent)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.layers.get(node.0 as usize).map(|l| l.children.clone()).unwrap_or_default()
    }

    fn is_hidden(&self, node: NodeId) -> bool {
        self.layers.get(node.0 as usize).is_some_and(|l| l.hidden)
    }

    fn set_hidden(&mut self, node: NodeId, hidden: bool) {
        if let Some(layer) = self.layers.get_mut(node.0 as usize) {
            layer.hidden = hidden;
        }
    }

    fn frame(&self, node: NodeId) -> Rect {
        self.layers.get(node.0 as usize).map(|l| l.frame).unwrap_or_default()
    }

    fn content_scale(&self) -> f32 {
        self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn children_are_in_insertion_order() {
        let mut tree = SoftLayerTree::new(1.0);
        let root = tree.add_root(Rect::new(0.0, 0.0, 10.0, 10.0), LayerContent::Empty);
        let a = tree.add_child(root, Rect::new(0.0, 0.0, 1.0, 1.0), LayerContent::Empty);
        let b = tree.add_child(root, Rect::new(0.0, 0.0, 1.0, 1.0), LayerContent::Empty);
        assert_eq!(tree.children(root), vec![a, b]);
        assert_eq!(tree.parent(b), Some(root));
    }

    #[test]
    fn remove_from_parent_detaches() {
        let mut tree = SoftLayerTree::new(1.0);
        let root = tree.add_root(Rect::new(0.0, 0.0, 10.0, 10.0), LayerContent::Empty);
        let a = tree.add_child(root, Rect::new(0.0, 0.0, 1.0, 1.0), LayerContent::Empty);
        tree.remove_from_parent(a);
        assert!(tree.children(root).is_empty());
        assert_eq!(tree.parent(a), None);
    }

    #[test]
    fn offset_moves_frame() {
        let mut tree = SoftLayerTree::new(1.0);
        let root = tree.add_root(Rect::new(1.0, 1.0, 10.0, 10.0), LayerContent::Empty);
        tree.offset(root, Vec2::new(0.0, -3.0));
        assert_eq!(tree.frame(root), Rect::new(1.0, -2.0, 10.0, 10.0));
    }
}
