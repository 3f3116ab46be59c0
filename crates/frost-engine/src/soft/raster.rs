use anyhow::{bail, Context};

use crate::coords::{Rect, Vec2};
use crate::host::{Compositor, LayerTree, NodeId};
use crate::paint::Color;
use crate::pixel::{AlphaMode, Bitmap, PixelBuffer, Rgba8};

use super::tree::{LayerContent, SoftLayerTree};

impl SoftLayerTree {
    /// Renders `root` at its own size, e.g. to inspect a whole scene.
    pub fn composite(&self, root: NodeId) -> anyhow::Result<Bitmap> {
        let size = self.frame(root).size;
        self.render_offscreen(root, Rect::new(0.0, 0.0, size.x, size.y), self.content_scale())
    }

    /// Premultiplied color of `node`'s visible subtree at `p` (node space), over `below`.
    fn shade(&self, node: NodeId, p: Vec2, below: [u8; 4]) -> [u8; 4] {
        let layer = &self.layers[node.0 as usize];
        if layer.hidden {
            return below;
        }

        let bounds = Rect::new(0.0, 0.0, layer.frame.size.x, layer.frame.size.y);
        let mut acc = below;
        if bounds.contains(p) {
            acc = paint_content(&layer.content, p, bounds.size, acc);
        }
        for &child in &layer.children {
            let origin = self.layers[child.0 as usize].frame.origin;
            acc = self.shade(child, p - origin, acc);
        }
        acc
    }
}

fn paint_content(content: &LayerContent, p: Vec2, size: Vec2, below: [u8; 4]) -> [u8; 4] {
    match content {
        LayerContent::Empty => below,
        LayerContent::Solid(color) => color.over_premul_u8(below),
        LayerContent::Stripes { a, b, period, vertical } => {
            let coord = if *vertical { p.x } else { p.y };
            let band = (coord / period.max(f32::EPSILON)).floor() as i64;
            let color = if band.rem_euclid(2) == 0 { a } else { b };
            color.over_premul_u8(below)
        }
        LayerContent::Image(bitmap) => {
            if bitmap.is_empty() {
                return below;
            }
            let ix = ((p.x / size.x) * bitmap.width() as f32) as u32;
            let iy = ((p.y / size.y) * bitmap.height() as f32) as u32;
            let raw = bitmap.pixels.pixel(ix.min(bitmap.width() - 1), iy.min(bitmap.height() - 1));
            image_color(bitmap, raw).over_premul_u8(below)
        }
    }
}

/// Converts a stored pixel into a premultiplied color, honouring format and alpha mode.
fn image_color(bitmap: &Bitmap, raw: Rgba8) -> Color {
    let bytes = raw.to_array();
    let [ro, go, bo, ao] = bitmap.format.channel_offsets();
    let f = |i: usize| bytes[i] as f32 / 255.0;
    match bitmap.alpha {
        AlphaMode::Premultiplied => Color { r: f(ro), g: f(go), b: f(bo), a: f(ao) },
        AlphaMode::Straight => Color::from_straight(f(ro), f(go), f(bo), f(ao)),
        AlphaMode::Ignored => Color { r: f(ro), g: f(go), b: f(bo), a: 1.0 },
    }
}

impl Compositor for SoftLayerTree {
    fn render_offscreen(&self, root: NodeId, region: Rect, scale: f32) -> anyhow::Result<Bitmap> {
        self.renders.set(self.renders.get() + 1);
        *self.hidden_at_last_render.borrow_mut() = (0..self.layers.len() as u32)
            .map(NodeId)
            .filter(|&n| self.is_hidden(n))
            .collect();

        if self.fail_renders {
            bail!("software rasterizer configured to fail");
        }
        if root.0 as usize >= self.layers.len() {
            bail!("unknown layer {root:?}");
        }

        let (w, h) = region.pixel_size(scale);
        let mut pixels = PixelBuffer::try_new(w, h).context("allocating offscreen target")?;
        for y in 0..h {
            for x in 0..w {
                let p = region.origin + Vec2::new((x as f32 + 0.5) / scale, (y as f32 + 0.5) / scale);
                let px = self.shade(root, p, [0, 0, 0, 0]);
                pixels.set_pixel(x, y, Rgba8::from_array(px));
            }
        }
        Ok(Bitmap::new(pixels, scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> Color {
        Color::from_srgb_u8(255, 0, 0, 255)
    }

    fn blue() -> Color {
        Color::from_srgb_u8(0, 0, 255, 255)
    }

    #[test]
    fn region_origin_maps_to_pixel_zero() {
        let mut tree = SoftLayerTree::new(1.0);
        let root = tree.add_root(Rect::new(0.0, 0.0, 10.0, 10.0), LayerContent::Solid(red()));
        tree.add_child(root, Rect::new(5.0, 5.0, 5.0, 5.0), LayerContent::Solid(blue()));

        let bmp = tree.render_offscreen(root, Rect::new(4.0, 4.0, 2.0, 2.0), 1.0).unwrap();
        assert_eq!((bmp.width(), bmp.height()), (2, 2));
        assert_eq!(bmp.pixels.pixel(0, 0), Rgba8::new(255, 0, 0, 255));
        assert_eq!(bmp.pixels.pixel(1, 1), Rgba8::new(0, 0, 255, 255));
    }

    #[test]
    fn scale_multiplies_pixel_size() {
        let mut tree = SoftLayerTree::new(2.0);
        let root = tree.add_root(Rect::new(0.0, 0.0, 10.0, 6.0), LayerContent::Solid(red()));
        let bmp = tree.composite(root).unwrap();
        assert_eq!((bmp.width(), bmp.height(), bmp.scale), (20, 12, 2.0));
    }

    #[test]
    fn hidden_layers_are_skipped() {
        let mut tree = SoftLayerTree::new(1.0);
        let root = tree.add_root(Rect::new(0.0, 0.0, 4.0, 4.0), LayerContent::Solid(red()));
        let top = tree.add_child(root, Rect::new(0.0, 0.0, 4.0, 4.0), LayerContent::Solid(blue()));
        tree.set_hidden(top, true);
        let bmp = tree.composite(root).unwrap();
        assert_eq!(bmp.pixels.pixel(2, 2), Rgba8::new(255, 0, 0, 255));
        assert_eq!(tree.hidden_at_last_render(), vec![top]);
    }

    #[test]
    fn stripes_alternate_by_period() {
        let mut tree = SoftLayerTree::new(1.0);
        let stripes = LayerContent::Stripes { a: red(), b: blue(), period: 2.0, vertical: false };
        let root = tree.add_root(Rect::new(0.0, 0.0, 1.0, 4.0), stripes);
        let bmp = tree.composite(root).unwrap();
        let reds: Vec<u8> = (0..4).map(|y| bmp.pixels.pixel(0, y).r).collect();
        assert_eq!(reds, vec![255, 255, 0, 0]);
    }

    #[test]
    fn image_content_is_stretched() {
        let mut src = PixelBuffer::try_new(1, 1).unwrap();
        src.set_pixel(0, 0, Rgba8::new(0, 255, 0, 255));
        let mut tree = SoftLayerTree::new(1.0);
        let root = tree.add_root(Rect::new(0.0, 0.0, 3.0, 3.0), LayerContent::Image(Bitmap::new(src, 1.0)));
        let bmp = tree.composite(root).unwrap();
        assert_eq!(bmp.pixels.pixel(2, 2), Rgba8::new(0, 255, 0, 255));
    }

    #[test]
    fn configured_failure_is_reported() {
        let mut tree = SoftLayerTree::new(1.0);
        let root = tree.add_root(Rect::new(0.0, 0.0, 3.0, 3.0), LayerContent::Empty);
        tree.set_render_failure(true);
        assert!(tree.composite(root).is_err());
        assert_eq!(tree.render_count(), 1);
    }
}
