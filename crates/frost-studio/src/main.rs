mod config;

use std::path::Path;

use anyhow::{Context, Result};
use frost_engine::coords::{Rect, Vec2};
use frost_engine::host::{AnimationContext, AnimationTiming, NodeId, TimingFunction};
use frost_engine::logging::{init_logging, LoggingConfig};
use frost_engine::paint::Color;
use frost_engine::pixel::{AlphaMode, Bitmap, PixelBuffer, BYTES_PER_PIXEL};
use frost_engine::soft::{LayerContent, ManualFrameSync, SoftLayerTree};
use frost_engine::time::FrameClock;
use frost_engine::{BlurConfig, BlurSurface, TickOutcome};

use config::StudioConfig;

/// Layers of the demo scene, bottom to top.
struct Scene {
    tree: SoftLayerTree,
    root: NodeId,
    stripes: NodeId,
    glass: NodeId,
}

/// Decodes `path` into a straight-alpha bitmap at scale 1.
fn load_backdrop(path: &Path) -> Result<Bitmap> {
    let rgba = image::open(path)
        .with_context(|| format!("opening {}", path.display()))?
        .to_rgba8();
    let (w, h) = rgba.dimensions();
    let pixels = PixelBuffer::from_raw(w, h, w as usize * BYTES_PER_PIXEL, rgba.into_raw())
        .context("decoded image does not match its dimensions")?;
    let mut bitmap = Bitmap::new(pixels, 1.0);
    bitmap.alpha = AlphaMode::Straight;
    Ok(bitmap)
}

fn build_scene(config: &StudioConfig) -> Result<Scene> {
    let (w, h) = (config.width, config.height);
    let mut tree = SoftLayerTree::new(config.scale);

    let root = tree.add_root(
        Rect::new(0.0, 0.0, w, h),
        LayerContent::Solid(Color::from_srgb_u8(24, 28, 40, 255)),
    );
    if let Some(path) = &config.backdrop {
        tree.add_child(root, Rect::new(0.0, 0.0, w, h), LayerContent::Image(load_backdrop(path)?));
    }
    // Taller than the viewport so there is something to scroll through.
    // Translucent so a backdrop stays visible between the bands.
    let stripes = tree.add_child(
        root,
        Rect::new(0.0, 0.0, w, h * 4.0),
        LayerContent::Stripes {
            a: Color::from_srgb_u8(230, 120, 40, 200),
            b: Color::from_srgb_u8(40, 110, 220, 200),
            period: 8.0,
            vertical: false,
        },
    );
    let glass = tree.add_child(
        root,
        Rect::new(w * 0.15, h * 0.25, w * 0.7, h * 0.5),
        LayerContent::Empty,
    );
    // Painted after the glass, so it never shows up inside the blur.
    tree.add_child(
        root,
        Rect::new(w * 0.25, h * 0.45, w * 0.5, h * 0.1),
        LayerContent::Solid(Color::from_srgb_u8(250, 250, 250, 255)),
    );

    Ok(Scene { tree, root, stripes, glass })
}

fn blur_config(config: &StudioConfig) -> BlurConfig {
    let blur = &config.blur;
    let mut out = BlurConfig::default()
        .radius(blur.radius)
        .iterations(blur.iterations)
        .edge_mode(blur.edge.into())
        .refresh_mode(blur.refresh_mode.into());
    if let Some([r, g, b, a]) = blur.tint {
        out = out.tint(Color::from_srgb_u8(r, g, b, a));
    }
    out
}

fn write_frame(bitmap: &Bitmap, path: &Path) -> Result<()> {
    // Every scene layer is opaque, so premultiplied and straight bytes coincide.
    let image = image::RgbaImage::from_raw(bitmap.width(), bitmap.height(), bitmap.pixels.to_packed_bytes())
        .context("frame buffer does not match its dimensions")?;
    image.save(path).with_context(|| format!("writing {}", path.display()))
}

fn run(config: StudioConfig) -> Result<()> {
    let mut scene = build_scene(&config)?;
    let sync = ManualFrameSync::new();
    let mut glass = BlurSurface::new(scene.glass, Box::new(sync.clone()), blur_config(&config));
    glass.attach(&scene.tree);

    if config.write_every > 0 {
        std::fs::create_dir_all(&config.output_dir)
            .with_context(|| format!("creating {}", config.output_dir.display()))?;
    }

    let gesture = &config.gesture;
    let mut clock = FrameClock::fixed_fps(config.fps);
    let mut published = 0u32;

    for _ in 0..config.frames {
        let time = clock.tick();
        let frame = time.frame_index as u32;
        let scrolling = (gesture.start_frame..gesture.end_frame).contains(&frame);

        if frame == gesture.start_frame {
            let timing = AnimationTiming::with_duration(config.blur.animation_duration)
                .timing_function(TimingFunction::EaseInEaseOut);
            let ctx = AnimationContext::with_timing(timing, time.media_time);
            glass.set_blur_radius(config.blur.target_radius, &ctx);
            log::info!("frame {frame}: animating radius to {}", config.blur.target_radius);
        }
        if scrolling {
            scene.tree.offset(scene.stripes, Vec2::new(0.0, -gesture.speed));
        }

        for link in sync.due(scrolling) {
            match glass.on_refresh(link, time.media_time, &mut scene.tree) {
                TickOutcome::Published { radius, box_size, .. } => {
                    published += 1;
                    log::debug!("frame {frame}: radius {radius:.2} box {box_size}");
                }
                other => log::debug!("frame {frame}: {other:?}"),
            }
        }
        if let Some(contents) = glass.contents() {
            scene.tree.set_content(scene.glass, LayerContent::Image(contents.clone()));
        }

        if config.write_every > 0 && frame % config.write_every == 0 {
            let bitmap = scene.tree.composite(scene.root)?;
            let path = config.output_dir.join(format!("frame-{frame:04}.png"));
            write_frame(&bitmap, &path)?;
            log::info!("wrote {}", path.display());
        }
    }

    log::info!("{} frames, {published} blur updates", config.frames);
    Ok(())
}

fn main() -> Result<()> {
    let config = match std::env::args_os().nth(1) {
        Some(path) => StudioConfig::load(path.as_ref())?,
        None => StudioConfig::default(),
    };

    let mut logging = LoggingConfig::default().timestamps(true);
    if let Some(filter) = &config.log_filter {
        logging = logging.filter(filter.clone());
    }
    init_logging(logging);

    run(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use frost_engine::pixel::Rgba8;

    #[test]
    fn backdrop_loads_as_straight_alpha() {
        let path = std::env::temp_dir().join(format!("frost-backdrop-{}.png", std::process::id()));
        image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 128])).save(&path).unwrap();

        let bitmap = load_backdrop(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!((bitmap.width(), bitmap.height()), (3, 2));
        assert_eq!(bitmap.alpha, AlphaMode::Straight);
        assert_eq!(bitmap.pixels.pixel(2, 1), Rgba8::new(10, 20, 30, 128));
    }

    #[test]
    fn missing_backdrop_is_an_error() {
        assert!(load_backdrop(Path::new("/nonexistent/frost-backdrop.png")).is_err());
    }
}
