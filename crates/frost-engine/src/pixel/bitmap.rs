use super::PixelBuffer;

/// Channel order of a 4 × 8-bit pixel.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum PixelFormat {
    #[default]
    Rgba8,
    Bgra8,
}

impl PixelFormat {
    /// Byte offsets of `(r, g, b, a)` within a pixel.
    #[inline]
    pub const fn channel_offsets(self) -> [usize; 4] {
        match self {
            PixelFormat::Rgba8 => [0, 1, 2, 3],
            PixelFormat::Bgra8 => [2, 1, 0, 3],
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum AlphaMode {
    #[default]
    Premultiplied,
    Straight,
    /// Alpha byte present but ignored (treated as opaque).
    Ignored,
}

/// Color space tag. Carried through untouched; blurring is not color-managed.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum ColorSpace {
    #[default]
    Srgb,
    DisplayP3,
    LinearSrgb,
}

/// Display orientation of the pixel data.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Up,
    Down,
    Left,
    Right,
    UpMirrored,
    DownMirrored,
    LeftMirrored,
    RightMirrored,
}

/// Pixel data plus the metadata a consumer needs to display it.
///
/// `scale` is pixels per logical point: a 100 × 50 pt snapshot taken at
/// scale 2 has 200 × 100 pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    pub pixels: PixelBuffer,
    pub format: PixelFormat,
    pub alpha: AlphaMode,
    pub color_space: ColorSpace,
    pub scale: f32,
    pub orientation: Orientation,
}

impl Bitmap {
    /// Wraps a buffer with default metadata (premultiplied RGBA, sRGB, up).
    pub fn new(pixels: PixelBuffer, scale: f32) -> Self {
        Self {
            pixels,
            format: PixelFormat::default(),
            alpha: AlphaMode::default(),
            color_space: ColorSpace::default(),
            scale,
            orientation: Orientation::default(),
        }
    }

    /// Builds a bitmap around `pixels` with every metadata field copied from `self`.
    pub fn with_pixels(&self, pixels: PixelBuffer) -> Self {
        Self {
            pixels,
            format: self.format,
            alpha: self.alpha,
            color_space: self.color_space,
            scale: self.scale,
            orientation: self.orientation,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}
