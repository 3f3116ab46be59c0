use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use frost_engine::blur::EdgeMode;
use frost_engine::host::RefreshMode;
use serde::Deserialize;

/// Studio settings, read from a TOML file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    pub output_dir: PathBuf,
    /// Scene size in points.
    pub width: f32,
    pub height: f32,
    /// Pixels per point.
    pub scale: f32,
    pub fps: u32,
    pub frames: u32,
    /// Write every n-th frame; 0 disables output.
    pub write_every: u32,
    pub log_filter: Option<String>,
    /// Image stretched over the scene background, below the stripes.
    pub backdrop: Option<PathBuf>,
    pub blur: BlurSection,
    pub gesture: GestureSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BlurSection {
    pub radius: f32,
    pub iterations: u32,
    pub refresh_mode: StudioRefreshMode,
    pub edge: StudioEdgeMode,
    /// Straight sRGB `[r, g, b, a]`.
    pub tint: Option<[u8; 4]>,
    /// Radius animated to once the gesture starts.
    pub target_radius: f32,
    pub animation_duration: f64,
}

/// TOML spelling of [`RefreshMode`]: `"tracking"` or `"continuous"`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudioRefreshMode {
    #[default]
    Tracking,
    Continuous,
}

impl From<StudioRefreshMode> for RefreshMode {
    fn from(mode: StudioRefreshMode) -> Self {
        match mode {
            StudioRefreshMode::Tracking => RefreshMode::Tracking,
            StudioRefreshMode::Continuous => RefreshMode::Continuous,
        }
    }
}

/// TOML spelling of [`EdgeMode`]: `"extend"` or `"truncate"`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudioEdgeMode {
    #[default]
    Extend,
    Truncate,
}

impl From<StudioEdgeMode> for EdgeMode {
    fn from(mode: StudioEdgeMode) -> Self {
        match mode {
            StudioEdgeMode::Extend => EdgeMode::Extend,
            StudioEdgeMode::Truncate => EdgeMode::Truncate,
        }
    }
}

/// Simulated scroll: the stripes move while `start_frame <= frame < end_frame`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GestureSection {
    pub start_frame: u32,
    pub end_frame: u32,
    /// Points per frame.
    pub speed: f32,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("frost-frames"),
            width: 160.0,
            height: 120.0,
            scale: 2.0,
            fps: 60,
            frames: 90,
            write_every: 10,
            log_filter: None,
            backdrop: None,
            blur: BlurSection::default(),
            gesture: GestureSection::default(),
        }
    }
}

impl Default for BlurSection {
    fn default() -> Self {
        Self {
            radius: 4.0,
            iterations: 3,
            refresh_mode: StudioRefreshMode::Tracking,
            edge: StudioEdgeMode::Extend,
            tint: Some([255, 255, 255, 48]),
            target_radius: 12.0,
            animation_duration: 0.3,
        }
    }
}

impl Default for GestureSection {
    fn default() -> Self {
        Self { start_frame: 10, end_frame: 70, speed: 1.5 }
    }
}

impl StudioConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let config: Self = toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(self.width > 0.0 && self.height > 0.0) {
            bail!("scene size must be positive, got {}x{}", self.width, self.height);
        }
        if !(self.scale > 0.0) {
            bail!("scale must be positive, got {}", self.scale);
        }
        if self.fps == 0 {
            bail!("fps must be at least 1");
        }
        Ok(())
    }
}
