//! Configuration for the stardrift hero backgrounds.
//!
//! The configuration lives in `config.toml` under the platform config
//! directory. A missing file yields the defaults; missing keys fall back to
//! their individual defaults.

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr, eyre};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use stardrift_core::{FieldStyle, Palette};

/// Name of the configuration file.
const CONFIG_FILE: &str = "config.toml";

/// Bounds for the refresh rate.
const MIN_FPS: u32 = 1;
const MAX_FPS: u32 = 240;

/// Largest radius, trail length or per-frame step, in pixels.
const MAX_EXTENT: f32 = 1000.0;

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Background shown at startup.
    pub style: FieldStyle,
    /// Particle tint.
    pub palette: Palette,
    /// Display refresh rate in frames per second.
    pub fps: u32,
    /// Fixed seed for reproducible layouts; entropy when absent.
    pub seed: Option<u64>,
    pub dot_flood: DotFloodConfig,
    pub shooting_stars: ShootingStarsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            style: FieldStyle::default(),
            palette: Palette::default(),
            fps: 60,
            seed: None,
            dot_flood: DotFloodConfig::default(),
            shooting_stars: ShootingStarsConfig::default(),
        }
    }
}

/// Parameters of the drifting dot field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DotFloodConfig {
    /// Number of dots.
    pub count: usize,
    /// Smallest dot radius in pixels.
    pub min_radius: f32,
    /// Random radius added on top of `min_radius`.
    pub max_radius: f32,
    /// Base speed in pixels per tick.
    pub speed: f32,
}

impl Default for DotFloodConfig {
    fn default() -> Self {
        Self {
            count: 160,
            min_radius: 0.4,
            max_radius: 2.2,
            speed: 0.25,
        }
    }
}

/// Parameters of the starfield with shooting stars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShootingStarsConfig {
    /// Number of twinkling background stars.
    pub star_count: usize,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Base drift speed of the background stars (0 keeps them fixed).
    pub drift: f32,
    /// Maximum number of concurrent shooting stars.
    pub shooting_count: usize,
    /// Opacity of the per-frame fade; lower values leave longer smears.
    pub background_alpha: f32,
    /// Life lost by a shooting star per tick.
    pub decay: f32,
    /// Minimum time between spawns in milliseconds.
    pub spawn_base_ms: f64,
    /// Random extra time between spawns in milliseconds.
    pub spawn_jitter_ms: f64,
    /// Trail length in pixels.
    pub trail_length: f32,
    /// Distance past the surface edge at which a shooting star is dropped.
    pub margin: f32,
}

impl Default for ShootingStarsConfig {
    fn default() -> Self {
        Self {
            star_count: 140,
            min_radius: 0.4,
            max_radius: 1.4,
            drift: 0.0,
            shooting_count: 3,
            background_alpha: 0.4,
            decay: 0.012,
            spawn_base_ms: 1200.0,
            spawn_jitter_ms: 1800.0,
            trail_length: 40.0,
            margin: 100.0,
        }
    }
}

impl Config {
    /// Default location of the configuration file.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "stardrift").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load from the default location, falling back to defaults.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                log::warn!("no home directory found, using default configuration");
                Ok(Self::default())
            }
        }
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::parse(&text)
            .wrap_err_with(|| format!("invalid config file {}", path.display()))?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse TOML text and normalize the result.
    pub fn parse(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        Ok(config.normalized())
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::default_path().ok_or_else(|| eyre!("no home directory found"))?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .wrap_err_with(|| format!("failed to create {}", parent.display()))?;
        }
        let text = toml::to_string_pretty(self).wrap_err("failed to serialize config")?;
        fs::write(path, text)
            .wrap_err_with(|| format!("failed to write config file {}", path.display()))?;
        log::info!("saved config to {}", path.display());
        Ok(())
    }

    /// Clamp values that would stall or break the animation loop.
    pub fn normalized(mut self) -> Self {
        self.fps = self.fps.clamp(MIN_FPS, MAX_FPS);

        let dots = &mut self.dot_flood;
        dots.min_radius = extent(dots.min_radius);
        dots.max_radius = extent(dots.max_radius);
        dots.speed = extent(dots.speed);

        let stars = &mut self.shooting_stars;
        stars.min_radius = extent(stars.min_radius);
        stars.max_radius = extent(stars.max_radius);
        stars.drift = extent(stars.drift);
        stars.background_alpha = stars.background_alpha.clamp(0.0, 1.0);
        stars.decay = stars.decay.max(f32::EPSILON);
        stars.spawn_base_ms = stars.spawn_base_ms.max(0.0);
        stars.spawn_jitter_ms = stars.spawn_jitter_ms.max(0.0);
        stars.trail_length = extent(stars.trail_length);
        stars.margin = stars.margin.max(0.0);
        self
    }

    /// Time between two display refreshes in milliseconds.
    pub fn frame_interval_ms(&self) -> u64 {
        1000 / u64::from(self.fps.clamp(MIN_FPS, MAX_FPS))
    }
}

/// Clamp a pixel length into `[0, MAX_EXTENT]`; NaN becomes zero.
fn extent(value: f32) -> f32 {
    value.max(0.0).min(MAX_EXTENT)
}
