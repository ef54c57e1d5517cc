//! Drifting dot flood (stateful).

use std::ops::Range;

use stardrift_config::DotFloodConfig;
use stardrift_core::SurfaceSize;

use super::wrap;
use crate::color::Rgb;
use crate::random::RandomSource;
use crate::raster::Raster;

/// Dot opacity.
const DOT_ALPHA: f32 = 0.85;

/// A single drifting dot.
#[derive(Debug, Clone, PartialEq)]
pub struct Dot {
    pub x: f32,
    pub y: f32,
    /// Radius in pixels.
    pub r: f32,
    pub vx: f32,
    pub vy: f32,
}

/// A fixed-size set of dots drifting at constant velocity across a torus.
#[derive(Debug, Clone, Default)]
pub struct DotFlood {
    dots: Vec<Dot>,
}

impl DotFlood {
    /// Build a flood from configuration.
    pub fn new(config: &DotFloodConfig, size: SurfaceSize, rng: &mut dyn RandomSource) -> Self {
        let mut flood = Self::default();
        flood.reconfigure(config, size, rng);
        flood
    }

    /// Build a flood from explicit dots.
    pub fn from_dots(dots: Vec<Dot>) -> Self {
        Self { dots }
    }

    /// Replace the whole set with one built from `config`.
    pub fn reconfigure(
        &mut self,
        config: &DotFloodConfig,
        size: SurfaceSize,
        rng: &mut dyn RandomSource,
    ) {
        let radius = config.min_radius..config.min_radius + config.max_radius;
        self.initialize(config.count, radius, config.speed, size, rng);
    }

    /// Populate `count` dots at uniform positions and directions, each moving
    /// at `speed` scaled by a factor in `[0.5, 1.5)`.
    pub fn initialize(
        &mut self,
        count: usize,
        radius: Range<f32>,
        speed: f32,
        size: SurfaceSize,
        rng: &mut dyn RandomSource,
    ) {
        let width = size.width as f32;
        let height = size.height as f32;
        self.dots = (0..count)
            .map(|_| {
                let r = rng.range(radius.start, radius.end);
                let angle = rng.angle();
                let v = speed * (0.5 + rng.next_unit());
                Dot {
                    x: wrap(rng.next_unit() * width, width),
                    y: wrap(rng.next_unit() * height, height),
                    r,
                    vx: angle.cos() * v,
                    vy: angle.sin() * v,
                }
            })
            .collect();
        log::debug!("dot flood initialized with {count} dots on {width}x{height}");
    }

    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }

    pub fn len(&self) -> usize {
        self.dots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dots.is_empty()
    }

    /// Advance every dot by its velocity and wrap it back onto the surface.
    pub fn tick(&mut self, size: SurfaceSize) {
        if size.is_empty() {
            return;
        }
        let width = size.width as f32;
        let height = size.height as f32;
        for dot in &mut self.dots {
            dot.x = wrap(dot.x + dot.vx, width);
            dot.y = wrap(dot.y + dot.vy, height);
        }
    }

    /// Clear the surface and paint every dot.
    pub fn paint(&self, raster: &mut Raster, color: Rgb) {
        raster.clear();
        for dot in &self.dots {
            raster.fill_circle(dot.x, dot.y, dot.r, color, DOT_ALPHA);
        }
    }
}
