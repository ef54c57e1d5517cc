//! Twinkling starfield with shooting stars (stateful).
//!
//! Background stars persist for the lifetime of the animation and only
//! twinkle (and drift, if configured). Shooting stars are transient: they
//! spawn near the top-left at a randomized interval, streak down-right while
//! their life decays, and are dropped once exhausted or off the surface.

use std::f32::consts::TAU;
use std::ops::Range;

use stardrift_config::ShootingStarsConfig;
use stardrift_core::SurfaceSize;

use super::wrap;
use crate::color::Rgb;
use crate::random::RandomSource;
use crate::raster::Raster;

/// Twinkle phase advance per tick.
const TWINKLE_STEP: f32 = 0.02;

/// Stroke width of a shooting star trail.
const TRAIL_WIDTH: f32 = 2.0;

/// Radius of a shooting star head.
const HEAD_RADIUS: f32 = 1.6;

/// Peak opacity of the trail next to the head.
const TRAIL_ALPHA: f32 = 0.9;

/// A persistent background star.
#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub vx: f32,
    pub vy: f32,
    /// Twinkle phase in radians, kept in `[0, 2π)`.
    pub twinkle: f32,
}

impl Star {
    /// Current opacity, oscillating in `[0.1, 0.7]`.
    pub fn alpha(&self) -> f32 {
        0.4 + self.twinkle.sin() * 0.3
    }
}

/// A short-lived streak.
#[derive(Debug, Clone, PartialEq)]
pub struct ShootingStar {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Remaining life, from 1 down to 0.
    pub life: f32,
}

impl ShootingStar {
    /// A fresh shooting star with full life.
    pub fn new(x: f32, y: f32, vx: f32, vy: f32) -> Self {
        Self {
            x,
            y,
            vx,
            vy,
            life: 1.0,
        }
    }

    /// Tail end of the trail, `length` pixels opposite the velocity.
    pub fn tail(&self, length: f32) -> (f32, f32) {
        let (dx, dy) = (-self.vx, -self.vy);
        let mag = (dx * dx + dy * dy).sqrt();
        let mag = if mag > 0.0 { mag } else { 1.0 };
        (self.x + dx / mag * length, self.y + dy / mag * length)
    }

    fn is_outside(&self, width: f32, height: f32, margin: f32) -> bool {
        self.x > width + margin
            || self.y > height + margin
            || self.x < -margin
            || self.y < -margin
    }
}

/// Starfield state.
#[derive(Debug, Clone)]
pub struct ShootingStars {
    stars: Vec<Star>,
    shooting: Vec<ShootingStar>,
    config: ShootingStarsConfig,
    /// Frame time of the last spawn in milliseconds.
    last_spawn_ms: f64,
}

impl ShootingStars {
    /// Build a starfield from configuration.
    pub fn new(
        config: &ShootingStarsConfig,
        size: SurfaceSize,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let mut field = Self {
            stars: Vec::new(),
            shooting: Vec::new(),
            config: config.clone(),
            last_spawn_ms: 0.0,
        };
        field.reconfigure(config, size, rng);
        field
    }

    /// Build a starfield from explicit stars.
    pub fn from_stars(config: &ShootingStarsConfig, stars: Vec<Star>) -> Self {
        Self {
            stars,
            shooting: Vec::new(),
            config: config.clone(),
            last_spawn_ms: 0.0,
        }
    }

    /// Replace the background stars and adopt the new parameters. Active
    /// shooting stars above the new maximum are dropped.
    pub fn reconfigure(
        &mut self,
        config: &ShootingStarsConfig,
        size: SurfaceSize,
        rng: &mut dyn RandomSource,
    ) {
        self.config = config.clone();
        self.shooting.truncate(config.shooting_count);
        let radius = config.min_radius..config.min_radius + config.max_radius;
        self.initialize(config.star_count, radius, config.drift, size, rng);
    }

    /// Populate `count` background stars at uniform positions with random
    /// twinkle phases. `speed` sets their drift, scaled by `[0.5, 1.5)`.
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
        self.stars = (0..count)
            .map(|_| {
                let r = rng.range(radius.start, radius.end);
                let angle = rng.angle();
                let v = speed * (0.5 + rng.next_unit());
                Star {
                    x: wrap(rng.next_unit() * width, width),
                    y: wrap(rng.next_unit() * height, height),
                    r,
                    vx: angle.cos() * v,
                    vy: angle.sin() * v,
                    twinkle: rng.angle(),
                }
            })
            .collect();
        log::debug!("starfield initialized with {count} stars on {width}x{height}");
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn shooting(&self) -> &[ShootingStar] {
        &self.shooting
    }

    pub fn config(&self) -> &ShootingStarsConfig {
        &self.config
    }

    /// Add a shooting star unless the maximum is already active.
    pub fn push_shooting_star(&mut self, star: ShootingStar) -> bool {
        if self.shooting.len() >= self.config.shooting_count {
            return false;
        }
        self.shooting.push(star);
        true
    }

    /// Spawn a shooting star in the top-left region heading down-right at
    /// 20° to 35° below the horizon.
    pub fn spawn_shooting_star(&mut self, size: SurfaceSize, rng: &mut dyn RandomSource) -> bool {
        let x = rng.next_unit() * size.width as f32 * 0.4;
        let y = rng.next_unit() * size.height as f32 * 0.3;
        let speed = 5.0 + rng.next_unit() * 4.0;
        let angle = (20.0 + rng.next_unit() * 15.0).to_radians();
        let star = ShootingStar::new(x, y, angle.cos() * speed, angle.sin() * speed);
        let spawned = self.push_shooting_star(star);
        if spawned {
            log::trace!("shooting star spawned at ({x:.1}, {y:.1})");
        }
        spawned
    }

    /// Advance one frame at time `now_ms`.
    pub fn tick(&mut self, now_ms: f64, size: SurfaceSize, rng: &mut dyn RandomSource) {
        if size.is_empty() {
            return;
        }
        let width = size.width as f32;
        let height = size.height as f32;

        for star in &mut self.stars {
            star.x = wrap(star.x + star.vx, width);
            star.y = wrap(star.y + star.vy, height);
            star.twinkle = (star.twinkle + TWINKLE_STEP).rem_euclid(TAU);
        }

        if self.shooting.len() < self.config.shooting_count {
            let cooldown =
                self.config.spawn_base_ms + rng.next_unit() as f64 * self.config.spawn_jitter_ms;
            if now_ms - self.last_spawn_ms > cooldown && self.spawn_shooting_star(size, rng) {
                self.last_spawn_ms = now_ms;
            }
        }

        let decay = self.config.decay;
        let margin = self.config.margin;
        for star in &mut self.shooting {
            star.x += star.vx;
            star.y += star.vy;
            star.life -= decay;
            if star.is_outside(width, height, margin) {
                star.life = 0.0;
            }
        }
        self.shooting.retain(|star| star.life > 0.0);
    }

    /// Fade the previous frame toward `sky`, then paint every star.
    pub fn paint(&self, raster: &mut Raster, color: Rgb, sky: Rgb) {
        raster.fade(sky, self.config.background_alpha);

        for star in &self.stars {
            raster.fill_circle(star.x, star.y, star.r, color, star.alpha());
        }

        for star in &self.shooting {
            let tail = star.tail(self.config.trail_length);
            raster.stroke_gradient(
                (star.x, star.y),
                tail,
                TRAIL_WIDTH,
                color,
                TRAIL_ALPHA * star.life,
                0.0,
            );
            raster.fill_circle(star.x, star.y, HEAD_RADIUS, color, star.life);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::random::ScriptedRandom;

    fn surface() -> SurfaceSize {
        SurfaceSize::new(200, 100)
    }

    fn config() -> ShootingStarsConfig {
        ShootingStarsConfig::default()
    }

    #[test]
    fn test_initialize_static_stars() {
        let mut rng = StdRng::seed_from_u64(5);
        let field = ShootingStars::new(&config(), surface(), &mut rng);
        assert_eq!(field.stars().len(), 140);
        assert!(field.shooting().is_empty());
        for star in field.stars() {
            assert_eq!(star.vx.abs() + star.vy.abs(), 0.0);
            assert!(star.r >= 0.4 && star.r < 1.8);
            assert!((0.0..200.0).contains(&star.x));
            assert!((0.0..100.0).contains(&star.y));
        }
    }

    #[test]
    fn test_twinkle_only_changes_phase() {
        let mut rng = StdRng::seed_from_u64(9);
        let cfg = ShootingStarsConfig {
            shooting_count: 0,
            ..config()
        };
        let mut field = ShootingStars::new(&cfg, surface(), &mut rng);
        let before = field.stars().to_vec();
        field.tick(16.0, surface(), &mut rng);
        for (a, b) in before.iter().zip(field.stars()) {
            assert_eq!((a.x, a.y), (b.x, b.y));
            let step = (b.twinkle - a.twinkle).rem_euclid(TAU);
            assert!((step - TWINKLE_STEP).abs() < 1e-5);
            assert!((0.1 - 1e-6..=0.7 + 1e-6).contains(&b.alpha()));
        }
    }

    #[test]
    fn test_twinkle_phase_wraps() {
        let mut rng = ScriptedRandom::constant(0.0);
        let star = Star {
            x: 10.0,
            y: 10.0,
            r: 1.0,
            vx: 0.0,
            vy: 0.0,
            twinkle: TAU - 0.01,
        };
        let cfg = ShootingStarsConfig {
            shooting_count: 0,
            ..config()
        };
        let mut field = ShootingStars::from_stars(&cfg, vec![star]);
        field.tick(0.0, surface(), &mut rng);
        let phase = field.stars()[0].twinkle;
        assert!((0.0..TAU).contains(&phase));
        assert!((phase - 0.01).abs() < 1e-4);

        // a phase that has drifted far still advances once wrapped
        let mut far = field.stars()[0].clone();
        far.twinkle = 524_288.0;
        let mut field = ShootingStars::from_stars(&cfg, vec![far]);
        let before = field.stars()[0].twinkle;
        field.tick(0.0, surface(), &mut rng);
        let after = field.stars()[0].twinkle;
        assert!(after < TAU);
        assert_ne!(before, after);
        for _ in 0..10_000 {
            field.tick(0.0, surface(), &mut rng);
            assert!((0.0..TAU).contains(&field.stars()[0].twinkle));
        }
    }

    #[test]
    fn test_drifting_stars_wrap() {
        let mut rng = StdRng::seed_from_u64(11);
        let cfg = ShootingStarsConfig {
            drift: 7.0,
            shooting_count: 0,
            ..config()
        };
        let mut field = ShootingStars::new(&cfg, surface(), &mut rng);
        for _ in 0..300 {
            field.tick(0.0, surface(), &mut rng);
            for star in field.stars() {
                assert!((0.0..200.0).contains(&star.x));
                assert!((0.0..100.0).contains(&star.y));
            }
        }
        assert_eq!(field.stars().len(), 140);
    }

    #[test]
    fn test_transient_count_bounded() {
        let mut rng = StdRng::seed_from_u64(21);
        let cfg = ShootingStarsConfig {
            spawn_base_ms: 0.0,
            spawn_jitter_ms: 0.0,
            ..config()
        };
        let mut field = ShootingStars::new(&cfg, surface(), &mut rng);
        let mut peak = 0;
        for frame in 1..2000 {
            field.tick(frame as f64 * 16.0, surface(), &mut rng);
            assert!(field.shooting().len() <= cfg.shooting_count);
            peak = peak.max(field.shooting().len());
        }
        assert_eq!(peak, cfg.shooting_count);
    }

    #[test]
    fn test_spawn_waits_for_cooldown() {
        // cooldown = 1200 + 0.5 * 1800 = 2100ms
        let mut rng = ScriptedRandom::constant(0.5);
        let mut field = ShootingStars::from_stars(&config(), Vec::new());
        field.tick(2000.0, surface(), &mut rng);
        assert!(field.shooting().is_empty());
        field.tick(2101.0, surface(), &mut rng);
        assert_eq!(field.shooting().len(), 1);
        field.tick(2200.0, surface(), &mut rng);
        assert_eq!(field.shooting().len(), 1);
    }

    #[test]
    fn test_spawn_heads_down_right_from_top_left() {
        let mut rng = ScriptedRandom::new([0.99, 0.99, 0.0, 0.5]);
        let mut field = ShootingStars::from_stars(&config(), Vec::new());
        assert!(field.spawn_shooting_star(surface(), &mut rng));
        let star = &field.shooting()[0];
        assert!(star.x < 200.0 * 0.4 && star.y < 100.0 * 0.3);
        assert!(star.vx > 0.0 && star.vy > 0.0);
        let speed = (star.vx * star.vx + star.vy * star.vy).sqrt();
        assert!((speed - 5.0).abs() < 1e-4);
        let angle = star.vy.atan2(star.vx).to_degrees();
        assert!((angle - 27.5).abs() < 1e-3);
        assert_eq!(star.life, 1.0);
    }

    #[test]
    fn test_life_decays_until_removed() {
        let mut rng = ScriptedRandom::constant(0.0);
        let cfg = ShootingStarsConfig {
            shooting_count: 1,
            ..config()
        };
        let mut field = ShootingStars::from_stars(&cfg, Vec::new());
        assert!(field.push_shooting_star(ShootingStar::new(10.0, 10.0, 0.1, 0.05)));

        let mut last_life = 1.0;
        for _ in 0..83 {
            field.tick(0.0, surface(), &mut rng);
            let life = field.shooting()[0].life;
            assert!(life <= last_life);
            assert!(life > 0.0);
            last_life = life;
        }
        field.tick(0.0, surface(), &mut rng);
        assert!(last_life - cfg.decay <= 0.0);
        assert!(field.shooting().is_empty());
    }

    #[test]
    fn test_leaving_surface_removes() {
        let mut rng = ScriptedRandom::constant(0.0);
        let mut field = ShootingStars::from_stars(&config(), Vec::new());
        assert!(field.push_shooting_star(ShootingStar::new(299.0, 10.0, 5.0, 0.0)));
        field.tick(0.0, surface(), &mut rng);
        assert!(field.shooting().is_empty());
    }

    #[test]
    fn test_push_respects_maximum() {
        let cfg = ShootingStarsConfig {
            shooting_count: 2,
            ..config()
        };
        let mut field = ShootingStars::from_stars(&cfg, Vec::new());
        assert!(field.push_shooting_star(ShootingStar::new(0.0, 0.0, 1.0, 1.0)));
        assert!(field.push_shooting_star(ShootingStar::new(0.0, 0.0, 1.0, 1.0)));
        assert!(!field.push_shooting_star(ShootingStar::new(0.0, 0.0, 1.0, 1.0)));
    }

    #[test]
    fn test_reconfigure_replaces_stars_and_trims_transients() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut field = ShootingStars::new(&config(), surface(), &mut rng);
        field.push_shooting_star(ShootingStar::new(0.0, 0.0, 1.0, 1.0));
        field.push_shooting_star(ShootingStar::new(0.0, 0.0, 1.0, 1.0));

        let smaller = ShootingStarsConfig {
            star_count: 10,
            shooting_count: 1,
            ..config()
        };
        field.reconfigure(&smaller, surface(), &mut rng);
        assert_eq!(field.stars().len(), 10);
        assert_eq!(field.shooting().len(), 1);
        assert_eq!(field.config().shooting_count, 1);
    }

    #[test]
    fn test_tail_points_against_velocity() {
        let star = ShootingStar::new(50.0, 50.0, 3.0, 4.0);
        let (tx, ty) = star.tail(10.0);
        assert!((tx - 44.0).abs() < 1e-5);
        assert!((ty - 42.0).abs() < 1e-5);

        let still = ShootingStar::new(5.0, 5.0, 0.0, 0.0);
        assert_eq!(still.tail(10.0), (5.0, 5.0));
    }

    #[test]
    fn test_paint_draws_trail_and_fades() {
        let mut raster = Raster::new(Rgb::BLACK);
        raster.resize(surface());
        let mut field = ShootingStars::from_stars(&config(), Vec::new());
        field.push_shooting_star(ShootingStar::new(100.0, 50.0, 5.0, 0.0));
        field.paint(&mut raster, Rgb::WHITE, Rgb::BLACK);
        let head = raster.pixel(100, 50).unwrap();
        let trail = raster.pixel(80, 50).unwrap();
        assert!(head.r > trail.r && trail.r > 0);
        assert_eq!(raster.pixel(120, 50), Some(Rgb::BLACK));

        let empty = ShootingStars::from_stars(&config(), Vec::new());
        empty.paint(&mut raster, Rgb::WHITE, Rgb::BLACK);
        assert!(raster.pixel(100, 50).unwrap().r < head.r);
    }
}
