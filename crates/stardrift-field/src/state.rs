//! Mounted field animation state.

use ratatui::{Frame, layout::Rect, widgets::Paragraph};
use stardrift_config::Config;
use stardrift_core::{FieldStyle, Palette, SurfaceSize};

use crate::animations::{dots::DotFlood, stars::ShootingStars};
use crate::color::{Rgb, palette_colors};
use crate::frame::{DueFrames, FrameHandle, FrameScheduler};
use crate::random::RandomSource;
use crate::raster::Raster;

/// The animation currently driving the surface.
#[derive(Debug)]
enum Animation {
    DotFlood(DotFlood),
    ShootingStars(ShootingStars),
}

/// One mounted background: its drawing surface, animation, and the pending
/// frame request that keeps it running.
///
/// Dropping the state cancels the pending request.
#[derive(Debug)]
pub struct FieldState {
    animation: Animation,
    raster: Raster,
    /// Next frame request; `None` while paused or unmounted.
    frame: Option<FrameHandle>,
    particle: Rgb,
    sky: Rgb,
}

impl FieldState {
    /// Mount the configured style: size the surface, initialize the
    /// particles, and request the first frame.
    ///
    /// The container size is used when known, otherwise the viewport.
    pub fn mount(
        config: &Config,
        container: Option<SurfaceSize>,
        viewport: SurfaceSize,
        scheduler: &FrameScheduler,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let (particle, sky) = palette_colors(config.palette);
        let mut raster = Raster::new(sky);
        raster.resize(measure(container, viewport));

        let size = if raster.size().is_empty() {
            viewport
        } else {
            raster.size()
        };
        let animation = match config.style {
            FieldStyle::DotFlood => {
                Animation::DotFlood(DotFlood::new(&config.dot_flood, size, rng))
            }
            FieldStyle::ShootingStars => {
                Animation::ShootingStars(ShootingStars::new(&config.shooting_stars, size, rng))
            }
        };
        log::debug!(
            "mounted {} on {}x{}",
            config.style.name(),
            raster.size().width,
            raster.size().height
        );

        Self {
            animation,
            raster,
            frame: Some(scheduler.request()),
            particle,
            sky,
        }
    }

    /// Cancel the pending frame. The state stays inspectable but will not
    /// tick again unless resumed.
    pub fn unmount(&mut self) {
        if let Some(handle) = self.frame.take() {
            handle.cancel();
            log::debug!("unmounted {}", self.style().name());
        }
    }

    /// Stop requesting frames.
    pub fn pause(&mut self) {
        if let Some(handle) = self.frame.take() {
            handle.cancel();
        }
    }

    /// Request a frame if none is pending.
    pub fn resume(&mut self, scheduler: &FrameScheduler) {
        if self.frame.is_none() {
            self.frame = Some(scheduler.request());
        }
    }

    /// Whether a frame request is outstanding.
    pub fn is_running(&self) -> bool {
        self.frame.is_some()
    }

    pub fn style(&self) -> FieldStyle {
        match self.animation {
            Animation::DotFlood(_) => FieldStyle::DotFlood,
            Animation::ShootingStars(_) => FieldStyle::ShootingStars,
        }
    }

    /// Current surface size in pixels.
    pub fn surface(&self) -> SurfaceSize {
        self.raster.size()
    }

    pub fn dot_flood(&self) -> Option<&DotFlood> {
        match &self.animation {
            Animation::DotFlood(flood) => Some(flood),
            Animation::ShootingStars(_) => None,
        }
    }

    pub fn shooting_stars(&self) -> Option<&ShootingStars> {
        match &self.animation {
            Animation::ShootingStars(field) => Some(field),
            Animation::DotFlood(_) => None,
        }
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    /// Apply the container's pixel size to the surface. Particles keep
    /// their positions and wrap into the new bounds on their next tick.
    ///
    /// A changed size clears the surface, so the current particles are
    /// painted again right away; a paused field would otherwise stay blank.
    pub fn resize(&mut self, container: Option<SurfaceSize>, viewport: SurfaceSize) {
        let size = measure(container, viewport);
        if size == self.raster.size() {
            return;
        }
        log::debug!("surface resized to {}x{}", size.width, size.height);
        self.raster.resize(size);
        self.paint();
    }

    /// Rebuild the particles from `config`. The style itself is fixed for
    /// the lifetime of a mount.
    pub fn reconfigure(&mut self, config: &Config, rng: &mut dyn RandomSource) {
        let size = self.raster.size();
        match &mut self.animation {
            Animation::DotFlood(flood) => flood.reconfigure(&config.dot_flood, size, rng),
            Animation::ShootingStars(field) => {
                field.reconfigure(&config.shooting_stars, size, rng)
            }
        }
        self.set_palette(config.palette);
    }

    pub fn set_palette(&mut self, palette: Palette) {
        let (particle, sky) = palette_colors(palette);
        self.particle = particle;
        self.sky = sky;
        self.raster.set_background(sky);
    }

    /// Run one frame if this state's request is among `due`: tick, paint,
    /// and request the next frame. Returns whether a frame ran.
    pub fn run_frame(
        &mut self,
        due: &DueFrames,
        now_ms: f64,
        scheduler: &FrameScheduler,
        rng: &mut dyn RandomSource,
    ) -> bool {
        let fired = self.frame.as_ref().is_some_and(|handle| due.contains(handle));
        if !fired {
            return false;
        }
        self.tick(now_ms, rng);
        self.frame = Some(scheduler.request());
        true
    }

    fn tick(&mut self, now_ms: f64, rng: &mut dyn RandomSource) {
        let size = self.raster.size();
        if size.is_empty() {
            return;
        }
        match &mut self.animation {
            Animation::DotFlood(flood) => flood.tick(size),
            Animation::ShootingStars(field) => field.tick(now_ms, size, rng),
        }
        self.paint();
    }

    fn paint(&mut self) {
        if self.raster.size().is_empty() {
            return;
        }
        match &self.animation {
            Animation::DotFlood(flood) => flood.paint(&mut self.raster, self.particle),
            Animation::ShootingStars(field) => {
                field.paint(&mut self.raster, self.particle, self.sky)
            }
        }
    }

    /// Render the surface into `area`.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Paragraph::new(self.raster.to_lines()), area);
    }
}

impl Drop for FieldState {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Pixel size of the container, falling back to the viewport when the
/// container is unknown or has no area.
fn measure(container: Option<SurfaceSize>, viewport: SurfaceSize) -> SurfaceSize {
    container
        .filter(|size| !size.is_empty())
        .unwrap_or(viewport)
}
