//! Pixel drawing surface mapped onto terminal cells.

use ratatui::{
    style::Style,
    text::{Line, Span},
};
use stardrift_core::SurfaceSize;

use crate::color::Rgb;

/// Upper half block: foreground paints the top pixel, background the bottom.
const HALF_BLOCK: &str = "▀";

/// Smallest half width of a stroked line, so thin strokes still hit pixels.
const MIN_HALF_WIDTH: f32 = 0.5;

/// A 2D raster of RGB pixels.
#[derive(Debug, Clone)]
pub struct Raster {
    size: SurfaceSize,
    pixels: Vec<Rgb>,
    background: Rgb,
}

impl Raster {
    /// Create an empty (zero sized) raster.
    pub fn new(background: Rgb) -> Self {
        Self {
            size: SurfaceSize::default(),
            pixels: Vec::new(),
            background,
        }
    }

    /// Current pixel dimensions.
    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    pub fn set_background(&mut self, background: Rgb) {
        self.background = background;
    }

    /// Apply new pixel dimensions. Reallocates and clears only on change.
    pub fn resize(&mut self, size: SurfaceSize) {
        if size == self.size {
            return;
        }
        self.size = size;
        self.pixels = vec![self.background; size.area()];
    }

    /// Fill every pixel with the background color.
    pub fn clear(&mut self) {
        self.pixels.fill(self.background);
    }

    /// Blend every pixel toward `color` by `alpha`.
    pub fn fade(&mut self, color: Rgb, alpha: f32) {
        for pixel in &mut self.pixels {
            *pixel = pixel.mix(color, alpha);
        }
    }

    /// Pixel at `(x, y)`, if inside the surface.
    pub fn pixel(&self, x: u16, y: u16) -> Option<Rgb> {
        self.index(x as i32, y as i32).map(|i| self.pixels[i])
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.size.width as i32 || y >= self.size.height as i32 {
            return None;
        }
        Some(y as usize * self.size.width as usize + x as usize)
    }

    fn blend(&mut self, x: i32, y: i32, color: Rgb, alpha: f32) {
        if alpha <= 0.0 {
            return;
        }
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = self.pixels[i].screen(color, alpha);
        }
    }

    /// Pixel bounds of a box, clipped to the surface. `None` when the box
    /// misses the surface entirely.
    fn clip_box(
        &self,
        left: f32,
        right: f32,
        top: f32,
        bottom: f32,
    ) -> Option<((i32, i32), (i32, i32))> {
        let xs = clip_span(left, right, self.size.width)?;
        let ys = clip_span(top, bottom, self.size.height)?;
        Some((xs, ys))
    }

    /// Paint a filled circle.
    ///
    /// Covers every pixel whose center lies within `radius`; a circle that
    /// covers no pixel center still marks the pixel holding its center.
    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb, alpha: f32) {
        let r2 = radius * radius;

        let mut covered = false;
        let bounds = self.clip_box(cx - radius, cx + radius, cy - radius, cy + radius);
        if let Some(((x0, x1), (y0, y1))) = bounds {
            for y in y0..=y1 {
                for x in x0..=x1 {
                    let dx = x as f32 + 0.5 - cx;
                    let dy = y as f32 + 0.5 - cy;
                    if dx * dx + dy * dy <= r2 {
                        covered = true;
                        self.blend(x, y, color, alpha);
                    }
                }
            }
        }

        if !covered {
            self.blend(cx.floor() as i32, cy.floor() as i32, color, alpha);
        }
    }

    /// Stroke a line whose opacity runs linearly from `alpha_from` at
    /// `from` to `alpha_to` at `to`. Each pixel is blended once.
    pub fn stroke_gradient(
        &mut self,
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        color: Rgb,
        alpha_from: f32,
        alpha_to: f32,
    ) {
        let half = (width / 2.0).max(MIN_HALF_WIDTH);
        let (ax, ay) = from;
        let (bx, by) = to;
        let (dx, dy) = (bx - ax, by - ay);
        let len2 = dx * dx + dy * dy;

        let Some(((x0, x1), (y0, y1))) = self.clip_box(
            ax.min(bx) - half,
            ax.max(bx) + half,
            ay.min(by) - half,
            ay.max(by) + half,
        ) else {
            return;
        };

        for y in y0..=y1 {
            for x in x0..=x1 {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;
                let t = if len2 > 0.0 {
                    (((px - ax) * dx + (py - ay) * dy) / len2).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let nx = ax + dx * t - px;
                let ny = ay + dy * t - py;
                if nx * nx + ny * ny <= half * half {
                    let alpha = alpha_from + (alpha_to - alpha_from) * t;
                    self.blend(x, y, color, alpha);
                }
            }
        }
    }

    /// Render as terminal lines, two pixels per cell.
    pub fn to_lines(&self) -> Vec<Line<'static>> {
        let rows = self.size.height.div_ceil(SurfaceSize::PIXELS_PER_CELL);
        (0..rows)
            .map(|row| {
                let spans: Vec<Span> = (0..self.size.width)
                    .map(|x| {
                        let top_y = row * SurfaceSize::PIXELS_PER_CELL;
                        let top = self.pixel(x, top_y).unwrap_or(self.background);
                        let bottom = self.pixel(x, top_y + 1).unwrap_or(self.background);
                        Span::styled(HALF_BLOCK, Style::new().fg(top.into()).bg(bottom.into()))
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

/// Inclusive pixel range covering `[lo, hi]` within `0..extent`.
fn clip_span(lo: f32, hi: f32, extent: u16) -> Option<(i32, i32)> {
    if extent == 0 {
        return None;
    }
    let lo = lo.floor().max(0.0);
    let hi = hi.ceil().min(extent as f32 - 1.0);
    if lo > hi {
        return None;
    }
    Some((lo as i32, hi as i32))
}
