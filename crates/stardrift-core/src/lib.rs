//! Core types shared by the stardrift crates.

use ratatui::{layout::Rect, style::Color};
use serde::{Deserialize, Serialize};

/// Pixel dimensions of a drawing surface.
///
/// Every terminal cell holds two vertically stacked pixels, so a container of
/// `cols x rows` cells measures `cols x 2*rows` pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u16,
    pub height: u16,
}

impl SurfaceSize {
    /// Number of pixels stacked in one terminal cell.
    pub const PIXELS_PER_CELL: u16 = 2;

    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Measure a cell area in pixels.
    pub fn from_cells(area: Rect) -> Self {
        Self {
            width: area.width,
            height: area.height.saturating_mul(Self::PIXELS_PER_CELL),
        }
    }

    /// True when either dimension is zero (nothing can be drawn).
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Total number of pixels.
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Which hero background is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldStyle {
    /// Drifting dots that wrap around the edges.
    #[default]
    DotFlood,
    /// Twinkling stars with occasional shooting stars.
    ShootingStars,
}

impl FieldStyle {
    /// Cycle to the next style.
    pub fn next(self) -> Self {
        match self {
            FieldStyle::DotFlood => FieldStyle::ShootingStars,
            FieldStyle::ShootingStars => FieldStyle::DotFlood,
        }
    }

    /// Human readable name.
    pub fn name(self) -> &'static str {
        match self {
            FieldStyle::DotFlood => "Dot Flood",
            FieldStyle::ShootingStars => "Shooting Stars",
        }
    }
}

/// Particle tint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Palette {
    /// Plain white particles on a near-black sky.
    #[default]
    Mono,
    Ice,
    Ember,
    Aurora,
}

impl Palette {
    /// Cycle to the next palette.
    pub fn next(self) -> Self {
        match self {
            Palette::Mono => Palette::Ice,
            Palette::Ice => Palette::Ember,
            Palette::Ember => Palette::Aurora,
            Palette::Aurora => Palette::Mono,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Palette::Mono => "Mono",
            Palette::Ice => "Ice",
            Palette::Ember => "Ember",
            Palette::Aurora => "Aurora",
        }
    }

    /// Hue in degrees and saturation of the particle tint.
    pub fn hue_saturation(self) -> (f32, f32) {
        match self {
            Palette::Mono => (0.0, 0.0),
            Palette::Ice => (200.0, 0.8),
            Palette::Ember => (25.0, 0.9),
            Palette::Aurora => (140.0, 0.7),
        }
    }

    /// Accent color for UI text.
    pub fn accent(self) -> Color {
        match self {
            Palette::Mono => Color::White,
            Palette::Ice => Color::LightCyan,
            Palette::Ember => Color::LightRed,
            Palette::Aurora => Color::LightGreen,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_from_cells_doubles_rows() {
        let size = SurfaceSize::from_cells(Rect::new(0, 0, 80, 24));
        assert_eq!(size, SurfaceSize::new(80, 48));
        assert_eq!(size.area(), 80 * 48);
        assert!(!size.is_empty());
        assert!(SurfaceSize::new(0, 10).is_empty());
    }

    #[test]
    fn test_style_cycle() {
        let style = FieldStyle::default();
        assert_eq!(style, FieldStyle::DotFlood);
        assert_eq!(style.next(), FieldStyle::ShootingStars);
        assert_eq!(style.next().next(), FieldStyle::DotFlood);
    }

    #[test]
    fn test_palette_cycle_visits_all() {
        let mut palette = Palette::Mono;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(palette);
            palette = palette.next();
        }
        assert_eq!(palette, Palette::Mono);
        assert_eq!(seen.len(), 4);
        assert_eq!(Palette::Mono.hue_saturation().1, 0.0);
    }
}
