//! Color utilities for the drawing surface.

use ratatui::style::Color;
use stardrift_core::Palette;

/// Sky color behind the particles.
const NIGHT_SKY: Rgb = Rgb::new(0, 0, 10);

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Move toward `target` by `alpha` (source-over compositing).
    pub fn mix(self, target: Rgb, alpha: f32) -> Rgb {
        let alpha = alpha.clamp(0.0, 1.0);
        Rgb::new(
            lerp_channel(self.r, target.r, alpha),
            lerp_channel(self.g, target.g, alpha),
            lerp_channel(self.b, target.b, alpha),
        )
    }

    /// Screen-blend `source` over `self` at `alpha` opacity.
    ///
    /// Screening never darkens, so overlapping particles brighten each other.
    pub fn screen(self, source: Rgb, alpha: f32) -> Rgb {
        let screened = Rgb::new(
            screen_channel(self.r, source.r),
            screen_channel(self.g, source.g),
            screen_channel(self.b, source.b),
        );
        self.mix(screened, alpha)
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::Rgb(rgb.r, rgb.g, rgb.b)
    }
}

fn lerp_channel(from: u8, to: u8, alpha: f32) -> u8 {
    let from = from as f32;
    let to = to as f32;
    (from + (to - from) * alpha).round().clamp(0.0, 255.0) as u8
}

fn screen_channel(a: u8, b: u8) -> u8 {
    let a = a as f32 / 255.0;
    let b = b as f32 / 255.0;
    ((1.0 - (1.0 - a) * (1.0 - b)) * 255.0).round() as u8
}

/// Particle and background colors for a palette.
pub fn palette_colors(palette: Palette) -> (Rgb, Rgb) {
    let (hue, saturation) = palette.hue_saturation();
    let particle = if saturation == 0.0 {
        Rgb::WHITE
    } else {
        hsl_to_rgb(hue, saturation, 0.8)
    };
    (particle, NIGHT_SKY)
}

/// Convert HSL to RGB color.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Rgb {
    if s == 0.0 {
        let v = (l * 255.0) as u8;
        return Rgb::new(v, v, v);
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    let h = h / 360.0;

    let r = hue_to_rgb(p, q, h + 1.0 / 3.0);
    let g = hue_to_rgb(p, q, h);
    let b = hue_to_rgb(p, q, h - 1.0 / 3.0);

    Rgb::new((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mix_endpoints() {
        let a = Rgb::new(10, 20, 30);
        let b = Rgb::new(110, 220, 130);
        assert_eq!(a.mix(b, 0.0), a);
        assert_eq!(a.mix(b, 1.0), b);
        assert_eq!(a.mix(b, 0.5), Rgb::new(60, 120, 80));
    }

    #[test]
    fn test_screen_never_darkens() {
        let base = Rgb::new(100, 50, 200);
        let out = base.screen(Rgb::new(30, 30, 30), 1.0);
        assert!(out.r >= base.r && out.g >= base.g && out.b >= base.b);
        assert_eq!(Rgb::BLACK.screen(Rgb::WHITE, 1.0), Rgb::WHITE);
        assert_eq!(base.screen(Rgb::WHITE, 0.0), base);
    }

    #[test]
    fn test_hsl_primaries() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), Rgb::new(255, 0, 0));
        assert_eq!(hsl_to_rgb(0.0, 0.0, 1.0), Rgb::WHITE);
    }

    #[test]
    fn test_palette_colors() {
        let (particle, sky) = palette_colors(Palette::Mono);
        assert_eq!(particle, Rgb::WHITE);
        assert_eq!(sky, NIGHT_SKY);

        let (ice, _) = palette_colors(Palette::Ice);
        assert!(ice.b > ice.r);
    }
}
