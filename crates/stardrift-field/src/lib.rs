//! Particle field animations for stardrift.
//!
//! Two independent hero backgrounds are provided: a flood of drifting dots
//! that wrap around the surface edges, and a twinkling starfield crossed by
//! short-lived shooting stars. Both paint onto a [`Raster`] that is sized to
//! its container and advanced once per display refresh through a
//! [`FrameScheduler`].

mod animations;
mod color;
mod frame;
mod random;
mod raster;
mod state;

pub use animations::dots::{Dot, DotFlood};
pub use animations::stars::{ShootingStar, ShootingStars, Star};
pub use color::{Rgb, hsl_to_rgb, palette_colors};
pub use frame::{DueFrames, FrameHandle, FrameScheduler};
pub use random::{RandomSource, ScriptedRandom};
pub use raster::Raster;
pub use state::FieldState;
