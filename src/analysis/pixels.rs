//! Read-only pixel access over decoded images

use image::RgbaImage;

use crate::io::error::{Result, SolverError};

/// An RGBA color with 8-bit channels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel (ignored by edge scoring)
    pub a: u8,
}

impl Color {
    /// Opaque color from RGB channels
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Sum of absolute per-channel differences over R, G and B
    pub const fn rgb_distance(self, other: Self) -> u32 {
        self.r.abs_diff(other.r) as u32
            + self.g.abs_diff(other.g) as u32
            + self.b.abs_diff(other.b) as u32
    }
}

impl From<image::Rgba<u8>> for Color {
    fn from(pixel: image::Rgba<u8>) -> Self {
        let [r, g, b, a] = pixel.0;
        Self { r, g, b, a }
    }
}

/// Coordinate-addressable color lookup
pub trait PixelSource {
    /// Image extent `(width, height)` in pixels
    fn dimensions(&self) -> (u32, u32);

    /// Color at `(x, y)`
    ///
    /// # Errors
    ///
    /// Returns an out-of-bounds error outside the image extent
    fn pixel(&self, x: u32, y: u32) -> Result<Color>;
}

impl PixelSource for RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn pixel(&self, x: u32, y: u32) -> Result<Color> {
        self.get_pixel_checked(x, y)
            .copied()
            .map(Color::from)
            .ok_or(SolverError::OutOfBounds {
                x,
                y,
                width: self.width(),
                height: self.height(),
            })
    }
}
