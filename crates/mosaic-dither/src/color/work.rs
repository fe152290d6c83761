//! Working color type
//!
//! Error diffusion and ordered dithering push channel values outside the
//! 8-bit range. `WorkColor` carries them unclamped until the palette match.

use std::ops::{Add, AddAssign, Mul, Sub};

use super::rgb::Rgb;

/// An RGB color with `f32` channels on the 0.0..=255.0 scale.
///
/// Values may leave that range while quantization error accumulates; the
/// palette match consumes them as-is.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorkColor {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
}

impl WorkColor {
    /// Create a working color from channel values.
    #[inline]
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// A working color with the same value in every channel.
    #[inline]
    pub fn splat(v: f32) -> Self {
        Self { r: v, g: v, b: v }
    }

    /// Clamp every channel independently to 0.0..=255.0.
    #[inline]
    pub fn clamp_channels(self) -> Self {
        Self {
            r: self.r.clamp(0.0, 255.0),
            g: self.g.clamp(0.0, 255.0),
            b: self.b.clamp(0.0, 255.0),
        }
    }

    /// Squared Euclidean distance to a palette color.
    #[inline]
    pub fn distance_squared(self, other: Rgb) -> f32 {
        let dr = self.r - other.r as f32;
        let dg = self.g - other.g as f32;
        let db = self.b - other.b as f32;
        dr * dr + dg * dg + db * db
    }
}

impl From<Rgb> for WorkColor {
    #[inline]
    fn from(rgb: Rgb) -> Self {
        Self {
            r: rgb.r as f32,
            g: rgb.g as f32,
            b: rgb.b as f32,
        }
    }
}

impl Add for WorkColor {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl AddAssign for WorkColor {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.r += rhs.r;
        self.g += rhs.g;
        self.b += rhs.b;
    }
}

impl Sub<Rgb> for WorkColor {
    type Output = Self;

    /// Signed quantization error: working value minus matched color.
    #[inline]
    fn sub(self, rhs: Rgb) -> Self {
        Self::new(
            self.r - rhs.r as f32,
            self.g - rhs.g as f32,
            self.b - rhs.b as f32,
        )
    }
}

impl Mul<f32> for WorkColor {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.r * rhs, self.g * rhs, self.b * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_channels_is_independent() {
        let c = WorkColor::new(-12.0, 128.0, 300.5).clamp_channels();
        assert_eq!(c, WorkColor::new(0.0, 128.0, 255.0));
    }

    #[test]
    fn test_distance_squared() {
        let c = WorkColor::new(200.0, 10.0, 10.0);
        assert_eq!(c.distance_squared(Rgb::new(255, 0, 0)), 55.0 * 55.0 + 100.0 + 100.0);
        assert_eq!(c.distance_squared(Rgb::new(200, 10, 10)), 0.0);
    }

    #[test]
    fn test_error_arithmetic() {
        let working = WorkColor::new(100.0, 50.0, 0.0);
        let err = working - Rgb::new(64, 64, 64);
        assert_eq!(err, WorkColor::new(36.0, -14.0, -64.0));

        let mut acc = WorkColor::default();
        acc += err * 0.5;
        assert_eq!(acc, WorkColor::new(18.0, -7.0, -32.0));
    }
}
