use glam::Vec3;
use image::Rgb as ImageRgb;

use crate::math::vec::{RgbAsVec3Ext, Vec3AsRgbExt};

pub type Rgb = ImageRgb<f32>;

pub const WHITE: Rgb = ImageRgb([1.0, 1.0, 1.0]);
pub const BLACK: Rgb = ImageRgb([0.0, 0.0, 0.0]);
pub const RED: Rgb = ImageRgb([1.0, 0.0, 0.0]);

pub fn clamp(color: Rgb) -> Rgb {
    color.vec().clamp(Vec3::ZERO, Vec3::ONE).rgb()
}

/// Quantize to 8 bits per channel, alpha is always opaque
pub fn to_rgba8(color: Rgb) -> [u8; 4] {
    let [r, g, b] = clamp(color).0.map(|c| (c * 255.0).round() as u8);
    [r, g, b, 255]
}
