use glam::Vec3;

use crate::color::{self, Rgb};
use crate::math::vec::{RgbAsVec3Ext, Vec3AsRgbExt};

/// Color and depth planes of the rendered image, row major, first row at the top
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub color: Vec<Vec3>,
    /// Normalized device depth, `1.0` is the far plane
    pub depth: Vec<f32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            color: vec![Vec3::ZERO; width * height],
            depth: vec![1.0; width * height],
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        if (width, height) != (self.width, self.height) {
            log::debug!("Resizing frame buffer to {width}x{height}");
            *self = Self::new(width, height);
        }
    }

    pub fn clear(&mut self, background: Rgb) {
        self.color.fill(background.vec());
        self.depth.fill(1.0);
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        self.color[y * self.width + x].rgb()
    }

    /// 8 bit RGBA pixels, ready to be uploaded as a texture
    pub fn to_rgba8(&self) -> Vec<[u8; 4]> {
        self.color.iter().map(|c| color::to_rgba8(c.rgb())).collect()
    }
}
