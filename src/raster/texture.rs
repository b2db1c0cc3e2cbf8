use std::path::Path;

use glam::{Vec2, Vec3};

/// An RGB image sampled with repeat wrapping
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    pub width: usize,
    pub height: usize,
    pixels: Vec<Vec3>,
}

impl Texture {
    pub fn from_image(image: image::DynamicImage) -> Self {
        let image = image.to_rgb32f();
        let (width, height) = image.dimensions();
        Self {
            width: width as usize,
            height: height as usize,
            pixels: image.pixels().map(|p| Vec3::from_array(p.0)).collect(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, image::ImageError> {
        let texture = Self::from_image(image::open(path)?);
        log::info!(
            "Loaded texture {} ({}x{})",
            path.display(),
            texture.width,
            texture.height
        );
        Ok(texture)
    }

    /// Blue and white stripes, used until an image is dropped on the window
    pub fn stripes() -> Self {
        const SIZE: usize = 256;
        const STRIPES: usize = 8;
        let blue = Vec3::new(0.15, 0.3, 0.7);
        let pixels = (0..SIZE * SIZE)
            .map(|i| {
                let (x, y) = (i % SIZE, i / SIZE);
                if (x + y) * STRIPES / SIZE % 2 == 0 {
                    Vec3::ONE
                } else {
                    blue
                }
            })
            .collect();
        Self {
            width: SIZE,
            height: SIZE,
            pixels,
        }
    }

    /// Nearest texel, `v = 1` is the top row of the image
    pub fn sample(&self, uv: Vec2) -> Vec3 {
        if self.pixels.is_empty() {
            return Vec3::ONE;
        }
        let u = uv.x - uv.x.floor();
        let v = uv.y - uv.y.floor();
        let x = ((u * self.width as f32) as usize).min(self.width - 1);
        let y = (((1.0 - v) * self.height as f32) as usize).min(self.height - 1);
        self.pixels[y * self.width + x]
    }
}
