use core::fmt::Display;

use clap::ValueEnum;
use geometry_viewer::{
    geometry::{Primitive, Quality},
    raster::ViewMode,
};

#[derive(Debug, Default, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum AvailablePrimitive {
    Capsule,
    Cone,
    Cube,
    Cylinder,
    Helix,
    Icosahedron,
    Icosphere,
    Sphere,
    #[default]
    Teapot,
    Torus,
    TorusKnot,
    Plane,
    Rectangle,
    RoundedRectangle,
    Circle,
    Ring,
    ImportedMesh,
}

impl From<AvailablePrimitive> for Primitive {
    fn from(val: AvailablePrimitive) -> Self {
        match val {
            AvailablePrimitive::Capsule => Primitive::Capsule,
            AvailablePrimitive::Cone => Primitive::Cone,
            AvailablePrimitive::Cube => Primitive::Cube,
            AvailablePrimitive::Cylinder => Primitive::Cylinder,
            AvailablePrimitive::Helix => Primitive::Helix,
            AvailablePrimitive::Icosahedron => Primitive::Icosahedron,
            AvailablePrimitive::Icosphere => Primitive::Icosphere,
            AvailablePrimitive::Sphere => Primitive::Sphere,
            AvailablePrimitive::Teapot => Primitive::Teapot,
            AvailablePrimitive::Torus => Primitive::Torus,
            AvailablePrimitive::TorusKnot => Primitive::TorusKnot,
            AvailablePrimitive::Plane => Primitive::Plane,
            AvailablePrimitive::Rectangle => Primitive::Rect,
            AvailablePrimitive::RoundedRectangle => Primitive::RoundedRect,
            AvailablePrimitive::Circle => Primitive::Circle,
            AvailablePrimitive::Ring => Primitive::Ring,
            AvailablePrimitive::ImportedMesh => Primitive::ImportedMesh,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum AvailableQuality {
    Low,
    Default,
    #[default]
    High,
}

impl From<AvailableQuality> for Quality {
    fn from(val: AvailableQuality) -> Self {
        match val {
            AvailableQuality::Low => Quality::Low,
            AvailableQuality::Default => Quality::Default,
            AvailableQuality::High => Quality::High,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum AvailableViewMode {
    Phong,
    Wireframe,
    #[default]
    Lambert,
}

impl From<AvailableViewMode> for ViewMode {
    fn from(val: AvailableViewMode) -> Self {
        match val {
            AvailableViewMode::Phong => ViewMode::Phong,
            AvailableViewMode::Wireframe => ViewMode::Wireframe,
            AvailableViewMode::Lambert => ViewMode::Lambert,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl std::str::FromStr for Dimensions {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut split_it = s.split('x');
        let (Some(a), Some(b), None) = (split_it.next(), split_it.next(), split_it.next()) else {
            return Err(anyhow::anyhow!("Incorrect format, expected `width`x`height`"));
        };
        let width: u32 = a.trim().parse()?;
        let height: u32 = b.trim().parse()?;
        anyhow::ensure!(width > 0 && height > 0, "Dimensions must not be zero");

        Ok(Dimensions { width, height })
    }
}

impl Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}x{}", self.width, self.height))
    }
}

pub fn parse_render_scale(s: &str) -> anyhow::Result<f32> {
    let scale: f32 = s.parse()?;
    anyhow::ensure!(
        (0.25..=1.0).contains(&scale),
        "Render scale must be between 0.25 and 1, got {scale}"
    );
    Ok(scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions() {
        let d: Dimensions = "1024x768".parse().unwrap();
        assert_eq!(d, Dimensions { width: 1024, height: 768 });
        assert_eq!(d.to_string(), "1024x768");
        assert!("1024".parse::<Dimensions>().is_err());
        assert!("0x10".parse::<Dimensions>().is_err());
        assert!("1x2x3".parse::<Dimensions>().is_err());
    }

    #[test]
    fn render_scale() {
        assert_eq!(parse_render_scale("0.5").unwrap(), 0.5);
        assert!(parse_render_scale("0.1").is_err());
        assert!(parse_render_scale("2").is_err());
    }

    #[test]
    fn value_enums_follow_library_order() {
        let primitives: Vec<Primitive> = AvailablePrimitive::value_variants()
            .iter()
            .map(|&p| p.into())
            .collect();
        assert_eq!(primitives, Primitive::ALL);
    }
}
