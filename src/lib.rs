pub mod camera;
pub mod color;
pub mod geometry;
pub mod loader;
pub mod math;
pub mod picking;
pub mod raster;
pub mod ray;
pub mod utils;
pub mod viewer;
