pub mod bounds;
pub mod transform;
pub mod vec;
