mod aabb;
pub use aabb::*;

mod ray;
pub use ray::*;

mod triangle;
pub use triangle::*;

mod segment;
pub use segment::*;

mod transform;
pub use transform::*;
