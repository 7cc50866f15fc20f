mod vertex;
pub use vertex::*;

mod mesh;
pub use mesh::*;

mod adjacency;
pub use adjacency::*;

mod propagation;
pub use propagation::*;

mod bones;
pub use bones::*;

mod model;
pub use model::*;

mod bake;
pub use bake::*;

#[cfg(test)]
pub(crate) mod test_meshes;
