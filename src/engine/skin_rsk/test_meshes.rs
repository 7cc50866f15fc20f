use glam::Vec3;
use crate::{BoneId, Face, Mesh, Vertex};

// Unit cube, vertex i sits at (i & 1, (i >> 1) & 1, (i >> 2) & 1)
pub fn cube_vertices() -> Vec<Vertex>
{
    (0..8u32).map(|i| Vertex::new(Vec3::new(
        (i & 1) as f32,
        ((i >> 1) & 1) as f32,
        ((i >> 2) & 1) as f32)))
        .collect()
}

pub fn cube_faces() -> Vec<Face>
{
    vec![
        Face::new(0, 1, 2), Face::new(1, 3, 2),
        Face::new(0, 1, 4), Face::new(1, 5, 4),
        Face::new(0, 2, 4), Face::new(2, 6, 4),
        Face::new(4, 5, 7), Face::new(4, 7, 6),
        Face::new(2, 3, 7), Face::new(2, 7, 6),
        Face::new(1, 3, 7), Face::new(1, 7, 5),
    ]
}

// Cube with only vertex 0 weighted (fully) to bone 0
pub fn cube_mesh() -> Mesh
{
    let mut vertices = cube_vertices();
    vertices[0].add_influence(BoneId(0), 1.0);
    Mesh::new("cube", vertices, cube_faces()).unwrap()
}

// Two separate triangles (0..3 and 3..6) plus an unreferenced vertex 6
pub fn two_islands() -> (usize, Vec<Face>)
{
    (7, vec![Face::new(0, 1, 2), Face::new(3, 4, 5)])
}
