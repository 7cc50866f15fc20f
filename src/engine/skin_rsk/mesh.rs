use std::cell::OnceCell;
use std::collections::HashMap;
use glam::Vec3;
use math_rsk::AABB;
use crate::{AdjacencyGraph, Face, ModelLoadError, Vertex};

#[derive(Debug, Clone)]
pub struct Mesh
{
    pub name: String,
    pub enabled: bool, // disabled meshes are skipped when picking

    vertices: Vec<Vertex>,
    faces: Vec<Face>,
    dirty: bool, // vertex data must be re-uploaded
    adjacency: OnceCell<AdjacencyGraph>,
}
impl Mesh
{
    pub fn new(name: impl Into<String>, vertices: Vec<Vertex>, faces: Vec<Face>) -> Result<Self, ModelLoadError>
    {
        validate_faces(vertices.len(), &faces)?;
        Ok(Self
        {
            name: name.into(),
            enabled: true,
            vertices,
            faces,
            dirty: true,
            adjacency: OnceCell::new(),
        })
    }

    #[inline] #[must_use] pub fn vertices(&self) -> &[Vertex] { &self.vertices }
    // Position edits do not invalidate adjacency, the vertex count cannot change through this
    #[inline] #[must_use] pub fn vertices_mut(&mut self) -> &mut [Vertex] { &mut self.vertices }
    #[inline] #[must_use] pub fn faces(&self) -> &[Face] { &self.faces }
    #[inline] #[must_use] pub fn vertex_count(&self) -> usize { self.vertices.len() }
    #[inline] #[must_use] pub fn face_count(&self) -> usize { self.faces.len() }

    #[must_use]
    pub fn face_positions(&self, face_index: usize) -> Option<[Vec3; 3]>
    {
        let face = self.faces.get(face_index)?;
        Some(face.indices.map(|i| self.vertices[i as usize].position))
    }

    // Built on first use after load or a topology change
    pub fn adjacency(&self) -> &AdjacencyGraph
    {
        self.adjacency.get_or_init(|| AdjacencyGraph::build(self.vertices.len(), &self.faces))
    }

    pub fn set_faces(&mut self, faces: Vec<Face>) -> Result<(), ModelLoadError>
    {
        validate_faces(self.vertices.len(), &faces)?;
        self.faces = faces;
        self.adjacency = OnceCell::new();
        self.dirty = true;
        Ok(())
    }

    #[must_use]
    pub fn bounds(&self) -> AABB
    {
        AABB::from_points(self.vertices.iter().map(|v| v.position)).unwrap_or_default()
    }

    pub fn translate_vertex(&mut self, index: usize, delta: Vec3) -> bool
    {
        let Some(vertex) = self.vertices.get_mut(index) else { return false; };
        vertex.position += delta;
        self.dirty = true;
        true
    }

    pub fn clear_selection(&mut self)
    {
        for v in &mut self.vertices
        {
            v.selected = false;
        }
    }

    #[inline] pub fn mark_dirty(&mut self) { self.dirty = true; }
    #[inline] #[must_use] pub fn is_dirty(&self) -> bool { self.dirty }
    #[inline]
    pub fn take_dirty(&mut self) -> bool
    {
        std::mem::replace(&mut self.dirty, false)
    }

    // Merge vertices that share the exact same position. The first vertex at a position is kept
    // (along with its attributes and influences), faces are remapped. Returns the number of vertices removed
    pub fn weld_vertices(&mut self) -> usize
    {
        let mut first_at: HashMap<[u32; 3], u32> = HashMap::with_capacity(self.vertices.len());
        let mut remap = Vec::with_capacity(self.vertices.len());
        let mut welded = Vec::with_capacity(self.vertices.len());

        for vertex in self.vertices.drain(..)
        {
            let key = (vertex.position + Vec3::ZERO).to_array().map(f32::to_bits); // + 0 folds -0 into 0
            let next_index = welded.len() as u32;
            let index = *first_at.entry(key).or_insert(next_index);
            if index == next_index
            {
                welded.push(vertex);
            }
            remap.push(index);
        }

        let removed = remap.len() - welded.len();
        self.vertices = welded;
        for face in &mut self.faces
        {
            face.indices = face.indices.map(|i| remap[i as usize]);
        }

        if removed > 0
        {
            log::debug!("Welded {removed} vertices in mesh '{}'", self.name);
            self.adjacency = OnceCell::new();
            self.dirty = true;
        }
        removed
    }
}

fn validate_faces(vertex_count: usize, faces: &[Face]) -> Result<(), ModelLoadError>
{
    for (face, f) in faces.iter().enumerate()
    {
        if let Some(&index) = f.indices.iter().find(|i| **i as usize >= vertex_count)
        {
            return Err(ModelLoadError::InvalidFaceIndex { face, index });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests
{
    use crate::test_meshes::{cube_faces, cube_mesh, cube_vertices};
    use super::*;

    fn split_quad() -> Mesh
    {
        let corners = [Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::new(1.0, 1.0, 0.0)];
        let vertices = [0, 1, 2, 1, 3, 2].map(|c| Vertex::new(corners[c])).to_vec();
        Mesh::new("quad", vertices, vec![Face::new(0, 1, 2), Face::new(3, 4, 5)]).unwrap()
    }

    #[test]
    fn rejects_bad_faces()
    {
        let result = Mesh::new("bad", cube_vertices(), vec![Face::new(0, 1, 8)]);
        assert!(matches!(result, Err(ModelLoadError::InvalidFaceIndex { face: 0, index: 8 })));

        let mut mesh = cube_mesh();
        assert!(mesh.set_faces(vec![Face::new(0, 1, 2), Face::new(9, 1, 2)]).is_err());
        assert_eq!(mesh.faces(), cube_faces().as_slice());
    }

    #[test]
    fn positions_do_not_invalidate_adjacency()
    {
        let mut mesh = cube_mesh();
        let before = mesh.adjacency().clone();
        assert!(mesh.translate_vertex(3, Vec3::splat(10.0)));
        assert_eq!(mesh.adjacency(), &before);
        assert!(!mesh.translate_vertex(8, Vec3::ONE));
    }

    #[test]
    fn topology_change_rebuilds_adjacency()
    {
        let mut mesh = cube_mesh();
        assert_eq!(mesh.adjacency().edge_count(), 18);
        mesh.set_faces(vec![Face::new(0, 1, 2)]).unwrap();
        assert_eq!(mesh.adjacency().edge_count(), 3);
        assert!(mesh.adjacency().neighbours(7).is_empty());
    }

    #[test]
    fn weld()
    {
        let mut mesh = split_quad();
        assert_eq!(mesh.adjacency().edge_count(), 6);

        assert_eq!(mesh.weld_vertices(), 2);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.faces(), &[Face::new(0, 1, 2), Face::new(1, 3, 2)]);
        assert_eq!(mesh.adjacency().edge_count(), 5);

        assert_eq!(mesh.weld_vertices(), 0);
    }

    #[test]
    fn weld_keeps_first_vertex()
    {
        let mut vertices = vec![Vertex::new(Vec3::ZERO), Vertex::new(Vec3::X), Vertex::new(Vec3::new(-0.0, 0.0, 0.0))];
        vertices[0].tex_coord.x = 1.0;
        vertices[2].tex_coord.x = 2.0;
        let mut mesh = Mesh::new("weld", vertices, vec![Face::new(2, 1, 0)]).unwrap();
        assert_eq!(mesh.weld_vertices(), 1);
        assert_eq!(mesh.vertices()[0].tex_coord.x, 1.0);
        assert_eq!(mesh.faces(), &[Face::new(0, 1, 0)]);
    }

    #[test]
    fn dirty_flag()
    {
        let mut mesh = cube_mesh();
        assert!(mesh.take_dirty());
        assert!(!mesh.is_dirty());
        mesh.translate_vertex(0, Vec3::X);
        assert!(mesh.take_dirty());
        assert!(!mesh.take_dirty());
    }

    #[test]
    fn bounds()
    {
        let mesh = cube_mesh();
        assert_eq!(mesh.bounds(), AABB::new(Vec3::ZERO, Vec3::ONE));
    }
}
