use glam::Vec3;
use serde::{Deserialize, Serialize};
use skin_rsk::Mesh;
use crate::{closest_edge, closest_vertex, PickHit};

// Index-based handle to a vertex, resolved against the mesh list at use time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexRef
{
    pub mesh: usize,
    pub vertex: usize,
}
impl VertexRef
{
    #[inline] #[must_use]
    pub const fn new(mesh: usize, vertex: usize) -> Self { Self { mesh, vertex } }
}

// What a click on a face selects
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode
{
    #[default]
    Vertex,
    Edge,
    Face,
}

// Ordered, duplicate-free set of selected vertices
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Selection
{
    refs: Vec<VertexRef>,
}
impl Selection
{
    #[inline] #[must_use] pub fn refs(&self) -> &[VertexRef] { &self.refs }
    #[inline] #[must_use] pub fn len(&self) -> usize { self.refs.len() }
    #[inline] #[must_use] pub fn is_empty(&self) -> bool { self.refs.is_empty() }
    #[inline] #[must_use] pub fn contains(&self, vertex: VertexRef) -> bool { self.refs.contains(&vertex) }

    pub fn clear(&mut self) { self.refs.clear(); }

    // Returns true if the vertex is selected afterward
    pub fn toggle(&mut self, vertex: VertexRef) -> bool
    {
        match self.refs.iter().position(|r| *r == vertex)
        {
            Some(i) =>
            {
                self.refs.remove(i);
                false
            }
            None =>
            {
                self.refs.push(vertex);
                true
            }
        }
    }

    // Toggles a group: if every vertex is already selected the group is deselected,
    // otherwise the missing ones are added. Returns true if the group is selected afterward
    pub fn toggle_group(&mut self, group: &[VertexRef]) -> bool
    {
        if group.iter().all(|v| self.contains(*v))
        {
            self.refs.retain(|r| !group.contains(r));
            return false;
        }
        for v in group
        {
            if !self.contains(*v)
            {
                self.refs.push(*v);
            }
        }
        true
    }

    // Select the vertex, edge, or face under a pick hit
    pub fn toggle_hit(&mut self, hit: &PickHit, mesh: &Mesh, mode: SelectionMode) -> bool
    {
        let group: Vec<u32> = match mode
        {
            SelectionMode::Vertex => vec![closest_vertex(mesh, &hit.face, hit.point)],
            SelectionMode::Edge =>
            {
                let (a, b) = closest_edge(mesh, &hit.face, hit.point);
                vec![a, b]
            }
            SelectionMode::Face => hit.face.indices.to_vec(),
        };
        let refs: Vec<_> = group.into_iter().map(|v| VertexRef::new(hit.mesh_index, v as usize)).collect();
        self.toggle_group(&refs)
    }

    // Adds every vertex of the enabled meshes within `radius` of `center`. Returns how many were added
    pub fn select_in_radius<'m>(&mut self, meshes: impl IntoIterator<Item = &'m Mesh>, center: Vec3, radius: f32) -> usize
    {
        let radius_sq = radius * radius;
        let mut added = 0;
        for (m, mesh) in meshes.into_iter().enumerate()
        {
            if !mesh.enabled { continue; }
            for (v, vertex) in mesh.vertices().iter().enumerate()
            {
                let vref = VertexRef::new(m, v);
                if vertex.position.distance_squared(center) <= radius_sq && !self.contains(vref)
                {
                    self.refs.push(vref);
                    added += 1;
                }
            }
        }
        added
    }

    // Mirror the selection into the per-vertex flags the renderer reads
    pub fn sync_flags<'m>(&self, meshes: impl IntoIterator<Item = &'m mut Mesh>)
    {
        for (m, mesh) in meshes.into_iter().enumerate()
        {
            mesh.clear_selection();
            for r in self.refs.iter().filter(|r| r.mesh == m)
            {
                if let Some(v) = mesh.vertices_mut().get_mut(r.vertex)
                {
                    v.selected = true;
                }
            }
            mesh.mark_dirty();
        }
    }
}

#[cfg(test)]
mod tests
{
    use skin_rsk::{Face, Vertex};
    use super::*;

    fn quad() -> Mesh
    {
        let vertices = [Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::new(1.0, 1.0, 0.0)].map(Vertex::new).to_vec();
        Mesh::new("quad", vertices, vec![Face::new(0, 1, 2), Face::new(1, 3, 2)]).unwrap()
    }

    fn hit_near(point: Vec3) -> PickHit
    {
        PickHit { point, face: Face::new(0, 1, 2), face_index: 0, mesh_index: 0, distance: 1.0 }
    }

    #[test]
    fn toggle_vertex()
    {
        let mesh = quad();
        let mut selection = Selection::default();
        assert!(selection.toggle_hit(&hit_near(Vec3::new(0.9, 0.05, 0.0)), &mesh, SelectionMode::Vertex));
        assert_eq!(selection.refs(), &[VertexRef::new(0, 1)]);
        assert!(!selection.toggle_hit(&hit_near(Vec3::new(0.8, 0.1, 0.0)), &mesh, SelectionMode::Vertex));
        assert!(selection.is_empty());
    }

    #[test]
    fn toggle_edge_and_face()
    {
        let mesh = quad();
        let mut selection = Selection::default();
        assert!(selection.toggle_hit(&hit_near(Vec3::new(0.5, 0.02, 0.0)), &mesh, SelectionMode::Edge));
        assert_eq!(selection.refs(), &[VertexRef::new(0, 0), VertexRef::new(0, 1)]);

        // face adds only the missing corner
        assert!(selection.toggle_hit(&hit_near(Vec3::new(0.2, 0.2, 0.0)), &mesh, SelectionMode::Face));
        assert_eq!(selection.len(), 3);
        assert!(!selection.toggle_hit(&hit_near(Vec3::new(0.2, 0.2, 0.0)), &mesh, SelectionMode::Face));
        assert!(selection.is_empty());
    }

    #[test]
    fn radius()
    {
        let meshes = vec![quad(), quad()];
        let mut selection = Selection::default();
        assert_eq!(selection.select_in_radius(&meshes, Vec3::ZERO, 1.0), 6);
        assert!(!selection.contains(VertexRef::new(1, 3)));
        assert_eq!(selection.select_in_radius(&meshes, Vec3::ZERO, 2.0), 2);
    }

    #[test]
    fn flags_follow_selection()
    {
        let mut meshes = vec![quad()];
        let mut selection = Selection::default();
        selection.toggle(VertexRef::new(0, 2));
        selection.toggle(VertexRef::new(3, 0)); // stale refs are ignored
        selection.sync_flags(&mut meshes);
        let flags: Vec<bool> = meshes[0].vertices().iter().map(|v| v.selected).collect();
        assert_eq!(flags, [false, false, true, false]);

        selection.clear();
        selection.sync_flags(&mut meshes);
        assert!(meshes[0].vertices().iter().all(|v| !v.selected));
    }
}
