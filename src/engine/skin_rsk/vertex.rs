use arrayvec::ArrayVec;
use glam::{Vec2, Vec3};

pub const MAX_INFLUENCES: usize = 16;

// Index into the model's bone registry and the animator's final matrix array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoneId(pub u32);
impl BoneId
{
    #[inline] #[must_use]
    pub const fn index(self) -> usize { self.0 as usize }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneInfluence
{
    pub bone: BoneId,
    pub weight: f32,
}

pub type Influences = ArrayVec<BoneInfluence, MAX_INFLUENCES>;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Vertex
{
    pub position: Vec3,
    pub normal: Vec3,
    pub tangent: Vec3,
    pub bitangent: Vec3,
    pub tex_coord: Vec2,
    pub influences: Influences, // weights are not necessarily normalized, may contain zero-weight candidates
    pub selected: bool,
}
impl Vertex
{
    #[inline] #[must_use]
    pub fn new(position: Vec3) -> Self
    {
        Self
        {
            position,
            ..Default::default()
        }
    }

    #[inline] #[must_use]
    pub fn with_normal(mut self, normal: Vec3) -> Self
    {
        self.normal = normal;
        self
    }

    // Returns false (and drops the influence) if the vertex already holds MAX_INFLUENCES
    pub fn add_influence(&mut self, bone: BoneId, weight: f32) -> bool
    {
        match self.influences.try_push(BoneInfluence { bone, weight })
        {
            Ok(()) => true,
            Err(_) =>
            {
                log::trace!("Dropping influence of bone {} (weight {weight}), vertex is full", bone.0);
                false
            }
        }
    }

    #[inline] #[must_use]
    pub fn has_bone(&self, bone: BoneId) -> bool
    {
        self.influences.iter().any(|i| i.bone == bone)
    }

    #[inline] #[must_use]
    pub fn total_weight(&self) -> f32
    {
        self.influences.iter().map(|i| i.weight).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Face
{
    pub indices: [u32; 3],
}
impl Face
{
    #[inline] #[must_use]
    pub const fn new(a: u32, b: u32, c: u32) -> Self { Self { indices: [a, b, c] } }

    // the three (undirected) edges, in winding order
    #[inline] #[must_use]
    pub const fn edges(&self) -> [(u32, u32); 3]
    {
        let [a, b, c] = self.indices;
        [(a, b), (b, c), (c, a)]
    }

    #[inline] #[must_use]
    pub fn contains(&self, vertex: u32) -> bool { self.indices.contains(&vertex) }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn influence_overflow_is_dropped()
    {
        let mut vertex = Vertex::new(Vec3::ZERO);
        for i in 0..MAX_INFLUENCES
        {
            assert!(vertex.add_influence(BoneId(i as u32), 0.5));
        }
        assert!(!vertex.add_influence(BoneId(99), 1.0));
        assert_eq!(vertex.influences.len(), MAX_INFLUENCES);
        assert!(!vertex.has_bone(BoneId(99)));
        assert_eq!(vertex.total_weight(), MAX_INFLUENCES as f32 * 0.5);
    }

    #[test]
    fn face_edges()
    {
        let face = Face::new(4, 7, 2);
        assert_eq!(face.edges(), [(4, 7), (7, 2), (2, 4)]);
        assert!(face.contains(2));
        assert!(!face.contains(3));
    }
}
