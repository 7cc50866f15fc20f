use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use nab_rsk::debug_panic;
use crate::{Mesh, Model, Vertex};

// How normals/tangents/bitangents go through the blend matrix
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectionBlend
{
    // w = 0 (no translation), renormalized
    #[default]
    Linear,
    // w = 1, transformed exactly like a position
    Affine,
}

#[derive(Debug, Clone)]
pub struct BakedMesh
{
    pub mesh: Mesh,
    pub blends: Box<[Mat4]>, // per vertex, source (bind) space -> baked space
}

#[derive(Debug, Clone)]
pub struct BakedModel
{
    meshes: Vec<BakedMesh>,
}
impl BakedModel
{
    #[inline] #[must_use] pub fn meshes(&self) -> &[BakedMesh] { &self.meshes }
    #[inline] #[must_use] pub fn meshes_mut(&mut self) -> &mut [BakedMesh] { &mut self.meshes }

    #[inline]
    pub fn iter_meshes(&self) -> impl Iterator<Item = &Mesh> { self.meshes.iter().map(|b| &b.mesh) }

    #[inline] #[must_use]
    pub fn blend(&self, mesh: usize, vertex: usize) -> Option<Mat4>
    {
        self.meshes.get(mesh)?.blends.get(vertex).copied()
    }
}

// Linear blend skinning of a posed mesh into a rigid snapshot
pub struct SkinningBaker<'m>
{
    matrices: &'m [Mat4],
    direction_blend: DirectionBlend,
}
impl<'m> SkinningBaker<'m>
{
    #[inline] #[must_use]
    pub fn new(matrices: &'m [Mat4], direction_blend: DirectionBlend) -> Self
    {
        Self { matrices, direction_blend }
    }

    // Sum of weight * bone matrix. Identity when no influence carries a nonzero weight.
    // Signed weights that cancel out still blend
    #[must_use]
    pub fn blend_matrix(&self, vertex: &Vertex) -> Mat4
    {
        self.weighted_blend(vertex).unwrap_or(Mat4::IDENTITY)
    }

    fn weighted_blend(&self, vertex: &Vertex) -> Option<Mat4>
    {
        let mut blend = Mat4::ZERO;
        let mut weighted = false;
        for influence in &vertex.influences
        {
            if influence.weight == 0.0 { continue; }

            let bone_mtx = match self.matrices.get(influence.bone.index())
            {
                Some(m) => *m,
                None =>
                {
                    debug_panic!("Bone {} is outside the {} final matrices", influence.bone.0, self.matrices.len());
                    Mat4::IDENTITY
                }
            };
            blend += bone_mtx * influence.weight;
            weighted = true;
        }

        weighted.then_some(blend)
    }

    // Vertices without any weighted influence are copied as-is
    #[must_use]
    pub fn bake_vertex(&self, vertex: &Vertex) -> (Vertex, Mat4)
    {
        let mut baked = vertex.clone();
        baked.influences.clear();
        let Some(blend) = self.weighted_blend(vertex) else
        {
            return (baked, Mat4::IDENTITY);
        };

        baked.position = blend.transform_point3(vertex.position);
        baked.normal = self.blend_direction(blend, vertex.normal);
        baked.tangent = self.blend_direction(blend, vertex.tangent);
        baked.bitangent = self.blend_direction(blend, vertex.bitangent);
        (baked, blend)
    }

    fn blend_direction(&self, blend: Mat4, direction: Vec3) -> Vec3
    {
        match self.direction_blend
        {
            DirectionBlend::Linear => blend.transform_vector3(direction).normalize_or_zero(),
            DirectionBlend::Affine => blend.transform_point3(direction),
        }
    }

    #[must_use]
    pub fn bake_mesh(&self, mesh: &Mesh) -> BakedMesh
    {
        let mut baked = mesh.clone();
        let mut blends = Vec::with_capacity(mesh.vertex_count());
        for (out, vertex) in baked.vertices_mut().iter_mut().zip(mesh.vertices())
        {
            let (v, blend) = self.bake_vertex(vertex);
            *out = v;
            blends.push(blend);
        }
        baked.mark_dirty();

        BakedMesh
        {
            mesh: baked,
            blends: blends.into_boxed_slice(),
        }
    }

    #[must_use]
    pub fn bake_model(&self, model: &Model) -> BakedModel
    {
        let meshes: Vec<_> = model.meshes().iter().map(|m| self.bake_mesh(m)).collect();
        log::info!("Baked {} meshes", meshes.len());
        BakedModel { meshes }
    }
}
