use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use glam::Mat4;
use math_rsk::AABB;
use crate::{BoneId, BoneRegistry, Face, Mesh, PropagationBudget, PropagationReport, Vertex, WeightPropagator};

#[derive(Debug)]
pub enum ModelLoadError
{
    InvalidBoneReference { mesh: usize, vertex: usize, bone: BoneId },
    InvalidVertexReference { mesh: usize, bone: String, vertex: u32 },
    InvalidFaceIndex { face: usize, index: u32 },
    TooManyBones,
}
impl Display for ModelLoadError
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { Debug::fmt(self, f) }
}
impl Error for ModelLoadError { }

// A bone's weights within one mesh
#[derive(Debug, Clone)]
pub struct BoneBinding
{
    pub name: String,
    pub offset: Mat4,
    pub weights: Vec<(u32, f32)>, // (vertex index, weight)
}

#[derive(Debug, Clone)]
pub struct MeshImport
{
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub faces: Vec<Face>,
    pub bones: Vec<BoneBinding>,
}

// Raw scene data handed over by an importer
#[derive(Debug, Default, Clone)]
pub struct ModelImport
{
    pub meshes: Vec<MeshImport>,
}

#[derive(Debug, Clone)]
pub struct Model
{
    meshes: Vec<Mesh>,
    bones: BoneRegistry,
}
impl Model
{
    // Validates the import, registers bones, applies weights and runs weight propagation on every mesh
    pub fn load(import: ModelImport, budget: &PropagationBudget) -> Result<Self, ModelLoadError>
    {
        let mut bones = BoneRegistry::new();
        let mut meshes = Vec::with_capacity(import.meshes.len());

        for (mesh_index, mesh_import) in import.meshes.into_iter().enumerate()
        {
            let mut vertices = mesh_import.vertices;
            for binding in &mesh_import.bones
            {
                let info = bones.register(&binding.name, binding.offset)?;
                for &(vertex, weight) in &binding.weights
                {
                    let Some(v) = vertices.get_mut(vertex as usize) else
                    {
                        return Err(ModelLoadError::InvalidVertexReference { mesh: mesh_index, bone: binding.name.clone(), vertex });
                    };
                    v.add_influence(info.id, weight);
                }
            }

            let mesh = Mesh::new(mesh_import.name, vertices, mesh_import.faces)?;
            meshes.push(mesh);
        }

        // pre-weighted vertices can only reference bones the import declared
        for (mesh_index, mesh) in meshes.iter().enumerate()
        {
            for (vertex, v) in mesh.vertices().iter().enumerate()
            {
                if let Some(bad) = v.influences.iter().find(|i| !bones.contains_id(i.bone))
                {
                    return Err(ModelLoadError::InvalidBoneReference { mesh: mesh_index, vertex, bone: bad.bone });
                }
            }
        }

        let mut model = Self { meshes, bones };
        model.propagate_weights(budget, |_, _| true);

        log::info!("Loaded model with {} meshes, {} vertices, {} bones",
            model.meshes.len(),
            model.meshes.iter().map(|m| m.vertex_count()).sum::<usize>(),
            model.bones.len());
        Ok(model)
    }

    #[inline] #[must_use] pub fn meshes(&self) -> &[Mesh] { &self.meshes }
    #[inline] #[must_use] pub fn meshes_mut(&mut self) -> &mut [Mesh] { &mut self.meshes }
    #[inline] #[must_use] pub fn bones(&self) -> &BoneRegistry { &self.bones }

    #[must_use]
    pub fn bounds(&self) -> AABB
    {
        self.meshes.iter()
            .filter(|m| m.vertex_count() > 0)
            .map(|m| m.bounds())
            .reduce(AABB::unioned_with)
            .unwrap_or_default()
    }

    // `should_continue` receives (mesh index, iteration) and is shared across meshes
    pub fn propagate_weights(&mut self, budget: &PropagationBudget, mut should_continue: impl FnMut(usize, u32) -> bool) -> Vec<PropagationReport>
    {
        self.meshes.iter_mut().enumerate().map(|(i, mesh)|
        {
            WeightPropagator::propagate(mesh, budget, |iter| should_continue(i, iter))
        }).collect()
    }

    // Returns total vertices removed
    pub fn weld_vertices(&mut self) -> usize
    {
        self.meshes.iter_mut().map(Mesh::weld_vertices).sum()
    }
}
