use std::collections::BTreeSet;
use nab_rsk::debug_panic;
use crate::{BoneId, Mesh, MAX_INFLUENCES};

pub const DEFAULT_DECAY_BASE: f64 = 1.1;
pub const DEFAULT_MAX_ITERATIONS: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropagationBudget
{
    // weight is divided by decay_base^(edge length / mesh diagonal) across each edge. Must be >= 1
    pub decay_base: f64,
    // relaxation passes before giving up, None to run until convergence
    pub max_iterations: Option<u32>,
}
impl Default for PropagationBudget
{
    fn default() -> Self
    {
        Self
        {
            decay_base: DEFAULT_DECAY_BASE,
            max_iterations: Some(DEFAULT_MAX_ITERATIONS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropagationStatus
{
    Converged,
    BudgetExhausted,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropagationReport
{
    pub status: PropagationStatus,
    pub iterations: u32,
    pub candidates_added: usize,
}
impl PropagationReport
{
    #[inline] #[must_use]
    pub fn converged(&self) -> bool { self.status == PropagationStatus::Converged }
}

// Spreads bone influence across mesh edges with exponential distance decay (a max-product
// relaxation, values only ever grow and are bounded by the largest starting weight),
// then registers the strongest spread bones as zero-weight candidates on each vertex
pub struct WeightPropagator
{
    bone_count: usize,
    weights: Box<[f64]>, // vertex-major, vertex_count * bone_count
    edges: Box<[Box<[(u32, f64)]>]>, // per vertex: (neighbour, decay divisor)
    iterations: u32,
    converged: bool,
}
impl WeightPropagator
{
    #[must_use]
    pub fn new(mesh: &Mesh, decay_base: f64) -> Self
    {
        let decay_base = if decay_base >= 1.0 { decay_base } else
        {
            log::warn!("Decay base {decay_base} would grow weights without bound, using {DEFAULT_DECAY_BASE}");
            DEFAULT_DECAY_BASE
        };

        let vertices = mesh.vertices();
        let bone_count = vertices.iter()
            .flat_map(|v| v.influences.iter())
            .map(|i| i.bone.index() + 1)
            .max()
            .unwrap_or(0);

        let mut weights = vec![0.0f64; vertices.len() * bone_count].into_boxed_slice();
        for (v, vertex) in vertices.iter().enumerate()
        {
            for influence in &vertex.influences
            {
                let slot = &mut weights[v * bone_count + influence.bone.index()];
                *slot = slot.max(influence.weight.abs() as f64);
            }
        }

        // f64 throughout, edge lengths are compounded over many hops
        let diagonal = mesh.bounds().size().as_dvec3().length();
        let diagonal = if diagonal > 0.0 { diagonal } else { 1.0 };

        let adjacency = mesh.adjacency();
        let edges = (0..vertices.len()).map(|v|
        {
            adjacency.neighbours(v).iter().map(|&n|
            {
                let distance = vertices[v].position.as_dvec3().distance(vertices[n as usize].position.as_dvec3());
                (n, decay_base.powf(distance / diagonal))
            }).collect()
        }).collect();

        Self
        {
            bone_count,
            weights,
            edges,
            iterations: 0,
            converged: false,
        }
    }

    #[inline] #[must_use] pub fn bone_count(&self) -> usize { self.bone_count }
    #[inline] #[must_use] pub fn iterations(&self) -> u32 { self.iterations }
    #[inline] #[must_use] pub fn is_converged(&self) -> bool { self.converged }

    #[must_use]
    pub fn weight(&self, vertex: usize, bone: BoneId) -> f64
    {
        if bone.index() >= self.bone_count { return 0.0; }
        self.weights.get(vertex * self.bone_count + bone.index()).copied().unwrap_or(0.0)
    }

    // One relaxation pass over every vertex. Returns true if any weight changed
    pub fn step(&mut self) -> bool
    {
        if self.converged
        {
            return false;
        }

        let bones = self.bone_count;
        let mut changed = false;
        for (v, neighbours) in self.edges.iter().enumerate()
        {
            for b in 0..bones
            {
                let weight = self.weights[v * bones + b];
                if weight == 0.0 { continue; }

                for &(n, divisor) in neighbours.iter()
                {
                    let candidate = weight / divisor;
                    let slot = &mut self.weights[n as usize * bones + b];
                    if candidate > *slot
                    {
                        *slot = candidate;
                        changed = true;
                    }
                }
            }
        }

        self.iterations += 1;
        self.converged = !changed;
        changed
    }

    // Relax until convergence, the iteration budget runs out, or `should_continue` (called with
    // the iteration count before each pass) returns false
    pub fn run(&mut self, budget: &PropagationBudget, mut should_continue: impl FnMut(u32) -> bool) -> PropagationStatus
    {
        loop
        {
            if self.converged
            {
                log::debug!("Weight propagation converged after {} iterations", self.iterations);
                return PropagationStatus::Converged;
            }
            if budget.max_iterations.is_some_and(|max| self.iterations >= max)
            {
                log::warn!("Weight propagation stopped after {} iterations without converging", self.iterations);
                return PropagationStatus::BudgetExhausted;
            }
            if !should_continue(self.iterations)
            {
                log::debug!("Weight propagation cancelled after {} iterations", self.iterations);
                return PropagationStatus::Cancelled;
            }
            self.step();
        }
    }

    // Append the strongest propagated bones not already on each vertex as zero-weight candidates,
    // up to MAX_INFLUENCES. Existing weights are untouched. Returns the number of candidates added
    pub fn finalize(&self, mesh: &mut Mesh) -> usize
    {
        let bones = self.bone_count;
        if mesh.vertex_count() * bones != self.weights.len()
        {
            debug_panic!("Finalizing weights against a different mesh ({} vertices, expected {})",
                mesh.vertex_count(), self.weights.len() / bones.max(1));
            return 0;
        }

        let mut added = 0;
        for (v, vertex) in mesh.vertices_mut().iter_mut().enumerate()
        {
            let row = &self.weights[v * bones..(v + 1) * bones];
            let mut claimed: BTreeSet<usize> = vertex.influences.iter().map(|i| i.bone.index()).collect();

            while vertex.influences.len() < MAX_INFLUENCES
            {
                let mut best: Option<(usize, f64)> = None;
                for (b, &w) in row.iter().enumerate()
                {
                    if w > 0.0 && !claimed.contains(&b) && best.is_none_or(|(_, bw)| w > bw)
                    {
                        best = Some((b, w));
                    }
                }

                let Some((bone, _)) = best else { break; };
                claimed.insert(bone);
                vertex.add_influence(BoneId(bone as u32), 0.0);
                added += 1;
            }
        }

        if added > 0
        {
            mesh.mark_dirty();
        }
        added
    }

    // Propagate and finalize in one go
    pub fn propagate(mesh: &mut Mesh, budget: &PropagationBudget, should_continue: impl FnMut(u32) -> bool) -> PropagationReport
    {
        let mut propagator = Self::new(mesh, budget.decay_base);
        let status = propagator.run(budget, should_continue);
        let candidates_added = propagator.finalize(mesh);
        log::debug!("Mesh '{}': {candidates_added} influence candidates added", mesh.name);

        PropagationReport
        {
            status,
            iterations: propagator.iterations,
            candidates_added,
        }
    }
}
