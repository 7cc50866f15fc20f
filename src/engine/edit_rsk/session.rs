use glam::{Mat4, Vec2, Vec3};
use anim_rsk::{AnimationClip, Animator, ClipImport, ClipLoadError};
use nab_rsk::timing::FSeconds;
use skin_rsk::{BakedModel, Mesh, Model, SkinningBaker, MAX_BONES};
use crate::{closest_vertex, ChangeStack, EditorConfig, PickHit, Picker, Selection, SelectionMode, VertexArena, VertexRef};

// Edits land on the baked snapshot and are mirrored back into the animated mesh's bind space
// through the inverse of each vertex's blend matrix
pub struct SnapshotTarget<'s>
{
    baked: &'s mut BakedModel,
    animated: &'s mut [Mesh],
}
impl<'s> SnapshotTarget<'s>
{
    #[inline] #[must_use]
    pub fn new(baked: &'s mut BakedModel, animated: &'s mut [Mesh]) -> Self { Self { baked, animated } }
}
impl VertexArena for SnapshotTarget<'_>
{
    fn translate(&mut self, vertex: VertexRef, delta: Vec3) -> bool
    {
        let Some(baked) = self.baked.meshes_mut().get_mut(vertex.mesh) else { return false; };
        if !baked.mesh.translate_vertex(vertex.vertex, delta)
        {
            return false;
        }

        let Some(animated) = self.animated.get_mut(vertex.mesh) else { return true; };
        let to_bind = baked.blends[vertex.vertex].inverse();
        if !to_bind.is_finite()
        {
            log::warn!("Vertex {vertex:?} has a singular blend matrix, edit not mirrored to the animated mesh");
            return true;
        }
        animated.translate_vertex(vertex.vertex, to_bind.transform_vector3(delta));
        true
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DirtyMeshes
{
    pub animated: Vec<usize>,
    pub baked: Vec<usize>,
}
impl DirtyMeshes
{
    #[inline] #[must_use]
    pub fn is_empty(&self) -> bool { self.animated.is_empty() && self.baked.is_empty() }
}

#[derive(Debug, Clone, Copy)]
struct DragStart
{
    point: Vec3,
    distance: f32,
}

// Everything the editor front-end drives each frame: playback, baking, picking, selection, and undoable edits
pub struct EditSession
{
    config: EditorConfig,
    model: Model,
    model_matrix: Mat4,
    animator: Animator,
    picker: Picker,
    baked: Option<BakedModel>,
    selection: Selection,
    hover: Option<PickHit>,
    history: ChangeStack,
    drag: Option<DragStart>,
    paused: bool,
}
impl EditSession
{
    #[must_use]
    pub fn new(model: Model, config: EditorConfig) -> Self
    {
        let mut animator = Animator::new();
        animator.set_speed(config.playback.speed);
        Self
        {
            picker: Picker::new(config.picking.edge_tolerance),
            config,
            model,
            model_matrix: Mat4::IDENTITY,
            animator,
            baked: None,
            selection: Selection::default(),
            hover: None,
            history: ChangeStack::default(),
            drag: None,
            paused: false,
        }
    }

    #[inline] #[must_use] pub fn config(&self) -> &EditorConfig { &self.config }
    #[inline] #[must_use] pub fn model(&self) -> &Model { &self.model }
    #[inline] #[must_use] pub fn animator(&self) -> &Animator { &self.animator }
    #[inline] #[must_use] pub fn baked(&self) -> Option<&BakedModel> { self.baked.as_ref() }
    #[inline] #[must_use] pub fn selection(&self) -> &Selection { &self.selection }
    #[inline] #[must_use] pub fn hover_hit(&self) -> Option<PickHit> { self.hover }
    #[inline] #[must_use] pub fn history(&self) -> &ChangeStack { &self.history }
    #[inline] #[must_use] pub fn is_paused(&self) -> bool { self.paused }
    #[inline] #[must_use] pub fn is_baked(&self) -> bool { self.baked.is_some() }
    #[inline] #[must_use] pub fn is_dragging(&self) -> bool { self.drag.is_some() }

    // For skinning the animated mesh on the GPU
    #[inline] #[must_use]
    pub fn final_matrices(&self) -> &[Mat4; MAX_BONES] { self.animator.final_matrices() }

    // World placement of the model, picking happens in model space
    pub fn set_model_matrix(&mut self, model_matrix: Mat4) { self.model_matrix = model_matrix; }

    // Playback

    pub fn load_clip(&mut self, import: ClipImport) -> Result<usize, ClipLoadError>
    {
        let clip = AnimationClip::load(import, self.model.bones())?;
        Ok(self.add_clip(clip))
    }

    pub fn add_clip(&mut self, clip: AnimationClip) -> usize
    {
        let index = self.animator.add_clip(clip);
        if self.config.playback.autoplay
        {
            self.animator.play();
        }
        index
    }

    pub fn play_index(&mut self, index: isize) -> bool { self.animator.play_index(index) }
    pub fn next_clip(&mut self) -> bool { self.animator.next() }
    pub fn previous_clip(&mut self) -> bool { self.animator.previous() }
    pub fn seek(&mut self, time: f32) { self.animator.seek(time); }
    pub fn set_speed(&mut self, speed: f32) { self.animator.set_speed(speed); }

    pub fn update(&mut self, delta_time: FSeconds)
    {
        if !self.paused
        {
            self.animator.update(delta_time);
        }
    }

    // Resuming drops the baked snapshot. Returns whether the session is now paused
    pub fn toggle_pause(&mut self) -> bool
    {
        self.paused = !self.paused;
        if !self.paused
        {
            self.unbake();
        }
        self.paused
    }

    // Baking

    fn snapshot(&self) -> BakedModel
    {
        SkinningBaker::new(self.animator.final_matrices(), self.config.baking.direction_blend).bake_model(&self.model)
    }

    // Freeze the current pose into an editable snapshot. Pauses playback and starts a fresh history
    pub fn bake(&mut self)
    {
        self.paused = true;
        let mut baked = self.snapshot();
        self.selection.sync_flags(baked.meshes_mut().iter_mut().map(|b| &mut b.mesh));
        self.baked = Some(baked);
        self.hover = None;
        self.drag = None;
        self.history.clear();
    }

    pub fn unbake(&mut self)
    {
        if self.baked.take().is_some()
        {
            log::debug!("Dropped baked snapshot");
        }
        self.hover = None;
        self.drag = None;
        self.selection.clear();
        self.history.clear();
    }

    // Picking & selection

    // Updates the hovered face. Only the baked snapshot can be picked
    pub fn hover(&mut self, cursor: Vec2, viewport: Vec2, view_projection: Mat4) -> Option<PickHit>
    {
        self.hover = self.baked.as_ref().and_then(|baked|
            self.picker.pick_at(cursor, viewport, view_projection, self.model_matrix, baked.iter_meshes()));
        self.hover
    }

    pub fn select_hovered(&mut self, mode: SelectionMode) -> bool
    {
        let (Some(hit), Some(baked)) = (self.hover, self.baked.as_mut()) else { return false; };
        let Some(mesh) = baked.meshes().get(hit.mesh_index).map(|b| &b.mesh) else { return false; };

        self.selection.toggle_hit(&hit, mesh, mode);
        self.selection.sync_flags(baked.meshes_mut().iter_mut().map(|b| &mut b.mesh));
        true
    }

    // Model space
    pub fn select_in_radius(&mut self, center: Vec3, radius: f32) -> usize
    {
        let Some(baked) = self.baked.as_mut() else { return 0; };
        let added = self.selection.select_in_radius(baked.iter_meshes(), center, radius);
        self.selection.sync_flags(baked.meshes_mut().iter_mut().map(|b| &mut b.mesh));
        added
    }

    pub fn clear_selection(&mut self)
    {
        self.selection.clear();
        if let Some(baked) = self.baked.as_mut()
        {
            self.selection.sync_flags(baked.meshes_mut().iter_mut().map(|b| &mut b.mesh));
        }
    }

    // Camera orbit pivot: the vertex nearest the cursor hit on the current pose, or the origin.
    // Picks against a temporary snapshot when nothing is baked
    #[must_use]
    pub fn pivot_at(&self, cursor: Vec2, viewport: Vec2, view_projection: Mat4) -> Vec3
    {
        let temp;
        let baked = match &self.baked
        {
            Some(b) => b,
            None =>
            {
                temp = self.snapshot();
                &temp
            }
        };

        self.picker.pick_at(cursor, viewport, view_projection, self.model_matrix, baked.iter_meshes())
            .and_then(|hit|
            {
                let mesh = &baked.meshes().get(hit.mesh_index)?.mesh;
                let vertex = closest_vertex(mesh, &hit.face, hit.point);
                mesh.vertices().get(vertex as usize).map(|v| v.position)
            })
            .unwrap_or(Vec3::ZERO)
    }

    // Editing

    // Starts moving the selection, anchored at the hovered point
    pub fn begin_drag(&mut self) -> bool
    {
        let Some(hit) = self.hover else { return false; };
        if self.baked.is_none() || !self.history.start_change(self.selection.refs())
        {
            return false;
        }
        self.drag = Some(DragStart { point: hit.point, distance: hit.distance });
        true
    }

    // Moves the selection so the anchor follows the cursor at its original depth along the pick ray
    pub fn drag(&mut self, cursor: Vec2, viewport: Vec2, view_projection: Mat4) -> bool
    {
        let Some(start) = self.drag else { return false; };
        let Some(ray) = Picker::cursor_ray(cursor, viewport, view_projection, self.model_matrix) else { return false; };
        let offset = ray.at(start.distance) - start.point;
        self.with_target(|history, target| history.modify(target, offset)).unwrap_or(false)
    }

    pub fn end_drag(&mut self) -> bool
    {
        self.drag = None;
        self.history.end_change()
    }

    pub fn undo(&mut self) -> bool
    {
        self.drag = None;
        self.with_target(|history, target| history.undo(target)).unwrap_or(false)
    }

    pub fn redo(&mut self) -> bool
    {
        self.drag = None;
        self.with_target(|history, target| history.redo(target)).unwrap_or(false)
    }

    // Merges coincident vertices of the bind pose. Vertex indices shift, so the snapshot goes with them
    pub fn weld_vertices(&mut self) -> usize
    {
        self.unbake();
        self.model.weld_vertices()
    }

    fn with_target<R>(&mut self, f: impl FnOnce(&mut ChangeStack, &mut SnapshotTarget<'_>) -> R) -> Option<R>
    {
        let baked = self.baked.as_mut()?;
        let mut target = SnapshotTarget::new(baked, self.model.meshes_mut());
        Some(f(&mut self.history, &mut target))
    }

    // Meshes whose vertex data changed since the last call
    pub fn take_dirty(&mut self) -> DirtyMeshes
    {
        let animated = self.model.meshes_mut().iter_mut().enumerate()
            .filter_map(|(i, m)| m.take_dirty().then_some(i))
            .collect();
        let baked = self.baked.as_mut().map_or_else(Vec::new, |b| b.meshes_mut().iter_mut().enumerate()
            .filter_map(|(i, b)| b.mesh.take_dirty().then_some(i))
            .collect());
        DirtyMeshes { animated, baked }
    }
}
