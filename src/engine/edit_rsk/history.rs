use glam::Vec3;
use skin_rsk::Mesh;
use crate::VertexRef;

// Something edits can move vertices in
pub trait VertexArena
{
    // Returns false if the reference doesn't resolve
    fn translate(&mut self, vertex: VertexRef, delta: Vec3) -> bool;
}
impl VertexArena for [Mesh]
{
    fn translate(&mut self, vertex: VertexRef, delta: Vec3) -> bool
    {
        self.get_mut(vertex.mesh).is_some_and(|m| m.translate_vertex(vertex.vertex, delta))
    }
}

// One reversible edit: a set of vertices moved together by a single offset
#[derive(Debug, Clone, PartialEq)]
pub struct Change
{
    refs: Box<[VertexRef]>,
    offset: Vec3,
    open: bool, // still being dragged
}
impl Change
{
    #[inline] #[must_use] pub fn refs(&self) -> &[VertexRef] { &self.refs }
    #[inline] #[must_use] pub fn offset(&self) -> Vec3 { self.offset }
    #[inline] #[must_use] pub fn is_open(&self) -> bool { self.open }

    fn translate_all<A: VertexArena + ?Sized>(&self, arena: &mut A, delta: Vec3)
    {
        for r in self.refs.iter()
        {
            if !arena.translate(*r, delta)
            {
                log::warn!("Edit references missing vertex {r:?}");
            }
        }
    }
}

// Linear undo/redo history. Everything after the cursor is the redoable future
#[derive(Debug, Default, Clone)]
pub struct ChangeStack
{
    changes: Vec<Change>,
    cursor: Option<usize>, // last applied change, None when everything is undone
}
impl ChangeStack
{
    #[inline] #[must_use] pub fn changes(&self) -> &[Change] { &self.changes }
    #[inline] #[must_use] pub fn len(&self) -> usize { self.changes.len() }
    #[inline] #[must_use] pub fn is_empty(&self) -> bool { self.changes.is_empty() }
    #[inline] #[must_use] pub fn cursor(&self) -> Option<usize> { self.cursor }
    #[inline] #[must_use] pub fn can_undo(&self) -> bool { self.cursor.is_some() }
    #[inline] #[must_use] pub fn can_redo(&self) -> bool { self.next_index() < self.changes.len() }

    #[inline] #[must_use]
    fn next_index(&self) -> usize { self.cursor.map_or(0, |c| c + 1) }

    #[must_use]
    pub fn is_editing(&self) -> bool
    {
        self.current().is_some_and(|c| c.open)
    }

    fn current(&self) -> Option<&Change> { self.cursor.and_then(|c| self.changes.get(c)) }

    fn current_open_mut(&mut self) -> Option<&mut Change>
    {
        self.cursor.and_then(|c| self.changes.get_mut(c)).filter(|c| c.open)
    }

    // Begin a new edit of `refs`, discarding the redoable future. Nothing happens for an empty selection
    pub fn start_change(&mut self, refs: &[VertexRef]) -> bool
    {
        if refs.is_empty()
        {
            return false;
        }
        self.end_change();

        let next = self.next_index();
        if next < self.changes.len()
        {
            log::debug!("Discarding {} redoable changes", self.changes.len() - next);
        }
        self.changes.truncate(next);
        self.changes.push(Change
        {
            refs: refs.into(),
            offset: Vec3::ZERO,
            open: true,
        });
        self.cursor = Some(next);
        true
    }

    // Move the open edit to a new total offset, only the difference from the last offset is applied
    pub fn modify<A: VertexArena + ?Sized>(&mut self, arena: &mut A, offset: Vec3) -> bool
    {
        let Some(change) = self.current_open_mut() else { return false; };
        let delta = offset - change.offset;
        change.translate_all(arena, delta);
        change.offset = offset;
        true
    }

    pub fn end_change(&mut self) -> bool
    {
        let Some(change) = self.current_open_mut() else { return false; };
        change.open = false;
        log::debug!("Recorded change moving {} vertices by {}", change.refs.len(), change.offset);
        true
    }

    pub fn undo<A: VertexArena + ?Sized>(&mut self, arena: &mut A) -> bool
    {
        let Some(cursor) = self.cursor else { return false; };
        self.end_change();

        let change = &self.changes[cursor];
        change.translate_all(arena, -change.offset);
        self.cursor = cursor.checked_sub(1);
        log::debug!("Undid change #{cursor}");
        true
    }

    pub fn redo<A: VertexArena + ?Sized>(&mut self, arena: &mut A) -> bool
    {
        let next = self.next_index();
        let Some(change) = self.changes.get(next) else { return false; };
        change.translate_all(arena, change.offset);
        self.cursor = Some(next);
        log::debug!("Redid change #{next}");
        true
    }

    pub fn clear(&mut self)
    {
        self.changes.clear();
        self.cursor = None;
    }
}
