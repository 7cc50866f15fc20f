use std::collections::HashMap;
use glam::Mat4;
use crate::{BoneId, ModelLoadError};

pub const MAX_BONES: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneInfo
{
    pub id: BoneId,
    pub offset: Mat4, // mesh space -> bone space (inverse bind pose)
}

// Bones by name. Ids are handed out in registration order and never reused
#[derive(Debug, Default, Clone)]
pub struct BoneRegistry
{
    bones: HashMap<String, BoneInfo>,
    next_id: u32,
}
impl BoneRegistry
{
    #[inline] #[must_use]
    pub fn new() -> Self { Self::default() }

    // Returns the existing bone if the name is already registered (the new offset is ignored)
    pub fn register(&mut self, name: &str, offset: Mat4) -> Result<BoneInfo, ModelLoadError>
    {
        if let Some(existing) = self.bones.get(name)
        {
            return Ok(*existing);
        }
        if self.bones.len() >= MAX_BONES
        {
            return Err(ModelLoadError::TooManyBones);
        }

        let info = BoneInfo { id: BoneId(self.next_id), offset };
        self.next_id += 1;
        self.bones.insert(name.to_string(), info);
        Ok(info)
    }

    #[inline] #[must_use]
    pub fn get(&self, name: &str) -> Option<&BoneInfo> { self.bones.get(name) }

    #[inline] #[must_use]
    pub fn contains_id(&self, id: BoneId) -> bool { id.0 < self.next_id }

    #[inline] #[must_use] pub fn len(&self) -> usize { self.bones.len() }
    #[inline] #[must_use] pub fn is_empty(&self) -> bool { self.bones.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BoneInfo)>
    {
        self.bones.iter().map(|(n, b)| (n.as_str(), b))
    }

    #[must_use]
    pub fn name_of(&self, id: BoneId) -> Option<&str>
    {
        self.iter().find(|(_, b)| b.id == id).map(|(n, _)| n)
    }
}
