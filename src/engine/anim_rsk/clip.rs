use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use skin_rsk::{BoneInfo, BoneRegistry};
use crate::{NodeSampler, SkeletonNode};

#[derive(Debug)]
pub enum ClipLoadError
{
    InvalidBoneReference { clip: String, track: String },
    InvalidTrimRange { start_from: f32, end_at: f32, duration: f32 },
    InvalidTickRate(f32),
}
impl Display for ClipLoadError
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { Debug::fmt(self, f) }
}
impl Error for ClipLoadError { }

// Animation data as handed over by an importer
pub struct ClipImport
{
    pub name: String,
    pub duration: f32, // ticks
    pub ticks_per_second: f32,
    pub trim: Option<(f32, f32)>, // [start_from, end_at] in ticks, the full clip if None
    pub root: SkeletonNode,
    pub tracks: Vec<(String, Box<dyn NodeSampler>)>, // node name -> sampler
}

pub struct AnimationClip
{
    name: String,
    duration: f32,
    ticks_per_second: f32,
    start_from: f32,
    end_at: f32,
    root: SkeletonNode,
    bones: BoneRegistry,
    samplers: HashMap<String, Box<dyn NodeSampler>>,
}
impl AnimationClip
{
    // Every track must animate a bone the model knows about
    pub fn load(import: ClipImport, bones: &BoneRegistry) -> Result<Self, ClipLoadError>
    {
        if !(import.ticks_per_second > 0.0 && import.ticks_per_second.is_finite())
        {
            return Err(ClipLoadError::InvalidTickRate(import.ticks_per_second));
        }

        let (start_from, end_at) = import.trim.unwrap_or((0.0, import.duration));
        if !(0.0 <= start_from && start_from <= end_at && end_at <= import.duration && end_at > 0.0)
        {
            return Err(ClipLoadError::InvalidTrimRange { start_from, end_at, duration: import.duration });
        }

        let mut samplers = HashMap::with_capacity(import.tracks.len());
        for (track, sampler) in import.tracks
        {
            if bones.get(&track).is_none()
            {
                return Err(ClipLoadError::InvalidBoneReference { clip: import.name, track });
            }
            if import.root.find(&track).is_none()
            {
                log::warn!("Clip '{}' animates '{track}', which is not in its skeleton and will never be sampled", import.name);
            }
            samplers.insert(track, sampler);
        }

        // nodes without a bone only carry transforms down to their children
        let mut helper_nodes = 0;
        import.root.visit(&mut |node| if bones.get(&node.name).is_none() { helper_nodes += 1; });

        log::info!("Loaded clip '{}': {} ticks @ {}/s, {} tracks, {} nodes ({helper_nodes} without a bone)",
            import.name, import.duration, import.ticks_per_second, samplers.len(), import.root.node_count());

        Ok(Self
        {
            name: import.name,
            duration: import.duration,
            ticks_per_second: import.ticks_per_second,
            start_from,
            end_at,
            root: import.root,
            bones: bones.clone(),
            samplers,
        })
    }

    #[inline] #[must_use] pub fn name(&self) -> &str { &self.name }
    #[inline] #[must_use] pub fn duration(&self) -> f32 { self.duration }
    #[inline] #[must_use] pub fn ticks_per_second(&self) -> f32 { self.ticks_per_second }
    #[inline] #[must_use] pub fn start_from(&self) -> f32 { self.start_from }
    #[inline] #[must_use] pub fn end_at(&self) -> f32 { self.end_at }
    #[inline] #[must_use] pub fn root(&self) -> &SkeletonNode { &self.root }

    // Length of the full clip in seconds
    #[inline] #[must_use]
    pub fn duration_secs(&self) -> f32 { self.duration / self.ticks_per_second }

    #[inline] #[must_use]
    pub fn bone(&self, name: &str) -> Option<&BoneInfo> { self.bones.get(name) }

    #[inline] #[must_use]
    pub fn sampler(&self, name: &str) -> Option<&dyn NodeSampler>
    {
        self.samplers.get(name).map(|s| s.as_ref())
    }
}
