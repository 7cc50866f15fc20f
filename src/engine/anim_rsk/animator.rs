use glam::Mat4;
use nab_rsk::debug_panic;
use nab_rsk::timing::FSeconds;
use skin_rsk::MAX_BONES;
use crate::{AnimationClip, SkeletonNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState
{
    Idle,
    Playing,
}

// Playlist of clips plus the playhead of the active one. Produces the per-bone skinning matrices
pub struct Animator
{
    clips: Vec<AnimationClip>,
    current: Option<usize>,
    state: PlaybackState,
    current_time: f32, // ticks
    speed: f32,
    final_matrices: [Mat4; MAX_BONES],
}
impl Default for Animator
{
    fn default() -> Self { Self::new() }
}
impl Animator
{
    #[must_use]
    pub fn new() -> Self
    {
        Self
        {
            clips: Vec::new(),
            current: None,
            state: PlaybackState::Idle,
            current_time: 0.0,
            speed: 1.0,
            final_matrices: [Mat4::IDENTITY; MAX_BONES],
        }
    }

    #[inline] #[must_use] pub fn state(&self) -> PlaybackState { self.state }
    #[inline] #[must_use] pub fn is_playing(&self) -> bool { self.state == PlaybackState::Playing }
    #[inline] #[must_use] pub fn current_time(&self) -> f32 { self.current_time }
    #[inline] #[must_use] pub fn speed(&self) -> f32 { self.speed }
    #[inline] #[must_use] pub fn clips(&self) -> &[AnimationClip] { &self.clips }
    #[inline] #[must_use] pub fn current_index(&self) -> Option<usize> { self.current }
    #[inline] #[must_use] pub fn final_matrices(&self) -> &[Mat4; MAX_BONES] { &self.final_matrices }

    #[must_use]
    pub fn current_clip(&self) -> Option<&AnimationClip>
    {
        self.current.and_then(|i| self.clips.get(i))
    }

    pub fn clip_names(&self) -> impl Iterator<Item = &str> { self.clips.iter().map(AnimationClip::name) }

    // seconds
    pub fn clip_durations(&self) -> impl Iterator<Item = FSeconds> + '_
    {
        self.clips.iter().map(|c| FSeconds(c.duration_secs()))
    }

    // Appends a clip and makes it the active one. Does not change the playback state
    pub fn add_clip(&mut self, clip: AnimationClip) -> usize
    {
        self.clips.push(clip);
        let index = self.clips.len() - 1;
        self.switch_to(index);
        index
    }

    // Index wraps around the playlist in both directions. Returns false if there are no clips
    pub fn play_index(&mut self, index: isize) -> bool
    {
        if self.clips.is_empty()
        {
            return false;
        }
        let wrapped = index.rem_euclid(self.clips.len() as isize) as usize;
        self.switch_to(wrapped);
        self.state = PlaybackState::Playing;
        true
    }

    pub fn next(&mut self) -> bool
    {
        let index = self.current.map_or(0, |i| i as isize + 1);
        self.play_index(index)
    }

    pub fn previous(&mut self) -> bool
    {
        let index = self.current.map_or(0, |i| i as isize - 1);
        self.play_index(index)
    }

    pub fn play(&mut self)
    {
        if self.current.is_some()
        {
            self.state = PlaybackState::Playing;
        }
    }

    pub fn pause(&mut self) { self.state = PlaybackState::Idle; }

    pub fn toggle(&mut self)
    {
        match self.state
        {
            PlaybackState::Idle => self.play(),
            PlaybackState::Playing => self.pause(),
        }
    }

    pub fn set_speed(&mut self, speed: f32)
    {
        if !speed.is_finite()
        {
            log::warn!("Ignoring non-finite playback speed {speed}");
            return;
        }
        self.speed = speed;
    }

    // Jump to a time (ticks), clamped into the trimmed range of the active clip
    pub fn seek(&mut self, time: f32)
    {
        let Some(clip) = self.current_clip() else { return; };
        self.current_time = time.clamp(clip.start_from(), clip.end_at());
        self.evaluate();
    }

    // Advances the playhead while playing, wrapping at the end of the clip, then re-poses
    pub fn update(&mut self, delta_time: FSeconds)
    {
        if self.state != PlaybackState::Playing
        {
            return;
        }
        let Some(clip) = self.current_clip() else { return; };

        let advanced = self.current_time + clip.ticks_per_second() * delta_time.0 * self.speed;
        // wrapping happens at end_at, a non-zero start_from snaps forward afterward
        self.current_time = (advanced % clip.end_at()).clamp(clip.start_from(), clip.end_at());
        self.evaluate();
    }

    // Recompute the final matrices for the current time
    pub fn evaluate(&mut self)
    {
        let Some(clip) = self.current.and_then(|i| self.clips.get(i)) else { return; };
        evaluate_node(clip, clip.root(), Mat4::IDENTITY, self.current_time, &mut self.final_matrices);
    }

    fn switch_to(&mut self, index: usize)
    {
        self.current = Some(index);
        self.current_time = 0.0;
        self.final_matrices = [Mat4::IDENTITY; MAX_BONES];
        self.evaluate();

        if let Some(clip) = self.current_clip()
        {
            log::debug!("Active clip is now #{index} '{}'", clip.name());
        }
    }
}

fn evaluate_node(clip: &AnimationClip, node: &SkeletonNode, parent: Mat4, time: f32, out: &mut [Mat4; MAX_BONES])
{
    let local = clip.sampler(&node.name).map_or(node.transform, |s| s.sample_local(time));
    let global = parent * local;

    if let Some(bone) = clip.bone(&node.name)
    {
        match out.get_mut(bone.id.index())
        {
            Some(slot) => *slot = global * bone.offset,
            None => debug_panic!("Bone '{}' has id {} past the final matrices", node.name, bone.id.0),
        }
    }

    for child in &node.children
    {
        evaluate_node(clip, child, global, time, out);
    }
}
