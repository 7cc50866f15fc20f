use glam::{Mat4, Quat, Vec3};
use math_rsk::Transform;

// Source of a node's local transform at a given time (in ticks)
pub trait NodeSampler
{
    fn sample_local(&self, time: f32) -> Mat4;
}
impl<F: Fn(f32) -> Mat4> NodeSampler for F
{
    fn sample_local(&self, time: f32) -> Mat4 { self(time) }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe<T>
{
    pub time: f32,
    pub value: T,
}
impl<T> Keyframe<T>
{
    #[inline] #[must_use]
    pub const fn new(time: f32, value: T) -> Self { Self { time, value } }
}

// Independent position/rotation/scale channels. Between keys positions and scales are lerped
// and rotations slerped, outside the keyed range the nearest key holds
#[derive(Debug, Default, Clone, PartialEq)]
pub struct KeyframeTrack
{
    positions: Vec<Keyframe<Vec3>>,
    rotations: Vec<Keyframe<Quat>>,
    scales: Vec<Keyframe<Vec3>>,
}
impl KeyframeTrack
{
    #[must_use]
    pub fn new(mut positions: Vec<Keyframe<Vec3>>, mut rotations: Vec<Keyframe<Quat>>, mut scales: Vec<Keyframe<Vec3>>) -> Self
    {
        positions.sort_by(|a, b| a.time.total_cmp(&b.time));
        rotations.sort_by(|a, b| a.time.total_cmp(&b.time));
        scales.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { positions, rotations, scales }
    }

    #[must_use]
    pub fn sample(&self, time: f32) -> Transform
    {
        let identity = Transform::default();
        Transform
        {
            position: sample_keys(&self.positions, time, identity.position, Vec3::lerp),
            rotation: sample_keys(&self.rotations, time, identity.rotation, Quat::slerp),
            scale: sample_keys(&self.scales, time, identity.scale, Vec3::lerp),
        }
    }

    #[must_use]
    pub fn key_count(&self) -> usize
    {
        self.positions.len().max(self.rotations.len()).max(self.scales.len())
    }
}
impl NodeSampler for KeyframeTrack
{
    fn sample_local(&self, time: f32) -> Mat4 { self.sample(time).to_world_mtx() }
}

fn sample_keys<T: Copy>(keys: &[Keyframe<T>], time: f32, default: T, interp: fn(T, T, f32) -> T) -> T
{
    let (Some(first), Some(last)) = (keys.first(), keys.last()) else { return default; };
    if time <= first.time { return first.value; }
    if time >= last.time { return last.value; }

    // first key strictly after `time`, never 0 or len here
    let next = keys.partition_point(|k| k.time <= time);
    let (from, to) = (&keys[next - 1], &keys[next]);
    let rel = (time - from.time) / (to.time - from.time);
    interp(from.value, to.value, rel)
}
