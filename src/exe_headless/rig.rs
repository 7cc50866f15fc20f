use glam::{Mat4, Quat, Vec3};
use anim_rsk::{ClipImport, Keyframe, KeyframeTrack, NodeSampler, SkeletonNode};
use skin_rsk::{BoneBinding, Face, MeshImport, ModelImport, Vertex};

pub const COLUMN_WIDTH: f32 = 0.5;
pub const SEGMENT_HEIGHT: f32 = 0.25;

#[inline] #[must_use]
pub fn column_height(segments: u32) -> f32 { segments as f32 * SEGMENT_HEIGHT }

// A flat strip of quads facing +z, two vertices per row. Only the bottom row is bound to "hip"
// and only the top row to "tip", everything in between is left to weight propagation
pub fn column(segments: u32) -> ModelImport
{
    let segments = segments.max(1);
    let rows = segments + 1;

    let mut vertices = Vec::with_capacity(rows as usize * 2);
    for row in 0..rows
    {
        let y = row as f32 * SEGMENT_HEIGHT;
        vertices.push(Vertex::new(Vec3::new(-COLUMN_WIDTH, y, 0.0)).with_normal(Vec3::Z));
        vertices.push(Vertex::new(Vec3::new(COLUMN_WIDTH, y, 0.0)).with_normal(Vec3::Z));
    }

    let mut faces = Vec::with_capacity(segments as usize * 2);
    for segment in 0..segments
    {
        let bl = segment * 2;
        let (br, tl, tr) = (bl + 1, bl + 2, bl + 3);
        faces.push(Face::new(bl, br, tl));
        faces.push(Face::new(br, tr, tl));
    }

    let top = segments * 2;
    let height = column_height(segments);
    let mesh = MeshImport
    {
        name: "column".to_string(),
        vertices,
        faces,
        bones: vec![
            BoneBinding
            {
                name: "hip".to_string(),
                offset: Mat4::IDENTITY,
                weights: vec![(0, 1.0), (1, 1.0)],
            },
            BoneBinding
            {
                name: "tip".to_string(),
                offset: Mat4::from_translation(Vec3::new(0.0, -height / 2.0, 0.0)),
                weights: vec![(top, 1.0), (top + 1, 1.0)],
            },
        ],
    };
    ModelImport { meshes: vec![mesh] }
}

// The tip bone sways around z and back over `duration` ticks
pub fn sway(segments: u32, duration: f32, ticks_per_second: f32, angle: f32) -> ClipImport
{
    let half_height = column_height(segments.max(1)) / 2.0;
    let tip_bind = Vec3::new(0.0, half_height, 0.0);

    let track = KeyframeTrack::new(
        vec![Keyframe::new(0.0, tip_bind)],
        vec![
            Keyframe::new(0.0, Quat::IDENTITY),
            Keyframe::new(duration / 2.0, Quat::from_rotation_z(angle)),
            Keyframe::new(duration, Quat::IDENTITY),
        ],
        vec![Keyframe::new(0.0, Vec3::ONE)]);
    log::debug!("Sway track: {} keys over {duration} ticks", track.key_count());
    let track: Box<dyn NodeSampler> = Box::new(track);

    let root = SkeletonNode::new("hip", Mat4::IDENTITY)
        .with_child(SkeletonNode::new("tip", Mat4::from_translation(tip_bind)));

    ClipImport
    {
        name: "sway".to_string(),
        duration,
        ticks_per_second,
        trim: None,
        root,
        tracks: vec![("tip".to_string(), track)],
    }
}
