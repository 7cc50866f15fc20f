use glam::{Mat4, Vec2, Vec3, Vec4};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray
{
    pub origin: Vec3,
    pub direction: Vec3,
}
impl Ray
{
    // assumes normalized direction
    #[inline] #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Self { Self { origin, direction } }

    #[inline] #[must_use]
    pub fn at(&self, t: f32) -> Vec3 { self.origin + self.direction * t }

    // Unproject a cursor position into a world-space ray.
    // The cursor is in pixels with the origin at the top-left of the viewport.
    // `clip_from_world` is (projection * view * model); the near point (NDC z=0) becomes the ray origin.
    // Returns None for an empty viewport or a non-invertible matrix
    #[must_use]
    pub fn from_screen(cursor: Vec2, viewport: Vec2, clip_from_world: Mat4) -> Option<Self>
    {
        if viewport.x <= 0.0 || viewport.y <= 0.0
        {
            return None;
        }

        let mut ndc = (cursor / viewport) * 2.0 - Vec2::ONE;
        ndc.y = -ndc.y; // screen +y is down

        let world_from_clip = clip_from_world.inverse();
        let near = unproject(world_from_clip, ndc.extend(0.0))?;
        let far = unproject(world_from_clip, ndc.extend(1.0))?;

        let direction = (far - near).try_normalize()?;
        Some(Self::new(near, direction))
    }
}

fn unproject(world_from_clip: Mat4, ndc: Vec3) -> Option<Vec3>
{
    let p = world_from_clip * Vec4::new(ndc.x, ndc.y, ndc.z, 1.0);
    if p.w == 0.0 || !p.is_finite()
    {
        return None;
    }
    Some(p.truncate() / p.w)
}
