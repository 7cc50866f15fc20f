use glam::{Mat4, Quat, Vec3};

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Transform
{
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}
impl Default for Transform
{
    fn default() -> Self { Self
    {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    }}
}
impl Transform
{
    #[inline] #[must_use]
    pub fn to_world_mtx(&self) -> Mat4 { Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position) }

    // position and scale are lerped, rotation is slerped
    #[must_use]
    pub fn interpolate(&self, to: &Transform, rel: f32) -> Transform
    {
        Self
        {
            position: self.position.lerp(to.position, rel),
            rotation: self.rotation.slerp(to.rotation, rel),
            scale: self.scale.lerp(to.scale, rel),
        }
    }
}

impl From<(Vec3, Quat, Vec3)> for Transform
{
    fn from((position, rotation, scale): (Vec3, Quat, Vec3)) -> Self
    {
        Transform { position, rotation, scale }
    }
}
impl From<Transform> for Mat4
{
    fn from(t: Transform) -> Self { t.to_world_mtx() }
}
impl From<Mat4> for Transform
{
    fn from(m: Mat4) -> Self
    {
        let (scale, rotation, position) = m.to_scale_rotation_translation();
        Transform { position, rotation, scale }
    }
}
