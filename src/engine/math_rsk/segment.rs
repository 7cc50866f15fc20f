use glam::Vec3;

#[must_use]
pub fn closest_point_on_segment(start: Vec3, end: Vec3, point: Vec3) -> Vec3
{
    let seg = end - start;
    let len_sq = seg.length_squared();
    if len_sq == 0.0
    {
        return start;
    }
    let t = ((point - start).dot(seg) / len_sq).clamp(0.0, 1.0);
    start + seg * t
}

#[inline] #[must_use]
pub fn point_segment_distance(start: Vec3, end: Vec3, point: Vec3) -> f32
{
    closest_point_on_segment(start, end, point).distance(point)
}
