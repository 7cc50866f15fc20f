use glam::Vec3;
use crate::Ray;

// Default threshold for the edge side test. The side test compares a normalized quantity
// against this threshold rather than testing for a strict sign change
pub const DEFAULT_EDGE_TOLERANCE: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit
{
    pub point: Vec3,
    pub distance: f32, // ray parameter, always > 0
}

// Intersect a ray with the triangle (a, b, c).
// The hit point is classified as outside when, for any edge, the normalized cross of the edge
// and (point - edge start) points away from the face normal by more than `edge_tolerance`.
// Points exactly on an edge produce a zero cross product and are treated as inside
#[must_use]
pub fn ray_triangle(ray: &Ray, a: Vec3, b: Vec3, c: Vec3, edge_tolerance: f32) -> Option<TriangleHit>
{
    let e_ab = (b - a).try_normalize()?;
    let e_bc = (c - b).try_normalize()?;
    let e_ca = (a - c).try_normalize()?;
    let normal = e_ab.cross(e_bc).try_normalize()?;

    let normal_dot_dir = normal.dot(ray.direction);
    if normal_dot_dir == 0.0 // parallel
    {
        return None;
    }

    // plane: dot(n, p) + d = 0
    let d = -normal.dot(a);
    let t = -(normal.dot(ray.origin) + d) / normal_dot_dir;
    if !(t > 0.0)
    {
        return None;
    }

    let point = ray.at(t);
    for (edge, start) in [(e_ab, a), (e_bc, b), (e_ca, c)]
    {
        let side = edge.cross(point - start).normalize().dot(normal);
        if side < edge_tolerance
        {
            return None;
        }
    }

    Some(TriangleHit { point, distance: t })
}

#[cfg(test)]
mod tests
{
    use approx::assert_relative_eq;
    use super::*;

    const A: Vec3 = Vec3::new(-1.0, -1.0, 0.0);
    const B: Vec3 = Vec3::new(1.0, -1.0, 0.0);
    const C: Vec3 = Vec3::new(0.0, 1.0, 0.0);

    fn down_z(x: f32, y: f32) -> Ray { Ray::new(Vec3::new(x, y, 5.0), Vec3::NEG_Z) }

    #[test]
    fn hits_center()
    {
        let hit = ray_triangle(&down_z(0.0, 0.0), A, B, C, DEFAULT_EDGE_TOLERANCE).unwrap();
        assert_relative_eq!(hit.distance, 5.0);
        assert_relative_eq!(hit.point, Vec3::ZERO);
    }

    #[test]
    fn winding_does_not_matter()
    {
        let hit = ray_triangle(&down_z(0.1, -0.2), A, C, B, DEFAULT_EDGE_TOLERANCE).unwrap();
        assert_relative_eq!(hit.distance, 5.0);
    }

    #[test]
    fn misses_outside()
    {
        assert_eq!(ray_triangle(&down_z(2.0, 0.0), A, B, C, DEFAULT_EDGE_TOLERANCE), None);
        assert_eq!(ray_triangle(&down_z(0.0, -1.5), A, B, C, DEFAULT_EDGE_TOLERANCE), None);
    }

    #[test]
    fn behind_origin()
    {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert_eq!(ray_triangle(&ray, A, B, C, DEFAULT_EDGE_TOLERANCE), None);
    }

    #[test]
    fn parallel()
    {
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
        assert_eq!(ray_triangle(&ray, A, B, C, DEFAULT_EDGE_TOLERANCE), None);
    }

    #[test]
    fn degenerate_triangle()
    {
        assert_eq!(ray_triangle(&down_z(0.0, 0.0), A, A, C, DEFAULT_EDGE_TOLERANCE), None);
        assert_eq!(ray_triangle(&down_z(0.0, 0.0), A, B, (A + B) / 2.0, DEFAULT_EDGE_TOLERANCE), None);
    }

    #[test]
    fn vertex_counts_as_inside()
    {
        let hit = ray_triangle(&down_z(C.x, C.y), A, B, C, DEFAULT_EDGE_TOLERANCE).unwrap();
        assert_relative_eq!(hit.point, C);
    }
}
