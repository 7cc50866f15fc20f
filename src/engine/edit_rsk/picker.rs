use glam::{Mat4, Vec2, Vec3};
use math_rsk::{point_segment_distance, ray_triangle, Ray, DEFAULT_EDGE_TOLERANCE};
use skin_rsk::{Face, Mesh};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit
{
    pub point: Vec3, // model space
    pub face: Face,
    pub face_index: usize,
    pub mesh_index: usize,
    pub distance: f32, // along the pick ray
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Picker
{
    pub edge_tolerance: f32,
}
impl Default for Picker
{
    fn default() -> Self { Self { edge_tolerance: DEFAULT_EDGE_TOLERANCE } }
}
impl Picker
{
    #[inline] #[must_use]
    pub fn new(edge_tolerance: f32) -> Self { Self { edge_tolerance } }

    // Model-space ray under the cursor
    #[inline] #[must_use]
    pub fn cursor_ray(cursor: Vec2, viewport: Vec2, view_projection: Mat4, model: Mat4) -> Option<Ray>
    {
        Ray::from_screen(cursor, viewport, view_projection * model)
    }

    // Front-most face hit by the ray across all enabled meshes.
    // Mesh indices count every mesh passed in, including disabled ones
    #[must_use]
    pub fn pick<'m>(&self, ray: &Ray, meshes: impl IntoIterator<Item = &'m Mesh>) -> Option<PickHit>
    {
        let mut nearest: Option<PickHit> = None;
        for (mesh_index, mesh) in meshes.into_iter().enumerate()
        {
            if !mesh.enabled { continue; }

            let vertices = mesh.vertices();
            for (face_index, face) in mesh.faces().iter().enumerate()
            {
                let [a, b, c] = face.indices.map(|i| vertices[i as usize].position);
                let Some(hit) = ray_triangle(ray, a, b, c, self.edge_tolerance) else { continue; };
                if nearest.is_none_or(|n| hit.distance < n.distance)
                {
                    nearest = Some(PickHit
                    {
                        point: hit.point,
                        face: *face,
                        face_index,
                        mesh_index,
                        distance: hit.distance,
                    });
                }
            }
        }
        nearest
    }

    #[must_use]
    pub fn pick_at<'m>(&self, cursor: Vec2, viewport: Vec2, view_projection: Mat4, model: Mat4, meshes: impl IntoIterator<Item = &'m Mesh>) -> Option<PickHit>
    {
        let ray = Self::cursor_ray(cursor, viewport, view_projection, model)?;
        self.pick(&ray, meshes)
    }
}

// Vertex of `face` nearest to `point`, first wins on ties
#[must_use]
pub fn closest_vertex(mesh: &Mesh, face: &Face, point: Vec3) -> u32
{
    let vertices = mesh.vertices();
    let mut best = face.indices[0];
    let mut best_dist = f32::INFINITY;
    for &i in &face.indices
    {
        let dist = vertices[i as usize].position.distance_squared(point);
        if dist < best_dist
        {
            best = i;
            best_dist = dist;
        }
    }
    best
}

// Edge of `face` nearest to `point`
#[must_use]
pub fn closest_edge(mesh: &Mesh, face: &Face, point: Vec3) -> (u32, u32)
{
    let vertices = mesh.vertices();
    let mut best = face.edges()[0];
    let mut best_dist = f32::INFINITY;
    for (a, b) in face.edges()
    {
        let dist = point_segment_distance(vertices[a as usize].position, vertices[b as usize].position, point);
        if dist < best_dist
        {
            best = (a, b);
            best_dist = dist;
        }
    }
    best
}
