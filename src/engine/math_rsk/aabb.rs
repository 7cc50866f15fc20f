use glam::Vec3;

#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct AABB
{
    pub min: Vec3,
    pub max: Vec3,
}
impl AABB
{
    pub const MAX_MIN: Self = Self { min: Vec3::MAX, max: Vec3::MIN }; // for finding min volume

    #[inline] #[must_use] pub const fn new(min: Vec3, max: Vec3) -> Self { Self { min, max } }
    #[inline] #[must_use] pub const fn empty() -> Self { Self { min: Vec3::ZERO, max: Vec3::ZERO } }

    // Smallest box containing all points, or None if there are no points
    #[must_use]
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self>
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut aabb = Self::new(first, first);
        for p in iter
        {
            aabb.include_point(p);
        }
        Some(aabb)
    }

    #[inline] #[must_use] pub fn size(self) -> Vec3 { self.max - self.min }
    #[inline] #[must_use] pub fn center(self) -> Vec3 { (self.min + self.max) / 2.0 }

    // Length of the min->max diagonal
    #[inline] #[must_use] pub fn diagonal_length(self) -> f32 { self.size().length() }

    #[inline]
    pub fn include_point(&mut self, point: Vec3)
    {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    #[inline]
    pub fn union_with(&mut self, other: Self)
    {
        *self = self.unioned_with(other);
    }

    #[inline] #[must_use]
    pub fn unioned_with(self, rhs: Self) -> Self
    {
        Self
        {
            min: self.min.min(rhs.min),
            max: self.max.max(rhs.max),
        }
    }

    #[must_use]
    pub fn contains_point(self, point: Vec3) -> bool
    {
        self.min.cmple(point).all() &&
        self.max.cmpge(point).all()
    }
}
