use std::cmp::Ordering;
use std::ops::{Add, AddAssign, Div, Mul, Sub};
use std::time::Duration;

macro_rules! generate_time_primitive
{
    ($name:ident, $type:ty) =>
    {
        #[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
        pub struct $name(pub $type);
        impl Ord for $name
        {
            fn cmp(&self, other: &Self) -> Ordering
            {
                self.0.total_cmp(&other.0)
            }
        }
        impl Eq for $name { }
        impl Add for $name
        {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output { Self(self.0 + rhs.0) }
        }
        impl AddAssign for $name
        {
            fn add_assign(&mut self, rhs: Self) { self.0 += rhs.0; }
        }
        impl Sub for $name
        {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output { Self(self.0 - rhs.0) }
        }
        impl Mul<$type> for $name
        {
            type Output = Self;
            fn mul(self, rhs: $type) -> Self::Output { Self(self.0 * rhs) }
        }
        impl Div for $name
        {
            type Output = $type;
            fn div(self, rhs: Self) -> Self::Output { self.0 / rhs.0 }
        }
    };
}

generate_time_primitive!(FSeconds, f32);
generate_time_primitive!(FMilliseconds, f32);

impl From<FSeconds> for FMilliseconds { fn from(sec: FSeconds) -> Self { Self(sec.0 * 1_000.0) } }
impl From<FMilliseconds> for FSeconds { fn from(ms: FMilliseconds) -> Self { Self(ms.0 / 1_000.0) } }

impl From<FMilliseconds> for Duration { fn from(ms: FMilliseconds) -> Self { Self::from_millis(ms.0 as u64) } }
impl From<FSeconds> for Duration { fn from(sec: FSeconds) -> Self { Self::from_secs_f32(sec.0) } }
impl From<Duration> for FSeconds { fn from(d: Duration) -> Self { Self(d.as_secs_f32()) } }

#[cfg(test)]
mod tests
{
    use approx::assert_relative_eq;
    use super::*;

    #[test]
    fn conversions()
    {
        let ms: FMilliseconds = FSeconds(1.5).into();
        assert_relative_eq!(ms.0, 1500.0);

        let sec: FSeconds = FMilliseconds(250.0).into();
        assert_relative_eq!(sec.0, 0.25);

        let dur: Duration = FSeconds(2.0).into();
        assert_eq!(dur, Duration::from_secs(2));
    }

    #[test]
    fn ordering()
    {
        let mut times = [FSeconds(3.0), FSeconds(-1.0), FSeconds(0.5)];
        times.sort();
        assert_eq!(times, [FSeconds(-1.0), FSeconds(0.5), FSeconds(3.0)]);
    }

    #[test]
    fn arithmetic()
    {
        let mut t = FSeconds(1.0);
        t += FSeconds(0.5);
        assert_eq!(t, FSeconds(1.5));
        assert_eq!(t * 2.0, FSeconds(3.0));
        assert_eq!(FSeconds(3.0) / FSeconds(1.5), 2.0);
        assert_eq!(FSeconds(3.0) - FSeconds(1.0), FSeconds(2.0));
    }
}
