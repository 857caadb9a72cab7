use derive_more::{Add, AddAssign, Neg, Sub, SubAssign};
use std::ops;

/// 2D vector with f32 coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Add, Sub, Neg, AddAssign, SubAssign)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    /// Create a new vector
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Create a zero vector
    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Euclidean norm
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Squared euclidean norm
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }
}

/// 2D point with f32 coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Create a new point
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Squared euclidean distance to `other`
    pub fn distance_squared(self, other: Self) -> f32 {
        (self - other).length_squared()
    }

    /// Euclidean distance to `other`
    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }

    /// Clamp each coordinate into `[min, max]` of the matching axis.
    ///
    /// Callers must ensure `min <= max` on both axes.
    pub fn clamp(self, min: Point, max: Point) -> Self {
        Self {
            x: self.x.clamp(min.x, max.x),
            y: self.y.clamp(min.y, max.y),
        }
    }

    /// Whether both coordinates are finite
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl ops::Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, s: f32) -> Vec2 {
        Vec2::new(self.x * s, self.y * s)
    }
}

impl ops::Div<f32> for Vec2 {
    type Output = Vec2;

    fn div(self, s: f32) -> Vec2 {
        Vec2::new(self.x / s, self.y / s)
    }
}

impl ops::Sub for Point {
    type Output = Vec2;

    fn sub(self, other: Point) -> Vec2 {
        Vec2::new(self.x - other.x, self.y - other.y)
    }
}

impl ops::Add<Vec2> for Point {
    type Output = Point;

    fn add(self, v: Vec2) -> Point {
        Point::new(self.x + v.x, self.y + v.y)
    }
}

impl ops::AddAssign<Vec2> for Point {
    fn add_assign(&mut self, v: Vec2) {
        self.x += v.x;
        self.y += v.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn point_difference_is_a_vector() {
        let a = Point::new(4.0, 6.0);
        let b = Point::new(1.0, 2.0);
        let d = a - b;
        assert_eq!(d, Vec2::new(3.0, 4.0));
        assert_eq!(d.length(), 5.0);
        assert_eq!(a.distance_squared(b), 25.0);
        assert_eq!(b + d, a);
    }

    #[test]
    fn vector_arithmetic() {
        let mut v = Vec2::new(1.0, -2.0) * 3.0;
        assert_eq!(v, Vec2::new(3.0, -6.0));
        v -= Vec2::new(1.0, 1.0);
        assert_eq!(v, Vec2::new(2.0, -7.0));
        assert_eq!(v / 2.0, Vec2::new(1.0, -3.5));
        assert_eq!(-v, Vec2::new(-2.0, 7.0));
    }

    #[test]
    fn clamp_per_axis() {
        let p = Point::new(-3.0, 50.0).clamp(Point::new(5.0, 30.0), Point::new(95.0, 70.0));
        assert_eq!(p, Point::new(5.0, 50.0));
        let p = Point::new(120.0, 90.0).clamp(Point::new(5.0, 30.0), Point::new(95.0, 70.0));
        assert_eq!(p, Point::new(95.0, 70.0));
    }
}
