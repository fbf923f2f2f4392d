//! Axis-Aligned Bounding Boxes
//!
//! For optimizing computations

use crate::{Point, Ray};

/// Axis-Aligned Bounding Box
///
/// A data structure to bound many objects to speed up computations
#[derive(Debug, Clone, PartialEq)]
pub struct Aabb {
    pub min: Point,
    pub max: Point,
}
impl Aabb {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Whether the box is hit by a ray between the parametric range
    ///
    /// A zero direction component yields an infinite inverse, which leaves that axis
    /// unconstrained while the origin is inside the slab and rejects it otherwise.
    pub fn hit(&self, r: &Ray, mut t_min: f64, mut t_max: f64) -> bool {
        for a in 0..3 {
            let inv_d = 1.0 / r.dir[a];
            let mut t0 = (self.min[a] - r.orig[a]) * inv_d;
            let mut t1 = (self.max[a] - r.orig[a]) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = if t0 > t_min { t0 } else { t_min };
            t_max = if t1 < t_max { t1 } else { t_max };
            if t_max <= t_min {
                return false;
            }
        }
        true
    }

    /// Compute the surrounding AABB between this and another
    pub fn surrounding_box(&self, other: &Aabb) -> Aabb {
        Aabb::new(self.min.inf(&other.min), self.max.sup(&other.max))
    }

    /// Whether `other` lies entirely inside this box
    pub fn contains(&self, other: &Aabb) -> bool {
        (0..3).all(|a| self.min[a] <= other.min[a] && other.max[a] <= self.max[a])
    }

    /// The eight corners of the box
    pub fn corners(&self) -> [Point; 8] {
        let mut corners = [Point::zeros(); 8];
        for (n, corner) in corners.iter_mut().enumerate() {
            let pick = |bit: usize, a: usize| {
                if n & bit != 0 {
                    self.max[a]
                } else {
                    self.min[a]
                }
            };
            *corner = Point::new(pick(4, 0), pick(2, 1), pick(1, 2));
        }
        corners
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vec3;

    fn sample_boxes() -> Vec<Aabb> {
        vec![
            Aabb::new(Point::new(0.0, 0.0, 0.0), Point::new(1.0, 1.0, 1.0)),
            Aabb::new(Point::new(-2.0, 0.5, 3.0), Point::new(-1.0, 4.0, 3.0)),
            Aabb::new(Point::new(0.25, -7.0, -1.0), Point::new(5.0, -6.0, 2.0)),
        ]
    }

    #[test]
    fn surrounding_box_is_componentwise() {
        let boxes = sample_boxes();
        for a in &boxes {
            for b in &boxes {
                let s = a.surrounding_box(b);
                for axis in 0..3 {
                    assert_eq!(s.min[axis], a.min[axis].min(b.min[axis]));
                    assert_eq!(s.max[axis], a.max[axis].max(b.max[axis]));
                }
                assert!(s.contains(a) && s.contains(b));
            }
        }
    }

    #[test]
    fn surrounding_box_commutes_and_is_idempotent() {
        let boxes = sample_boxes();
        for a in &boxes {
            assert_eq!(a.surrounding_box(a), *a);
            for b in &boxes {
                assert_eq!(a.surrounding_box(b), b.surrounding_box(a));
                for c in &boxes {
                    assert_eq!(
                        a.surrounding_box(b).surrounding_box(c),
                        a.surrounding_box(&b.surrounding_box(c))
                    );
                }
            }
        }
    }

    #[test]
    fn slab_test() {
        let bbox = Aabb::new(Point::new(-1.0, -1.0, -1.0), Point::new(1.0, 1.0, 1.0));
        let toward = Ray::new(Point::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert!(bbox.hit(&toward, 0.001, f64::INFINITY));
        // Box is behind the allowed range
        assert!(!bbox.hit(&toward, 0.001, 3.0));

        let away = Ray::new(Point::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 1.0), 0.0);
        assert!(!bbox.hit(&away, 0.001, f64::INFINITY));

        // Zero direction components outside the slab miss
        let beside = Ray::new(Point::new(3.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert!(!bbox.hit(&beside, 0.001, f64::INFINITY));
    }

    #[test]
    fn flat_box_is_still_hit_straight_on() {
        let bbox = Aabb::new(Point::new(-1.0, -1.0, 0.0), Point::new(1.0, 1.0, 0.0));
        let r = Ray::new(Point::new(0.2, 0.3, 1.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert!(!bbox.hit(&r, 0.001, f64::INFINITY));
        let padded = Aabb::new(Point::new(-1.0, -1.0, -0.0001), Point::new(1.0, 1.0, 0.0001));
        assert!(padded.hit(&r, 0.001, f64::INFINITY));
    }

    #[test]
    fn corners_span_box() {
        let bbox = Aabb::new(Point::new(-1.0, 2.0, 3.0), Point::new(4.0, 5.0, 6.0));
        let corners = bbox.corners();
        let rebuilt = corners[1..].iter().fold(Aabb::new(corners[0], corners[0]), |acc, c| {
            acc.surrounding_box(&Aabb::new(*c, *c))
        });
        assert_eq!(rebuilt, bbox);
    }
}
