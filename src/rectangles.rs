//! Axis-aligned rectangles and boxes built from them

use std::sync::Arc;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::{
    aabb::Aabb,
    objects::{HitRecord, Hittable, HittableList},
    Material, Point, Ray, Vec3,
};

/// Half thickness given to rectangles' bounding boxes along their missing axis
const PAD: f64 = 0.0001;

/// The plane a rectangle lies in, named by its two spanning axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Plane {
    Xy,
    Xz,
    Yz,
}
impl Plane {
    /// Indices of the in-plane axes and the normal axis, as `(a, b, k)`
    fn axes(self) -> (usize, usize, usize) {
        match self {
            Plane::Xy => (0, 1, 2),
            Plane::Xz => (0, 2, 1),
            Plane::Yz => (1, 2, 0),
        }
    }
}

/// Axis-aligned rectangle spanning `[a0, a1] x [b0, b1]` at offset `k` along the normal axis
pub struct Rectangle {
    plane: Plane,
    material: Material,
    a0: f64,
    a1: f64,
    b0: f64,
    b1: f64,
    k: f64,
}
impl Rectangle {
    pub fn new(
        plane: Plane,
        material: Material,
        a0: f64,
        a1: f64,
        b0: f64,
        b1: f64,
        k: f64,
    ) -> Self {
        Self {
            plane,
            material,
            a0,
            a1,
            b0,
            b1,
            k,
        }
    }

    pub fn xy(material: Material, x0: f64, x1: f64, y0: f64, y1: f64, k: f64) -> Self {
        Self::new(Plane::Xy, material, x0, x1, y0, y1, k)
    }

    pub fn xz(material: Material, x0: f64, x1: f64, z0: f64, z1: f64, k: f64) -> Self {
        Self::new(Plane::Xz, material, x0, x1, z0, z1, k)
    }

    pub fn yz(material: Material, y0: f64, y1: f64, z0: f64, z1: f64, k: f64) -> Self {
        Self::new(Plane::Yz, material, y0, y1, z0, z1, k)
    }
}
impl Hittable for Rectangle {
    fn try_hit<'a>(
        &'a self,
        ray: &Ray,
        t_min: f64,
        t_max: f64,
        _rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let (a, b, k) = self.plane.axes();
        let t = (self.k - ray.orig[k]) / ray.dir[k];
        // A ray parallel to the plane gives an infinite or NaN t
        if !t.is_finite() || t < t_min || t > t_max {
            return None;
        }
        let x = ray.orig[a] + t * ray.dir[a];
        let y = ray.orig[b] + t * ray.dir[b];
        if x < self.a0 || x > self.a1 || y < self.b0 || y > self.b1 {
            return None;
        }
        let u = (x - self.a0) / (self.a1 - self.a0);
        let v = (y - self.b0) / (self.b1 - self.b0);
        let mut outward_normal = Vec3::zeros();
        outward_normal[k] = 1.0;
        let p = ray.at(t);
        Some(HitRecord::new(
            p,
            t,
            ray,
            &outward_normal,
            &*self.material,
            u,
            v,
        ))
    }

    fn try_bounding_box(&self, _time0: f64, _time1: f64) -> Option<Aabb> {
        let (a, b, k) = self.plane.axes();
        let mut min = Point::zeros();
        let mut max = Point::zeros();
        min[a] = self.a0;
        max[a] = self.a1;
        min[b] = self.b0;
        max[b] = self.b1;
        min[k] = self.k - PAD;
        max[k] = self.k + PAD;
        Some(Aabb::new(min, max))
    }
}

/// Axis-aligned box made of six rectangles sharing one material
pub struct Cuboid {
    box_min: Point,
    box_max: Point,
    sides: HittableList,
}
impl Cuboid {
    pub fn new(p0: Point, p1: Point, material: Material) -> Self {
        let mut sides = HittableList::default();

        // Sides facing z
        sides.add(Arc::new(Rectangle::xy(material.clone(), p0[0], p1[0], p0[1], p1[1], p0[2])));
        sides.add(Arc::new(Rectangle::xy(material.clone(), p0[0], p1[0], p0[1], p1[1], p1[2])));

        // Sides facing y
        sides.add(Arc::new(Rectangle::xz(material.clone(), p0[0], p1[0], p0[2], p1[2], p0[1])));
        sides.add(Arc::new(Rectangle::xz(material.clone(), p0[0], p1[0], p0[2], p1[2], p1[1])));

        // Sides facing x
        sides.add(Arc::new(Rectangle::yz(material.clone(), p0[1], p1[1], p0[2], p1[2], p0[0])));
        sides.add(Arc::new(Rectangle::yz(material, p0[1], p1[1], p0[2], p1[2], p1[0])));

        Self {
            box_min: p0,
            box_max: p1,
            sides,
        }
    }
}
impl Hittable for Cuboid {
    fn try_hit<'a>(
        &'a self,
        ray: &Ray,
        t_min: f64,
        t_max: f64,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        self.sides.try_hit(ray, t_min, t_max, rng)
    }

    fn try_bounding_box(&self, _time0: f64, _time1: f64) -> Option<Aabb> {
        Some(Aabb::new(self.box_min, self.box_max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::Lambertian;
    use crate::Color;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gray() -> Material {
        Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5)))
    }

    #[test]
    fn xz_rect_hit_and_uv() {
        let mut rng = StdRng::seed_from_u64(0);
        let rect = Rectangle::xz(gray(), 0.0, 2.0, 0.0, 4.0, 1.0);
        let ray = Ray::new(Point::new(0.5, 5.0, 3.0), Vec3::new(0.0, -1.0, 0.0), 0.0);
        let hr = rect.try_hit(&ray, 0.001, f64::INFINITY, &mut rng).unwrap();
        assert!((hr.t - 4.0).abs() < 1e-12);
        assert!((hr.u - 0.25).abs() < 1e-12);
        assert!((hr.v - 0.75).abs() < 1e-12);
        assert!(hr.front_face);
        assert_eq!(hr.normal, Vec3::new(0.0, 1.0, 0.0));

        let outside = Ray::new(Point::new(3.0, 5.0, 3.0), Vec3::new(0.0, -1.0, 0.0), 0.0);
        assert!(rect.try_hit(&outside, 0.001, f64::INFINITY, &mut rng).is_none());
    }

    #[test]
    fn parallel_ray_misses() {
        let mut rng = StdRng::seed_from_u64(0);
        for plane in [Plane::Xy, Plane::Xz, Plane::Yz] {
            let rect = Rectangle::new(plane, gray(), -1.0, 1.0, -1.0, 1.0, 0.0);
            let (a, _, k) = plane.axes();
            let mut dir = Vec3::zeros();
            dir[a] = 1.0;
            // Lies in the plane itself, and beside it
            for offset in [0.0, 0.5] {
                let mut orig = Point::zeros();
                orig[a] = -5.0;
                orig[k] = offset;
                let ray = Ray::new(orig, dir, 0.0);
                assert!(rect.try_hit(&ray, 0.001, f64::INFINITY, &mut rng).is_none());
            }
        }
    }

    #[test]
    fn bounding_box_is_padded() {
        let rect = Rectangle::yz(gray(), 0.0, 1.0, 2.0, 3.0, 5.0);
        let bbox = rect.try_bounding_box(0.0, 0.0).unwrap();
        assert_eq!(bbox.min, Point::new(5.0 - PAD, 0.0, 2.0));
        assert_eq!(bbox.max, Point::new(5.0 + PAD, 1.0, 3.0));
        assert!(bbox.max[0] > bbox.min[0]);
    }

    #[test]
    fn cuboid_reports_nearest_face() {
        let mut rng = StdRng::seed_from_u64(0);
        let cuboid = Cuboid::new(Point::new(0.0, 0.0, 0.0), Point::new(1.0, 2.0, 3.0), gray());
        let ray = Ray::new(Point::new(0.5, 1.0, 10.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        let hr = cuboid.try_hit(&ray, 0.001, f64::INFINITY, &mut rng).unwrap();
        assert!((hr.t - 7.0).abs() < 1e-12);
        assert_eq!(hr.normal, Vec3::new(0.0, 0.0, 1.0));

        // From inside, the far wall is struck from behind
        let inside = Ray::new(Point::new(0.5, 1.0, 1.0), Vec3::new(1.0, 0.0, 0.0), 0.0);
        let hr = cuboid.try_hit(&inside, 0.001, f64::INFINITY, &mut rng).unwrap();
        assert!((hr.t - 0.5).abs() < 1e-12);
        assert!(!hr.front_face);

        let bbox = cuboid.try_bounding_box(0.0, 1.0).unwrap();
        assert_eq!(bbox, Aabb::new(Point::zeros(), Point::new(1.0, 2.0, 3.0)));
    }
}
