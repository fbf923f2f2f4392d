//! Translation and rotation

use rand::RngCore;

use crate::{
    aabb::Aabb,
    objects::{HitRecord, Hittable, HittableObj},
    Point, Ray, Vec3,
};

/// Translate an object
pub struct Translate {
    obj: HittableObj,
    offset: Vec3,
}
impl Translate {
    pub fn new(obj: HittableObj, offset: Vec3) -> Self {
        Self { obj, offset }
    }
}
impl Hittable for Translate {
    fn try_hit<'a>(
        &'a self,
        ray: &Ray,
        t_min: f64,
        t_max: f64,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let moved_ray = Ray::new(ray.orig - self.offset, ray.dir, ray.time);

        self.obj
            .try_hit(&moved_ray, t_min, t_max, rng)
            .map(|mut hr| {
                hr.p += self.offset;
                hr
            })
    }

    fn try_bounding_box(&self, time0: f64, time1: f64) -> Option<Aabb> {
        self.obj
            .try_bounding_box(time0, time1)
            .map(|output_box| Aabb::new(output_box.min + self.offset, output_box.max + self.offset))
    }
}

/// Rotate an object about the y axis
pub struct RotateY {
    obj: HittableObj,
    sin_theta: f64,
    cos_theta: f64,
    bbox: Option<Aabb>,
}
impl RotateY {
    pub fn new(obj: HittableObj, angle_deg: f64) -> Self {
        let radians = angle_deg.to_radians();
        let sin_theta = radians.sin();
        let cos_theta = radians.cos();

        // A rotated box is no longer axis aligned, so bound all 8 of its rotated corners
        let bbox = obj.try_bounding_box(0.0, 1.0).map(|bbox| {
            let mut min = Point::repeat(f64::INFINITY);
            let mut max = Point::repeat(f64::NEG_INFINITY);
            for corner in bbox.corners() {
                let tester = Self::to_world(cos_theta, sin_theta, &corner);
                min = min.inf(&tester);
                max = max.sup(&tester);
            }
            Aabb::new(min, max)
        });

        Self {
            obj,
            sin_theta,
            cos_theta,
            bbox,
        }
    }

    /// Object space to world space
    fn to_world(cos_theta: f64, sin_theta: f64, v: &Vec3) -> Vec3 {
        Vec3::new(
            cos_theta * v[0] + sin_theta * v[2],
            v[1],
            -sin_theta * v[0] + cos_theta * v[2],
        )
    }

    /// World space to object space
    ///
    /// Both rotated components are computed from the original, un-rotated coordinates.
    fn to_object(cos_theta: f64, sin_theta: f64, v: &Vec3) -> Vec3 {
        Vec3::new(
            cos_theta * v[0] - sin_theta * v[2],
            v[1],
            sin_theta * v[0] + cos_theta * v[2],
        )
    }
}
impl Hittable for RotateY {
    fn try_hit<'a>(
        &'a self,
        ray: &Ray,
        t_min: f64,
        t_max: f64,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let origin = Self::to_object(self.cos_theta, self.sin_theta, &ray.orig);
        let direction = Self::to_object(self.cos_theta, self.sin_theta, &ray.dir);
        let rotated_r = Ray::new(origin, direction, ray.time);

        self.obj
            .try_hit(&rotated_r, t_min, t_max, rng)
            .map(|mut rec| {
                // The local normal already faces the local ray, and rotation preserves that
                rec.p = Self::to_world(self.cos_theta, self.sin_theta, &rec.p);
                rec.normal = Self::to_world(self.cos_theta, self.sin_theta, &rec.normal);
                rec
            })
    }

    fn try_bounding_box(&self, _time0: f64, _time1: f64) -> Option<Aabb> {
        self.bbox.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::Lambertian;
    use crate::objects::Sphere;
    use crate::rectangles::Cuboid;
    use crate::Color;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn unit_cube() -> HittableObj {
        Arc::new(Cuboid::new(
            Point::zeros(),
            Point::new(1.0, 1.0, 1.0),
            Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5))),
        ))
    }

    #[test]
    fn translate_moves_hits_and_box() {
        let mut rng = StdRng::seed_from_u64(0);
        let moved = Translate::new(unit_cube(), Vec3::new(10.0, 0.0, 0.0));
        let ray = Ray::new(Point::new(10.5, 0.5, 5.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        let hr = moved.try_hit(&ray, 0.001, f64::INFINITY, &mut rng).unwrap();
        assert!((hr.t - 4.0).abs() < 1e-12);
        assert!((hr.p - Point::new(10.5, 0.5, 1.0)).norm() < 1e-12);

        let missed = Ray::new(Point::new(0.5, 0.5, 5.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert!(moved.try_hit(&missed, 0.001, f64::INFINITY, &mut rng).is_none());

        let bbox = moved.try_bounding_box(0.0, 1.0).unwrap();
        assert_eq!(bbox.min, Point::new(10.0, 0.0, 0.0));
        assert_eq!(bbox.max, Point::new(11.0, 1.0, 1.0));
    }

    #[test]
    fn rotate_quarter_turn() {
        let mut rng = StdRng::seed_from_u64(0);
        // The cube spans x in [0, 1]; a quarter turn about y carries it to z in [-1, 0]
        let rotated = RotateY::new(unit_cube(), 90.0);
        let bbox = rotated.try_bounding_box(0.0, 1.0).unwrap();
        assert!((bbox.min - Point::new(0.0, 0.0, -1.0)).norm() < 1e-12);
        assert!((bbox.max - Point::new(1.0, 1.0, 0.0)).norm() < 1e-12);

        let ray = Ray::new(Point::new(0.5, 0.5, 5.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        let hr = rotated.try_hit(&ray, 0.001, f64::INFINITY, &mut rng).unwrap();
        assert!((hr.t - 5.0).abs() < 1e-9);
        assert!((hr.p - Point::new(0.5, 0.5, 0.0)).norm() < 1e-9);
        assert!((hr.normal - Vec3::new(0.0, 0.0, 1.0)).norm() < 1e-9);
    }

    #[test]
    fn rotated_box_contains_rotated_geometry() {
        let mut rng = StdRng::seed_from_u64(4);
        let rotated = RotateY::new(unit_cube(), 30.0);
        let bbox = rotated.try_bounding_box(0.0, 1.0).unwrap();
        for _ in 0..500 {
            let orig = crate::utils::gen_random(&mut rng, -5.0, 5.0);
            let dir = crate::utils::gen_random(&mut rng, -1.0, 1.0);
            let ray = Ray::new(orig, dir, 0.0);
            if let Some(hr) = rotated.try_hit(&ray, 0.001, f64::INFINITY, &mut rng) {
                assert!(bbox.hit(&ray, 0.001, f64::INFINITY));
                for a in 0..3 {
                    assert!(hr.p[a] >= bbox.min[a] - 1e-9 && hr.p[a] <= bbox.max[a] + 1e-9);
                }
            }
        }
    }

    #[test]
    fn rotation_keeps_sphere_distances() {
        let mut rng = StdRng::seed_from_u64(0);
        let sphere: HittableObj = Arc::new(Sphere::new(
            Point::new(3.0, 0.0, 0.0),
            1.0,
            Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5))),
        ));
        // Half a turn carries the sphere to x = -3
        let rotated = RotateY::new(sphere, 180.0);
        let ray = Ray::new(Point::new(-10.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), 0.0);
        let hr = rotated.try_hit(&ray, 0.001, f64::INFINITY, &mut rng).unwrap();
        assert!((hr.t - 6.0).abs() < 1e-9);
        assert!((hr.normal - Vec3::new(-1.0, 0.0, 0.0)).norm() < 1e-9);
    }
}
