//! Objects
use std::sync::Arc;

use crate::{aabb::Aabb, materials::Scatterable, Material, Point, Ray, Vec3};
use rand::RngCore;

pub type HittableObj = Arc<dyn Hittable + Send + Sync>;

/// Anything a ray can strike
pub trait Hittable {
    /// Nearest intersection with `ray` whose distance lies within `[t_min, t_max]`
    fn try_hit<'a>(
        &'a self,
        ray: &Ray,
        t_min: f64,
        t_max: f64,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>>;

    fn try_bounding_box(&self, time0: f64, time1: f64) -> Option<Aabb>;
}

#[derive(Default, Clone)]
pub struct HittableList(pub Vec<HittableObj>);
impl HittableList {
    pub fn add(&mut self, obj: HittableObj) {
        self.0.push(obj)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
impl Hittable for HittableList {
    fn try_hit<'a>(
        &'a self,
        ray: &Ray,
        t_min: f64,
        t_max: f64,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let mut closest_so_far = t_max;
        let mut hr_final = None;

        for obj in &self.0 {
            if let Some(hr) = obj.try_hit(ray, t_min, closest_so_far, rng) {
                // On a tie the earlier object keeps the hit
                if hr_final.is_none() || hr.t < closest_so_far {
                    closest_so_far = hr.t;
                    hr_final = Some(hr)
                }
            }
        }
        hr_final
    }

    fn try_bounding_box(&self, time0: f64, time1: f64) -> Option<Aabb> {
        let mut output_box: Option<Aabb> = None;

        for obj in &self.0 {
            let tmp_box = obj.try_bounding_box(time0, time1)?;
            output_box = Some(match output_box {
                Some(output_box) => output_box.surrounding_box(&tmp_box),
                None => tmp_box,
            });
        }
        output_box
    }
}
impl FromIterator<HittableObj> for HittableList {
    fn from_iter<I: IntoIterator<Item = HittableObj>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Represents a hit
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Point,
    /// Unit normal, always facing against the incoming ray
    pub normal: Vec3,
    /// Distance along the ray
    pub t: f64,
    /// Whether the ray struck the outward-facing side
    pub front_face: bool,
    /// Material
    pub material: &'a dyn Scatterable,
    /// U,V surface coordinates
    pub u: f64,
    /// U,V surface coordinates
    pub v: f64,
}
impl<'a> HitRecord<'a> {
    pub fn new(
        p: Point,
        t: f64,
        ray: &Ray,
        outward_normal: &Vec3,
        material: &'a dyn Scatterable,
        u: f64,
        v: f64,
    ) -> Self {
        let front_face = ray.dir.dot(outward_normal) < 0.0;
        let normal = if front_face {
            *outward_normal
        } else {
            -outward_normal
        };
        Self {
            p,
            normal,
            t,
            front_face,
            material,
            u,
            v,
        }
    }
}

pub struct Sphere {
    pub center: Point,
    pub radius: f64,
    pub material: Material,
}
impl Sphere {
    pub fn new(center: Point, radius: f64, material: Material) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    pub fn get_uv(p: &Point) -> (f64, f64) {
        // p: a given point on the sphere of radius one, centered at the origin.
        // u: returned value [0,1] of angle around the Y axis from X=-1.
        // v: returned value [0,1] of angle from Y=-1 to Y=+1.
        //     <1 0 0> yields <0.50 0.50>       <-1  0  0> yields <0.00 0.50>
        //     <0 1 0> yields <0.50 1.00>       < 0 -1  0> yields <0.50 0.00>
        //     <0 0 1> yields <0.25 0.50>       < 0  0 -1> yields <0.75 0.50>

        let theta = (-p[1]).clamp(-1.0, 1.0).acos();
        let phi = (-p[2]).atan2(p[0]) + std::f64::consts::PI;

        let u = phi / (2.0 * std::f64::consts::PI);
        let v = theta / std::f64::consts::PI;
        (u, v)
    }
}
impl Hittable for Sphere {
    fn try_hit<'a>(
        &'a self,
        ray: &Ray,
        t_min: f64,
        t_max: f64,
        _rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        hit_sphere(self.center, self.radius, &*self.material, ray, t_min, t_max)
    }

    fn try_bounding_box(&self, _time0: f64, _time1: f64) -> Option<Aabb> {
        let v = Vec3::repeat(self.radius.abs());
        Some(Aabb::new(self.center - v, self.center + v))
    }
}

/// Sphere whose center travels linearly between two points over a time interval
pub struct MovingSphere {
    initial_center: Point,
    final_center: Point,
    initial_time: f64,
    final_time: f64,
    radius: f64,
    material: Material,
}
impl MovingSphere {
    pub fn new(
        initial_center: Point,
        final_center: Point,
        initial_time: f64,
        final_time: f64,
        radius: f64,
        material: Material,
    ) -> Self {
        Self {
            initial_center,
            final_center,
            initial_time,
            final_time,
            radius,
            material,
        }
    }

    pub fn center(&self, time: f64) -> Point {
        let span = self.final_time - self.initial_time;
        if span == 0.0 {
            return self.initial_center;
        }
        self.initial_center
            + ((time - self.initial_time) / span) * (self.final_center - self.initial_center)
    }
}
impl Hittable for MovingSphere {
    fn try_hit<'a>(
        &'a self,
        ray: &Ray,
        t_min: f64,
        t_max: f64,
        _rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        hit_sphere(
            self.center(ray.time),
            self.radius,
            &*self.material,
            ray,
            t_min,
            t_max,
        )
    }

    fn try_bounding_box(&self, time0: f64, time1: f64) -> Option<Aabb> {
        let v = Vec3::repeat(self.radius.abs());

        let box0 = Aabb::new(self.center(time0) - v, self.center(time0) + v);
        let box1 = Aabb::new(self.center(time1) - v, self.center(time1) + v);

        Some(box0.surrounding_box(&box1))
    }
}

/// Intersect a ray with the sphere at `center` as it stands at the ray's time
fn hit_sphere<'a>(
    center: Point,
    radius: f64,
    material: &'a dyn Scatterable,
    ray: &Ray,
    t_min: f64,
    t_max: f64,
) -> Option<HitRecord<'a>> {
    if radius == 0.0 {
        return None;
    }
    let oc = ray.orig - center;
    let a = ray.dir.norm_squared();
    let half_b = oc.dot(&ray.dir);
    let c = oc.norm_squared() - radius.powi(2);
    let discriminant = half_b.powi(2) - a * c;
    if discriminant < 0.0 {
        return None;
    }

    // Find the nearest root that lies in the acceptable range
    let sqrtd = discriminant.sqrt();
    let mut root = (-half_b - sqrtd) / a;
    if !(t_min..=t_max).contains(&root) {
        root = (-half_b + sqrtd) / a;
        if !(t_min..=t_max).contains(&root) {
            return None;
        }
    }
    let p = ray.at(root);
    let outward_normal = (p - center) / radius;
    let (u, v) = Sphere::get_uv(&outward_normal);
    Some(HitRecord::new(p, root, ray, &outward_normal, material, u, v))
}
