//! Mediums

use std::sync::Arc;

use rand::{Rng, RngCore};

use crate::{
    aabb::Aabb,
    materials::Isotropic,
    objects::{HitRecord, Hittable, HittableObj},
    textures::{SolidColor, Texture},
    Color, Material, Ray, Vec3,
};

/// Constant Medium
///
/// Homogeneous fog filling the inside of a boundary object
pub struct ConstantMedium {
    boundary: HittableObj,
    phase_function: Material,
    neg_inv_density: f64,
}
impl ConstantMedium {
    pub fn new(boundary: HittableObj, density: f64, albedo: Texture) -> Self {
        Self {
            boundary,
            phase_function: Arc::new(Isotropic::new(albedo)),
            neg_inv_density: -1.0 / density,
        }
    }

    pub fn from_color(boundary: HittableObj, density: f64, color: Color) -> Self {
        Self::new(boundary, density, Arc::new(SolidColor::new(color)))
    }
}
impl Hittable for ConstantMedium {
    fn try_hit<'a>(
        &'a self,
        ray: &Ray,
        t_min: f64,
        t_max: f64,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        // Where the ray enters and leaves the boundary, wherever those lie along the ray
        let mut t_enter = self
            .boundary
            .try_hit(ray, f64::NEG_INFINITY, f64::INFINITY, rng)?
            .t;
        let mut t_exit = self
            .boundary
            .try_hit(ray, t_enter + 0.0001, f64::INFINITY, rng)?
            .t;

        t_enter = t_enter.max(t_min);
        t_exit = t_exit.min(t_max);
        if t_enter >= t_exit {
            return None;
        }
        t_enter = t_enter.max(0.0);

        let ray_length = ray.dir.norm();
        let distance_inside_boundary = (t_exit - t_enter) * ray_length;
        // Free-flight distance is exponentially distributed; 1 - gen keeps the log finite
        let hit_distance = self.neg_inv_density * (1.0 - rng.gen::<f64>()).ln();

        if hit_distance > distance_inside_boundary {
            return None;
        }
        let t = t_enter + hit_distance / ray_length;
        let mut rec = HitRecord::new(
            ray.at(t),
            t,
            ray,
            &Vec3::new(1.0, 0.0, 0.0),
            &*self.phase_function,
            0.0,
            0.0,
        );
        // Neither is meaningful inside a volume
        rec.normal = Vec3::new(1.0, 0.0, 0.0);
        rec.front_face = true;
        Some(rec)
    }

    fn try_bounding_box(&self, time0: f64, time1: f64) -> Option<Aabb> {
        self.boundary.try_bounding_box(time0, time1)
    }
}
