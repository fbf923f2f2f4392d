//! Ray Tracing Library

use nalgebra::Vector3;
use rand::RngCore;
use std::sync::Arc;

pub mod aabb;
pub mod bvh;
pub mod cameras;
pub mod config;
pub mod error;
pub mod materials;
pub mod mediums;
pub mod objects;
pub mod output;
pub mod perlin;
pub mod rectangles;
pub mod renderer;
pub mod scenes;
pub mod textures;
pub mod transrot;
pub mod utils;

use materials::Scatterable;
use objects::Hittable;

pub use error::{Error, Result};

pub type Vec3 = Vector3<f64>;
pub type Point = Vec3;
pub type Color = Vec3;
pub type Material = Arc<dyn Scatterable + Send + Sync>;

/// Closest distance along a ray at which a hit counts, to reduce shadow acne
pub const T_EPSILON: f64 = 0.001;

/// Prelude
pub mod prelude {
    pub use crate::bvh::BvhNode;
    pub use crate::cameras::{Camera, CameraConfig};
    pub use crate::materials::{Dielectric, DiffuseLight, Isotropic, Lambertian, Metal};
    pub use crate::mediums::ConstantMedium;
    pub use crate::objects::{HitRecord, Hittable, HittableList, HittableObj, MovingSphere, Sphere};
    pub use crate::rectangles::{Cuboid, Plane, Rectangle};
    pub use crate::renderer::{Image, RenderSettings, Renderer};
    pub use crate::textures::{Checker, ImageTexture, Noise, SolidColor, Texture};
    pub use crate::transrot::{RotateY, Translate};
    pub use crate::{Color, Material, Point, Ray, Vec3};
}

/// The ray in ray tracing
#[derive(Debug, Clone)]
pub struct Ray {
    pub orig: Point,
    pub dir: Vec3,
    /// Moment within the camera shutter interval this ray was cast at
    pub time: f64,
}
impl Ray {
    pub fn new(orig: Point, dir: Vec3, time: f64) -> Self {
        Self { orig, dir, time }
    }

    pub fn at(&self, t: f64) -> Point {
        self.orig + t * self.dir
    }

    /// Radiance carried back along this ray
    ///
    /// Recurses once per bounce until `depth` runs out, the ray escapes to the background, or a
    /// material absorbs it.
    pub fn get_color(
        &self,
        world: &dyn Hittable,
        depth: u32,
        background: &Color,
        rng: &mut dyn RngCore,
    ) -> Color {
        // If we have exceeded the ray bounce limit, no more light is gathered
        if depth == 0 {
            return Color::zeros();
        }

        match world.try_hit(self, T_EPSILON, f64::INFINITY, rng) {
            Some(hr) => {
                let emitted = hr.material.emitted(hr.u, hr.v, &hr.p);
                match hr.material.try_scatter(self, &hr, rng) {
                    Some(sr) => {
                        emitted
                            + sr.attenuation.component_mul(&sr.scattered.get_color(
                                world,
                                depth - 1,
                                background,
                                rng,
                            ))
                    }
                    None => emitted,
                }
            }
            None => *background,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{Dielectric, Lambertian, Metal};
    use crate::objects::{HittableList, Sphere};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn non_emissive_world() -> HittableList {
        let mut world = HittableList::default();
        world.add(Arc::new(Sphere::new(
            Point::new(0.0, -1000.0, 0.0),
            1000.0,
            Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5))),
        )));
        world.add(Arc::new(Sphere::new(
            Point::new(-2.0, 1.0, 0.0),
            1.0,
            Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.3)),
        )));
        world.add(Arc::new(Sphere::new(
            Point::new(2.0, 1.0, 0.0),
            1.0,
            Arc::new(Dielectric::new(1.5)),
        )));
        world
    }

    #[test]
    fn ray_at() {
        let ray = Ray::new(Point::new(1.0, 2.0, 3.0), Vec3::new(0.0, 0.0, -2.0), 0.0);
        assert_eq!(ray.at(1.5), Point::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn zero_depth_is_black() {
        let world = non_emissive_world();
        let mut rng = StdRng::seed_from_u64(42);
        let ray = Ray::new(Point::new(0.0, 1.0, 5.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        let color = ray.get_color(&world, 0, &Color::new(0.5, 0.7, 1.0), &mut rng);
        assert_eq!(color, Color::zeros());
    }

    #[test]
    fn miss_returns_background() {
        let world = non_emissive_world();
        let mut rng = StdRng::seed_from_u64(42);
        let background = Color::new(0.25, 0.5, 0.75);
        let ray = Ray::new(Point::new(0.0, 5.0, 0.0), Vec3::new(0.0, 1.0, 0.0), 0.0);
        assert_eq!(ray.get_color(&world, 10, &background, &mut rng), background);
    }

    #[test]
    fn no_emitters_is_non_negative() {
        let world = non_emissive_world();
        let mut rng = StdRng::seed_from_u64(7);
        let black = Color::zeros();
        for i in 0..200 {
            let x = -3.0 + 6.0 * (i as f64 / 200.0);
            let ray = Ray::new(Point::new(0.0, 1.0, 8.0), Vec3::new(x, -0.2, -8.0), 0.0);
            let color = ray.get_color(&world, 20, &black, &mut rng);
            assert!(color.iter().all(|c| *c >= 0.0), "negative radiance {color:?}");
        }
    }

    #[test]
    fn emitter_is_seen_directly() {
        let mut world = HittableList::default();
        world.add(Arc::new(Sphere::new(
            Point::new(0.0, 0.0, -3.0),
            1.0,
            Arc::new(materials::DiffuseLight::from_color(Color::new(4.0, 4.0, 4.0))),
        )));
        let mut rng = StdRng::seed_from_u64(1);
        let ray = Ray::new(Point::zeros(), Vec3::new(0.0, 0.0, -1.0), 0.0);
        let color = ray.get_color(&world, 5, &Color::zeros(), &mut rng);
        assert_eq!(color, Color::new(4.0, 4.0, 4.0));
    }
}
