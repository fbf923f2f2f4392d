//! Implementation of materials

use std::sync::Arc;

use crate::{
    objects::HitRecord,
    textures::{self, SolidColor, Texture, TextureConfig},
    utils::{self, SerdeVector},
    Color, Material, Point, Ray,
};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Material
pub trait Scatterable {
    /// Bounce the incoming ray off the surface, or `None` if it is absorbed
    fn try_scatter(
        &self,
        ray_in: &Ray,
        hit_record: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult>;

    /// Light given off at the hit, black unless the material is a light source
    fn emitted(&self, _u: f64, _v: f64, _p: &Point) -> Color {
        Color::zeros()
    }
}

/// Scatter Result
#[derive(Debug)]
pub struct ScatterResult {
    /// Attenuation Color
    pub attenuation: Color,
    /// Resulting Scattered Ray
    pub scattered: Ray,
}

/// Config for materials
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MaterialConfig {
    Lambertian(LambertianConfig),
    Metal(MetalConfig),
    Dielectric(DielectricConfig),
    DiffuseLight(DiffuseLightConfig),
}

/// Generator from config
pub struct Generator;
impl Generator {
    pub fn from_config(config: MaterialConfig, rng: &mut dyn RngCore) -> Material {
        match config {
            MaterialConfig::Lambertian(c) => Arc::new(Lambertian::from_config(c, rng)),
            MaterialConfig::Metal(c) => Arc::new(Metal::from_config(c)),
            MaterialConfig::Dielectric(c) => Arc::new(Dielectric::from_config(c)),
            MaterialConfig::DiffuseLight(c) => Arc::new(DiffuseLight::from_config(c, rng)),
        }
    }
}

/// Lambertian Scatterer
pub struct Lambertian {
    albedo: Texture,
}
impl Lambertian {
    pub fn new(albedo: Color) -> Self {
        Self {
            albedo: Arc::new(SolidColor::new(albedo)),
        }
    }

    pub fn from_texture(texture: Texture) -> Self {
        Self { albedo: texture }
    }

    pub fn from_config(config: LambertianConfig, rng: &mut dyn RngCore) -> Self {
        Self::from_texture(textures::Generator::from_config(config.albedo, rng))
    }
}
impl Scatterable for Lambertian {
    fn try_scatter(
        &self,
        ray_in: &Ray,
        hit_record: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let mut scatter_direction = hit_record.normal + utils::random_unit_vector(rng);

        // Protect against hit_record.normal and the random unit vector being exact opposites
        if utils::near_zero(&scatter_direction) {
            scatter_direction = hit_record.normal;
        }
        let scattered = Ray::new(hit_record.p, scatter_direction, ray_in.time);
        let attenuation = self.albedo.value(hit_record.u, hit_record.v, &hit_record.p);
        Some(ScatterResult {
            attenuation,
            scattered,
        })
    }
}

/// Lambertian Config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LambertianConfig {
    pub albedo: TextureConfig,
}

/// Metal Scatterer
#[derive(Debug, Clone)]
pub struct Metal {
    albedo: Color,
    fuzz: f64,
}
impl Metal {
    /// `fuzz` is clamped to `[0, 1]`
    pub fn new(albedo: Color, fuzz: f64) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    pub fn from_config(config: MetalConfig) -> Self {
        Self::new(config.albedo.into(), config.fuzz)
    }
}
impl Scatterable for Metal {
    fn try_scatter(
        &self,
        ray_in: &Ray,
        hit_record: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let reflected = utils::reflect(&ray_in.dir.normalize(), &hit_record.normal);
        let scattered = Ray::new(
            hit_record.p,
            reflected + self.fuzz * utils::random_in_unit_sphere(rng),
            ray_in.time,
        );
        if scattered.dir.dot(&hit_record.normal) > 0.0 {
            Some(ScatterResult {
                attenuation: self.albedo,
                scattered,
            })
        } else {
            None
        }
    }
}

/// Metal Config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetalConfig {
    pub albedo: SerdeVector,
    #[serde(default)]
    pub fuzz: f64,
}

/// A Dielectric is a refractive material, such as glass
#[derive(Debug, Clone)]
pub struct Dielectric {
    ir: f64,
}
impl Dielectric {
    pub fn new(ir: f64) -> Self {
        Self { ir }
    }

    pub fn from_config(config: DielectricConfig) -> Self {
        Self { ir: config.ir }
    }

    /// Fraction of light reflected at the given incidence cosine
    ///
    /// Use Schlick's approximation for reflectance
    pub fn reflectance(cosine: f64, ref_idx: f64) -> f64 {
        let r0 = ((1.0 - ref_idx) / (1.0 + ref_idx)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}
impl Scatterable for Dielectric {
    fn try_scatter(
        &self,
        ray_in: &Ray,
        hit_record: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let attenuation = Color::new(1.0, 1.0, 1.0);
        let refraction_ratio = if hit_record.front_face {
            1.0 / self.ir
        } else {
            self.ir
        };

        let unit_direction = ray_in.dir.normalize();
        let cos_theta = (-unit_direction).dot(&hit_record.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta.powi(2)).sqrt();

        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction = if cannot_refract
            || Self::reflectance(cos_theta, refraction_ratio) > rng.gen::<f64>()
        {
            utils::reflect(&unit_direction, &hit_record.normal)
        } else {
            utils::refract(&unit_direction, &hit_record.normal, refraction_ratio)
        };

        let scattered = Ray::new(hit_record.p, direction, ray_in.time);
        Some(ScatterResult {
            attenuation,
            scattered,
        })
    }
}

/// Dielectric Config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DielectricConfig {
    pub ir: f64,
}

/// Light source: emits its texture and never scatters
pub struct DiffuseLight {
    emit: Texture,
}
impl DiffuseLight {
    pub fn new(emit: Texture) -> Self {
        Self { emit }
    }

    pub fn from_color(color: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(color)))
    }

    pub fn from_config(config: DiffuseLightConfig, rng: &mut dyn RngCore) -> Self {
        Self::new(textures::Generator::from_config(config.emit, rng))
    }
}
impl Scatterable for DiffuseLight {
    fn try_scatter(
        &self,
        _ray_in: &Ray,
        _hit_record: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        None
    }

    fn emitted(&self, u: f64, v: f64, p: &Point) -> Color {
        self.emit.value(u, v, p)
    }
}

/// Diffuse Light Config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffuseLightConfig {
    pub emit: TextureConfig,
}

/// Isotropic phase function, used inside participating media
pub struct Isotropic {
    albedo: Texture,
}
impl Isotropic {
    pub fn new(albedo: Texture) -> Self {
        Self { albedo }
    }

    pub fn from_color(color: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(color)))
    }
}
impl Scatterable for Isotropic {
    fn try_scatter(
        &self,
        ray_in: &Ray,
        hit_record: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let scattered = Ray::new(
            hit_record.p,
            utils::random_in_unit_sphere(rng),
            ray_in.time,
        );
        Some(ScatterResult {
            attenuation: self.albedo.value(hit_record.u, hit_record.v, &hit_record.p),
            scattered,
        })
    }
}
