//! Utils

use crate::{Color, Vec3};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Compute a random vector inside the unit sphere
///
/// Randomly generate vectors. If the squared norm is < 1, it is inside the unit sphere.
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = gen_random(rng, -1.0, 1.0);
        if p.norm_squared() < 1.0 {
            return p;
        }
    }
}

/// A random vector on the surface of the unit sphere
///
/// Used for Lambertian scattering: normal + unit vector is cosine distributed
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = gen_random(rng, -1.0, 1.0);
        let len_sq = p.norm_squared();
        // Reject the tiny core as well so normalizing stays well-conditioned
        if len_sq < 1.0 && len_sq > 1e-160 {
            return p / len_sq.sqrt();
        }
    }
}

/// Generate a random vector inside a unit disk on the xy plane
///
/// This simulates defocus blur
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), 0.0);
        if p.norm_squared() < 1.0 {
            return p;
        }
    }
}

/// Generate Random Vectors with every component in `[min, max)`
pub fn gen_random(rng: &mut dyn RngCore, min: f64, max: f64) -> Vec3 {
    Vec3::new(
        rng.gen_range(min..max),
        rng.gen_range(min..max),
        rng.gen_range(min..max),
    )
}

/// Whether every component of the vector is close to zero
pub fn near_zero(v: &Vec3) -> bool {
    const S: f64 = 1e-8;
    v.iter().all(|c| c.abs() < S)
}

/// Mirror `v` about the surface normal `n`
pub fn reflect(v: &Vec3, n: &Vec3) -> Vec3 {
    *v - 2.0 * v.dot(n) * *n
}

/// Bend the unit vector `uv` through a surface with normal `n` by Snell's law
pub fn refract(uv: &Vec3, n: &Vec3, etai_over_etat: f64) -> Vec3 {
    let cos_theta = (-*uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (*uv + cos_theta * *n);
    let r_out_parallel = -(1.0 - r_out_perp.norm_squared()).abs().sqrt() * *n;
    r_out_perp + r_out_parallel
}

/// Averages the accumulated color, gamma-corrects it for gamma = 2.0, and clamps each channel
/// to `[0, 0.999]`
pub fn gamma_correct(color: &Color, samples_per_pixel: u32) -> Color {
    let scale = 1.0 / samples_per_pixel as f64;
    color.map(|c| (scale * c).max(0.0).sqrt().clamp(0.0, 0.999))
}

/// scale a gamma-corrected channel to between 0 and 255
pub fn scale_color(val: f64) -> u8 {
    (256.0 * val.clamp(0.0, 0.999)) as u8
}

/// Vector representation used in config files, written as `[x, y, z]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SerdeVector(pub [f64; 3]);
impl From<SerdeVector> for Vec3 {
    fn from(value: SerdeVector) -> Self {
        Vec3::new(value.0[0], value.0[1], value.0[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn random_vectors_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            assert!(random_in_unit_sphere(&mut rng).norm() < 1.0);
            assert!((random_unit_vector(&mut rng).norm() - 1.0).abs() < 1e-9);
            let d = random_in_unit_disk(&mut rng);
            assert!(d.norm() < 1.0);
            assert_eq!(d[2], 0.0);
        }
    }

    #[test]
    fn reflect_flips_normal_component() {
        let v = Vec3::new(1.0, -1.0, 0.0);
        let n = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(reflect(&v, &n), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn refract_with_unit_ratio_passes_straight_through() {
        let v = Vec3::new(1.0, -1.0, 0.0).normalize();
        let n = Vec3::new(0.0, 1.0, 0.0);
        let r = refract(&v, &n, 1.0);
        assert!((r - v).norm() < 1e-12);
    }

    #[test]
    fn gamma_correct_clamps() {
        let c = gamma_correct(&Color::new(0.5, 8.0, -1.0), 2);
        assert!((c[0] - 0.5).abs() < 1e-12);
        assert_eq!(c[1], 0.999);
        assert_eq!(c[2], 0.0);
        assert_eq!(scale_color(c[1]), 255);
        assert_eq!(scale_color(c[0]), 128);
    }

    #[test]
    fn near_zero_detection() {
        assert!(near_zero(&Vec3::new(1e-9, -1e-9, 0.0)));
        assert!(!near_zero(&Vec3::new(1e-9, 1e-3, 0.0)));
    }
}
