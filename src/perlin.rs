//! Perlin gradient noise

use rand::{Rng, RngCore};

use crate::{utils, Point, Vec3};

/// Perlin noise generator
///
/// The gradient table and permutations are drawn once at construction, so a seeded generator
/// reproduces the same noise field.
#[derive(Debug, Clone)]
pub struct Perlin {
    ranvec: Vec<Vec3>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}
impl Perlin {
    const POINT_COUNT: usize = 256;

    pub fn new(rng: &mut dyn RngCore) -> Self {
        let ranvec = (0..Self::POINT_COUNT)
            .map(|_| utils::random_unit_vector(rng))
            .collect();

        let perm_x = Self::perlin_generate_perm(rng);
        let perm_y = Self::perlin_generate_perm(rng);
        let perm_z = Self::perlin_generate_perm(rng);

        Self {
            ranvec,
            perm_x,
            perm_y,
            perm_z,
        }
    }

    /// Sum of `depth` octaves (7 by default) of noise at doubling frequency and halving weight
    pub fn turbulence(&self, p: &Point, depth: Option<u32>) -> f64 {
        let depth = depth.unwrap_or(7);
        let mut accum = 0.0;
        let mut temp_p = *p;
        let mut weight = 1.0;

        for _ in 0..depth {
            accum += weight * self.noise(&temp_p);
            weight *= 0.5;
            temp_p *= 2.0;
        }
        accum.abs()
    }

    pub fn noise(&self, p: &Point) -> f64 {
        let u = p[0] - p[0].floor();
        let v = p[1] - p[1].floor();
        let w = p[2] - p[2].floor();

        let i = p[0].floor() as i64;
        let j = p[1].floor() as i64;
        let k = p[2].floor() as i64;

        let mut c = [[[Vec3::zeros(); 2]; 2]; 2];
        for (di, c0) in c.iter_mut().enumerate() {
            for (dj, c1) in c0.iter_mut().enumerate() {
                for (dk, c2) in c1.iter_mut().enumerate() {
                    *c2 = self.ranvec[self.perm_x[Self::wrap(i + di as i64)]
                        ^ self.perm_y[Self::wrap(j + dj as i64)]
                        ^ self.perm_z[Self::wrap(k + dk as i64)]]
                }
            }
        }

        Self::perlin_interp(&c, u, v, w)
    }

    /// Lattice coordinate folded into the table
    fn wrap(n: i64) -> usize {
        (n & (Self::POINT_COUNT as i64 - 1)) as usize
    }

    fn perlin_generate_perm(rng: &mut dyn RngCore) -> Vec<usize> {
        let mut p: Vec<usize> = (0..Self::POINT_COUNT).collect();
        Self::permute(&mut p, rng);
        p
    }

    /// Fisher-Yates shuffle
    fn permute(p: &mut [usize], rng: &mut dyn RngCore) {
        for i in (1..p.len()).rev() {
            let target = rng.gen_range(0..=i);
            p.swap(i, target);
        }
    }

    fn perlin_interp(c: &[[[Vec3; 2]; 2]; 2], u: f64, v: f64, w: f64) -> f64 {
        // Hermitian Smoothing
        let uu = u.powi(2) * (3.0 - 2.0 * u);
        let vv = v.powi(2) * (3.0 - 2.0 * v);
        let ww = w.powi(2) * (3.0 - 2.0 * w);

        let mut accum = 0.0;

        for (i, ci) in c.iter().enumerate() {
            let i = i as f64;
            for (j, cj) in ci.iter().enumerate() {
                let j = j as f64;
                for (k, ck) in cj.iter().enumerate() {
                    let k = k as f64;
                    let weight_v = Vec3::new(u - i, v - j, w - k);
                    accum += (i * uu + (1.0 - i) * (1.0 - uu))
                        * (j * vv + (1.0 - j) * (1.0 - vv))
                        * (k * ww + (1.0 - k) * (1.0 - ww))
                        * ck.dot(&weight_v);
                }
            }
        }
        accum
    }
}
