//! Cameras and configs for cameras
use crate::utils::{self, SerdeVector};
use crate::{Point, Ray, Vec3};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Camera Config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    pub look_from: SerdeVector,
    pub look_at: SerdeVector,
    #[serde(default = "CameraConfig::default_v_up")]
    pub v_up: SerdeVector,
    pub vertical_fov_deg: f64,
    /// Falls back to the image's aspect ratio when absent
    #[serde(default)]
    pub aspect_ratio: Option<f64>,
    #[serde(default)]
    pub aperture: f64,
    pub focus_distance: f64,
    /// Shutter open
    #[serde(default)]
    pub time0: f64,
    /// Shutter close
    #[serde(default)]
    pub time1: f64,
}
impl CameraConfig {
    fn default_v_up() -> SerdeVector {
        SerdeVector([0.0, 1.0, 0.0])
    }
}

/// Camera and related tasks
#[derive(Debug, Clone)]
pub struct Camera {
    origin: Point,
    lower_left_corner: Point,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    _w: Vec3,
    lens_radius: f64,
    time0: f64,
    time1: f64,
}
impl Camera {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        look_from: Point,
        look_at: Point,
        v_up: Vec3,
        vertical_fov_deg: f64,
        aspect_ratio: f64,
        aperture: f64,
        focus_dist: f64,
        time0: f64,
        time1: f64,
    ) -> Self {
        // Establish the viewport
        let theta = vertical_fov_deg.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = aspect_ratio * viewport_height;

        // Calculate the viewing vectors
        let w = (look_from - look_at).normalize();
        let u = (v_up.cross(&w)).normalize();
        let v = w.cross(&u);

        let origin = look_from;
        let horizontal = focus_dist * viewport_width * u;
        let vertical = focus_dist * viewport_height * v;
        let lower_left_corner = origin - horizontal / 2.0 - vertical / 2.0 - focus_dist * w;

        let lens_radius = aperture / 2.0;

        Self {
            origin,
            lower_left_corner,
            horizontal,
            vertical,
            u,
            v,
            _w: w,
            lens_radius,
            time0,
            time1,
        }
    }

    /// Build from config, using `image_aspect_ratio` unless the config overrides it
    pub fn from_config(config: &CameraConfig, image_aspect_ratio: f64) -> Self {
        Self::new(
            config.look_from.into(),
            config.look_at.into(),
            config.v_up.into(),
            config.vertical_fov_deg,
            config.aspect_ratio.unwrap_or(image_aspect_ratio),
            config.aperture,
            config.focus_distance,
            config.time0,
            config.time1,
        )
    }

    /// Ray through the viewport at normalized coordinates `(s, t)`, measured from the lower left
    pub fn get_ray(&self, s: f64, t: f64, rng: &mut dyn RngCore) -> Ray {
        let rd = self.lens_radius * utils::random_in_unit_disk(rng);
        let offset = self.u * rd[0] + self.v * rd[1];

        let time = if self.time1 > self.time0 {
            rng.gen_range(self.time0..self.time1)
        } else {
            self.time0
        };

        Ray::new(
            self.origin + offset,
            self.lower_left_corner + s * self.horizontal + t * self.vertical - self.origin - offset,
            time,
        )
    }
}
