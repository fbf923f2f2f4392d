//! Textures/colors

use std::path::Path;
use std::sync::Arc;

use log::{debug, warn};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::{perlin::Perlin, utils::SerdeVector, Color, Point};

pub type Texture = Arc<dyn Textured + Send + Sync>;

pub trait Textured {
    fn value(&self, u: f64, v: f64, p: &Point) -> Color;
}

/// Config for textures
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TextureConfig {
    Solid {
        color: SerdeVector,
    },
    Checker {
        even: Box<TextureConfig>,
        odd: Box<TextureConfig>,
        #[serde(default = "Checker::default_scale")]
        scale: f64,
    },
    Noise {
        scale: f64,
    },
    Image {
        path: String,
    },
}

/// Generator from config
pub struct Generator;
impl Generator {
    pub fn from_config(config: TextureConfig, rng: &mut dyn RngCore) -> Texture {
        match config {
            TextureConfig::Solid { color } => Arc::new(SolidColor::new(color.into())),
            TextureConfig::Checker { even, odd, scale } => {
                let even = Self::from_config(*even, rng);
                let odd = Self::from_config(*odd, rng);
                Arc::new(Checker::new(even, odd).with_scale(scale))
            }
            TextureConfig::Noise { scale } => Arc::new(Noise::new(scale, rng)),
            TextureConfig::Image { path } => Arc::new(ImageTexture::open(path)),
        }
    }
}

/// Solid Color
#[derive(Debug, Clone)]
pub struct SolidColor {
    color_value: Color,
}
impl SolidColor {
    pub fn new(color: Color) -> Self {
        Self { color_value: color }
    }
}
impl Textured for SolidColor {
    fn value(&self, _u: f64, _v: f64, _p: &Point) -> Color {
        self.color_value
    }
}

/// Checker Texture
///
/// A solid 3-D checkerboard, independent of the surface parameterization
#[derive(Clone)]
pub struct Checker {
    odd: Texture,
    even: Texture,
    scale: f64,
}
impl Checker {
    pub fn new(even: Texture, odd: Texture) -> Self {
        Self {
            odd,
            even,
            scale: Self::default_scale(),
        }
    }

    pub fn from_solid_colors(c1: Color, c2: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(c1)), Arc::new(SolidColor::new(c2)))
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    fn default_scale() -> f64 {
        10.0
    }
}
impl Textured for Checker {
    fn value(&self, u: f64, v: f64, p: &Point) -> Color {
        let sines =
            (self.scale * p[0]).sin() * (self.scale * p[1]).sin() * (self.scale * p[2]).sin();
        if sines < 0.0 {
            self.odd.value(u, v, p)
        } else {
            self.even.value(u, v, p)
        }
    }
}

/// Noise Texture
///
/// Marble: a sine along z whose phase is disturbed by turbulence
#[derive(Debug, Clone)]
pub struct Noise {
    noise: Perlin,
    scale: f64,
}
impl Noise {
    pub fn new(scale: f64, rng: &mut dyn RngCore) -> Self {
        Self {
            noise: Perlin::new(rng),
            scale,
        }
    }
}
impl Textured for Noise {
    fn value(&self, _u: f64, _v: f64, p: &Point) -> Color {
        let turbulence = self.noise.turbulence(&(self.scale * *p), None);
        Color::new(1.0, 1.0, 1.0) * 0.5 * (1.0 + (self.scale * p[2] + 10.0 * turbulence).sin())
    }
}

/// Image Texture
///
/// Samples a raster by (u, v). An image that fails to load renders as solid magenta.
#[derive(Clone)]
pub struct ImageTexture {
    image: Option<image::RgbImage>,
}
impl ImageTexture {
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match image::open(path) {
            Ok(img) => {
                let image = img.to_rgb8();
                debug!(
                    "Loaded texture {} ({}x{})",
                    path.display(),
                    image.width(),
                    image.height()
                );
                Self::from_image(image)
            }
            Err(err) => {
                warn!("Could not load texture image {}: {err}", path.display());
                Self { image: None }
            }
        }
    }

    pub fn from_image(image: image::RgbImage) -> Self {
        if image.width() == 0 || image.height() == 0 {
            return Self { image: None };
        }
        Self { image: Some(image) }
    }
}
impl Textured for ImageTexture {
    fn value(&self, u: f64, v: f64, _p: &Point) -> Color {
        let Some(image) = &self.image else {
            return Color::new(1.0, 0.0, 1.0);
        };

        // Flip v to image coordinates
        let u = u.clamp(0.0, 1.0);
        let v = 1.0 - v.clamp(0.0, 1.0);

        let i = ((u * image.width() as f64) as u32).min(image.width() - 1);
        let j = ((v * image.height() as f64) as u32).min(image.height() - 1);

        let color_scale = 1.0 / 255.0;
        let pixel = image.get_pixel(i, j);
        Color::new(
            color_scale * pixel[0] as f64,
            color_scale * pixel[1] as f64,
            color_scale * pixel[2] as f64,
        )
    }
}
