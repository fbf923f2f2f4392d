//! Render configuration files
//!
//! A config names the image to produce and the scene to render, either one of the built-in scenes
//! or a list of objects written out in YAML.

use std::path::Path;
use std::sync::Arc;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    bvh::BvhNode,
    cameras::{Camera, CameraConfig},
    materials::{self, MaterialConfig},
    mediums::ConstantMedium,
    objects::{HittableList, HittableObj, MovingSphere, Sphere},
    rectangles::{Cuboid, Plane, Rectangle},
    renderer::{RenderSettings, Renderer},
    scenes,
    textures::{self, TextureConfig},
    transrot::{RotateY, Translate},
    utils::SerdeVector,
    Color, Error, Result,
};

/// Top level config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub image: ImageConfig,
    /// Required for object lists; overrides a built-in scene's own camera
    #[serde(default)]
    pub camera: Option<CameraConfig>,
    pub scene: SceneConfig,
}

/// Image Config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    pub width: usize,
    /// Falls back to the built-in scene's framing, or 16:9
    #[serde(default)]
    pub aspect_ratio: Option<f64>,
    #[serde(default = "ImageConfig::default_samples_per_pixel")]
    pub samples_per_pixel: u32,
    #[serde(default = "ImageConfig::default_max_depth")]
    pub max_depth: u32,
    #[serde(default)]
    pub seed: u64,
    /// Falls back to the built-in scene's background, or black
    #[serde(default)]
    pub background: Option<SerdeVector>,
}
impl ImageConfig {
    fn default_samples_per_pixel() -> u32 {
        100
    }

    fn default_max_depth() -> u32 {
        50
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio.unwrap_or(16.0 / 9.0)
    }

    pub fn height(&self) -> usize {
        ((self.width as f64 / self.aspect_ratio()) as usize).max(1)
    }
}
impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            width: 400,
            aspect_ratio: None,
            samples_per_pixel: Self::default_samples_per_pixel(),
            max_depth: Self::default_max_depth(),
            seed: 0,
            background: None,
        }
    }
}

/// Where the world comes from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SceneConfig {
    Builtin {
        name: String,
    },
    Objects {
        #[serde(default = "SceneConfig::default_bvh")]
        bvh: bool,
        objects: Vec<ObjectConfig>,
    },
}
impl SceneConfig {
    fn default_bvh() -> bool {
        true
    }
}

/// Config for a single object
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ObjectConfig {
    Sphere {
        center: SerdeVector,
        radius: f64,
        material: MaterialConfig,
    },
    MovingSphere {
        center0: SerdeVector,
        center1: SerdeVector,
        time0: f64,
        time1: f64,
        radius: f64,
        material: MaterialConfig,
    },
    Rectangle {
        plane: Plane,
        a0: f64,
        a1: f64,
        b0: f64,
        b1: f64,
        k: f64,
        material: MaterialConfig,
    },
    Cuboid {
        min: SerdeVector,
        max: SerdeVector,
        material: MaterialConfig,
    },
    Translate {
        offset: SerdeVector,
        object: Box<ObjectConfig>,
    },
    RotateY {
        angle_deg: f64,
        object: Box<ObjectConfig>,
    },
    ConstantMedium {
        density: f64,
        albedo: TextureConfig,
        boundary: Box<ObjectConfig>,
    },
}
impl ObjectConfig {
    pub fn build(self, rng: &mut dyn RngCore) -> HittableObj {
        match self {
            ObjectConfig::Sphere {
                center,
                radius,
                material,
            } => Arc::new(Sphere::new(
                center.into(),
                radius,
                materials::Generator::from_config(material, rng),
            )),
            ObjectConfig::MovingSphere {
                center0,
                center1,
                time0,
                time1,
                radius,
                material,
            } => Arc::new(MovingSphere::new(
                center0.into(),
                center1.into(),
                time0,
                time1,
                radius,
                materials::Generator::from_config(material, rng),
            )),
            ObjectConfig::Rectangle {
                plane,
                a0,
                a1,
                b0,
                b1,
                k,
                material,
            } => Arc::new(Rectangle::new(
                plane,
                materials::Generator::from_config(material, rng),
                a0,
                a1,
                b0,
                b1,
                k,
            )),
            ObjectConfig::Cuboid { min, max, material } => Arc::new(Cuboid::new(
                min.into(),
                max.into(),
                materials::Generator::from_config(material, rng),
            )),
            ObjectConfig::Translate { offset, object } => {
                Arc::new(Translate::new(object.build(rng), offset.into()))
            }
            ObjectConfig::RotateY { angle_deg, object } => {
                Arc::new(RotateY::new(object.build(rng), angle_deg))
            }
            ObjectConfig::ConstantMedium {
                density,
                albedo,
                boundary,
            } => {
                let boundary = boundary.build(rng);
                let albedo = textures::Generator::from_config(albedo, rng);
                Arc::new(ConstantMedium::new(boundary, density, albedo))
            }
        }
    }
}

impl RenderConfig {
    /// Read a YAML config from `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading config from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Config for a built-in scene with default image settings
    pub fn builtin(name: impl Into<String>) -> Self {
        Self {
            image: ImageConfig::default(),
            camera: None,
            scene: SceneConfig::Builtin { name: name.into() },
        }
    }

    /// Assemble the world, camera, and settings described by this config
    ///
    /// Everything random in the scene is drawn from a generator seeded with `image.seed`.
    pub fn into_renderer(self) -> Result<Renderer> {
        let RenderConfig {
            mut image,
            camera,
            scene,
        } = self;
        let mut rng = StdRng::seed_from_u64(image.seed);
        let (world, bvh, camera_config, background) = match scene {
            SceneConfig::Builtin { name } => {
                let scene = scenes::by_name(&name, &mut rng)?;
                image.aspect_ratio = image.aspect_ratio.or(Some(scene.aspect_ratio));
                let camera = camera.unwrap_or(scene.camera);
                (scene.world, true, Some(camera), Some(scene.background))
            }
            SceneConfig::Objects { bvh, objects } => {
                let world: HittableList =
                    objects.into_iter().map(|obj| obj.build(&mut rng)).collect();
                (world, bvh, camera, None)
            }
        };
        let camera_config = camera_config.ok_or(Error::MissingCamera)?;
        debug!("Scene holds {} objects", world.len());

        let world: HittableObj = if bvh {
            Arc::new(BvhNode::new(
                world,
                camera_config.time0,
                camera_config.time1,
                &mut rng,
            )?)
        } else {
            Arc::new(world)
        };

        let camera = Camera::from_config(&camera_config, image.aspect_ratio());
        let background = image
            .background
            .map(Color::from)
            .or(background)
            .unwrap_or_else(Color::zeros);
        let settings = RenderSettings {
            width: image.width,
            height: image.height(),
            samples_per_pixel: image.samples_per_pixel,
            max_depth: image.max_depth,
            background,
            seed: image.seed,
        };
        Ok(Renderer::new(world, camera, settings))
    }
}
