//! Built-in scenes

use std::sync::Arc;

use log::debug;
use rand::{Rng, RngCore};

use crate::{
    cameras::CameraConfig,
    materials::{Dielectric, DiffuseLight, Lambertian, Metal},
    mediums::ConstantMedium,
    objects::{HittableList, HittableObj, Sphere},
    rectangles::{Cuboid, Rectangle},
    textures::{Checker, Noise},
    transrot::{RotateY, Translate},
    utils::{gen_random, SerdeVector},
    Color, Error, Material, Point, Result, Vec3,
};

/// Names accepted by [`by_name`]
pub const SCENE_NAMES: [&str; 5] = [
    "random_spheres",
    "two_perlin_spheres",
    "simple_light",
    "cornell_box",
    "cornell_smoke",
];

const WIDESCREEN: f64 = 16.0 / 9.0;

/// A world with a camera suited to viewing it
pub struct Scene {
    pub world: HittableList,
    pub camera: CameraConfig,
    pub background: Color,
    /// Image width over height the camera was framed for
    pub aspect_ratio: f64,
}

/// Build the built-in scene called `name`
pub fn by_name(name: &str, rng: &mut dyn RngCore) -> Result<Scene> {
    let scene = match name {
        "random_spheres" => random_spheres(rng),
        "two_perlin_spheres" => two_perlin_spheres(rng),
        "simple_light" => simple_light(rng),
        "cornell_box" => cornell_box(),
        "cornell_smoke" => cornell_smoke(),
        _ => return Err(Error::UnknownScene(name.to_string())),
    };
    debug!("Built scene {name} with {} objects", scene.world.len());
    Ok(scene)
}

fn camera(look_from: [f64; 3], look_at: [f64; 3], vertical_fov_deg: f64) -> CameraConfig {
    CameraConfig {
        look_from: SerdeVector(look_from),
        look_at: SerdeVector(look_at),
        v_up: SerdeVector([0.0, 1.0, 0.0]),
        vertical_fov_deg,
        aspect_ratio: None,
        aperture: 0.0,
        focus_distance: 10.0,
        time0: 0.0,
        time1: 1.0,
    }
}

/// Field of small random spheres around three large ones, on a checkered ground
pub fn random_spheres(rng: &mut dyn RngCore) -> Scene {
    let mut world = HittableList::default();

    let checker = Arc::new(Checker::from_solid_colors(
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ));
    world.add(Arc::new(Sphere::new(
        Point::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::from_texture(checker)),
    )));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = rng.gen::<f64>();
            let center = Point::new(
                a as f64 + 0.9 * rng.gen::<f64>(),
                0.2,
                b as f64 + 0.9 * rng.gen::<f64>(),
            );
            if (center - Point::new(4.0, 0.2, 0.0)).norm() <= 0.9 {
                continue;
            }

            let sphere_material: Material = if choose_mat < 0.8 {
                // diffuse
                let albedo = gen_random(rng, 0.0, 1.0).component_mul(&gen_random(rng, 0.0, 1.0));
                Arc::new(Lambertian::new(albedo))
            } else if choose_mat < 0.95 {
                // metal
                let albedo = gen_random(rng, 0.5, 1.0);
                let fuzz = rng.gen_range(0.0..0.5);
                Arc::new(Metal::new(albedo, fuzz))
            } else {
                // glass
                Arc::new(Dielectric::new(1.5))
            };
            world.add(Arc::new(Sphere::new(center, 0.2, sphere_material)));
        }
    }

    world.add(Arc::new(Sphere::new(
        Point::new(0.0, 1.0, 0.0),
        1.0,
        Arc::new(Dielectric::new(1.5)),
    )));
    world.add(Arc::new(Sphere::new(
        Point::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Lambertian::new(Color::new(0.4, 0.2, 0.1))),
    )));
    world.add(Arc::new(Sphere::new(
        Point::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    let mut camera = camera([13.0, 2.0, 3.0], [0.0, 0.0, 0.0], 20.0);
    camera.aperture = 0.1;
    Scene {
        world,
        camera,
        background: Color::new(0.7, 0.8, 1.0),
        aspect_ratio: WIDESCREEN,
    }
}

fn marble_spheres(rng: &mut dyn RngCore) -> HittableList {
    let marble: Material = Arc::new(Lambertian::from_texture(Arc::new(Noise::new(4.0, rng))));
    let mut world = HittableList::default();
    world.add(Arc::new(Sphere::new(
        Point::new(0.0, -1000.0, 0.0),
        1000.0,
        marble.clone(),
    )));
    world.add(Arc::new(Sphere::new(Point::new(0.0, 2.0, 0.0), 2.0, marble)));
    world
}

/// Two marble spheres under a daylight sky
pub fn two_perlin_spheres(rng: &mut dyn RngCore) -> Scene {
    Scene {
        world: marble_spheres(rng),
        camera: camera([13.0, 2.0, 3.0], [0.0, 0.0, 0.0], 20.0),
        background: Color::new(0.7, 0.8, 1.0),
        aspect_ratio: WIDESCREEN,
    }
}

/// The marble spheres lit only by a rectangular and a spherical lamp
pub fn simple_light(rng: &mut dyn RngCore) -> Scene {
    let mut world = marble_spheres(rng);
    let light: Material = Arc::new(DiffuseLight::from_color(Color::new(4.0, 4.0, 4.0)));
    world.add(Arc::new(Rectangle::xy(light.clone(), 3.0, 5.0, 1.0, 3.0, -2.0)));
    world.add(Arc::new(Sphere::new(Point::new(0.0, 7.0, 0.0), 2.0, light)));

    Scene {
        world,
        camera: camera([26.0, 3.0, 6.0], [0.0, 2.0, 0.0], 20.0),
        background: Color::zeros(),
        aspect_ratio: WIDESCREEN,
    }
}

/// The five walls of the box, without its light or contents. Returns the white wall material.
fn cornell_walls(world: &mut HittableList) -> Material {
    let red: Material = Arc::new(Lambertian::new(Color::new(0.65, 0.05, 0.05)));
    let white: Material = Arc::new(Lambertian::new(Color::new(0.73, 0.73, 0.73)));
    let green: Material = Arc::new(Lambertian::new(Color::new(0.12, 0.45, 0.15)));
    world.add(Arc::new(Rectangle::yz(green, 0.0, 555.0, 0.0, 555.0, 555.0)));
    world.add(Arc::new(Rectangle::yz(red, 0.0, 555.0, 0.0, 555.0, 0.0)));
    world.add(Arc::new(Rectangle::xz(white.clone(), 0.0, 555.0, 0.0, 555.0, 0.0)));
    world.add(Arc::new(Rectangle::xz(white.clone(), 0.0, 555.0, 0.0, 555.0, 555.0)));
    world.add(Arc::new(Rectangle::xy(white.clone(), 0.0, 555.0, 0.0, 555.0, 555.0)));
    white
}

/// The two blocks of the Cornell box, turned and moved into place
fn cornell_blocks(white: &Material) -> (HittableObj, HittableObj) {
    let tall: HittableObj = Arc::new(Cuboid::new(
        Point::zeros(),
        Point::new(165.0, 330.0, 165.0),
        white.clone(),
    ));
    let tall: HittableObj = Arc::new(Translate::new(
        Arc::new(RotateY::new(tall, 15.0)),
        Vec3::new(265.0, 0.0, 295.0),
    ));

    let short: HittableObj = Arc::new(Cuboid::new(
        Point::zeros(),
        Point::new(165.0, 165.0, 165.0),
        white.clone(),
    ));
    let short: HittableObj = Arc::new(Translate::new(
        Arc::new(RotateY::new(short, -18.0)),
        Vec3::new(130.0, 0.0, 65.0),
    ));
    (tall, short)
}

fn cornell_camera() -> CameraConfig {
    camera([278.0, 278.0, -800.0], [278.0, 278.0, 0.0], 40.0)
}

/// Cornell box with two rotated blocks
pub fn cornell_box() -> Scene {
    let mut world = HittableList::default();
    let white = cornell_walls(&mut world);
    let light: Material = Arc::new(DiffuseLight::from_color(Color::new(15.0, 15.0, 15.0)));
    world.add(Arc::new(Rectangle::xz(light, 213.0, 343.0, 227.0, 332.0, 554.0)));

    let (tall, short) = cornell_blocks(&white);
    world.add(tall);
    world.add(short);

    Scene {
        world,
        camera: cornell_camera(),
        background: Color::zeros(),
        aspect_ratio: 1.0,
    }
}

/// Cornell box whose blocks are filled with dark and light smoke
pub fn cornell_smoke() -> Scene {
    let mut world = HittableList::default();
    let white = cornell_walls(&mut world);
    let light: Material = Arc::new(DiffuseLight::from_color(Color::new(7.0, 7.0, 7.0)));
    world.add(Arc::new(Rectangle::xz(light, 113.0, 443.0, 127.0, 432.0, 554.0)));

    let (tall, short) = cornell_blocks(&white);
    world.add(Arc::new(ConstantMedium::from_color(tall, 0.01, Color::zeros())));
    world.add(Arc::new(ConstantMedium::from_color(
        short,
        0.01,
        Color::new(1.0, 1.0, 1.0),
    )));

    Scene {
        world,
        camera: cornell_camera(),
        background: Color::zeros(),
        aspect_ratio: 1.0,
    }
}
