//! Parallel render drivers
//!
//! Every pixel draws from its own generator, seeded from the render seed and the pixel's index,
//! so the image is the same whichever driver runs it and however the work is scheduled.

use std::sync::{mpsc, Arc};

use indicatif::ProgressBar;
use log::{debug, error, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use threadpool::ThreadPool;

use crate::cameras::Camera;
use crate::objects::{Hittable, HittableObj};
use crate::utils;
use crate::{Color, Error, Result};

/// What the render driver needs to know besides the scene and camera
#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub width: usize,
    pub height: usize,
    pub samples_per_pixel: u32,
    pub max_depth: u32,
    /// Radiance of rays that escape the scene
    pub background: Color,
    pub seed: u64,
}
impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 400,
            height: 225,
            samples_per_pixel: 100,
            max_depth: 50,
            background: Color::zeros(),
            seed: 0,
        }
    }
}

/// Rendered image
///
/// Row-major, top row first. Every channel is gamma corrected and clamped to `[0, 0.999]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Color>,
}
impl Image {
    pub fn get(&self, x: usize, y: usize) -> Color {
        self.pixels[y * self.width + x]
    }
}

/// Everything a scanline needs, shared between render threads
struct Frame {
    world: HittableObj,
    camera: Camera,
    settings: RenderSettings,
}
impl Frame {
    fn render_row(&self, row: usize) -> Vec<Color> {
        render_row(&*self.world, &self.camera, &self.settings, row)
    }
}

/// Renders a scene through a camera
pub struct Renderer {
    frame: Arc<Frame>,
    progress: Option<ProgressBar>,
}
impl Renderer {
    pub fn new(world: HittableObj, camera: Camera, settings: RenderSettings) -> Self {
        Self {
            frame: Arc::new(Frame {
                world,
                camera,
                settings,
            }),
            progress: None,
        }
    }

    /// Tick `progress` once per finished scanline
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.frame.settings
    }

    /// Render on the rayon pool, one task per scanline
    pub fn render(&self) -> Image {
        let RenderSettings { width, height, .. } = self.frame.settings;
        info!("Rendering {width}x{height} on the rayon pool");
        let mut pixels = vec![Color::zeros(); width * height];
        if width > 0 {
            pixels
                .par_chunks_mut(width)
                .enumerate()
                .for_each(|(row, out)| {
                    out.copy_from_slice(&self.frame.render_row(row));
                    self.tick();
                });
        }
        self.finish();
        Image {
            width,
            height,
            pixels,
        }
    }

    /// Render on a fixed pool of `workers` threads
    ///
    /// Scanlines are issued bottom to top; each result lands in its own row of the image, so the
    /// order they finish in does not matter. Blocks until every job is done, and fails rather than
    /// hand back an image with rows missing.
    pub fn render_with_pool(&self, workers: usize) -> Result<Image> {
        let RenderSettings { width, height, .. } = self.frame.settings;
        let workers = workers.max(1);
        info!("Rendering {width}x{height} on {workers} worker threads");

        let pool = ThreadPool::new(workers);
        let (tx, rx) = mpsc::channel();
        for row in (0..height).rev() {
            let tx = tx.clone();
            let frame = Arc::clone(&self.frame);
            pool.execute(move || {
                // The receiver is held until every row arrives
                let _ = tx.send((row, frame.render_row(row)));
            });
        }
        drop(tx);

        // A panicking job drops its sender without sending, so the channel can close early
        let mut pixels = vec![Color::zeros(); width * height];
        let mut rendered = 0;
        for (row, colors) in rx.iter().take(height) {
            pixels[row * width..(row + 1) * width].copy_from_slice(&colors);
            rendered += 1;
            self.tick();
        }
        pool.join();

        let panicked = pool.panic_count();
        if rendered < height || panicked > 0 {
            error!("{panicked} render jobs panicked, {rendered} of {height} rows finished");
            return Err(Error::IncompleteRender {
                rendered,
                expected: height,
            });
        }
        self.finish();

        Ok(Image {
            width,
            height,
            pixels,
        })
    }

    fn tick(&self) {
        if let Some(progress) = &self.progress {
            progress.inc(1);
        }
    }

    fn finish(&self) {
        if let Some(progress) = &self.progress {
            progress.finish();
        }
        debug!("Render finished");
    }
}

/// Render one row of the image, `row` counted from the top
fn render_row(
    world: &dyn Hittable,
    camera: &Camera,
    settings: &RenderSettings,
    row: usize,
) -> Vec<Color> {
    // Camera coordinates run bottom to top
    let j = settings.height - 1 - row;
    (0..settings.width)
        .map(|i| {
            let index = row * settings.width + i;
            let mut rng = StdRng::seed_from_u64(pixel_seed(settings.seed, index));
            let mut pixel_color = Color::zeros();
            for _ in 0..settings.samples_per_pixel {
                let u = (i as f64 + rng.gen::<f64>()) / (settings.width.max(2) - 1) as f64;
                let v = (j as f64 + rng.gen::<f64>()) / (settings.height.max(2) - 1) as f64;
                let ray = camera.get_ray(u, v, &mut rng);
                let sample = ray.get_color(world, settings.max_depth, &settings.background, &mut rng);
                // A stray NaN or infinity would poison the whole pixel
                if sample.iter().all(|c| c.is_finite()) {
                    pixel_color += sample;
                }
            }
            utils::gamma_correct(&pixel_color, settings.samples_per_pixel.max(1))
        })
        .collect()
}

/// Seed for the pixel at `index`, spreading neighbouring indices across the seed space
fn pixel_seed(seed: u64, index: usize) -> u64 {
    seed ^ (index as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::{Lambertian, Metal, ScatterResult, Scatterable};
    use crate::objects::{HitRecord, HittableList, Sphere};
    use crate::{Point, Ray, Vec3};
    use rand::RngCore;

    fn two_spheres() -> HittableObj {
        let mut world = HittableList::default();
        world.add(Arc::new(Sphere::new(
            Point::new(0.0, -1000.0, 0.0),
            1000.0,
            Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5))),
        )));
        world.add(Arc::new(Sphere::new(
            Point::new(0.0, 1.0, 0.0),
            1.0,
            Arc::new(Metal::new(Color::new(0.8, 0.6, 0.2), 0.0)),
        )));
        Arc::new(world)
    }

    fn level_camera() -> Camera {
        Camera::new(
            Point::new(0.0, 3.0, 10.0),
            Point::new(0.0, 3.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            40.0,
            2.0,
            0.0,
            10.0,
            0.0,
            0.0,
        )
    }

    fn small_settings(seed: u64) -> RenderSettings {
        RenderSettings {
            width: 40,
            height: 20,
            samples_per_pixel: 2,
            max_depth: 5,
            background: Color::new(0.7, 0.8, 1.0),
            seed,
        }
    }

    #[test]
    fn two_sphere_scene() {
        let settings = small_settings(42);
        let background = settings.background;
        let image = Renderer::new(two_spheres(), level_camera(), settings).render();
        assert_eq!(image.width, 40);
        assert_eq!(image.height, 20);
        assert_eq!(image.pixels.len(), 800);

        // The top row looks up past everything
        let sky = utils::gamma_correct(&background, 1);
        for x in 0..40 {
            assert!((image.get(x, 0) - sky).norm() < 1e-12);
        }

        // Low in the middle of the frame is the metal sphere
        let sphere = image.get(20, 15);
        assert!((sphere - sky).norm() > 0.05, "{sphere:?} looks like sky");

        for pixel in &image.pixels {
            assert!(pixel.iter().all(|c| (0.0..=0.999).contains(c)));
        }
    }

    #[test]
    fn drivers_agree() {
        let renderer = Renderer::new(two_spheres(), level_camera(), small_settings(7));
        let parallel = renderer.render();
        let pooled = renderer.render_with_pool(3).unwrap();
        assert_eq!(parallel, pooled);
        assert_eq!(parallel, renderer.render_with_pool(1).unwrap());
    }

    #[test]
    fn seed_controls_noise() {
        let a = Renderer::new(two_spheres(), level_camera(), small_settings(1)).render();
        let b = Renderer::new(two_spheres(), level_camera(), small_settings(1)).render();
        let c = Renderer::new(two_spheres(), level_camera(), small_settings(2)).render();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn progress_counts_rows() {
        let progress = ProgressBar::hidden();
        let renderer = Renderer::new(two_spheres(), level_camera(), small_settings(0))
            .with_progress(progress.clone());
        renderer.render_with_pool(2).unwrap();
        assert_eq!(progress.position(), 20);
    }

    struct Glitch;
    impl Scatterable for Glitch {
        fn try_scatter(
            &self,
            _ray_in: &Ray,
            _hit_record: &HitRecord,
            _rng: &mut dyn RngCore,
        ) -> Option<ScatterResult> {
            None
        }

        fn emitted(&self, _u: f64, _v: f64, _p: &Point) -> Color {
            Color::repeat(f64::NAN)
        }
    }

    #[test]
    fn non_finite_samples_are_dropped() {
        let mut world = HittableList::default();
        world.add(Arc::new(Sphere::new(
            Point::new(0.0, 3.0, 0.0),
            100.0,
            Arc::new(Glitch),
        )));
        let settings = RenderSettings {
            width: 4,
            height: 2,
            samples_per_pixel: 3,
            max_depth: 3,
            background: Color::new(1.0, 1.0, 1.0),
            seed: 0,
        };
        // The camera sits inside the sphere, so every sample is NaN
        let image = Renderer::new(Arc::new(world), level_camera(), settings).render();
        for pixel in &image.pixels {
            assert_eq!(*pixel, Color::zeros());
        }
    }

    struct Fragile;
    impl Scatterable for Fragile {
        fn try_scatter(
            &self,
            _ray_in: &Ray,
            _hit_record: &HitRecord,
            _rng: &mut dyn RngCore,
        ) -> Option<ScatterResult> {
            panic!("scatter failed");
        }
    }

    #[test]
    fn pool_reports_rows_lost_to_panics() {
        let mut world = HittableList::default();
        world.add(Arc::new(Sphere::new(
            Point::new(0.0, -1000.0, 0.0),
            1000.0,
            Arc::new(Fragile),
        )));
        let settings = RenderSettings {
            width: 8,
            height: 8,
            samples_per_pixel: 1,
            max_depth: 3,
            background: Color::new(0.7, 0.8, 1.0),
            seed: 0,
        };
        // The lower rows look down at the floor, the upper rows only see sky
        let renderer = Renderer::new(Arc::new(world), level_camera(), settings);
        match renderer.render_with_pool(2) {
            Err(Error::IncompleteRender { rendered, expected }) => {
                assert_eq!(expected, 8);
                assert!(rendered < 8);
            }
            Err(e) => panic!("unexpected error {e}"),
            Ok(_) => panic!("partial image returned"),
        }
    }
}
