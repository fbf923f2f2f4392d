//! Writing rendered images to disk

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::{Rgb, RgbImage};
use log::info;

use crate::renderer::Image;
use crate::utils::scale_color;
use crate::{Error, Result};

/// Save `image` to `path`, picking the format from the file extension
pub fn save(image: &Image, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "ppm" => {
            let mut writer = BufWriter::new(File::create(path)?);
            write_ppm(image, &mut writer)?;
            writer.flush()?;
        }
        "png" => to_rgb_image(image).save(path)?,
        _ => return Err(Error::UnsupportedFormat(path.display().to_string())),
    }
    info!("Saved {}x{} image to {}", image.width, image.height, path.display());
    Ok(())
}

/// Plain-text PPM, one pixel per line, top row first
pub fn write_ppm(image: &Image, writer: &mut impl Write) -> Result<()> {
    write!(writer, "P3\n{} {}\n255\n", image.width, image.height)?;
    for pixel in &image.pixels {
        writeln!(
            writer,
            "{} {} {}",
            scale_color(pixel[0]),
            scale_color(pixel[1]),
            scale_color(pixel[2])
        )?;
    }
    Ok(())
}

pub fn to_rgb_image(image: &Image) -> RgbImage {
    RgbImage::from_fn(image.width as u32, image.height as u32, |x, y| {
        let pixel = image.get(x as usize, y as usize);
        Rgb([
            scale_color(pixel[0]),
            scale_color(pixel[1]),
            scale_color(pixel[2]),
        ])
    })
}
