//! Overlay of the final circles on the source image.

use crate::io::InputError;
use crate::report::ReportError;
use craterfit_core::ImageSize;
use craterfit_filter::CircleCandidate;
use image::{ImageFormat, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut};
use std::path::Path;

pub const OVERLAY_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
/// Ring is drawn at radius `r - 1`, `r` and `r + 1`.
const RING_HALF_WIDTH: i32 = 1;
const DOT_RADIUS: i32 = 3;

/// Image dimensions read from the file header.
pub fn image_size(path: impl AsRef<Path>) -> Result<ImageSize, InputError> {
    let path = path.as_ref();
    let (width, height) = image::image_dimensions(path).map_err(|source| InputError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(ImageSize::new(width, height))
}

pub fn load_rgb(path: impl AsRef<Path>) -> Result<RgbImage, InputError> {
    let path = path.as_ref();
    image::open(path)
        .map(|img| img.to_rgb8())
        .map_err(|source| InputError::Image {
            path: path.to_path_buf(),
            source,
        })
}

/// Draw every circle as a 3 px ring with a filled center dot.
///
/// Centers and radii are rounded to whole pixels; parts outside the image are clipped.
pub fn draw_circles(img: &mut RgbImage, circles: &[CircleCandidate]) {
    for c in circles {
        let center = (c.x().round() as i32, c.y().round() as i32);
        let r = c.r().round() as i32;
        for ring in (r - RING_HALF_WIDTH).max(0)..=r + RING_HALF_WIDTH {
            draw_hollow_circle_mut(img, center, ring, OVERLAY_COLOR);
        }
        draw_filled_circle_mut(img, center, DOT_RADIUS, OVERLAY_COLOR);
    }
}

/// Draw the circles onto `img` and save it as PNG.
pub fn write_overlay(
    mut img: RgbImage,
    circles: &[CircleCandidate],
    path: impl AsRef<Path>,
) -> Result<(), ReportError> {
    draw_circles(&mut img, circles);
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}
