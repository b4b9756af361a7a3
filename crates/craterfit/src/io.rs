//! JSON inputs: the mask set produced by the segmentation stage and the run config.

use craterfit_core::{Contour, ImageSize};
use craterfit_filter::{ContourSource, FilterConfig, RegionMask};
use serde::{Deserialize, Serialize};
use std::{
    borrow::Cow,
    fs,
    path::{Path, PathBuf},
};

/// Failure to acquire one of the run inputs.
#[derive(thiserror::Error, Debug)]
pub enum InputError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[cfg(feature = "image")]
    #[error("failed to open image {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("mask {index}: invalid segmentation: {source}")]
    InvalidMask {
        index: usize,
        #[source]
        source: RleError,
    },

    #[error("mask {index}: raster segmentation needs the `image` feature")]
    RasterUnsupported { index: usize },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RleError {
    #[error("run lengths cover {got} pixels, a {width}x{height} mask has {expected}")]
    LengthMismatch {
        width: u32,
        height: u32,
        expected: u64,
        got: u64,
    },
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, InputError> {
    let raw = fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| InputError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Uncompressed COCO run-length mask.
///
/// `size` is `[height, width]`. Pixels are visited column by column and the
/// runs alternate background / foreground, starting with background.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RleMask {
    pub size: [u32; 2],
    pub counts: Vec<u32>,
}

impl RleMask {
    pub fn height(&self) -> u32 {
        self.size[0]
    }

    pub fn width(&self) -> u32 {
        self.size[1]
    }

    /// Encode the pixels for which `inside(x, y)` holds.
    pub fn from_fn(width: u32, height: u32, inside: impl Fn(u32, u32) -> bool) -> Self {
        let mut counts = Vec::new();
        let mut current = false;
        let mut run = 0u32;
        for x in 0..width {
            for y in 0..height {
                if inside(x, y) != current {
                    counts.push(run);
                    current = !current;
                    run = 0;
                }
                run += 1;
            }
        }
        counts.push(run);
        Self {
            size: [height, width],
            counts,
        }
    }

    /// Row-major pixels, 255 for foreground and 0 for background.
    pub fn decode(&self) -> Result<Vec<u8>, RleError> {
        let (width, height) = (self.width(), self.height());
        let expected = u64::from(width) * u64::from(height);
        let got: u64 = self.counts.iter().map(|&c| u64::from(c)).sum();
        if got != expected {
            return Err(RleError::LengthMismatch {
                width,
                height,
                expected,
                got,
            });
        }

        let (w, h) = (width as usize, height as usize);
        let mut pixels = vec![0u8; w * h];
        let mut offset = 0usize;
        for (k, &count) in self.counts.iter().enumerate() {
            let count = count as usize;
            if k % 2 == 1 {
                for i in offset..offset + count {
                    pixels[(i % h) * w + i / h] = 255;
                }
            }
            offset += count;
        }
        Ok(pixels)
    }

    #[cfg(feature = "image")]
    pub fn to_image(&self) -> Result<image::GrayImage, RleError> {
        let pixels = self.decode()?;
        let got = pixels.len() as u64;
        image::GrayImage::from_raw(self.width(), self.height(), pixels).ok_or(
            RleError::LengthMismatch {
                width: self.width(),
                height: self.height(),
                expected: u64::from(self.width()) * u64::from(self.height()),
                got,
            },
        )
    }
}

/// One region proposal: traced polygon contours, a raster mask, or both.
///
/// Non-empty `contours` win over `segmentation`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MaskRecord {
    #[serde(default)]
    pub area: u32,
    #[serde(default)]
    pub stability_score: f32,
    #[serde(default)]
    pub predicted_iou: f32,
    /// Outer boundaries of the mask's connected components, in pixel coordinates.
    #[serde(default)]
    pub contours: Vec<Contour>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segmentation: Option<RleMask>,
}

impl MaskRecord {
    fn into_region_mask(self, index: usize) -> Result<RegionMask<MaskPayload>, InputError> {
        let segmentation = match self.segmentation {
            Some(rle) if self.contours.is_empty() => raster_payload(index, &rle)?,
            _ => MaskPayload::Contours(self.contours),
        };
        Ok(RegionMask {
            segmentation,
            area: self.area,
            stability_score: self.stability_score,
            predicted_iou: self.predicted_iou,
        })
    }
}

#[cfg(feature = "image")]
fn raster_payload(index: usize, rle: &RleMask) -> Result<MaskPayload, InputError> {
    rle.to_image()
        .map(MaskPayload::Raster)
        .map_err(|source| InputError::InvalidMask { index, source })
}

#[cfg(not(feature = "image"))]
fn raster_payload(index: usize, rle: &RleMask) -> Result<MaskPayload, InputError> {
    rle.decode()
        .map_err(|source| InputError::InvalidMask { index, source })?;
    Err(InputError::RasterUnsupported { index })
}

/// Segmentation carried by a loaded mask.
#[derive(Clone, Debug, PartialEq)]
pub enum MaskPayload {
    Contours(Vec<Contour>),
    #[cfg(feature = "image")]
    Raster(image::GrayImage),
}

/// [`ContourSource`] for [`MaskPayload`]: polygons pass through, rasters are traced.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaskContours {
    #[cfg(feature = "image")]
    pub raster: crate::raster::RasterContours,
}

impl ContourSource<MaskPayload> for MaskContours {
    fn contours<'a>(&self, segmentation: &'a MaskPayload) -> Cow<'a, [Contour]> {
        match segmentation {
            MaskPayload::Contours(contours) => Cow::Borrowed(contours.as_slice()),
            #[cfg(feature = "image")]
            MaskPayload::Raster(mask) => self.raster.contours(mask),
        }
    }
}

/// Mask generator output for a single image.
///
/// `width`/`height` may be omitted (0) when the image itself is supplied to the run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MaskSet {
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub masks: Vec<MaskRecord>,
}

impl MaskSet {
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, InputError> {
        read_json(path.as_ref())
    }

    pub fn image_size(&self) -> ImageSize {
        ImageSize::new(self.width, self.height)
    }

    /// Consume the set into filter inputs, decoding raster segmentations.
    pub fn into_region_masks(self) -> Result<Vec<RegionMask<MaskPayload>>, InputError> {
        self.masks
            .into_iter()
            .enumerate()
            .map(|(index, rec)| rec.into_region_mask(index))
            .collect()
    }
}

/// Configuration of a full run: inputs, outputs and filter parameters.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub masks_path: Option<String>,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub csv_path: Option<String>,
    #[serde(default)]
    pub report_path: Option<String>,
    #[serde(default)]
    pub overlay_path: Option<String>,
    #[serde(default)]
    pub filter: FilterConfig,
}

impl RunConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, InputError> {
        read_json(path.as_ref())
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), crate::report::ReportError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the CSV output path.
    pub fn csv_path(&self) -> PathBuf {
        self.csv_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("craters.csv"))
    }
}
