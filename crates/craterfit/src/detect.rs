use crate::io::{InputError, MaskContours, MaskSet};
use crate::report::ReportError;
use craterfit_core::ImageSize;
use craterfit_filter::{CraterDetection, CraterFilter, FilterConfig, FilterError, PolygonGeometry};
use log::{info, warn};
use std::path::Path;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced by the high-level facade helpers.
#[derive(thiserror::Error, Debug)]
pub enum RunError {
    #[error("input acquisition failed: {0}")]
    Input(#[from] InputError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Filter and deduplicate an in-memory mask set.
///
/// `image` overrides the dimensions stored in the set; a disagreement is logged.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(set, config), fields(masks = set.masks.len()))
)]
pub fn detect_mask_set(
    set: MaskSet,
    image: Option<ImageSize>,
    config: &FilterConfig,
) -> Result<CraterDetection, RunError> {
    let declared = set.image_size();
    let size = match image {
        Some(actual) => {
            if declared != actual && declared != ImageSize::new(0, 0) {
                warn!(
                    "mask set declares {}x{}, image is {}x{}; using the image",
                    declared.width, declared.height, actual.width, actual.height
                );
            }
            actual
        }
        None => declared,
    };

    let filter = CraterFilter::new(config.clone())?;
    let masks = set.into_region_masks()?;
    Ok(filter.detect(size, &masks, &MaskContours::default(), &PolygonGeometry)?)
}

/// Load a mask JSON file (and optionally the image for its dimensions), then run the filter.
pub fn detect_from_files(
    masks_path: impl AsRef<Path>,
    image_path: Option<&Path>,
    config: &FilterConfig,
) -> Result<CraterDetection, RunError> {
    let masks_path = masks_path.as_ref();
    let set = MaskSet::load_json(masks_path)?;
    info!("loaded {} masks from {}", set.masks.len(), masks_path.display());
    let size = image_path.map(image_size).transpose()?;
    detect_mask_set(set, size, config)
}

#[cfg(feature = "image")]
fn image_size(path: &Path) -> Result<ImageSize, InputError> {
    crate::render::image_size(path)
}

#[cfg(not(feature = "image"))]
fn image_size(path: &Path) -> Result<ImageSize, InputError> {
    Err(InputError::Io {
        path: path.to_path_buf(),
        source: std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "image decoding requires the `image` feature",
        ),
    })
}
