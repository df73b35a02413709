//! Image reference resolution.

use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// A resolved image and its natural size in pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    /// File the reference resolved to
    pub path: PathBuf,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Resolves image references found in the input.
pub trait ImageSource {
    /// Resolve `reference` and read its dimensions.
    ///
    /// `Ok(None)` means the image is missing or cannot be decoded, which
    /// layout treats as a warning. `Err` is reserved for failures of the
    /// source itself, such as a file that exists but cannot be opened, and
    /// aborts the render.
    fn probe(&self, reference: &str) -> Result<Option<ImageInfo>>;
}

/// Image source backed by the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct FsImageSource {
    base_dir: Option<PathBuf>,
}

impl FsImageSource {
    /// Create a source resolving relative references against the working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative references against `dir` as well.
    pub fn with_base_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(dir.into()),
        }
    }

    /// Candidate files for a reference, in lookup order.
    pub fn candidates(&self, reference: &str) -> Vec<PathBuf> {
        let reference = reference.strip_prefix("file://").unwrap_or(reference);
        let path = Path::new(reference);
        let mut candidates = vec![path.to_path_buf()];

        if path.is_relative() {
            if let Some(ref base) = self.base_dir {
                candidates.push(base.join(path));
            }
        } else {
            // absolute references written by another machine: try them relative
            let relative: PathBuf = path
                .components()
                .filter(|c| matches!(c, Component::Normal(_)))
                .collect();
            if !relative.as_os_str().is_empty() {
                if let Some(ref base) = self.base_dir {
                    candidates.push(base.join(&relative));
                }
                candidates.push(relative);
            }
        }

        candidates
    }
}

impl ImageSource for FsImageSource {
    fn probe(&self, reference: &str) -> Result<Option<ImageInfo>> {
        let Some(path) = self.candidates(reference).into_iter().find(|p| p.is_file()) else {
            log::debug!("Image '{}' not found", reference);
            return Ok(None);
        };

        match image::image_dimensions(&path) {
            Ok((width, height)) if width > 0 && height > 0 => Ok(Some(ImageInfo {
                path,
                width,
                height,
            })),
            Ok(_) => {
                log::warn!("Image '{}' has no pixels", path.display());
                Ok(None)
            }
            Err(e) => read_failure(reference, &path, e),
        }
    }
}

/// Split read failures into source errors and undecodable images.
fn read_failure(reference: &str, path: &Path, err: image::ImageError) -> Result<Option<ImageInfo>> {
    match err {
        image::ImageError::IoError(e)
            if !matches!(e.kind(), io::ErrorKind::UnexpectedEof | io::ErrorKind::InvalidData) =>
        {
            Err(Error::ImageSource {
                path: reference.to_string(),
                reason: format!("{}: {}", path.display(), e),
            })
        }
        other => {
            log::warn!("Cannot read image '{}': {}", path.display(), other);
            Ok(None)
        }
    }
}
