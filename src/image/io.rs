//! Loading and saving images through the `image` crate, gated behind the
//! `io` feature so the core engine can be used without it.

use std::path::Path;

use super::Image;
use crate::error::BuildError;

/// Loads an image from `path`, converting it to 8-bit RGBA.
///
/// Format is sniffed from content by the `image` crate, not from the
/// extension; callers that need to enforce an extension allowlist (as
/// `wfc-gen` does) check it themselves before calling this.
pub fn load(path: impl AsRef<Path>) -> Result<Image, BuildError> {
    let dynamic = image::open(path.as_ref()).map_err(|_| BuildError::MalformedImage)?;
    let rgba = dynamic.to_rgba8();
    let (width, height) = rgba.dimensions();
    Image::new(rgba.into_raw(), width as usize, height as usize, 4)
}

/// Saves `img` to `path`; the output format is inferred from the extension.
pub fn save(img: &Image, path: impl AsRef<Path>) -> Result<(), BuildError> {
    let buffer =
        image::RgbaImage::from_raw(img.width() as u32, img.height() as u32, img.data().to_vec())
            .ok_or(BuildError::MalformedImage)?;
    buffer.save(path.as_ref()).map_err(|_| BuildError::MalformedImage)
}
