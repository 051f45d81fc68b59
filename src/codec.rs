// File <-> PixelBuffer, via the `image` crate.

use std::path::Path;

use image::ImageFormat;

use crate::error::{Error, Result};
use crate::types::PixelBuffer;

/// File name used when the user exports without choosing one.
pub const DEFAULT_EXPORT_NAME: &str = "displaced_image.png";

/// Decode any format `image` understands into RGBA8.
pub fn load(path: impl AsRef<Path>) -> Result<PixelBuffer> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let rgba = img.to_rgba8();
    log::info!("loaded {} ({}x{})", path.display(), rgba.width(), rgba.height());
    Ok(PixelBuffer::from(rgba))
}

/// Write `buffer` as a PNG.
pub fn save_png(buffer: &PixelBuffer, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let img = buffer.clone().into_rgba_image()?;
    img.save_with_format(path, ImageFormat::Png)
        .map_err(|source| Error::Encode {
            path: path.to_path_buf(),
            source,
        })?;
    log::info!("saved {}", path.display());
    Ok(())
}
