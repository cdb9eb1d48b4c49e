use std::path::Path;

use img2ply_image::{Image, ImageSize};

use crate::error::IoError;

/// Reads an image from the given file path as RGBA with 8 bits per channel.
///
/// The method tries to read from any image format supported by the image crate.
/// Images without an alpha channel are returned fully opaque (alpha 255) and
/// higher bit depths are scaled down to 8 bits.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An RGBA image with four channels (rgba8).
pub fn read_image_any_rgba8(file_path: impl AsRef<Path>) -> Result<Image<u8, 4>, IoError> {
    let file_path = file_path.as_ref();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    // open the file and map it to memory
    let file = std::fs::File::open(file_path)?;
    let mmap = unsafe { memmap2::Mmap::map(&file)? };

    // decode the data directly from memory
    let img = image::ImageReader::new(std::io::Cursor::new(&mmap[..]))
        .with_guessed_format()?
        .decode()?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    log::debug!(
        "decoded {} ({}, {:?})",
        file_path.display(),
        size,
        img.color()
    );

    Ok(Image::new(size, img.into_rgba8().into_raw())?)
}
