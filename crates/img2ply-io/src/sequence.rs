use std::path::{Path, PathBuf};

use crate::error::IoError;

/// File extensions, compared case-insensitively, recognized as image slices.
pub const SUPPORTED_FILE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_FILE_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}

/// List the image files of a directory in sequence order.
///
/// Files are sorted by name, so slices must be numbered (zero padded) for the
/// order to be meaningful. Files with an unsupported extension are skipped.
///
/// # Errors
///
/// Returns [`IoError::InputNotFound`] if the directory does not exist or holds
/// no supported image.
pub fn list_image_sequence(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, IoError> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(IoError::InputNotFound(dir.to_path_buf()));
    }

    let mut images = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_supported_image(&path) {
            images.push(path);
        } else {
            log::debug!("skipping {}", path.display());
        }
    }

    if images.is_empty() {
        return Err(IoError::InputNotFound(dir.to_path_buf()));
    }

    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(images)
}

/// Turn user supplied inputs into the ordered list of slices to convert.
///
/// A single directory is expanded with [`list_image_sequence`]. Anything else is
/// taken as an explicit list of image files, kept in the given order.
///
/// # Errors
///
/// Returns [`IoError::InputNotFound`] for an empty list or for a listed file
/// that does not exist.
pub fn resolve_inputs<P: AsRef<Path>>(inputs: &[P]) -> Result<Vec<PathBuf>, IoError> {
    match inputs {
        [] => Err(IoError::InputNotFound(PathBuf::new())),
        [single] if single.as_ref().is_dir() => list_image_sequence(single),
        files => files
            .iter()
            .map(|file| {
                let file = file.as_ref();
                if file.is_file() {
                    Ok(file.to_path_buf())
                } else {
                    Err(IoError::InputNotFound(file.to_path_buf()))
                }
            })
            .collect(),
    }
}
