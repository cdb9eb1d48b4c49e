#![deny(missing_docs)]
//! Image types used as slices of an image sequence

/// image representation for the slices of a sequence.
pub mod image;

/// Error types for the image module.
pub mod error;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
