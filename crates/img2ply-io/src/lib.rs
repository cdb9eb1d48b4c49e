#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
///
/// Defines [`IoError`](error::IoError) variants for missing inputs, file access
/// and decoding failures.
pub mod error;

/// High-level image reading functions.
///
/// See [`functional::read_image_any_rgba8`] for automatic format detection.
pub mod functional;

/// Discovery of the ordered image files forming a sequence.
pub mod sequence;

pub use crate::error::IoError;
pub use crate::functional::read_image_any_rgba8;
pub use crate::sequence::{list_image_sequence, resolve_inputs, SUPPORTED_FILE_EXTENSIONS};
