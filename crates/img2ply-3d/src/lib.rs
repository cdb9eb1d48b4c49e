#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// I/O utilities for reading and writing 3D data.
pub mod io;

/// Point cloud container.
pub mod pointcloud;

/// Mapping of image slices into a bounding box.
pub mod projection;

/// Selection of the pixels visited in each slice.
pub mod sampling;
