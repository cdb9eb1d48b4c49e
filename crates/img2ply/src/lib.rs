#![deny(missing_docs)]
//! Convert an image sequence to a PLY point cloud.
//!
//! Every image is a slice stacked along a depth axis; every sampled pixel becomes
//! a colored point inside a user supplied bounding box.
//!
//! ```no_run
//! use img2ply::{convert, BoundingBox, ConversionParams, DepthAxis};
//!
//! let bbox = BoundingBox::new(15.0, 10.0, 15.0)?;
//! let params = ConversionParams::default()
//!     .with_depth_axis(DepthAxis::Y)
//!     .with_depth_inverse(true);
//!
//! let summary = convert("scans/pumpkin", "pumpkin.ply", bbox, params)?;
//! println!("wrote {} points", summary.points);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#[doc(inline)]
pub use img2ply_image as image;

#[doc(inline)]
pub use img2ply_io as io;

#[doc(inline)]
pub use img2ply_3d as k3d;

/// The conversion pipeline from image files to a PLY file.
pub mod convert;

pub use convert::{convert, ConvertError, ConvertSummary, Converter};
pub use img2ply_3d::io::ply::Encoding;
pub use img2ply_3d::projection::{BoundingBox, ConversionParams, DepthAxis};
