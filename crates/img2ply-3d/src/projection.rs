use std::fmt;
use std::str::FromStr;

use img2ply_image::{Image, ImageError, ImageSize};

use crate::pointcloud::PointCloud;
use crate::sampling::SampleGrid;

/// Alpha value below which pixels are dropped when alpha filtering is enabled.
pub const DEFAULT_ALPHA_THRESHOLD: u8 = 25;

/// Error types for the projection module.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ProjectionError {
    /// The bounding box has a negative or non finite extent.
    #[error("Invalid bounding box extents {0:?}, expected finite non-negative values")]
    InvalidBoundingBox([f64; 3]),

    /// A slice does not have the size of the first slice of the sequence.
    #[error("Image {index} has size {found}, expected {expected} like the first image")]
    DimensionMismatch {
        /// Position of the offending slice in the sequence.
        index: usize,
        /// Size of the first slice.
        expected: ImageSize,
        /// Size of the offending slice.
        found: ImageSize,
    },

    /// A slice index outside the declared sequence length.
    #[error("Image index {0} is outside a sequence of {1} images")]
    IndexOutOfRange(usize, usize),

    /// Failed to access the pixels of a slice.
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// The axis along which successive slices are stacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthAxis {
    /// Slices are stacked along x, the image spans z (width) and y (height).
    X,
    /// Slices are stacked along y, the image spans x (width) and z (height).
    Y,
    /// Slices are stacked along z, the image spans x (width) and y (height).
    #[default]
    Z,
}

impl DepthAxis {
    /// Indices into `[x, y, z]` receiving the image width, image height and depth.
    pub const fn axes(self) -> [usize; 3] {
        match self {
            DepthAxis::X => [2, 1, 0],
            DepthAxis::Y => [0, 2, 1],
            DepthAxis::Z => [0, 1, 2],
        }
    }

    /// Place the width, height and depth coordinates on their `[x, y, z]` axes.
    #[inline]
    pub fn assemble(self, along_width: f64, along_height: f64, depth: f64) -> [f64; 3] {
        match self {
            DepthAxis::X => [depth, along_height, along_width],
            DepthAxis::Y => [along_width, depth, along_height],
            DepthAxis::Z => [along_width, along_height, depth],
        }
    }
}

impl fmt::Display for DepthAxis {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            DepthAxis::X => "x",
            DepthAxis::Y => "y",
            DepthAxis::Z => "z",
        })
    }
}

impl FromStr for DepthAxis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "x" => Ok(DepthAxis::X),
            "y" => Ok(DepthAxis::Y),
            "z" => Ok(DepthAxis::Z),
            _ => Err(format!(
                "Invalid depth direction: {s}. Valid arguments: 'x', 'y' or 'z'"
            )),
        }
    }
}

/// Extents of the box the slices are mapped into, along x, y and z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    extents: [f64; 3],
}

impl BoundingBox {
    /// Create a bounding box from its extents along x, y and z.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError::InvalidBoundingBox`] for negative, NaN or
    /// infinite extents.
    pub fn new(x: f64, y: f64, z: f64) -> Result<Self, ProjectionError> {
        let extents = [x, y, z];
        if extents.iter().any(|e| !e.is_finite() || *e < 0.0) {
            return Err(ProjectionError::InvalidBoundingBox(extents));
        }
        Ok(Self { extents })
    }

    /// Extents along x, y and z.
    pub fn extents(&self) -> [f64; 3] {
        self.extents
    }

    /// Extents covered by the image width, the image height and the depth.
    pub fn oriented(&self, axis: DepthAxis) -> [f64; 3] {
        let [w, h, d] = axis.axes();
        [self.extents[w], self.extents[h], self.extents[d]]
    }
}

impl TryFrom<[f64; 3]> for BoundingBox {
    type Error = ProjectionError;

    fn try_from(extents: [f64; 3]) -> Result<Self, Self::Error> {
        BoundingBox::new(extents[0], extents[1], extents[2])
    }
}

impl FromStr for BoundingBox {
    type Err = String;

    /// Parse `"x,y,z"` extents.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|v| v.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("Invalid bounding box {s}: {e}"))?;

        let extents: [f64; 3] = values
            .try_into()
            .map_err(|_| format!("Invalid bounding box {s}: expected three values x,y,z"))?;

        BoundingBox::try_from(extents).map_err(|e| e.to_string())
    }
}

/// Parameters of a conversion, constant for all the slices of a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionParams {
    /// Axis along which the slices are stacked.
    pub depth_axis: DepthAxis,
    /// Place the first slice at the far end of the depth axis.
    pub depth_inverse: bool,
    /// Drop pixels whose alpha is below `alpha_threshold`.
    pub ignore_alpha: bool,
    /// Alpha cut-off used when `ignore_alpha` is set.
    pub alpha_threshold: u8,
    /// Columns visited per slice, 0 for all of them.
    pub width_samples: usize,
    /// Rows visited per slice, 0 for all of them.
    pub height_samples: usize,
    /// Use the same pixel step for columns and rows.
    pub maintain_aspect_ratio: bool,
    /// Carry the alpha channel into the point cloud.
    pub keep_alpha: bool,
}

impl Default for ConversionParams {
    fn default() -> Self {
        Self {
            depth_axis: DepthAxis::Z,
            depth_inverse: false,
            ignore_alpha: true,
            alpha_threshold: DEFAULT_ALPHA_THRESHOLD,
            width_samples: 0,
            height_samples: 0,
            maintain_aspect_ratio: true,
            keep_alpha: false,
        }
    }
}

impl ConversionParams {
    /// Set the axis along which the slices are stacked.
    pub fn with_depth_axis(mut self, depth_axis: DepthAxis) -> Self {
        self.depth_axis = depth_axis;
        self
    }

    /// Reverse the placement of the slices.
    pub fn with_depth_inverse(mut self, depth_inverse: bool) -> Self {
        self.depth_inverse = depth_inverse;
        self
    }

    /// Enable or disable the alpha filter.
    pub fn with_ignore_alpha(mut self, ignore_alpha: bool) -> Self {
        self.ignore_alpha = ignore_alpha;
        self
    }

    /// Set the alpha cut-off of the alpha filter.
    pub fn with_alpha_threshold(mut self, alpha_threshold: u8) -> Self {
        self.alpha_threshold = alpha_threshold;
        self
    }

    /// Set the number of columns and rows sampled per slice.
    pub fn with_samples(mut self, width_samples: usize, height_samples: usize) -> Self {
        self.width_samples = width_samples;
        self.height_samples = height_samples;
        self
    }

    /// Share the pixel step between columns and rows.
    pub fn with_maintain_aspect_ratio(mut self, maintain_aspect_ratio: bool) -> Self {
        self.maintain_aspect_ratio = maintain_aspect_ratio;
        self
    }

    /// Carry the alpha channel into the point cloud.
    pub fn with_keep_alpha(mut self, keep_alpha: bool) -> Self {
        self.keep_alpha = keep_alpha;
        self
    }

    #[inline]
    fn keeps(&self, alpha: u8) -> bool {
        !self.ignore_alpha || alpha >= self.alpha_threshold
    }
}

/// Projects the slices of a sequence into a bounding box, one slice at a time.
///
/// The sample grid is fixed by the first projected slice; later slices must have
/// the same size. Slices can be dropped as soon as they are projected.
///
/// # Example
///
/// ```
/// use img2ply_image::Image;
/// use img2ply_3d::pointcloud::PointCloud;
/// use img2ply_3d::projection::{BoundingBox, ConversionParams, Projector};
///
/// let bbox = BoundingBox::new(2.0, 2.0, 1.0).unwrap();
/// let params = ConversionParams::default().with_ignore_alpha(false);
/// let mut projector = Projector::new(bbox, params, 1);
///
/// let image = Image::<u8, 4>::from_size_val([2, 2].into(), 255).unwrap();
/// let mut cloud = PointCloud::new(false);
/// projector.project(0, &image, &mut cloud).unwrap();
///
/// assert_eq!(cloud.points(), &[
///     [0.0, 0.0, 0.0],
///     [2.0, 0.0, 0.0],
///     [0.0, 2.0, 0.0],
///     [2.0, 2.0, 0.0],
/// ]);
/// ```
#[derive(Debug, Clone)]
pub struct Projector {
    params: ConversionParams,
    // width, height and depth extents after orientation
    extents: [f64; 3],
    sequence_len: usize,
    grid: Option<SampleGrid>,
}

impl Projector {
    /// Create a projector for a sequence of `sequence_len` slices.
    pub fn new(bbox: BoundingBox, params: ConversionParams, sequence_len: usize) -> Self {
        Self {
            params,
            extents: bbox.oriented(params.depth_axis),
            sequence_len,
            grid: None,
        }
    }

    /// The parameters of the conversion.
    pub fn params(&self) -> &ConversionParams {
        &self.params
    }

    /// The sample grid, once the first slice has been projected.
    pub fn grid(&self) -> Option<&SampleGrid> {
        self.grid.as_ref()
    }

    /// Depth coordinate of the slice at `index`.
    pub fn depth(&self, index: usize) -> f64 {
        let depth_extent = self.extents[2];
        let last = self.sequence_len.saturating_sub(1).max(1);
        let depth = index as f64 / last as f64 * depth_extent;
        if self.params.depth_inverse {
            depth_extent - depth
        } else {
            depth
        }
    }

    /// Project the slice at `index` and append its points to `cloud`.
    ///
    /// Returns the number of points appended.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError::DimensionMismatch`] if the slice size differs
    /// from the first projected slice and [`ProjectionError::IndexOutOfRange`]
    /// if `index` is not part of the sequence.
    pub fn project(
        &mut self,
        index: usize,
        image: &Image<u8, 4>,
        cloud: &mut PointCloud,
    ) -> Result<usize, ProjectionError> {
        if index >= self.sequence_len {
            return Err(ProjectionError::IndexOutOfRange(index, self.sequence_len));
        }

        let params = self.params;
        let [width_extent, height_extent, _] = self.extents;
        let depth = self.depth(index);

        let grid = self.grid.get_or_insert_with(|| {
            let grid = SampleGrid::new(
                image.size(),
                params.width_samples,
                params.height_samples,
                params.maintain_aspect_ratio,
            );
            log::debug!(
                "sample grid for {}: {}x{} samples, step {:?}",
                image.size(),
                grid.cols().len(),
                grid.rows().len(),
                grid.step()
            );
            grid
        });

        if grid.size() != image.size() {
            return Err(ProjectionError::DimensionMismatch {
                index,
                expected: grid.size(),
                found: image.size(),
            });
        }

        let u_scale = normalizer(image.width()) * width_extent;
        let v_scale = normalizer(image.height()) * height_extent;

        let before = cloud.len();
        for &row in grid.rows() {
            let along_height = row as f64 * v_scale;
            for &col in grid.cols() {
                let rgba = *image.pixel(col, row)?;
                if !params.keeps(rgba[3]) {
                    continue;
                }
                let along_width = col as f64 * u_scale;
                cloud.push(
                    params.depth_axis.assemble(along_width, along_height, depth),
                    rgba,
                );
            }
        }

        Ok(cloud.len() - before)
    }
}

// factor mapping a pixel index to [0, 1], a single pixel maps to 0
fn normalizer(n: usize) -> f64 {
    if n > 1 {
        1.0 / (n - 1) as f64
    } else {
        0.0
    }
}

/// Project a whole sequence of slices into a new point cloud.
///
/// # Arguments
///
/// * `images` - The slices, in stacking order.
/// * `bbox` - The box the slices are mapped into.
/// * `params` - The conversion parameters.
///
/// # Errors
///
/// Returns [`ProjectionError::DimensionMismatch`] if the slices differ in size.
pub fn project_images(
    images: &[Image<u8, 4>],
    bbox: BoundingBox,
    params: ConversionParams,
) -> Result<PointCloud, ProjectionError> {
    let mut projector = Projector::new(bbox, params, images.len());
    let mut cloud = PointCloud::new(params.keep_alpha);
    for (index, image) in images.iter().enumerate() {
        projector.project(index, image, &mut cloud)?;
    }
    Ok(cloud)
}
