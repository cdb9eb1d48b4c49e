use img2ply_image::ImageSize;

/// The pixels visited in every slice of a sequence.
///
/// A sample count of 0 visits every index of that dimension. Otherwise the
/// indices are spread evenly over the dimension, first and last pixel included.
///
/// When the aspect ratio is maintained both dimensions share one pixel step,
/// taken from the densest requested dimension, so the sampled points keep the
/// proportions of the image.
///
/// # Examples
///
/// ```
/// use img2ply_3d::sampling::SampleGrid;
///
/// let grid = SampleGrid::new([5, 3].into(), 3, 0, false);
/// assert_eq!(grid.cols(), &[0, 2, 4]);
/// assert_eq!(grid.rows(), &[0, 1, 2]);
/// assert_eq!(grid.len(), 9);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleGrid {
    size: ImageSize,
    cols: Vec<usize>,
    rows: Vec<usize>,
    step: Option<usize>,
}

impl SampleGrid {
    /// Compute the grid for an image size and the requested sample counts.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the slices.
    /// * `width_samples` - Number of columns to visit, 0 for all of them.
    /// * `height_samples` - Number of rows to visit, 0 for all of them.
    /// * `maintain_aspect_ratio` - Use the same pixel step for columns and rows.
    pub fn new(
        size: ImageSize,
        width_samples: usize,
        height_samples: usize,
        maintain_aspect_ratio: bool,
    ) -> Self {
        let requested = width_samples > 0 || height_samples > 0;

        if maintain_aspect_ratio && requested {
            let step = [
                candidate_step(size.width, width_samples),
                candidate_step(size.height, height_samples),
            ]
            .into_iter()
            .flatten()
            .fold(f64::INFINITY, f64::min);

            let step = if step.is_finite() {
                (step.floor() as usize).max(1)
            } else {
                usize::MAX
            };

            return Self {
                size,
                cols: (0..size.width).step_by(step).collect(),
                rows: (0..size.height).step_by(step).collect(),
                step: Some(step),
            };
        }

        Self {
            size,
            cols: evenly_spaced(size.width, width_samples),
            rows: evenly_spaced(size.height, height_samples),
            step: None,
        }
    }

    /// The image size the grid was computed for.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Column indices visited, strictly increasing.
    pub fn cols(&self) -> &[usize] {
        &self.cols
    }

    /// Row indices visited, strictly increasing.
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// The pixel step shared by both dimensions when the aspect ratio is maintained.
    pub fn step(&self) -> Option<usize> {
        self.step
    }

    /// Number of pixels visited per slice.
    pub fn len(&self) -> usize {
        self.cols.len() * self.rows.len()
    }

    /// Whether no pixel is visited.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the visited `(col, row)` pairs, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows
            .iter()
            .flat_map(move |&row| self.cols.iter().map(move |&col| (col, row)))
    }
}

// pixel distance between samples needed to fit `count` samples into `n` pixels
fn candidate_step(n: usize, count: usize) -> Option<f64> {
    if count == 0 {
        return None;
    }
    let count = count.min(n);
    if count <= 1 {
        return Some(f64::INFINITY);
    }
    Some((n - 1) as f64 / (count - 1) as f64)
}

fn evenly_spaced(n: usize, count: usize) -> Vec<usize> {
    if count == 0 || count >= n {
        return (0..n).collect();
    }
    if count == 1 {
        return vec![0];
    }
    let step = (n - 1) as f64 / (count - 1) as f64;
    (0..count)
        .map(|k| ((k as f64 * step).round() as usize).min(n - 1))
        .collect()
}
