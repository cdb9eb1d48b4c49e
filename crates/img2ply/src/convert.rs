use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use img2ply_3d::io::ply::{write_ply_to, Encoding, PlyError};
use img2ply_3d::pointcloud::PointCloud;
use img2ply_3d::projection::{BoundingBox, ConversionParams, ProjectionError, Projector};
use img2ply_io::{read_image_any_rgba8, resolve_inputs, IoError};

/// Error types for the conversion pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The input is missing or an image could not be read.
    #[error(transparent)]
    Input(#[from] IoError),

    /// The slices could not be projected.
    #[error(transparent)]
    Projection(#[from] ProjectionError),

    /// The point cloud could not be serialized.
    #[error(transparent)]
    Ply(#[from] PlyError),

    /// The output file could not be created or moved into place.
    #[error("Failed to write {path}: {source}")]
    Output {
        /// The requested output path.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// The cancel flag was raised before all the slices were processed.
    #[error("Conversion cancelled after {0} images")]
    Cancelled(usize),
}

/// Outcome of a successful conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertSummary {
    /// Number of slices converted.
    pub images: usize,
    /// Number of points written.
    pub points: usize,
    /// The PLY file written.
    pub output: PathBuf,
    /// Wall time of the conversion.
    pub elapsed: Duration,
}

/// Converts image sequences into PLY files.
///
/// # Example
///
/// ```no_run
/// use img2ply::{BoundingBox, ConversionParams, Converter, Encoding};
///
/// let converter = Converter::new(BoundingBox::new(1.0, 1.0, 1.0)?)
///     .with_params(ConversionParams::default().with_samples(64, 0))
///     .with_encoding(Encoding::BinaryLittleEndian);
///
/// let summary = converter.run(&["slices/"], "cloud.ply")?;
/// assert_eq!(summary.output.to_str(), Some("cloud.ply"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Converter {
    bbox: BoundingBox,
    params: ConversionParams,
    encoding: Encoding,
    cancel: Option<Arc<AtomicBool>>,
}

impl Converter {
    /// Create a converter with default parameters and ascii output.
    pub fn new(bbox: BoundingBox) -> Self {
        Self {
            bbox,
            params: ConversionParams::default(),
            encoding: Encoding::Ascii,
            cancel: None,
        }
    }

    /// Set the conversion parameters.
    pub fn with_params(mut self, params: ConversionParams) -> Self {
        self.params = params;
        self
    }

    /// Set the encoding of the PLY payload.
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Abort between two slices once `flag` is raised.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Decode and project the given slices, in order, one image in memory at a time.
    pub fn project_files<P: AsRef<Path>>(&self, files: &[P]) -> Result<PointCloud, ConvertError> {
        let mut projector = Projector::new(self.bbox, self.params, files.len());
        let mut cloud = PointCloud::new(self.params.keep_alpha);

        log::debug!(
            "depth axis {}, oriented extents {:?}",
            self.params.depth_axis,
            self.bbox.oriented(self.params.depth_axis)
        );

        for (index, file) in files.iter().enumerate() {
            if self.is_cancelled() {
                log::warn!("conversion cancelled after {} images", index);
                return Err(ConvertError::Cancelled(index));
            }

            let image = read_image_any_rgba8(file)?;
            let added = projector.project(index, &image, &mut cloud)?;

            log::info!(
                "< {} / {} > {}: {} points, {} in total",
                index + 1,
                files.len(),
                file.as_ref().display(),
                added,
                cloud.len()
            );
        }

        Ok(cloud)
    }

    /// Convert the inputs into a PLY file at `output`.
    ///
    /// `inputs` is either a single directory, whose supported images are taken in
    /// file name order, or an explicit ordered list of image files.
    ///
    /// The file is only created once every slice has been projected and
    /// serialized; on error nothing is left at `output`.
    pub fn run<P: AsRef<Path>>(
        &self,
        inputs: &[P],
        output: impl AsRef<Path>,
    ) -> Result<ConvertSummary, ConvertError> {
        let start = Instant::now();
        let output = output.as_ref();

        let files = resolve_inputs(inputs)?;
        log::info!("images found: {}", files.len());

        let cloud = self.project_files(&files)?;
        self.write_output(&cloud, output)?;

        let summary = ConvertSummary {
            images: files.len(),
            points: cloud.len(),
            output: output.to_path_buf(),
            elapsed: start.elapsed(),
        };
        log::info!(
            "wrote {} points to {} in {:.1?}",
            summary.points,
            output.display(),
            summary.elapsed
        );

        Ok(summary)
    }

    // the cloud goes to a temporary file in the destination directory, renamed on success
    fn write_output(&self, cloud: &PointCloud, output: &Path) -> Result<(), ConvertError> {
        let output_error = |source| ConvertError::Output {
            path: output.to_path_buf(),
            source,
        };

        let dir = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut builder = tempfile::Builder::new();
        builder.prefix(".img2ply-").suffix(".ply.part");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(std::fs::Permissions::from_mode(0o644));
        }
        let mut file = builder.tempfile_in(dir).map_err(output_error)?;

        {
            let mut writer = BufWriter::new(file.as_file_mut());
            write_ply_to(&mut writer, cloud, self.encoding)?;
            writer.flush().map_err(output_error)?;
        }

        file.persist(output).map_err(|e| output_error(e.error))?;
        Ok(())
    }
}

/// Convert an image sequence into a PLY file in one call.
///
/// # Arguments
///
/// * `input` - A directory of slices or a single image file.
/// * `output` - The PLY file to write.
/// * `bbox` - The box the slices are mapped into.
/// * `params` - The conversion parameters.
pub fn convert(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    bbox: BoundingBox,
    params: ConversionParams,
) -> Result<ConvertSummary, ConvertError> {
    Converter::new(bbox)
        .with_params(params)
        .run(&[input.as_ref()], output)
}
