use argh::FromArgs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use img2ply::{BoundingBox, ConversionParams, Converter, DepthAxis, Encoding};

#[derive(FromArgs)]
/// Convert an image sequence to a PLY point cloud
struct Args {
    /// a directory of slices or an ordered list of image files
    #[argh(positional)]
    input: Vec<PathBuf>,

    /// path to the PLY file to write
    #[argh(option, short = 'o')]
    output: PathBuf,

    /// extents of the output along x, y and z, e.g. 15,10,15
    #[argh(option)]
    bounding_box: BoundingBox,

    /// axis along which the slices are stacked: x, y or z
    #[argh(option, default = "DepthAxis::Z")]
    depth_direction: DepthAxis,

    /// place the first slice at the far end of the depth axis
    #[argh(option, default = "false", from_str_fn(parse_bool))]
    depth_inverse: bool,

    /// drop pixels whose alpha is below the threshold
    #[argh(option, default = "true", from_str_fn(parse_bool))]
    ignore_alpha: bool,

    /// alpha cut-off used to drop pixels
    #[argh(option, default = "img2ply::k3d::projection::DEFAULT_ALPHA_THRESHOLD")]
    alpha_threshold: u8,

    /// columns sampled per slice, 0 for all of them
    #[argh(option, default = "0")]
    width_samples: usize,

    /// rows sampled per slice, 0 for all of them
    #[argh(option, default = "0")]
    height_samples: usize,

    /// use the same pixel step for columns and rows
    #[argh(option, default = "true", from_str_fn(parse_bool))]
    maintain_aspect_ratio: bool,

    /// write the alpha channel as a vertex property
    #[argh(switch)]
    keep_alpha: bool,

    /// payload encoding: ascii, binary_little_endian or binary_big_endian
    #[argh(option, default = "Encoding::Ascii")]
    format: Encoding,
}

fn parse_bool(value: &str) -> Result<bool, String> {
    Ok(matches!(
        value.to_lowercase().as_str(),
        "yes" | "true" | "t" | "1"
    ))
}

impl Args {
    fn params(&self) -> ConversionParams {
        ConversionParams::default()
            .with_depth_axis(self.depth_direction)
            .with_depth_inverse(self.depth_inverse)
            .with_ignore_alpha(self.ignore_alpha)
            .with_alpha_threshold(self.alpha_threshold)
            .with_samples(self.width_samples, self.height_samples)
            .with_maintain_aspect_ratio(self.maintain_aspect_ratio)
            .with_keep_alpha(self.keep_alpha)
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    // create a cancel token to stop between two slices
    let cancel_token = Arc::new(AtomicBool::new(false));

    ctrlc::set_handler({
        let cancel_token = cancel_token.clone();
        move || {
            log::warn!("Received Ctrl-C signal, stopping after the current slice");
            cancel_token.store(true, Ordering::SeqCst);
        }
    })?;

    let summary = Converter::new(args.bounding_box)
        .with_params(args.params())
        .with_encoding(args.format)
        .with_cancel_flag(cancel_token)
        .run(&args.input, &args.output)?;

    log::info!(
        "Converted {} images into {} points: {}",
        summary.images,
        summary.points,
        summary.output.display()
    );

    Ok(())
}

fn main() -> ExitCode {
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::init_from_env(env);

    let args: Args = argh::from_env();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
