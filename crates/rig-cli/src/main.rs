use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use rig::prelude::*;

/// Multi-camera photogrammetry rig toolkit.
#[derive(Debug, Parser)]
#[command(author, version, about = "Calibration conversion and reconstruction viewing for camera rigs")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert a vendor calibration file into per-camera intrinsic/extrinsic files.
    Convert {
        /// Vendor calibration JSON.
        #[arg(long)]
        calib: PathBuf,

        /// Output directory; `intrinsics/` and `extrinsics/` are created inside.
        #[arg(long)]
        save_dir: PathBuf,

        /// Vendor schema: ava256 or renderme360.
        #[arg(long)]
        format: String,
    },

    /// Load a reconstruction output directory and hand it to a viewer backend.
    View {
        /// Directory holding mesh.obj, mesh_coord_changer.npy and extrinsics/.
        #[arg(long)]
        save_dir: PathBuf,

        /// Show the mesh without cameras and origin.
        #[arg(long)]
        only_mesh: bool,

        /// Camera frustum size.
        #[arg(long, default_value_t = 0.1)]
        camera_scale: f64,

        /// Scene OBJ to write. Defaults to `<save_dir>/scene.obj`.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Stream to a rerun viewer instead of writing an OBJ.
        #[cfg(feature = "rerun")]
        #[arg(long)]
        rerun: bool,
    },

    /// Print the resolution level table.
    Levels,
}

fn init_logging() {
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(LevelFilter::Info);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

fn run_convert(calib: &Path, save_dir: &Path, format: &str) -> Result<String> {
    let format: VendorFormat = format.parse()?;
    let report = convert_calibration(calib, save_dir, format)
        .with_context(|| format!("converting {}", calib.display()))?;
    Ok(serde_json::to_string_pretty(&report)?)
}

fn levels_table() -> String {
    let mut out = String::from("level  matching_downscale  dense_downscale\n");
    for level in ResolutionLevel::all() {
        let _ = writeln!(
            out,
            "{:>5}  {:>18}  {:>15}",
            level,
            level.matching_downscale(),
            level.dense_downscale()
        );
    }
    out
}

fn viewer_sink(save_dir: &Path, output: Option<PathBuf>) -> ObjSceneWriter {
    ObjSceneWriter::new(output.unwrap_or_else(|| save_dir.join("scene.obj")))
}

fn run_view(save_dir: &Path, options: ViewerOptions, sink: &mut dyn SceneSink) -> Result<()> {
    let scene = Visualizer::new(options)
        .run(save_dir, sink)
        .with_context(|| format!("viewing {}", save_dir.display()))?;
    log::info!(
        "scene: {} vertices, {} cameras",
        scene.mesh.vertices.len(),
        scene.cameras.len()
    );
    Ok(())
}

fn main() {
    init_logging();
    if let Err(err) = try_main() {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let args = Args::parse();
    match args.command {
        Command::Convert {
            calib,
            save_dir,
            format,
        } => {
            let json = run_convert(&calib, &save_dir, &format)?;
            println!("{json}");
        }
        Command::View {
            save_dir,
            only_mesh,
            camera_scale,
            output,
            #[cfg(feature = "rerun")]
            rerun,
        } => {
            let options = ViewerOptions {
                only_mesh,
                camera_scale,
                ..ViewerOptions::default()
            };
            #[cfg(feature = "rerun")]
            if rerun {
                let mut sink = rig::view::RerunSink::spawn("rig")?;
                return run_view(&save_dir, options, &mut sink);
            }
            let mut sink = viewer_sink(&save_dir, output);
            run_view(&save_dir, options, &mut sink)?;
        }
        Command::Levels => print!("{}", levels_table()),
    }
    Ok(())
}
