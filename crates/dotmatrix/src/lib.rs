use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use dotmatrix_core::{FrameStatus, GameBoy, MachineConfig};
use typed_builder::TypedBuilder;

pub const DEFAULT_FRAMES: u32 = 60;

#[derive(Clone, Debug, Eq, PartialEq, TypedBuilder)]
pub struct RunOptions {
    pub rom_path: PathBuf,
    #[builder(default = DEFAULT_FRAMES)]
    pub frames: u32,
    /// Where to dump the final framebuffer as raw RGB24.
    #[builder(default, setter(strip_option))]
    pub output: Option<PathBuf>,
    #[builder(default = false)]
    pub trace: bool,
}

impl RunOptions {
    /// Parse `<rom> [frames] [out.rgb] [--trace]`.
    pub fn from_args(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut trace = false;
        let mut positional = Vec::new();
        for arg in args {
            match arg.as_str() {
                "--trace" => trace = true,
                flag if flag.starts_with("--") => bail!("unknown option '{flag}'"),
                _ => positional.push(arg),
            }
        }

        let mut positional = positional.into_iter();
        let Some(rom_path) = positional.next() else {
            bail!("usage: dotmatrix <rom> [frames] [out.rgb] [--trace]");
        };
        let frames = match positional.next() {
            Some(frames) => frames
                .parse()
                .with_context(|| format!("invalid frame count '{frames}'"))?,
            None => DEFAULT_FRAMES,
        };
        let output = positional.next().map(PathBuf::from);
        if let Some(extra) = positional.next() {
            bail!("unexpected argument '{extra}'");
        }

        Ok(Self {
            rom_path: PathBuf::from(rom_path),
            frames,
            output,
            trace,
        })
    }
}

/// What a headless run produced.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RunSummary {
    pub frames: u32,
    pub stopped: bool,
}

pub fn run(options: &RunOptions) -> Result<RunSummary> {
    let rom = std::fs::read(&options.rom_path)
        .with_context(|| format!("failed to read ROM file '{}'", options.rom_path.display()))?;

    let config = MachineConfig::builder().trace(options.trace).build();
    let mut gb = GameBoy::new(config);
    gb.load_cartridge(&rom)
        .with_context(|| format!("'{}'", options.rom_path.display()))?;

    let summary = run_frames(&mut gb, options.frames)?;
    log::info!(
        "ran {} frame(s){}",
        summary.frames,
        if summary.stopped { ", program stopped" } else { "" }
    );

    if let Some(path) = &options.output {
        std::fs::write(path, gb.framebuffer().to_rgb24())
            .with_context(|| format!("failed to write framebuffer to '{}'", path.display()))?;
        log::info!("framebuffer written to '{}'", path.display());
    }
    Ok(summary)
}

/// Run up to `frames` frames, ending early when the program stops.
pub fn run_frames(gb: &mut GameBoy, frames: u32) -> Result<RunSummary> {
    for frame in 0..frames {
        let status = gb
            .run_frame()
            .with_context(|| format!("emulation failed during frame {frame}"))?;
        if status == FrameStatus::Stopped {
            return Ok(RunSummary {
                frames: frame,
                stopped: true,
            });
        }
    }
    Ok(RunSummary {
        frames,
        stopped: false,
    })
}
