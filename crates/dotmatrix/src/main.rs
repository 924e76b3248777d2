use dotmatrix::RunOptions;
use dotmatrix_core::{SCREEN_HEIGHT, SCREEN_WIDTH};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let options = RunOptions::from_args(std::env::args().skip(1))?;
    log::info!("Playing ROM path: '{}'", options.rom_path.display());

    let summary = dotmatrix::run(&options)?;
    let ending = if summary.stopped { " (program stopped)" } else { "" };
    match &options.output {
        Some(path) => println!(
            "Wrote {} bytes ({}x{} rgb24) after {} frames{ending} to '{}'",
            SCREEN_WIDTH * SCREEN_HEIGHT * 3,
            SCREEN_WIDTH,
            SCREEN_HEIGHT,
            summary.frames,
            path.display()
        ),
        None => println!("Ran {} frames{ending}", summary.frames),
    }
    Ok(())
}
