pub mod cpu;
mod error;
pub mod machine;

pub use cpu::HaltBehavior;
pub use error::{CartridgeError, EmulationError};
pub use machine::{FrameBuffer, FrameStatus, GameBoy, MachineConfig, Rgb, Snapshot};

/// Logical screen width in pixels for the DMG.
pub const SCREEN_WIDTH: usize = 160;
/// Logical screen height in pixels.
pub const SCREEN_HEIGHT: usize = 144;
