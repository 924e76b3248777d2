use std::error::Error;
use std::fmt::{Display, Formatter};

/// Conditions that end the current run.
///
/// None of these can be recovered from inside the core: the driver records
/// the fault and stops interpreting instructions until a new cartridge is
/// loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmulationError {
    /// The byte at `address` is not an entry of the primary opcode table.
    InvalidOpcode { opcode: u8, address: u16 },
    /// A single-bit register accessor was called with a bit index above 7.
    InvalidBitIndex(u8),
    /// The rasterizer tried to write a pixel outside the 144x160 grid.
    PixelOutOfBounds { line: usize, x: usize },
}

impl Display for EmulationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidOpcode { opcode, address } => {
                write!(f, "invalid opcode 0x{opcode:02X} at 0x{address:04X}")
            }
            Self::InvalidBitIndex(bit) => write!(f, "bit index {bit} out of range 0..=7"),
            Self::PixelOutOfBounds { line, x } => {
                write!(f, "pixel ({line}, {x}) outside the 144x160 framebuffer")
            }
        }
    }
}

impl Error for EmulationError {}

/// Reasons a cartridge image is refused.
///
/// A refused image leaves the machine untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartridgeError {
    /// The image has no bytes at all.
    Empty,
    /// Every byte of the image is zero, which is treated as "no cartridge".
    NoData,
    /// The image is larger than the biggest supported cartridge (2 MiB).
    TooLarge(usize),
}

impl Display for CartridgeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "could not load cartridge: image is empty"),
            Self::NoData => write!(f, "could not load cartridge: image is zero-filled"),
            Self::TooLarge(len) => {
                write!(f, "could not load cartridge: {len} bytes exceeds the 2 MiB limit")
            }
        }
    }
}

impl Error for CartridgeError {}
