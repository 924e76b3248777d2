mod cartridge;
mod config;
mod framebuffer;
mod gameboy;
mod memory;
mod ppu;
mod snapshot;
mod timer;

pub use cartridge::{Cartridge, BANK_SIZE, MAX_CARTRIDGE_SIZE};
pub use config::{MachineConfig, FRAME_CYCLES};
pub use framebuffer::{FrameBuffer, Rgb};
pub use gameboy::{FrameStatus, GameBoy};
pub use memory::{
    IoEvent, Memory, BGP, DIV, DMA, JOYP, LCDC, LY, LYC, MEMORY_SIZE, OBP0, OBP1, SCX, SCY,
    STAT, TAC, TIMA, TMA, WX, WY,
};
pub use ppu::{LcdControl, LcdMode, LcdStatus, Ppu, CYCLES_PER_LINE, LAST_LINE, VBLANK_LINE};
pub use snapshot::{Flags, Snapshot};
pub use timer::{period_for, Timer, DIVIDER_PERIOD};

#[cfg(test)]
mod tests;
