mod render;

use super::memory::{Memory, LCDC, LY, LYC, STAT};
use super::FrameBuffer;
use crate::cpu::{Interrupt, InterruptController};
use crate::EmulationError;

/// T-cycles per scanline.
pub const CYCLES_PER_LINE: i32 = 456;
/// First VBlank line.
pub const VBLANK_LINE: u8 = 144;
/// Last line before LY wraps to 0.
pub const LAST_LINE: u8 = 153;

/// Countdown values at which the visible-line modes change: OAM scan
/// for the first 80 cycles, pixel transfer for the next 172, then HBlank.
const OAM_SCAN_END: i32 = CYCLES_PER_LINE - 80;
const TRANSFER_END: i32 = OAM_SCAN_END - 172;

bitflags::bitflags! {
    /// LCDC (0xFF40).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct LcdControl: u8 {
        const BG_ENABLE       = 1 << 0;
        const OBJ_ENABLE      = 1 << 1;
        const OBJ_TALL        = 1 << 2;
        const BG_TILE_MAP     = 1 << 3;
        const TILE_DATA       = 1 << 4;
        const WINDOW_ENABLE   = 1 << 5;
        const WINDOW_TILE_MAP = 1 << 6;
        const LCD_ENABLE      = 1 << 7;
    }
}

bitflags::bitflags! {
    /// STAT (0xFF41) flag bits; the mode lives in bits 1..0.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct LcdStatus: u8 {
        const COINCIDENCE           = 1 << 2;
        const HBLANK_INTERRUPT      = 1 << 3;
        const VBLANK_INTERRUPT      = 1 << 4;
        const OAM_INTERRUPT         = 1 << 5;
        const COINCIDENCE_INTERRUPT = 1 << 6;
        const _ = !0;
    }
}

/// PPU mode reported in STAT bits 1..0.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LcdMode {
    HBlank = 0,
    VBlank = 1,
    OamScan = 2,
    Transfer = 3,
}

impl LcdMode {
    /// STAT bit that enables the LCD interrupt on entering this mode.
    fn interrupt_select(self) -> Option<LcdStatus> {
        match self {
            LcdMode::HBlank => Some(LcdStatus::HBLANK_INTERRUPT),
            LcdMode::VBlank => Some(LcdStatus::VBLANK_INTERRUPT),
            LcdMode::OamScan => Some(LcdStatus::OAM_INTERRUPT),
            LcdMode::Transfer => None,
        }
    }
}

/// Scanline state machine and rasterizer.
#[derive(Clone, Debug)]
pub struct Ppu {
    /// Cycles left in the current scanline.
    scanline_counter: i32,
    mode: LcdMode,
    /// LY == LYC as of the previous status update, for edge detection.
    coincidence: bool,
    framebuffer: FrameBuffer,
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new()
    }
}

impl Ppu {
    pub fn new() -> Self {
        Self {
            scanline_counter: CYCLES_PER_LINE,
            mode: LcdMode::OamScan,
            coincidence: false,
            framebuffer: FrameBuffer::new(),
        }
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.framebuffer
    }

    #[inline]
    pub fn scanline_counter(&self) -> i32 {
        self.scanline_counter
    }

    #[inline]
    pub fn mode(&self) -> LcdMode {
        self.mode
    }

    /// Advance by `cycles` T-cycles.
    ///
    /// Finishing a scanline moves LY on by one. The line just finished is
    /// rasterized if it was visible; entering line 144 requests VBlank and
    /// moving past line 153 wraps back to 0.
    pub fn update(&mut self, cycles: u32, memory: &mut Memory) -> Result<(), EmulationError> {
        self.update_status(memory);

        if !Self::lcd_enabled(memory) {
            return Ok(());
        }

        self.scanline_counter -= cycles as i32;
        if self.scanline_counter > 0 {
            return Ok(());
        }

        let finished = memory.read(LY);
        if finished < VBLANK_LINE {
            render::draw_scanline(memory, finished, &mut self.framebuffer)?;
        }

        self.scanline_counter = CYCLES_PER_LINE;
        let line = memory.increment_scanline();
        if line == VBLANK_LINE {
            log::debug!("PPU: VBlank edge (LY {finished}->{line})");
            InterruptController::request(memory, Interrupt::VBlank);
        } else if line > LAST_LINE {
            memory.store(LY, 0);
        }

        Ok(())
    }

    fn lcd_enabled(memory: &Memory) -> bool {
        LcdControl::from_bits_truncate(memory.read(LCDC)).contains(LcdControl::LCD_ENABLE)
    }

    /// Recompute STAT's mode and coincidence bits and raise the LCD
    /// interrupt for an enabled mode change or a new LY == LYC match.
    fn update_status(&mut self, memory: &mut Memory) {
        let stat = LcdStatus::from_bits_retain(memory.read(STAT));

        if !Self::lcd_enabled(memory) {
            // LCD off: LY held at 0, mode reported as VBlank.
            self.scanline_counter = CYCLES_PER_LINE;
            self.mode = LcdMode::VBlank;
            memory.store(LY, 0);
            memory.store(STAT, (stat.bits() & !0x03) | LcdMode::VBlank as u8);
            return;
        }

        let line = memory.read(LY);
        let mode = if line >= VBLANK_LINE {
            LcdMode::VBlank
        } else if self.scanline_counter >= OAM_SCAN_END {
            LcdMode::OamScan
        } else if self.scanline_counter >= TRANSFER_END {
            LcdMode::Transfer
        } else {
            LcdMode::HBlank
        };

        let mode_interrupt = mode
            .interrupt_select()
            .is_some_and(|select| stat.contains(select));
        if mode_interrupt && mode != self.mode {
            InterruptController::request(memory, Interrupt::Lcd);
        }
        self.mode = mode;

        let coincidence = line == memory.read(LYC);
        let mut stat = stat;
        stat.set(LcdStatus::COINCIDENCE, coincidence);
        // Edge-triggered: the interrupt fires when LY == LYC starts to hold.
        if coincidence && !self.coincidence && stat.contains(LcdStatus::COINCIDENCE_INTERRUPT) {
            log::debug!("PPU: LY == LYC ({line}) interrupt");
            InterruptController::request(memory, Interrupt::Lcd);
        }
        self.coincidence = coincidence;

        memory.store(STAT, (stat.bits() & !0x03) | mode as u8);
    }
}
