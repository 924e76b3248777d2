use super::{Memory, BGP, DIV, LCDC, OBP0, OBP1, STAT, TAC, TIMA, TMA};
use crate::cpu::{IE_ADDR, IF_ADDR};

impl Memory {
    /// Seed the I/O registers with the values the DMG boot ROM leaves behind
    /// at PC=0x0100.
    pub(super) fn apply_dmg_initial_io_state(&mut self) {
        // Divider / timer.
        self.store(DIV, 0x00);
        self.store(TIMA, 0x00);
        self.store(TMA, 0x00);
        self.store(TAC, 0x00);

        // Sound registers (no APU here, but the defaults are visible to
        // software).
        const SOUND_DEFAULTS: [(u16, u8); 21] = [
            (0xFF10, 0x80),
            (0xFF11, 0xBF),
            (0xFF12, 0xF3),
            (0xFF13, 0xFF),
            (0xFF14, 0xBF),
            (0xFF16, 0x3F),
            (0xFF17, 0x00),
            (0xFF18, 0xFF),
            (0xFF19, 0xBF),
            (0xFF1A, 0x7F),
            (0xFF1B, 0xFF),
            (0xFF1C, 0x9F),
            (0xFF1D, 0xFF),
            (0xFF1E, 0xBF),
            (0xFF20, 0xFF),
            (0xFF21, 0x00),
            (0xFF22, 0x00),
            (0xFF23, 0xBF),
            (0xFF24, 0x77),
            (0xFF25, 0xF3),
            (0xFF26, 0xF1),
        ];
        for (addr, value) in SOUND_DEFAULTS {
            self.store(addr, value);
        }

        // PPU registers. SCY/SCX/LY/LYC/WY/WX start at zero.
        self.store(LCDC, 0x91);
        self.store(STAT, 0x85);
        self.store(BGP, 0xFC);
        self.store(OBP0, 0xFF);
        self.store(OBP1, 0xFF);

        // IF's upper 3 bits always read as 1 on DMG; VBlank is already
        // requested when the boot ROM hands over.
        self.store(IF_ADDR, 0xE1);
        self.store(IE_ADDR, 0x00);
    }
}
