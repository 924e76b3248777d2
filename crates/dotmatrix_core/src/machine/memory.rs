mod init;

use super::Cartridge;
use crate::cpu::Bus;

/// Total addressable memory for the Game Boy (64 KiB).
pub const MEMORY_SIZE: usize = 0x10000;

pub const JOYP: u16 = 0xFF00;
pub const DIV: u16 = 0xFF04;
pub const TIMA: u16 = 0xFF05;
pub const TMA: u16 = 0xFF06;
pub const TAC: u16 = 0xFF07;
pub const LCDC: u16 = 0xFF40;
pub const STAT: u16 = 0xFF41;
pub const SCY: u16 = 0xFF42;
pub const SCX: u16 = 0xFF43;
pub const LY: u16 = 0xFF44;
pub const LYC: u16 = 0xFF45;
pub const DMA: u16 = 0xFF46;
pub const BGP: u16 = 0xFF47;
pub const OBP0: u16 = 0xFF48;
pub const OBP1: u16 = 0xFF49;
pub const WY: u16 = 0xFF4A;
pub const WX: u16 = 0xFF4B;

/// Side effects of a CPU write that other components must see.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IoEvent {
    /// DIV was written; the divider restarts from zero.
    DividerReset,
    /// TAC was written with this value.
    TimerControl(u8),
}

/// Flat 64 KiB address space with the DMG write rules applied per region.
///
/// Reads are plain except for the joypad register. Writes made by the CPU
/// go through [`Memory::write`]; the timer and PPU update their own
/// registers through the narrow hooks below, which bypass the CPU-side
/// rules (a CPU write to LY resets it, the PPU must be able to advance it).
#[derive(Clone, Debug)]
pub struct Memory {
    data: Vec<u8>,
    events: Vec<IoEvent>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    pub fn new() -> Self {
        Self {
            data: vec![0; MEMORY_SIZE],
            events: Vec::new(),
        }
    }

    pub fn read(&self, addr: u16) -> u8 {
        match addr {
            // Echo RAM always shows the working RAM it mirrors.
            0xE000..=0xFDFF => self.data[usize::from(addr - 0x2000)],
            // No buttons are ever pressed: the input lines read high.
            JOYP => self.data[usize::from(JOYP)] | 0xCF,
            _ => self.data[usize::from(addr)],
        }
    }

    /// Apply a CPU write. Exactly one region rule fires per address.
    pub fn write(&mut self, addr: u16, value: u8) -> Option<IoEvent> {
        match addr {
            0x0000..=0x7FFF => {
                log::trace!("ignored write 0x{value:02X} to cartridge ROM at 0x{addr:04X}");
                None
            }
            0xE000..=0xFDFF => {
                self.store(addr, value);
                self.store(addr - 0x2000, value);
                None
            }
            0xFEA0..=0xFEFF => None,
            DIV => {
                self.store(DIV, 0);
                Some(IoEvent::DividerReset)
            }
            TAC => {
                self.store(TAC, value);
                Some(IoEvent::TimerControl(value))
            }
            LY => {
                self.store(LY, 0);
                None
            }
            DMA => {
                log::debug!("OAM DMA from 0x{:04X} requested; transfers are not modelled", u16::from(value) << 8);
                None
            }
            _ => {
                self.store(addr, value);
                None
            }
        }
    }

    /// Raw store used by the timer, PPU and loader.
    #[inline]
    pub fn store(&mut self, addr: u16, value: u8) {
        self.data[usize::from(addr)] = value;
    }

    /// Timer hook: advance DIV by one, wrapping.
    pub fn increment_divider(&mut self) {
        let div = self.data[usize::from(DIV)].wrapping_add(1);
        self.store(DIV, div);
    }

    /// PPU hook: advance LY by one and return the new line.
    pub fn increment_scanline(&mut self) -> u8 {
        let line = self.data[usize::from(LY)].wrapping_add(1);
        self.store(LY, line);
        line
    }

    /// Drain the events produced by CPU writes since the last call.
    pub fn take_events(&mut self) -> Vec<IoEvent> {
        std::mem::take(&mut self.events)
    }

    /// Clear the address space, seed the post-boot I/O registers and map the
    /// cartridge's fixed bank at 0x0000.
    pub fn load_cartridge(&mut self, cartridge: &Cartridge) {
        self.data.fill(0);
        self.events.clear();
        self.apply_dmg_initial_io_state();

        let bank = cartridge.fixed_bank();
        self.data[..bank.len()].copy_from_slice(bank);
    }

    /// Full address-space contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

impl Bus for Memory {
    #[inline]
    fn read8(&mut self, addr: u16) -> u8 {
        self.read(addr)
    }

    #[inline]
    fn write8(&mut self, addr: u16, value: u8) {
        if let Some(event) = self.write(addr, value) {
            self.events.push(event);
        }
    }
}
