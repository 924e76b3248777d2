use super::incdec::pair_slot;
use crate::cpu::{Bus, Cpu};

impl Cpu {
    /// Move A to or from `address`. Store forms have bit 4 of the opcode
    /// clear (0xE0/0xE2/0xEA), loads have it set (0xF0/0xF2/0xFA).
    fn transfer_a<B: Bus>(&mut self, bus: &mut B, opcode: u8, address: u16) {
        if opcode & 0x10 == 0 {
            bus.write8(address, self.regs.a());
        } else {
            let value = bus.read8(address);
            self.regs.set_a(value);
        }
    }

    /// Address for the (BC)/(DE)/(HL+)/(HL-) forms; post-steps HL.
    fn indirect_address(&mut self, opcode: u8) -> u16 {
        let hl = self.regs.hl();
        match (opcode >> 4) & 0x03 {
            0 => self.regs.bc(),
            1 => self.regs.de(),
            2 => {
                self.regs.set_hl(hl.wrapping_add(1));
                hl
            }
            _ => {
                self.regs.set_hl(hl.wrapping_sub(1));
                hl
            }
        }
    }

    pub(super) fn exec_ld_rr_d16<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        let word = self.fetch16(bus);
        self.regs.set16(pair_slot(opcode), word);
        12
    }

    pub(super) fn exec_ld_r_d8<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        let slot = (opcode >> 3) & 0x07;
        let byte = self.fetch8(bus);
        self.write_reg8(bus, slot, byte);
        if slot == 6 { 12 } else { 8 }
    }

    /// LD r,r' over 0x40..=0x7F, HALT excluded.
    pub(super) fn exec_ld_r_r<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        debug_assert_ne!(opcode, 0x76);
        let (dst, src) = ((opcode >> 3) & 0x07, opcode & 0x07);
        let byte = self.read_reg8(bus, src);
        self.write_reg8(bus, dst, byte);
        if dst == 6 || src == 6 { 8 } else { 4 }
    }

    pub(super) fn exec_ld_a16_sp<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let address = self.fetch16(bus);
        bus.write16(address, self.regs.sp);
        20
    }

    /// LDH (a8),A / LDH A,(a8).
    pub(super) fn exec_ldh_a8<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        let address = 0xFF00 | u16::from(self.fetch8(bus));
        self.transfer_a(bus, opcode, address);
        12
    }

    /// LD (C),A / LD A,(C).
    pub(super) fn exec_ldh_c<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        let address = 0xFF00 | u16::from(self.regs.c());
        self.transfer_a(bus, opcode, address);
        8
    }

    /// LD (a16),A / LD A,(a16).
    pub(super) fn exec_ld_a16_a<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        let address = self.fetch16(bus);
        self.transfer_a(bus, opcode, address);
        16
    }

    pub(super) fn exec_ld_indirect_a<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        let address = self.indirect_address(opcode);
        bus.write8(address, self.regs.a());
        8
    }

    pub(super) fn exec_ld_a_indirect<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> u32 {
        let address = self.indirect_address(opcode);
        let value = bus.read8(address);
        self.regs.set_a(value);
        8
    }

    pub(super) fn exec_ld_sp_hl(&mut self) -> u32 {
        self.regs.sp = self.regs.hl();
        8
    }
}
